use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DIFFICULTY: &str = "expert";
pub const DEFAULT_QUESTION_COUNT: u32 = 5;

/// Difficulty levels offered by the front ends. Any free-form level is accepted
/// by the templates; this list only drives pickers.
pub const DIFFICULTY_LEVELS: [&str; 4] = ["beginner", "intermediate", "expert", "research-level"];

const EXPERT_PREFIX: &str = "As a 100-year experienced Data Science expert";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    GenerateQuestions,
    AnswerQuestion,
    ReviewCode,
    SolveProblem,
    FreeChat,
}

impl TaskKind {
    pub const ALL: [TaskKind; 5] = [
        TaskKind::GenerateQuestions,
        TaskKind::AnswerQuestion,
        TaskKind::ReviewCode,
        TaskKind::SolveProblem,
        TaskKind::FreeChat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::GenerateQuestions => "generate-questions",
            TaskKind::AnswerQuestion => "answer-question",
            TaskKind::ReviewCode => "review-code",
            TaskKind::SolveProblem => "solve-problem",
            TaskKind::FreeChat => "free-chat",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user task, built per call and dropped once the request string exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskRequest {
    GenerateQuestions {
        topic: String,
        difficulty: String,
        count: u32,
    },
    AnswerQuestion {
        question: String,
    },
    ReviewCode {
        code: String,
        context: String,
    },
    SolveProblem {
        description: String,
    },
    FreeChat {
        message: String,
    },
}

impl TaskRequest {
    pub fn generate_questions(
        topic: impl Into<String>,
        difficulty: Option<&str>,
        count: Option<u32>,
    ) -> Self {
        Self::GenerateQuestions {
            topic: topic.into(),
            difficulty: difficulty.unwrap_or(DEFAULT_DIFFICULTY).to_string(),
            count: count.unwrap_or(DEFAULT_QUESTION_COUNT),
        }
    }

    pub fn answer_question(question: impl Into<String>) -> Self {
        Self::AnswerQuestion {
            question: question.into(),
        }
    }

    pub fn review_code(code: impl Into<String>, context: Option<&str>) -> Self {
        Self::ReviewCode {
            code: code.into(),
            context: context.unwrap_or_default().to_string(),
        }
    }

    pub fn solve_problem(description: impl Into<String>) -> Self {
        Self::SolveProblem {
            description: description.into(),
        }
    }

    pub fn free_chat(message: impl Into<String>) -> Self {
        Self::FreeChat {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Self::GenerateQuestions { .. } => TaskKind::GenerateQuestions,
            Self::AnswerQuestion { .. } => TaskKind::AnswerQuestion,
            Self::ReviewCode { .. } => TaskKind::ReviewCode,
            Self::SolveProblem { .. } => TaskKind::SolveProblem,
            Self::FreeChat { .. } => TaskKind::FreeChat,
        }
    }

    /// The user-supplied text the task is about.
    pub fn primary_input(&self) -> &str {
        match self {
            Self::GenerateQuestions { topic, .. } => topic,
            Self::AnswerQuestion { question } => question,
            Self::ReviewCode { code, .. } => code,
            Self::SolveProblem { description } => description,
            Self::FreeChat { message } => message,
        }
    }

    /// Presence check for the required field. Returns the warning to show when
    /// it is blank.
    pub fn missing_input(&self) -> Option<&'static str> {
        if !self.primary_input().trim().is_empty() {
            return None;
        }

        Some(match self.kind() {
            TaskKind::GenerateQuestions => "Please enter a topic",
            TaskKind::AnswerQuestion => "Please enter a question",
            TaskKind::ReviewCode => "Please paste some code to review",
            TaskKind::SolveProblem => "Please describe your problem",
            TaskKind::FreeChat => "Please enter a message",
        })
    }

    /// Render the task body that follows the persona in the outbound request.
    pub fn render(&self) -> String {
        match self {
            Self::GenerateQuestions {
                topic,
                difficulty,
                count,
            } => format!(
                "{EXPERT_PREFIX}, generate {count} {difficulty}-level questions on {topic}.

Make these questions:
- Highly challenging and thought-provoking
- Industry/research-level difficulty
- Requiring deep understanding and practical knowledge
- Include edge cases and real-world scenarios

Format each question clearly with numbering."
            ),
            Self::AnswerQuestion { question } => format!(
                "{EXPERT_PREFIX}, provide a comprehensive answer to:

{question}

Include:
- Detailed explanation
- Mathematical foundations (if applicable)
- Code examples (Python/SQL when relevant)
- Best practices
- Common pitfalls to avoid
- Real-world applications"
            ),
            Self::ReviewCode { code, context } => format!(
                "{EXPERT_PREFIX}, review this code:

Context: {context}

Code:
```
{code}
```

Provide:
- Code quality assessment
- Performance optimization suggestions
- Best practices recommendations
- Potential bugs or issues
- Improved version of the code"
            ),
            Self::SolveProblem { description } => format!(
                "{EXPERT_PREFIX}, solve this problem:

{description}

Provide:
- Problem analysis
- Multiple solution approaches
- Step-by-step implementation
- Code examples
- Trade-offs and recommendations"
            ),
            Self::FreeChat { message } => message.clone(),
        }
    }
}
