use std::fmt::Write;

use serde::Deserialize;

use crate::domain::{
    TaskRequest, Transcript, DEFAULT_DIFFICULTY, DEFAULT_QUESTION_COUNT, DIFFICULTY_LEVELS,
};

pub const MAX_QUESTION_COUNT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Chat,
    Questions,
    Answer,
    Review,
    Solve,
}

impl Panel {
    pub const ALL: [Panel; 5] = [
        Panel::Chat,
        Panel::Questions,
        Panel::Answer,
        Panel::Review,
        Panel::Solve,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Panel::Chat => "chat",
            Panel::Questions => "questions",
            Panel::Answer => "answer",
            Panel::Review => "review",
            Panel::Solve => "solve",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.slug() == slug)
    }

    fn label(&self) -> &'static str {
        match self {
            Panel::Chat => "💬 Chat with Agent",
            Panel::Questions => "❓ Generate Questions",
            Panel::Answer => "🔍 Ask a Question",
            Panel::Review => "📝 Review Code",
            Panel::Solve => "🧩 Solve a Problem",
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Panel::Chat => "💬 Chat with Data Science Expert",
            Panel::Questions => "❓ Generate Hard Questions",
            Panel::Answer => "🔍 Ask a Question",
            Panel::Review => "📝 Code Review",
            Panel::Solve => "🧩 Solve a Data Science Problem",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Panel::Chat => "✅ Response received!",
            Panel::Questions => "✅ Questions generated successfully!",
            Panel::Answer => "✅ Answer generated!",
            Panel::Review => "✅ Code review completed!",
            Panel::Solve => "✅ Solution generated!",
        }
    }
}

/// Fields posted by any panel form; each panel reads only its own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelForm {
    pub message: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub count: Option<String>,
    pub question: Option<String>,
    pub code: Option<String>,
    pub context: Option<String>,
    pub problem: Option<String>,
}

impl PanelForm {
    /// Build the task for `panel`. A question count that is not a number is
    /// reported as a warning; numbers are clamped to 1..=20.
    pub fn to_task(&self, panel: Panel) -> Result<TaskRequest, &'static str> {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();

        Ok(match panel {
            Panel::Chat => TaskRequest::free_chat(field(&self.message)),
            Panel::Questions => {
                let count = match self.count.as_deref().map(str::trim) {
                    None | Some("") => None,
                    Some(raw) => Some(
                        raw.parse::<u32>()
                            .map_err(|_| "Number of questions must be a whole number")?
                            .clamp(1, MAX_QUESTION_COUNT),
                    ),
                };
                let difficulty = self
                    .difficulty
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty());
                TaskRequest::generate_questions(field(&self.topic), difficulty, count)
            }
            Panel::Answer => TaskRequest::answer_question(field(&self.question)),
            Panel::Review => TaskRequest::review_code(field(&self.code), self.context.as_deref()),
            Panel::Solve => TaskRequest::solve_problem(field(&self.problem)),
        })
    }
}

/// Banner shown above a panel after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success { message: String, body: String },
    Warning(String),
    Error(String),
}

pub struct PageView<'a> {
    pub session_id: &'a str,
    pub panel: Panel,
    pub transcript: &'a Transcript,
    pub notice: Option<&'a Notice>,
    pub form: &'a PanelForm,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "
body { font-family: sans-serif; margin: 0; display: flex; }
nav { width: 18rem; padding: 1rem; background: #f3f3f3; min-height: 100vh; }
nav a { display: block; padding: 0.4rem 0; }
nav a.active { font-weight: bold; }
main { flex: 1; padding: 2rem; }
button { width: 100%; background-color: #4CAF50; color: white; border: 0; border-radius: 5px; padding: 0.5rem 1rem; font-size: 16px; }
button:hover { background-color: #45a049; }
textarea, input, select { width: 100%; margin: 0.3rem 0 1rem; }
pre { white-space: pre-wrap; background: #fafafa; padding: 1rem; border-radius: 0.5rem; }
.success-box { padding: 1rem; border-radius: 0.5rem; background-color: #d4edda; border: 1px solid #c3e6cb; color: #155724; margin: 1rem 0; }
.warning-box { padding: 1rem; border-radius: 0.5rem; background-color: #fff3cd; border: 1px solid #ffeeba; color: #856404; margin: 1rem 0; }
.error-box { padding: 1rem; border-radius: 0.5rem; background-color: #f8d7da; border: 1px solid #f5c6cb; color: #721c24; margin: 1rem 0; }
.user, .assistant { margin: 0.5rem 0; }
footer { text-align: center; color: #666; margin-top: 2rem; }
";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

pub fn render_page(view: &PageView<'_>) -> String {
    let id = escape_html(view.session_id);
    let mut body = String::new();

    let _ = write!(body, "<nav>\n<h2>🎯 Features</h2>\n");
    for panel in Panel::ALL {
        let class = if panel == view.panel {
            " class=\"active\""
        } else {
            ""
        };
        let _ = writeln!(
            body,
            "<a href=\"/sessions/{id}/{}\"{class}>{}</a>",
            panel.slug(),
            panel.label()
        );
    }
    let _ = write!(
        body,
        "<hr>\n<details><summary>ℹ️ About</summary>\n<p>This AI agent is powered by Google's Gemini 2.5 Flash model and provides expert-level assistance in data science &amp; ML, code review &amp; optimization, problem solving, question generation and expert consultations.</p>\n</details>\n\
         <form method=\"post\" action=\"/sessions/{id}/clear\"><button type=\"submit\">🗑️ Clear Chat History</button></form>\n\
         <form method=\"post\" action=\"/sessions/{id}/end\"><button type=\"submit\">End Session</button></form>\n</nav>\n"
    );

    let _ = write!(
        body,
        "<main>\n<h1>🤖 Data Science Expert AI Agent</h1>\n<h3>Your AI-Powered Data Science Assistant</h3>\n<hr>\n<h2>{}</h2>\n",
        view.panel.heading()
    );

    if view.panel == Panel::Chat {
        for entry in view.transcript.entries() {
            let _ = write!(
                body,
                "<div class=\"user\"><strong>You</strong><pre>{}</pre></div>\n<div class=\"assistant\"><strong>Assistant</strong><pre>{}</pre></div>\n",
                escape_html(entry.user()),
                escape_html(entry.assistant())
            );
        }
    }

    match view.notice {
        Some(Notice::Success { message, body: text }) => {
            let _ = write!(
                body,
                "<div class=\"success-box\">{}</div>\n<pre class=\"result\">{}</pre>\n",
                escape_html(message),
                escape_html(text)
            );
        }
        Some(Notice::Warning(text)) => {
            let text = escape_html(text);
            let _ = writeln!(body, "<div class=\"warning-box\">⚠️ {text}</div>");
        }
        Some(Notice::Error(text)) => {
            let text = escape_html(text);
            let _ = writeln!(body, "<div class=\"error-box\">❌ Error: {text}</div>");
        }
        None => {}
    }

    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/sessions/{id}/{}\">",
        view.panel.slug()
    );
    body.push_str(&render_fields(view.panel, view.form));
    body.push_str("</form>\n");

    body.push_str(
        "<footer><hr><p>Powered by Google Gemini 2.5 Flash | Built with Rust</p></footer>\n</main>",
    );

    layout("Data Science Expert AI Agent", &body)
}

fn render_fields(panel: Panel, form: &PanelForm) -> String {
    let value = |v: &Option<String>| escape_html(v.as_deref().unwrap_or_default());

    match panel {
        Panel::Chat => format!(
            "<label>Your message<textarea name=\"message\" rows=\"3\" \
             placeholder=\"Ask me anything about data science...\">{}</textarea></label>\n\
             <button type=\"submit\">Send</button>\n",
            value(&form.message)
        ),
        Panel::Questions => {
            let selected = form
                .difficulty
                .as_deref()
                .filter(|d| DIFFICULTY_LEVELS.contains(d))
                .unwrap_or(DEFAULT_DIFFICULTY);
            let count = form
                .count
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .map(escape_html)
                .unwrap_or_else(|| DEFAULT_QUESTION_COUNT.to_string());

            let mut options = String::new();
            for level in DIFFICULTY_LEVELS {
                let attr = if level == selected { " selected" } else { "" };
                let _ = writeln!(options, "<option value=\"{level}\"{attr}>{level}</option>");
            }

            format!(
                "<label>Enter topic:<input type=\"text\" name=\"topic\" value=\"{}\" placeholder=\"e.g., Neural Networks, Time Series, A/B Testing\"></label>\n\
                 <label>Number of questions:<input type=\"number\" name=\"count\" min=\"1\" max=\"{MAX_QUESTION_COUNT}\" value=\"{count}\"></label>\n\
                 <label>Difficulty level:<select name=\"difficulty\">\n{options}</select></label>\n\
                 <button type=\"submit\">🚀 Generate Questions</button>\n",
                value(&form.topic)
            )
        }
        Panel::Answer => format!(
            "<label>Enter your data science question:<textarea name=\"question\" rows=\"6\" placeholder=\"e.g., What is the difference between L1 and L2 regularization?\">{}</textarea></label>\n\
             <button type=\"submit\">🔎 Get Answer</button>\n",
            value(&form.question)
        ),
        Panel::Review => format!(
            "<label>Context (optional):<input type=\"text\" name=\"context\" value=\"{}\" placeholder=\"e.g., This code trains a random forest model\"></label>\n\
             <label>Paste your code here:<textarea name=\"code\" rows=\"14\">{}</textarea></label>\n\
             <button type=\"submit\">🔍 Review Code</button>\n",
            value(&form.context),
            value(&form.code)
        ),
        Panel::Solve => format!(
            "<label>Describe your problem:<textarea name=\"problem\" rows=\"8\" placeholder=\"Example: I have an imbalanced dataset with 95% negative class and 5% positive class.\">{}</textarea></label>\n\
             <button type=\"submit\">🚀 Solve Problem</button>\n",
            value(&form.problem)
        ),
    }
}

pub fn render_not_found() -> String {
    layout(
        "Session not found",
        "<main>\n<h1>Session not found</h1>\n<p>This session has ended or never existed.</p>\n<p><a href=\"/\">Start a new session</a></p>\n</main>",
    )
}

pub fn render_session_ended() -> String {
    layout(
        "Session ended",
        "<main>\n<h1>Session ended</h1>\n<p>Your chat history has been discarded.</p>\n<p><a href=\"/\">Start a new session</a></p>\n</main>",
    )
}
