use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::application::PromptDispatcher;
use crate::domain::{ChatHistoryEntry, TaskRequest, Transcript};

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    GenerateQuestions,
    AskQuestion,
    ReviewCode,
    SolveProblem,
    Chat,
    ResetConversation,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::GenerateQuestions),
            "2" => Some(Self::AskQuestion),
            "3" => Some(Self::ReviewCode),
            "4" => Some(Self::SolveProblem),
            "5" => Some(Self::Chat),
            "6" => Some(Self::ResetConversation),
            "7" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Interactive numbered menu over any line reader and writer.
///
/// Requests run one at a time; a failed request is reported and the menu is
/// shown again. The chat transcript is kept for this session only and is
/// never sent to the model.
pub struct ConsoleMenu<R, W> {
    dispatcher: Arc<PromptDispatcher>,
    input: R,
    output: W,
    transcript: Transcript,
    spinner: bool,
}

impl<R: BufRead, W: Write> ConsoleMenu<R, W> {
    pub fn new(dispatcher: Arc<PromptDispatcher>, input: R, output: W) -> Self {
        Self {
            dispatcher,
            input,
            output,
            transcript: Transcript::new(),
            spinner: false,
        }
    }

    /// Show an indicatif spinner on stderr instead of a progress line.
    pub fn with_spinner(mut self, spinner: bool) -> Self {
        self.spinner = spinner;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user picks Exit or input ends.
    pub async fn run(&mut self) -> io::Result<()> {
        self.print_banner()?;

        loop {
            self.print_menu()?;

            let Some(choice) = self.prompt("\nEnter your choice (1-7): ")? else {
                break;
            };

            match MenuChoice::parse(&choice) {
                Some(MenuChoice::GenerateQuestions) => {
                    let Some(topic) = self.prompt("\nEnter topic: ")? else {
                        break;
                    };
                    let Some(count) = self.prompt("Number of questions (default 5): ")? else {
                        break;
                    };

                    let count = match count.trim() {
                        "" => None,
                        raw => match raw.parse::<u32>() {
                            Ok(n) => Some(n),
                            Err(_) => {
                                writeln!(self.output, "\n❌ Invalid number of questions: {raw}")?;
                                continue;
                            }
                        },
                    };

                    let task = TaskRequest::generate_questions(topic, None, count);
                    self.execute("Generating questions...", task).await?;
                }
                Some(MenuChoice::AskQuestion) => {
                    let Some(question) = self.prompt("\nEnter your question: ")? else {
                        break;
                    };
                    self.execute("Processing...", TaskRequest::answer_question(question)).await?;
                }
                Some(MenuChoice::ReviewCode) => {
                    writeln!(
                        self.output,
                        "\nEnter your code (press Enter twice when done):"
                    )?;
                    self.output.flush()?;
                    let Some(code) = read_code_block(&mut self.input)? else {
                        break;
                    };
                    let Some(context) = self.prompt("\nContext (optional): ")? else {
                        break;
                    };
                    let task = TaskRequest::review_code(code, Some(context.as_str()));
                    self.execute("Reviewing code...", task).await?;
                }
                Some(MenuChoice::SolveProblem) => {
                    let Some(problem) = self.prompt("\nDescribe your problem: ")? else {
                        break;
                    };
                    self.execute("Solving problem...", TaskRequest::solve_problem(problem)).await?;
                }
                Some(MenuChoice::Chat) => {
                    let Some(message) = self.prompt("\nYour message: ")? else {
                        break;
                    };
                    let task = TaskRequest::free_chat(message.clone());
                    if let Some(response) = self.execute("Processing...", task).await? {
                        self.transcript.push(ChatHistoryEntry::new(message, response));
                    }
                }
                Some(MenuChoice::ResetConversation) => {
                    self.transcript.clear();
                    writeln!(self.output, "Conversation reset successfully!")?;
                }
                Some(MenuChoice::Exit) => {
                    writeln!(
                        self.output,
                        "\n👋 Thank you for using Data Science Expert AI Agent!"
                    )?;
                    break;
                }
                None => {
                    writeln!(self.output, "\n❌ Invalid choice. Please try again.")?;
                }
            }
        }

        self.output.flush()
    }

    /// Dispatch one task and print its outcome. Returns the response on success.
    async fn execute(&mut self, label: &str, task: TaskRequest) -> io::Result<Option<String>> {
        if let Some(warning) = task.missing_input() {
            writeln!(self.output, "\n⚠️ {warning}")?;
            return Ok(None);
        }

        let progress = if self.spinner {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_message(label.to_string());
            bar.enable_steady_tick(Duration::from_millis(100));
            Some(bar)
        } else {
            writeln!(self.output, "\n🔄 {label}\n")?;
            self.output.flush()?;
            None
        };

        let result = self.dispatcher.dispatch(&task).await;

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        match result {
            Ok(response) => {
                writeln!(self.output, "{response}")?;
                Ok(Some(response))
            }
            Err(e) => {
                debug!("{} request failed: {}", task.kind(), e);
                writeln!(self.output, "\n❌ Error: {e}")?;
                Ok(None)
            }
        }
    }

    fn print_banner(&mut self) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "🤖 DATA SCIENCE EXPERT AI AGENT")?;
        writeln!(self.output, "{rule}")
    }

    fn print_menu(&mut self) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "\n{rule}")?;
        writeln!(self.output, "MENU OPTIONS:")?;
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "1. Generate Hard Questions")?;
        writeln!(self.output, "2. Ask a Question")?;
        writeln!(self.output, "3. Review Code")?;
        writeln!(self.output, "4. Solve a Problem")?;
        writeln!(self.output, "5. Chat with Agent")?;
        writeln!(self.output, "6. Reset Conversation")?;
        writeln!(self.output, "7. Exit")?;
        writeln!(self.output, "{rule}")
    }

    /// Print `label` and read one line. `None` means input is exhausted.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        read_line(&mut self.input)
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Read lines until two consecutive blank lines and join them, dropping the
/// first blank of the terminating pair. A blank first line counts as code.
///
/// End of input also terminates the block; `None` only when nothing was read.
pub fn read_code_block<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut lines: Vec<String> = Vec::new();

    loop {
        match read_line(input)? {
            Some(line) => {
                if line.is_empty() && lines.last().is_some_and(|l| l.is_empty()) {
                    lines.pop();
                    break;
                }
                lines.push(line);
            }
            None if lines.is_empty() => return Ok(None),
            None => {
                if lines.last().is_some_and(|l| l.is_empty()) {
                    lines.pop();
                }
                break;
            }
        }
    }

    Ok(Some(lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn menu_choice_parses_digits_only() {
        assert_eq!(MenuChoice::parse(" 3 "), Some(MenuChoice::ReviewCode));
        assert_eq!(MenuChoice::parse("7"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("8"), None);
        assert_eq!(MenuChoice::parse("exit"), None);
    }

    #[test]
    fn code_block_stops_at_two_blank_lines() {
        let mut input = Cursor::new("import pandas as pd\n\ndf = pd.read_csv('x')\n\n\nafter\n");
        let code = read_code_block(&mut input).unwrap().unwrap();
        assert_eq!(code, "import pandas as pd\n\ndf = pd.read_csv('x')");

        let rest = read_line(&mut input).unwrap();
        assert_eq!(rest.as_deref(), Some("after"));
    }

    #[test]
    fn code_block_keeps_leading_blank_line() {
        let mut input = Cursor::new("\nx = 1\n\n\n");
        let code = read_code_block(&mut input).unwrap().unwrap();
        assert_eq!(code, "\nx = 1");
    }

    #[test]
    fn code_block_ends_at_eof() {
        let mut input = Cursor::new("x = 1\r\ny = 2\n\n");
        let code = read_code_block(&mut input).unwrap().unwrap();
        assert_eq!(code, "x = 1\ny = 2");

        let mut empty = Cursor::new("");
        assert!(read_code_block(&mut empty).unwrap().is_none());
    }
}
