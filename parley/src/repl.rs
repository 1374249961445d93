//! Interactive loop: reads lines, dispatches commands, prints replies.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pchat::{ChatSession, ExchangeError};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

const PROMPT: &str = "> ";
const THINKING: &str = "回應中...";

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Clear,
    Empty,
    Message(String),
}

/// Commands match the whole trimmed line, ignoring ASCII case. Anything else
/// is a message, sent as typed.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        Command::Exit
    } else if trimmed.eq_ignore_ascii_case("clear") || trimmed == "重新開始" {
        Command::Clear
    } else {
        Command::Message(line.to_string())
    }
}

/// Maps a 1-based menu answer to a catalog entry.
pub fn parse_model_choice<'a>(input: &str, models: &'a [String]) -> Option<&'a str> {
    let index = input.trim().parse::<usize>().ok()?;
    index
        .checked_sub(1)
        .and_then(|index| models.get(index))
        .map(String::as_str)
}

/// User-facing wording for a failed exchange. Library error text stays in
/// English for logs.
pub fn describe_error(error: &ExchangeError) -> String {
    match error {
        ExchangeError::Api { status, body } => format!("API 請求失敗：{status} - {body}"),
        ExchangeError::Transport {
            message,
            timed_out: true,
        } => format!("請求逾時：{message}"),
        ExchangeError::Transport { message, .. } => format!("無法連線到伺服器：{message}"),
        ExchangeError::Parse(message) => format!("無法解析 API 回應：{message}"),
        ExchangeError::InvalidRequest(message) => format!("無效的請求：{message}"),
    }
}

/// Asks which model to use until a valid number is entered. `None` means the
/// user closed input before choosing.
pub fn select_model(
    editor: &mut DefaultEditor,
    models: &[String],
) -> rustyline::Result<Option<String>> {
    println!();
    println!("請選擇使用的模型：");
    for (index, model) in models.iter().enumerate() {
        println!("({}) {model}", index + 1);
    }

    let prompt = format!("請輸入選項 (1 到 {})：", models.len());
    loop {
        match editor.readline(&prompt) {
            Ok(answer) => match parse_model_choice(&answer, models) {
                Some(model) => {
                    println!("已選擇：{model}");
                    println!();
                    return Ok(Some(model.to_string()));
                }
                None => println!(
                    "{}",
                    format!("無效的選項，請輸入 1 到 {}", models.len()).red()
                ),
            },
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err),
        }
    }
}

pub struct ChatRepl {
    editor: DefaultEditor,
    session: ChatSession,
}

impl ChatRepl {
    pub fn new(editor: DefaultEditor, session: ChatSession) -> Self {
        Self { editor, session }
    }

    pub async fn run(&mut self) -> rustyline::Result<()> {
        self.print_welcome();

        loop {
            let line = match self.editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("再見！");
                    break;
                }
                Err(err) => return Err(err),
            };

            match parse_command(&line) {
                Command::Empty => continue,
                Command::Exit => {
                    println!("再見！");
                    break;
                }
                Command::Clear => {
                    self.session.reset();
                    println!("{}", "對話歷史已清除，重新開始新的對話。".green());
                    println!();
                }
                Command::Message(text) => {
                    let _ = self.editor.add_history_entry(text.as_str());
                    self.exchange(&text).await;
                }
            }
        }

        tracing::info!(
            phase = "session",
            event = "closed",
            session_id = %self.session.id(),
            turns = self.session.turns().len()
        );
        Ok(())
    }

    fn print_welcome(&self) {
        println!("=== 對話助手 (使用模型: {}) ===", self.session.model());
        println!("輸入 'exit' 或 'quit' 來結束程式");
        println!("輸入 'clear' 或 '重新開始' 來清除對話歷史");
        println!();
    }

    async fn exchange(&mut self, text: &str) {
        println!("{}", text.dimmed());

        let spinner = thinking_spinner();
        let outcome = self.session.send(text).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(reply) => println!("{}", reply.yellow()),
            Err(err) => println!("{}", format!("錯誤：{}", describe_error(&err)).red()),
        }
        println!();
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(THINKING.dimmed().to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use pchat::ExchangeError;

    use super::{Command, describe_error, parse_command, parse_model_choice};

    #[test]
    fn commands_ignore_case_and_surrounding_space() {
        assert_eq!(parse_command("exit"), Command::Exit);
        assert_eq!(parse_command("  QUIT "), Command::Exit);
        assert_eq!(parse_command("Clear"), Command::Clear);
        assert_eq!(parse_command("重新開始"), Command::Clear);
        assert_eq!(parse_command(" 重新開始\t"), Command::Clear);
    }

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("   \t"), Command::Empty);
    }

    #[test]
    fn everything_else_is_a_message() {
        assert_eq!(
            parse_command("exit now"),
            Command::Message("exit now".to_string())
        );
        assert_eq!(
            parse_command("請問台北天氣？"),
            Command::Message("請問台北天氣？".to_string())
        );
    }

    #[test]
    fn model_choice_is_one_based_and_bounded() {
        let models = vec!["grok-3".to_string(), "grok-3-mini".to_string()];

        assert_eq!(parse_model_choice("1", &models), Some("grok-3"));
        assert_eq!(parse_model_choice(" 2 ", &models), Some("grok-3-mini"));
        assert_eq!(parse_model_choice("0", &models), None);
        assert_eq!(parse_model_choice("3", &models), None);
        assert_eq!(parse_model_choice("grok-3", &models), None);
        assert_eq!(parse_model_choice("", &models), None);
    }

    #[test]
    fn errors_are_described_in_traditional_chinese() {
        let api = ExchangeError::Api {
            status: 401,
            body: "invalid key".to_string(),
        };
        assert_eq!(describe_error(&api), "API 請求失敗：401 - invalid key");

        let timeout = ExchangeError::Transport {
            message: "deadline".to_string(),
            timed_out: true,
        };
        assert_eq!(describe_error(&timeout), "請求逾時：deadline");

        let refused = ExchangeError::Transport {
            message: "connection refused".to_string(),
            timed_out: false,
        };
        assert_eq!(describe_error(&refused), "無法連線到伺服器：connection refused");

        let parse = ExchangeError::Parse("no choices returned".to_string());
        assert_eq!(describe_error(&parse), "無法解析 API 回應：no choices returned");
    }
}
