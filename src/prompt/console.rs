use super::{ConfirmPrompt, PromptAnswer, WARNING_TEXT, WARNING_TITLE};
use std::io::{self, BufRead, Write};

/// Asks on stderr and reads the answer from stdin. Anything but yes declines.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

impl ConfirmPrompt for ConsolePrompt {
    fn ask(&self) -> PromptAnswer {
        {
            let mut stderr = io::stderr().lock();
            let _ = write!(stderr, "{WARNING_TITLE} {WARNING_TEXT} [y/N] ");
            let _ = stderr.flush();
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => PromptAnswer::Decline,
            Ok(_) => parse_answer(&line),
        }
    }
}

/// Interpret a typed answer; the default is "no".
pub fn parse_answer(input: &str) -> PromptAnswer {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => PromptAnswer::Affirm,
        _ => PromptAnswer::Decline,
    }
}

#[cfg_attr(windows, allow(dead_code))]
pub(super) fn show_notice(title: &str, text: &str) {
    eprintln!("{title}: {text}");
}
