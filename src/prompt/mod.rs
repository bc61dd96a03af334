//! User-facing dialogs: the unsafe-volume confirmation and the exit notice.

pub mod console;
#[cfg(windows)]
mod message_box;
mod scripted;

pub use console::ConsolePrompt;
#[cfg(windows)]
pub use message_box::MessageBoxPrompt;
pub use scripted::ScriptedPrompt;

use std::sync::Arc;

pub const WARNING_TITLE: &str = "Warning!";
pub const WARNING_TEXT: &str =
    "High sound can damage your ears. Do you really want to increase volume to an unsafe level?";
pub const EXIT_TITLE: &str = "Volume Level Protector";
pub const EXIT_TEXT: &str = "Volume Level Protector is exiting now..";

/// The user's answer to the unsafe-volume question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    Affirm,
    Decline,
}

/// A blocking yes/no question about exceeding the ceiling.
///
/// `ask` may block for as long as the user takes; there is no timeout.
pub trait ConfirmPrompt: Send + Sync {
    fn ask(&self) -> PromptAnswer;
}

/// Modal dialog on Windows, terminal question elsewhere.
pub fn platform_prompt() -> Arc<dyn ConfirmPrompt> {
    #[cfg(windows)]
    {
        Arc::new(MessageBoxPrompt)
    }
    #[cfg(not(windows))]
    {
        Arc::new(ConsolePrompt)
    }
}

/// Tell the user the monitor is going away.
pub fn show_exit_notice() {
    #[cfg(windows)]
    message_box::show_notice(EXIT_TITLE, EXIT_TEXT);
    #[cfg(not(windows))]
    console::show_notice(EXIT_TITLE, EXIT_TEXT);
}
