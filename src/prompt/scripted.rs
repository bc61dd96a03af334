use super::{ConfirmPrompt, PromptAnswer};
use crate::lock_or_recover;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Prompt that replays canned answers, for exercising the guard without a UI.
///
/// Once the script runs out every further question gets the fallback answer.
#[derive(Debug)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<PromptAnswer>>,
    fallback: PromptAnswer,
    asked: AtomicUsize,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = PromptAnswer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            fallback: PromptAnswer::Decline,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn always(answer: PromptAnswer) -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            fallback: answer,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl ConfirmPrompt for ScriptedPrompt {
    fn ask(&self) -> PromptAnswer {
        self.asked.fetch_add(1, Ordering::SeqCst);
        lock_or_recover(&self.answers, "scripted prompt")
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_script_then_falls_back() {
        let prompt = ScriptedPrompt::new([PromptAnswer::Affirm]);
        assert_eq!(prompt.ask(), PromptAnswer::Affirm);
        assert_eq!(prompt.ask(), PromptAnswer::Decline);
        assert_eq!(prompt.times_asked(), 2);
    }
}
