//! Single-prompt confirmation gate and the session override flag.

use crate::lock_or_recover;
use crate::log_debug;
use crate::prompt::{ConfirmPrompt, PromptAnswer};
use std::sync::Mutex;

/// Result of one call to [`ConfirmationGate::request_confirmation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// The user accepted unsafe levels; the override is now active.
    Granted,
    /// The user said no; the ceiling stays in force.
    Declined,
    /// Another prompt was already open, nothing was shown.
    AlreadyPending,
}

/// Owns the override flag and the "prompt on screen" flag.
///
/// Each flag has its own mutex and is only touched through these methods.
/// The in-progress flag is checked and set under one lock acquisition, so two
/// workers racing into [`request_confirmation`](Self::request_confirmation)
/// cannot both get past the check.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    override_granted: Mutex<bool>,
    warning_in_progress: Mutex<bool>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_override_active(&self) -> bool {
        *lock_or_recover(&self.override_granted, "override flag")
    }

    pub fn is_warning_in_progress(&self) -> bool {
        *lock_or_recover(&self.warning_in_progress, "warning flag")
    }

    /// Show the prompt unless one is already open, and record consent.
    ///
    /// Blocks for as long as the prompt does; call it off the notification thread.
    pub fn request_confirmation(&self, prompt: &dyn ConfirmPrompt) -> ConfirmationOutcome {
        let Some(_slot) = self.claim_warning() else {
            log_debug("confirmation already on screen; skipping");
            return ConfirmationOutcome::AlreadyPending;
        };

        let outcome = match prompt.ask() {
            PromptAnswer::Affirm => {
                *lock_or_recover(&self.override_granted, "override flag") = true;
                ConfirmationOutcome::Granted
            }
            PromptAnswer::Decline => ConfirmationOutcome::Declined,
        };
        log_debug(&format!("confirmation finished: {outcome:?}"));
        tracing::info!(outcome = ?outcome, "confirmation answered");
        outcome
    }

    fn claim_warning(&self) -> Option<WarningSlot<'_>> {
        let mut in_progress = lock_or_recover(&self.warning_in_progress, "warning flag");
        if *in_progress {
            return None;
        }
        *in_progress = true;
        Some(WarningSlot { gate: self })
    }
}

/// Clears the in-progress flag when the prompt returns or unwinds.
struct WarningSlot<'a> {
    gate: &'a ConfirmationGate,
}

impl Drop for WarningSlot<'_> {
    fn drop(&mut self) {
        *lock_or_recover(&self.gate.warning_in_progress, "warning flag") = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;
    use crossbeam_channel::{bounded, Receiver, Sender};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    struct HeldPrompt {
        entered: Sender<()>,
        release: Receiver<PromptAnswer>,
    }

    impl ConfirmPrompt for HeldPrompt {
        fn ask(&self) -> PromptAnswer {
            let _ = self.entered.send(());
            self.release.recv().unwrap_or(PromptAnswer::Decline)
        }
    }

    struct PanickingPrompt;

    impl ConfirmPrompt for PanickingPrompt {
        fn ask(&self) -> PromptAnswer {
            panic!("dialog failed");
        }
    }

    #[test]
    fn starts_idle_without_override() {
        let gate = ConfirmationGate::new();
        assert!(!gate.is_override_active());
        assert!(!gate.is_warning_in_progress());
    }

    #[test]
    fn affirm_sets_override_and_clears_warning() {
        let gate = ConfirmationGate::new();
        let prompt = ScriptedPrompt::always(PromptAnswer::Affirm);
        assert_eq!(
            gate.request_confirmation(&prompt),
            ConfirmationOutcome::Granted
        );
        assert!(gate.is_override_active());
        assert!(!gate.is_warning_in_progress());
    }

    #[test]
    fn decline_leaves_override_off() {
        let gate = ConfirmationGate::new();
        let prompt = ScriptedPrompt::always(PromptAnswer::Decline);
        assert_eq!(
            gate.request_confirmation(&prompt),
            ConfirmationOutcome::Declined
        );
        assert!(!gate.is_override_active());
        assert!(!gate.is_warning_in_progress());
    }

    #[test]
    fn override_is_never_revoked_by_later_decline() {
        let gate = ConfirmationGate::new();
        let prompt = ScriptedPrompt::new([PromptAnswer::Affirm, PromptAnswer::Decline]);
        gate.request_confirmation(&prompt);
        gate.request_confirmation(&prompt);
        assert!(gate.is_override_active());
        assert_eq!(prompt.times_asked(), 2);
    }

    #[test]
    fn second_request_while_prompt_open_is_a_no_op() {
        let gate = Arc::new(ConfirmationGate::new());
        let (entered_tx, entered_rx) = bounded(1);
        let (release_tx, release_rx) = bounded(1);
        let held = Arc::new(HeldPrompt {
            entered: entered_tx,
            release: release_rx,
        });

        let worker_gate = Arc::clone(&gate);
        let worker_prompt = Arc::clone(&held);
        let worker =
            thread::spawn(move || worker_gate.request_confirmation(worker_prompt.as_ref()));
        entered_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("first prompt should open");
        assert!(gate.is_warning_in_progress());

        let other = ScriptedPrompt::always(PromptAnswer::Affirm);
        assert_eq!(
            gate.request_confirmation(&other),
            ConfirmationOutcome::AlreadyPending
        );
        assert_eq!(other.times_asked(), 0);

        release_tx.send(PromptAnswer::Decline).unwrap();
        assert_eq!(worker.join().unwrap(), ConfirmationOutcome::Declined);
        assert!(!gate.is_warning_in_progress());
        assert!(!gate.is_override_active());
    }

    #[test]
    fn warning_flag_clears_when_prompt_panics() {
        let gate = ConfirmationGate::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            gate.request_confirmation(&PanickingPrompt)
        }));
        assert!(result.is_err());
        assert!(!gate.is_warning_in_progress());

        let prompt = ScriptedPrompt::always(PromptAnswer::Affirm);
        assert_eq!(
            gate.request_confirmation(&prompt),
            ConfirmationOutcome::Granted
        );
    }
}
