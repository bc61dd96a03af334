//! Volume ceiling enforcement.
//!
//! [`VolumeGuard::evaluate`] runs on whatever thread the platform uses to deliver
//! volume notifications. It never waits on the user: an unsafe level is clamped
//! synchronously and the confirmation prompt is handed to a background thread.

pub mod gate;

use crate::endpoint::{clamp_level, VolumeEndpoint};
use crate::log_debug;
use crate::prompt::ConfirmPrompt;
use gate::{ConfirmationGate, ConfirmationOutcome};
use std::fmt;
use std::sync::Arc;
use std::thread;

/// Highest master volume scalar allowed while headphones are plugged in.
pub const VOLUME_CEILING: f32 = 0.7;

/// Whether `level` is above [`VOLUME_CEILING`]. The ceiling itself is allowed,
/// so the echo of a clamp is never a new violation.
pub fn exceeds_ceiling(level: f32) -> bool {
    level > VOLUME_CEILING
}

/// A volume change reported by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeEvent {
    level: f32,
}

impl VolumeEvent {
    pub fn new(level: f32) -> Self {
        Self { level }
    }

    /// Reported master volume scalar.
    pub fn level(self) -> f32 {
        self.level
    }
}

/// What the guard did with one event.
#[derive(Debug)]
pub enum Evaluation {
    /// The user already accepted unsafe levels for this run.
    OverrideActive,
    /// No headphones detected (or detection failed).
    JackDisconnected,
    /// Level is at or under the ceiling.
    WithinCeiling,
    /// Volume was forced down to the ceiling and a confirmation was dispatched.
    Clamped {
        /// Background confirmation, `None` if the worker could not be spawned.
        confirmation: Option<ConfirmationTask>,
    },
}

impl Evaluation {
    pub fn is_clamped(&self) -> bool {
        matches!(self, Evaluation::Clamped { .. })
    }

    /// Take the confirmation handle out of a clamped evaluation.
    pub fn into_confirmation(self) -> Option<ConfirmationTask> {
        match self {
            Evaluation::Clamped { confirmation } => confirmation,
            _ => None,
        }
    }
}

/// Handle to a confirmation worker. Dropping it detaches the worker.
pub struct ConfirmationTask {
    handle: thread::JoinHandle<ConfirmationOutcome>,
}

impl ConfirmationTask {
    /// Block until the worker finishes. `None` if the prompt panicked.
    pub fn wait(self) -> Option<ConfirmationOutcome> {
        self.handle.join().ok()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl fmt::Debug for ConfirmationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationTask")
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

/// Decides, per volume event, whether to clamp and whether to ask the user.
pub struct VolumeGuard {
    endpoint: Arc<dyn VolumeEndpoint>,
    gate: Arc<ConfirmationGate>,
    prompt: Arc<dyn ConfirmPrompt>,
}

impl VolumeGuard {
    pub fn new(endpoint: Arc<dyn VolumeEndpoint>, prompt: Arc<dyn ConfirmPrompt>) -> Self {
        Self {
            endpoint,
            gate: Arc::new(ConfirmationGate::new()),
            prompt,
        }
    }

    pub fn endpoint(&self) -> &dyn VolumeEndpoint {
        self.endpoint.as_ref()
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    /// Apply the ceiling policy to one event.
    ///
    /// Order matters: the override is checked before touching the device, and
    /// the jack query only happens when no override is in effect.
    pub fn evaluate(&self, event: VolumeEvent) -> Evaluation {
        if self.gate.is_override_active() {
            return Evaluation::OverrideActive;
        }
        if !self.endpoint.is_jack_connected() {
            return Evaluation::JackDisconnected;
        }
        if !exceeds_ceiling(event.level()) {
            return Evaluation::WithinCeiling;
        }

        self.clamp(event);
        Evaluation::Clamped {
            confirmation: self.dispatch_confirmation(),
        }
    }

    fn clamp(&self, event: VolumeEvent) {
        let target = clamp_level(VOLUME_CEILING);
        match self.endpoint.set_volume(target) {
            Ok(()) => {
                log_debug(&format!(
                    "clamped volume {:.3} -> {target:.3}",
                    event.level()
                ));
                tracing::info!(requested = event.level(), applied = target, "volume clamped");
            }
            Err(err) => {
                log_debug(&format!("clamp to {target:.3} failed: {err}"));
                tracing::warn!(requested = event.level(), error = %err, "volume clamp failed");
            }
        }
    }

    fn dispatch_confirmation(&self) -> Option<ConfirmationTask> {
        let gate = Arc::clone(&self.gate);
        let prompt = Arc::clone(&self.prompt);
        let spawned = thread::Builder::new()
            .name("volume-confirm".to_string())
            .spawn(move || gate.request_confirmation(prompt.as_ref()));
        match spawned {
            Ok(handle) => Some(ConfirmationTask { handle }),
            Err(err) => {
                log_debug(&format!("failed to spawn confirmation worker: {err}"));
                tracing::warn!(error = %err, "confirmation worker not started");
                None
            }
        }
    }
}

impl crate::notify::VolumeListener for VolumeGuard {
    fn on_volume_changed(&self, event: VolumeEvent) {
        // The confirmation task is detached; nothing on this thread waits for it.
        let _ = self.evaluate(event);
    }
}
