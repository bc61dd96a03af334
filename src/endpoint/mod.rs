//! Access to the default audio render endpoint.
//!
//! The endpoint is opened once at startup and never reopened, even if the user
//! switches the default output device later in the session.

pub mod jack;
/// In-memory endpoint for unit and integration tests; no audio hardware needed.
pub mod mock;
#[cfg(windows)]
mod wasapi;

use crate::notify::{Subscription, VolumeListener};
use jack::TopologyStep;
use std::sync::Arc;

/// Failures talking to the platform audio stack.
///
/// Only [`EndpointError::DeviceUnavailable`] and
/// [`EndpointError::NotificationRegistrationFailed`] ever leave the startup
/// path; everything else is absorbed where it happens.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// No default render endpoint, or the audio service could not be reached.
    #[error("default audio render device unavailable: {reason}")]
    DeviceUnavailable {
        /// What failed while opening the device.
        reason: String,
    },

    /// A step of the jack topology walk failed.
    #[error("jack topology query failed at {step}: {reason}")]
    TopologyQueryFailed {
        /// Which step of the walk failed.
        step: TopologyStep,
        /// Platform error text.
        reason: String,
    },

    /// The volume-change subscription could not be established.
    #[error("volume notification registration failed: {reason}")]
    NotificationRegistrationFailed {
        /// Platform error text.
        reason: String,
    },

    /// Reading or writing the master volume failed.
    #[error("master volume call failed: {reason}")]
    VolumeControl {
        /// Platform error text.
        reason: String,
    },
}

impl EndpointError {
    pub fn device_unavailable(reason: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            reason: reason.into(),
        }
    }

    pub fn topology(step: TopologyStep, reason: impl Into<String>) -> Self {
        Self::TopologyQueryFailed {
            step,
            reason: reason.into(),
        }
    }

    pub fn registration(reason: impl Into<String>) -> Self {
        Self::NotificationRegistrationFailed {
            reason: reason.into(),
        }
    }

    pub fn volume_control(reason: impl Into<String>) -> Self {
        Self::VolumeControl {
            reason: reason.into(),
        }
    }
}

/// Handle to one audio render endpoint.
///
/// Implementations are shared between the notification thread and the
/// confirmation thread, so they must be `Send + Sync`.
pub trait VolumeEndpoint: Send + Sync {
    /// Human-readable endpoint identifier for logs and `--probe`.
    fn describe(&self) -> String;

    /// Current master volume scalar.
    fn volume(&self) -> Result<f32, EndpointError>;

    /// Set the master volume scalar. Callers pass a level already inside [0, 1].
    fn set_volume(&self, level: f32) -> Result<(), EndpointError>;

    /// Whether a cable is plugged into the endpoint's output jack.
    ///
    /// Any failure while asking reads as `false`.
    fn is_jack_connected(&self) -> bool;

    /// Deliver every future volume change to `listener`.
    fn subscribe(&self, listener: Arc<dyn VolumeListener>) -> Result<Subscription, EndpointError>;
}

/// Clamp a requested level into the scalar range the platform accepts.
pub fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        return 0.0;
    }
    level.clamp(0.0, 1.0)
}

/// Open the system default render endpoint.
#[cfg(windows)]
pub fn open_default() -> Result<Arc<dyn VolumeEndpoint>, EndpointError> {
    let endpoint = wasapi::WasapiEndpoint::open()?;
    Ok(Arc::new(endpoint))
}

/// Open the system default render endpoint.
#[cfg(not(windows))]
pub fn open_default() -> Result<Arc<dyn VolumeEndpoint>, EndpointError> {
    Err(EndpointError::device_unavailable(
        "endpoint volume control requires the Windows audio service",
    ))
}
