//! Delivery of endpoint volume changes to the guard.
//!
//! The platform calls back on a thread it owns, at any time, including from
//! inside our own `set_volume` call. Listeners must be quick and must not block.

#[cfg(windows)]
pub(crate) mod wasapi;

use crate::endpoint::{EndpointError, VolumeEndpoint};
use crate::guard::VolumeEvent;
use crate::log_debug;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Receives volume-change notifications.
pub trait VolumeListener: Send + Sync {
    fn on_volume_changed(&self, event: VolumeEvent);
}

/// Keeps a platform registration alive. Delivery stops once this is dropped
/// (or, for platforms without explicit unregistration, when the process exits).
pub struct Subscription {
    _registration: Box<dyn Any>,
}

impl Subscription {
    pub fn new<T: 'static>(registration: T) -> Self {
        Self {
            _registration: Box::new(registration),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}

/// The one registration between an endpoint and its listener.
#[derive(Debug)]
pub struct NotificationSource {
    endpoint: String,
    _subscription: Subscription,
}

impl NotificationSource {
    /// Subscribe `listener` to `endpoint`. Done once, right after the endpoint opens.
    pub fn register(
        endpoint: &dyn VolumeEndpoint,
        listener: Arc<dyn VolumeListener>,
    ) -> Result<Self, EndpointError> {
        let label = endpoint.describe();
        let subscription = endpoint.subscribe(listener).inspect_err(|err| {
            log_debug(&format!("volume notifications unavailable for {label}: {err}"));
        })?;
        log_debug(&format!("listening for volume changes on {label}"));
        Ok(Self {
            endpoint: label,
            _subscription: subscription,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
