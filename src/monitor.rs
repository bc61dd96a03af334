//! Wiring: endpoint + guard + notification registration.

use crate::endpoint::{self, EndpointError, VolumeEndpoint};
use crate::guard::VolumeGuard;
use crate::log_debug;
use crate::notify::{NotificationSource, VolumeListener};
use crate::prompt::ConfirmPrompt;
use std::io;
use std::sync::Arc;
use std::thread;

/// A guard that is registered for volume notifications.
///
/// Holds the registration, so dropping the monitor stops protection.
pub struct Monitor {
    guard: Arc<VolumeGuard>,
    source: NotificationSource,
}

impl Monitor {
    /// Build the guard around `endpoint` and subscribe it to volume changes.
    pub fn start(
        endpoint: Arc<dyn VolumeEndpoint>,
        prompt: Arc<dyn ConfirmPrompt>,
    ) -> Result<Self, EndpointError> {
        let guard = Arc::new(VolumeGuard::new(endpoint, prompt));
        let listener: Arc<dyn VolumeListener> = guard.clone();
        let source = NotificationSource::register(guard.endpoint(), listener)?;
        tracing::info!(endpoint = source.endpoint(), "volume monitor started");
        Ok(Self { guard, source })
    }

    pub fn guard(&self) -> &VolumeGuard {
        &self.guard
    }

    pub fn endpoint_label(&self) -> &str {
        self.source.endpoint()
    }
}

/// Open the default endpoint and monitor it on a dedicated thread for the rest
/// of the process. Startup failures end the thread; they are logged, not retried.
pub fn spawn_listener(prompt: Arc<dyn ConfirmPrompt>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("volume-listener".to_string())
        .spawn(move || {
            let monitor = match endpoint::open_default()
                .and_then(|endpoint| Monitor::start(endpoint, prompt))
            {
                Ok(monitor) => monitor,
                Err(err) => {
                    log_debug(&format!("volume monitor not started: {err}"));
                    tracing::error!(error = %err, "volume monitor not started");
                    eprintln!("Volume Level Protector: {err}");
                    return;
                }
            };
            log_debug(&format!(
                "protecting {} (ceiling {:.2})",
                monitor.endpoint_label(),
                crate::guard::VOLUME_CEILING
            ));
            // The platform owns delivery now; this thread only keeps the
            // registration alive.
            loop {
                thread::park();
            }
        })
}
