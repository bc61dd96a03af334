//! In-memory endpoint for exercising the guard without audio hardware.
//!
//! Like the real device, a successful `set_volume` is echoed back to every
//! subscriber on the calling thread, so the guard sees its own clamp.

use super::jack::{connected_or_unplugged, TopologyStep};
use super::{EndpointError, VolumeEndpoint};
use crate::guard::VolumeEvent;
use crate::lock_or_recover;
use crate::notify::{Subscription, VolumeListener};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Simulated jack state, including a broken topology query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JackState {
    Connected,
    Unplugged,
    QueryFails,
}

type ListenerList = Vec<(u64, Arc<dyn VolumeListener>)>;

struct Shared {
    level: Mutex<f32>,
    jack: Mutex<JackState>,
    writes: Mutex<Vec<f32>>,
    listeners: Mutex<ListenerList>,
    next_id: AtomicU64,
    echo: AtomicBool,
    fail_writes: AtomicBool,
}

/// Scriptable stand-in for the default render endpoint.
#[derive(Clone)]
pub struct MockEndpoint {
    shared: Arc<Shared>,
}

impl MockEndpoint {
    /// An unplugged endpoint at `level`.
    pub fn new(level: f32) -> Self {
        Self {
            shared: Arc::new(Shared {
                level: Mutex::new(level),
                jack: Mutex::new(JackState::Unplugged),
                writes: Mutex::new(Vec::new()),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                echo: AtomicBool::new(true),
                fail_writes: AtomicBool::new(false),
            }),
        }
    }

    pub fn with_jack(self, state: JackState) -> Self {
        self.set_jack(state);
        self
    }

    pub fn set_jack(&self, state: JackState) {
        *lock_or_recover(&self.shared.jack, "mock jack") = state;
    }

    /// Whether successful writes are re-delivered to subscribers.
    pub fn set_echo(&self, echo: bool) {
        self.shared.echo.store(echo, Ordering::SeqCst);
    }

    /// Make every `set_volume` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.shared.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every level passed to a successful `set_volume`, in order.
    pub fn writes(&self) -> Vec<f32> {
        lock_or_recover(&self.shared.writes, "mock writes").clone()
    }

    pub fn level(&self) -> f32 {
        *lock_or_recover(&self.shared.level, "mock level")
    }

    pub fn subscriber_count(&self) -> usize {
        lock_or_recover(&self.shared.listeners, "mock listeners").len()
    }

    /// Simulate the user (or another app) moving the volume slider.
    pub fn change_volume(&self, level: f32) {
        *lock_or_recover(&self.shared.level, "mock level") = level;
        self.notify(level);
    }

    fn notify(&self, level: f32) {
        // Snapshot first: listeners may call back into `set_volume`.
        let listeners: Vec<Arc<dyn VolumeListener>> =
            lock_or_recover(&self.shared.listeners, "mock listeners")
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
        for listener in listeners {
            listener.on_volume_changed(VolumeEvent::new(level));
        }
    }
}

impl VolumeEndpoint for MockEndpoint {
    fn describe(&self) -> String {
        "mock render endpoint".to_string()
    }

    fn volume(&self) -> Result<f32, EndpointError> {
        Ok(self.level())
    }

    fn set_volume(&self, level: f32) -> Result<(), EndpointError> {
        if self.shared.fail_writes.load(Ordering::SeqCst) {
            return Err(EndpointError::volume_control("simulated write failure"));
        }
        *lock_or_recover(&self.shared.level, "mock level") = level;
        lock_or_recover(&self.shared.writes, "mock writes").push(level);
        if self.shared.echo.load(Ordering::SeqCst) {
            self.notify(level);
        }
        Ok(())
    }

    fn is_jack_connected(&self) -> bool {
        let state = *lock_or_recover(&self.shared.jack, "mock jack");
        match state {
            JackState::Connected => connected_or_unplugged(Ok(true)),
            JackState::Unplugged => connected_or_unplugged(Ok(false)),
            JackState::QueryFails => connected_or_unplugged(Err(EndpointError::topology(
                TopologyStep::JackDescription,
                "simulated topology failure",
            ))),
        }
    }

    fn subscribe(&self, listener: Arc<dyn VolumeListener>) -> Result<Subscription, EndpointError> {
        let id = self.shared.next_id.fetch_add(1, Ordering::SeqCst);
        lock_or_recover(&self.shared.listeners, "mock listeners").push((id, listener));
        Ok(Subscription::new(MockRegistration {
            shared: Arc::downgrade(&self.shared),
            id,
        }))
    }
}

struct MockRegistration {
    shared: Weak<Shared>,
    id: u64,
}

impl Drop for MockRegistration {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            lock_or_recover(&shared.listeners, "mock listeners").retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Counter {
        seen: Mutex<Vec<f32>>,
        calls: AtomicUsize,
    }

    impl VolumeListener for Counter {
        fn on_volume_changed(&self, event: VolumeEvent) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(event.level());
        }
    }

    #[test]
    fn writes_are_echoed_to_subscribers() {
        let endpoint = MockEndpoint::new(0.2);
        let counter = Arc::new(Counter::default());
        let _sub = endpoint.subscribe(counter.clone()).unwrap();

        endpoint.set_volume(0.4).unwrap();
        endpoint.change_volume(0.6);

        assert_eq!(*counter.seen.lock().unwrap(), vec![0.4, 0.6]);
        assert_eq!(endpoint.writes(), vec![0.4]);
        assert_eq!(endpoint.level(), 0.6);
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let endpoint = MockEndpoint::new(0.2);
        let counter = Arc::new(Counter::default());
        let sub = endpoint.subscribe(counter.clone()).unwrap();
        assert_eq!(endpoint.subscriber_count(), 1);
        drop(sub);
        assert_eq!(endpoint.subscriber_count(), 0);
        endpoint.change_volume(0.9);
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_writes_leave_level_alone() {
        let endpoint = MockEndpoint::new(0.9);
        endpoint.fail_writes(true);
        assert!(endpoint.set_volume(0.7).is_err());
        assert_eq!(endpoint.level(), 0.9);
        assert!(endpoint.writes().is_empty());
    }

    #[test]
    fn jack_query_failure_reads_unplugged() {
        let endpoint = MockEndpoint::new(0.5).with_jack(JackState::QueryFails);
        assert!(!endpoint.is_jack_connected());
        endpoint.set_jack(JackState::Connected);
        assert!(endpoint.is_jack_connected());
    }
}
