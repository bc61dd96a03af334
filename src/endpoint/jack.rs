//! Jack detection policy.
//!
//! The platform walk (property store → topology → connector → part → jack
//! description) can fail at any step. A failure is logged with the step that
//! broke and then reads the same as an unplugged jack: the monitor cannot tell
//! "no headphones" from "could not ask", and it does not try to.

use super::EndpointError;
use crate::log_debug;
use std::fmt;

/// One step of the topology walk, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyStep {
    PropertyStore,
    DeviceTopology,
    Connector,
    ConnectedTo,
    Part,
    JackDescription,
    JackState,
}

impl TopologyStep {
    pub fn label(self) -> &'static str {
        match self {
            TopologyStep::PropertyStore => "property store",
            TopologyStep::DeviceTopology => "device topology",
            TopologyStep::Connector => "connector lookup",
            TopologyStep::ConnectedTo => "downstream connector",
            TopologyStep::Part => "downstream part",
            TopologyStep::JackDescription => "jack description interface",
            TopologyStep::JackState => "jack state",
        }
    }
}

impl fmt::Display for TopologyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-jack connection flags as reported by the jack-description interface.
///
/// The connector counts as plugged when any reported jack is connected.
pub fn any_jack_connected(states: &[bool]) -> bool {
    states.iter().any(|connected| *connected)
}

/// Collapse a topology query into the plugged/unplugged answer the guard uses.
pub fn connected_or_unplugged(result: Result<bool, EndpointError>) -> bool {
    match result {
        Ok(connected) => connected,
        Err(err) => {
            log_debug(&format!("jack state unknown, treating as unplugged: {err}"));
            tracing::debug!(error = %err, "jack detection failed");
            false
        }
    }
}
