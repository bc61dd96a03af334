use anyhow::{Context, Result};
use volume_protect::endpoint::{self, EndpointError, VolumeEndpoint};
use volume_protect::guard::exceeds_ceiling;
use volume_protect::VOLUME_CEILING;

/// One-shot snapshot of the endpoint the monitor would protect.
pub(crate) struct ProbeReport {
    endpoint: String,
    volume: Result<f32, String>,
    jack_connected: bool,
}

impl ProbeReport {
    pub(crate) fn collect(endpoint: &dyn VolumeEndpoint) -> Self {
        Self {
            endpoint: endpoint.describe(),
            volume: endpoint.volume().map_err(|err: EndpointError| err.to_string()),
            jack_connected: endpoint.is_jack_connected(),
        }
    }

    fn would_clamp(&self) -> bool {
        self.jack_connected
            && self
                .volume
                .as_ref()
                .map(|level| exceeds_ceiling(*level))
                .unwrap_or(false)
    }

    pub(crate) fn render(&self) -> String {
        let volume = match &self.volume {
            Ok(level) => format!("{:.0}%", level * 100.0),
            Err(err) => format!("unavailable ({err})"),
        };
        let jack = if self.jack_connected {
            "connected"
        } else {
            "not connected"
        };
        let mut lines = Vec::new();
        lines.push(format!("Default render endpoint: {}", self.endpoint));
        lines.push(format!("Master volume: {volume}"));
        lines.push(format!("Headphone jack: {jack}"));
        lines.push(format!("Safety ceiling: {:.0}%", VOLUME_CEILING * 100.0));
        lines.push(format!(
            "Would clamp now: {}",
            if self.would_clamp() { "yes" } else { "no" }
        ));
        lines.join("\n")
    }
}

pub(crate) fn run_probe() -> Result<()> {
    let endpoint =
        endpoint::open_default().context("failed to open the default audio output endpoint")?;
    println!("{}", ProbeReport::collect(endpoint.as_ref()).render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use volume_protect::endpoint::mock::{JackState, MockEndpoint};

    #[test]
    fn report_flags_loud_plugged_endpoint() {
        let endpoint = MockEndpoint::new(0.85).with_jack(JackState::Connected);
        let rendered = ProbeReport::collect(&endpoint).render();
        assert!(rendered.contains("Default render endpoint: mock render endpoint"));
        assert!(rendered.contains("Master volume: 85%"));
        assert!(rendered.contains("Headphone jack: connected"));
        assert!(rendered.contains("Safety ceiling: 70%"));
        assert!(rendered.contains("Would clamp now: yes"));
    }

    #[test]
    fn report_ignores_loud_speakers() {
        let endpoint = MockEndpoint::new(1.0);
        let rendered = ProbeReport::collect(&endpoint).render();
        assert!(rendered.contains("Headphone jack: not connected"));
        assert!(rendered.contains("Would clamp now: no"));
    }

    #[test]
    fn report_matches_guard_at_the_ceiling() {
        let at_ceiling = MockEndpoint::new(VOLUME_CEILING).with_jack(JackState::Connected);
        assert!(!ProbeReport::collect(&at_ceiling).would_clamp());

        let just_above = f32::from_bits(VOLUME_CEILING.to_bits() + 1);
        let above = MockEndpoint::new(just_above).with_jack(JackState::Connected);
        assert!(ProbeReport::collect(&above).would_clamp());
    }
}
