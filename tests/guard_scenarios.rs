use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use volume_protect::endpoint::mock::{JackState, MockEndpoint};
use volume_protect::prompt::{PromptAnswer, ScriptedPrompt};
use volume_protect::{Monitor, VOLUME_CEILING};

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

#[test]
fn headphones_loud_then_user_accepts() {
    let endpoint = MockEndpoint::new(0.4).with_jack(JackState::Connected);
    let prompt = Arc::new(ScriptedPrompt::new([PromptAnswer::Affirm]));
    let monitor = Monitor::start(Arc::new(endpoint.clone()), prompt.clone()).expect("subscribe");
    assert_eq!(endpoint.subscriber_count(), 1);

    endpoint.change_volume(0.9);
    assert_eq!(endpoint.level(), VOLUME_CEILING);
    assert_eq!(endpoint.writes(), vec![VOLUME_CEILING]);

    assert!(wait_until(|| monitor.guard().gate().is_override_active()));
    assert_eq!(prompt.times_asked(), 1);

    endpoint.change_volume(0.95);
    assert_eq!(endpoint.level(), 0.95);
    assert_eq!(endpoint.writes(), vec![VOLUME_CEILING]);
}

#[test]
fn speakers_are_never_touched() {
    let endpoint = MockEndpoint::new(0.4);
    let prompt = Arc::new(ScriptedPrompt::always(PromptAnswer::Decline));
    let _monitor = Monitor::start(Arc::new(endpoint.clone()), prompt.clone()).expect("subscribe");

    endpoint.change_volume(1.0);
    assert_eq!(endpoint.level(), 1.0);
    assert!(endpoint.writes().is_empty());
    assert_eq!(prompt.times_asked(), 0);
}

#[test]
fn quiet_headphones_are_never_touched() {
    let endpoint = MockEndpoint::new(0.2).with_jack(JackState::Connected);
    let prompt = Arc::new(ScriptedPrompt::always(PromptAnswer::Decline));
    let _monitor = Monitor::start(Arc::new(endpoint.clone()), prompt.clone()).expect("subscribe");

    endpoint.change_volume(0.5);
    assert_eq!(endpoint.level(), 0.5);
    assert!(endpoint.writes().is_empty());
    assert_eq!(prompt.times_asked(), 0);
}

#[test]
fn dropping_monitor_ends_protection() {
    let endpoint = MockEndpoint::new(0.2).with_jack(JackState::Connected);
    let prompt = Arc::new(ScriptedPrompt::always(PromptAnswer::Decline));
    let monitor = Monitor::start(Arc::new(endpoint.clone()), prompt).expect("subscribe");
    drop(monitor);

    assert_eq!(endpoint.subscriber_count(), 0);
    endpoint.change_volume(1.0);
    assert!(endpoint.writes().is_empty());
}
