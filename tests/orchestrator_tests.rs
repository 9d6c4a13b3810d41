//! Orchestrator thread lifecycle tests

use std::sync::Arc;
use std::time::{Duration, Instant};
use voxmail::dialogue::prompts;
use voxmail::integration::{ControllerEvent, Orchestrator, OrchestratorHandle, VoxmailConfig};
use voxmail::mailbox::InMemoryMailbox;
use voxmail::speech::{CapabilityError, ConsoleSpeech, RecognitionError, ScriptedSpeech};
use voxmail::DialogueState;

const WAIT: Duration = Duration::from_secs(5);

fn test_config() -> VoxmailConfig {
    VoxmailConfig::default()
        .with_pacing_gap_ms(0)
        .without_cue_tones()
}

/// Collect events until `done` matches one; panics after `WAIT`
fn wait_for(
    handle: &OrchestratorHandle,
    done: impl Fn(&ControllerEvent) -> bool,
) -> Vec<ControllerEvent> {
    let deadline = Instant::now() + WAIT;
    let mut events = Vec::new();
    while Instant::now() < deadline {
        if let Some(event) = handle.recv_event_timeout(Duration::from_millis(50)) {
            let finished = done(&event);
            events.push(event);
            if finished {
                return events;
            }
        }
    }
    panic!("Timed out; events so far: {:?}", events);
}

#[test]
fn test_scripted_compose_session() {
    let speech = Arc::new(ScriptedSpeech::new());
    for text in ["compose", "a@b.com", "Hello", "Test body", "exit"] {
        speech.push_heard(text);
    }
    let mailbox = Arc::new(InMemoryMailbox::new());

    let (orchestrator, handle) =
        Orchestrator::new(test_config(), Arc::clone(&speech), Arc::clone(&mailbox)).unwrap();
    let worker = orchestrator.start().unwrap();

    handle.activate().unwrap();
    let events = wait_for(&handle, |e| {
        matches!(e, ControllerEvent::StateChanged(DialogueState::Idle))
    });

    let heard: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ControllerEvent::Heard(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(heard, vec!["compose", "a@b.com", "Hello", "Test body", "exit"]);
    assert!(events.contains(&ControllerEvent::StateChanged(DialogueState::ComposeBody)));

    assert_eq!(mailbox.sent().len(), 1);
    assert_eq!(mailbox.sent()[0].subject, "Hello");
    assert!(!handle.is_armed());
    assert_eq!(handle.status(), prompts::STATUS_ACTIVATE);

    handle.shutdown().unwrap();
    wait_for(&handle, |e| matches!(e, ControllerEvent::Shutdown));
    worker.join().unwrap();

    // Nothing was listened for after exit
    assert_eq!(speech.listen_count(), 5);
}

#[test]
fn test_setup_failure_reports_fatal() {
    let speech = Arc::new(ScriptedSpeech::new().with_enable_error(CapabilityError::NoInputDevice));
    speech.push_heard("read");

    let (orchestrator, handle) =
        Orchestrator::new(test_config(), Arc::clone(&speech), InMemoryMailbox::new()).unwrap();
    let worker = orchestrator.start().unwrap();

    let events = wait_for(&handle, |e| matches!(e, ControllerEvent::Fatal(_)));
    match events.last() {
        Some(ControllerEvent::Fatal(message)) => assert!(message.contains("microphone")),
        other => panic!("Expected Fatal, got {:?}", other),
    }

    // Activation is refused; nothing is heard or spoken
    handle.activate().unwrap();
    handle.shutdown().unwrap();
    wait_for(&handle, |e| matches!(e, ControllerEvent::Shutdown));
    worker.join().unwrap();

    assert_eq!(speech.listen_count(), 0);
    assert!(speech.spoken().is_empty());
}

#[test]
fn test_permission_loss_mid_session() {
    let speech = Arc::new(ScriptedSpeech::new());
    speech.push_error(RecognitionError::NotAllowed);
    speech.push_heard("read");

    let (orchestrator, handle) =
        Orchestrator::new(test_config(), Arc::clone(&speech), InMemoryMailbox::new()).unwrap();
    let worker = orchestrator.start().unwrap();

    handle.activate().unwrap();
    wait_for(&handle, |e| {
        matches!(e, ControllerEvent::Fatal(m) if m == prompts::STATUS_NO_MICROPHONE)
    });
    assert!(!handle.is_armed());
    assert_eq!(speech.remaining(), 1);

    handle.shutdown().unwrap();
    worker.join().unwrap();
}

#[test]
fn test_shutdown_while_idle() {
    let speech = Arc::new(ScriptedSpeech::new());
    let (orchestrator, handle) =
        Orchestrator::new(test_config(), Arc::clone(&speech), InMemoryMailbox::new()).unwrap();
    let worker = orchestrator.start().unwrap();

    handle.shutdown().unwrap();
    wait_for(&handle, |e| matches!(e, ControllerEvent::Shutdown));
    worker.join().unwrap();
    assert_eq!(speech.listen_count(), 0);
}

#[test]
fn test_interrupt_leaves_state_alone() {
    let speech = Arc::new(ScriptedSpeech::new());
    speech.push_heard("search");

    let (orchestrator, handle) =
        Orchestrator::new(test_config(), Arc::clone(&speech), InMemoryMailbox::new()).unwrap();
    let worker = orchestrator.start().unwrap();

    handle.activate().unwrap();
    wait_for(&handle, |e| {
        matches!(e, ControllerEvent::StateChanged(DialogueState::Searching))
    });

    handle.interrupt();
    assert_eq!(handle.snapshot().state, DialogueState::Searching);
    assert!(handle.is_armed());

    handle.shutdown().unwrap();
    worker.join().unwrap();
    // One from interrupt, one from shutdown, one from the worker's own shutdown handling
    assert_eq!(speech.cancel_count(), 3);
}

#[test]
fn test_shutdown_ends_a_waiting_listen() {
    let mut config = test_config();
    config.speech.words_per_minute = 60_000;
    config.speech.listen_timeout_ms = 30_000;
    let (speech, _feed) = ConsoleSpeech::new(config.speech.clone());

    let (orchestrator, handle) =
        Orchestrator::new(config, Arc::new(speech), InMemoryMailbox::new()).unwrap();
    let worker = orchestrator.start().unwrap();

    handle.activate().unwrap();
    wait_for(&handle, |e| {
        matches!(e, ControllerEvent::StateChanged(DialogueState::Listening))
    });

    // Well under the listen timeout
    handle.shutdown().unwrap();
    let events = wait_for(&handle, |e| matches!(e, ControllerEvent::Shutdown));
    worker.join().unwrap();

    assert!(!events
        .iter()
        .any(|e| matches!(e, ControllerEvent::Status(s) if s.starts_with("Error"))));
}
