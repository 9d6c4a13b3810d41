//! Shared status line and last-heard transcript

use crate::dialogue::DialogueState;
use crate::integration::ControllerEvent;
use crossbeam_channel::{Sender, TrySendError};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Immutable copy of what the display should show
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusSnapshot {
    pub state: DialogueState,
    pub status: String,
    /// Last transcript, as heard
    pub transcript: Option<String>,
    pub armed: bool,
}

/// Thread-safe status sink written by the controller
///
/// Every change is also published as a [`ControllerEvent`] when an event
/// channel is attached. Publishing never blocks: a full channel drops the
/// event, the snapshot still holds the latest value.
#[derive(Clone, Default)]
pub struct StatusBoard {
    inner: Arc<RwLock<StatusSnapshot>>,
    events: Option<Sender<ControllerEvent>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also publish every change on `events`
    pub fn with_events(mut self, events: Sender<ControllerEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Get a snapshot of current state (no lock held after return)
    pub fn snapshot(&self) -> StatusSnapshot {
        self.inner.read().clone()
    }

    pub fn status(&self) -> String {
        self.inner.read().status.clone()
    }

    pub fn transcript(&self) -> Option<String> {
        self.inner.read().transcript.clone()
    }

    pub fn state(&self) -> DialogueState {
        self.inner.read().state
    }

    pub fn is_armed(&self) -> bool {
        self.inner.read().armed
    }

    pub fn set_status(&self, status: impl Into<String>) {
        let status = status.into();
        {
            let mut inner = self.inner.write();
            if inner.status == status {
                return;
            }
            inner.status = status.clone();
        }
        debug!("Status: {}", status);
        self.publish(ControllerEvent::Status(status));
    }

    pub fn set_transcript(&self, transcript: impl Into<String>) {
        let transcript = transcript.into();
        self.inner.write().transcript = Some(transcript.clone());
        self.publish(ControllerEvent::Heard(transcript));
    }

    /// Record the dialogue position; publishes only real changes
    pub fn set_state(&self, state: DialogueState, armed: bool) {
        let changed = {
            let mut inner = self.inner.write();
            let changed = inner.state != state;
            inner.state = state;
            inner.armed = armed;
            changed
        };
        if changed {
            self.publish(ControllerEvent::StateChanged(state));
        }
    }

    pub fn publish(&self, event: ControllerEvent) {
        let Some(events) = &self.events else {
            return;
        };
        match events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => debug!("Event channel full, dropping {:?}", event),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}
