//! Session state owned by the dialogue controller

use crate::mailbox::{Draft, Message};
use tracing::debug;

/// Where the conversation currently is
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DialogueState {
    /// Not started, or ended by "exit"; nothing is listened for
    #[default]
    Idle,
    /// Awaiting a top-level command
    Listening,
    ComposeTo,
    ComposeSubject,
    ComposeBody,
    /// Awaiting a search query
    Searching,
    /// Iterating search hits, awaiting next/stop
    ReadingResults,
    /// Awaiting a folder name
    ChooseFolder,
}

impl DialogueState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DialogueState::Idle)
    }

    /// One of the three states that fill the draft
    pub fn is_composing(&self) -> bool {
        matches!(
            self,
            DialogueState::ComposeTo | DialogueState::ComposeSubject | DialogueState::ComposeBody
        )
    }
}

impl std::fmt::Display for DialogueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogueState::Idle => write!(f, "Idle"),
            DialogueState::Listening => write!(f, "Listening"),
            DialogueState::ComposeTo => write!(f, "Compose (recipient)"),
            DialogueState::ComposeSubject => write!(f, "Compose (subject)"),
            DialogueState::ComposeBody => write!(f, "Compose (message)"),
            DialogueState::Searching => write!(f, "Searching"),
            DialogueState::ReadingResults => write!(f, "Reading results"),
            DialogueState::ChooseFolder => write!(f, "Choose folder"),
        }
    }
}

/// Search hits and the position of the next one to speak
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchResults {
    hits: Vec<Message>,
    cursor: usize,
}

impl SearchResults {
    pub fn new(hits: Vec<Message>) -> Self {
        Self { hits, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Advance to the next hit; returns its 1-based position
    pub fn next_hit(&mut self) -> Option<(usize, &Message)> {
        let hit = self.hits.get(self.cursor)?;
        self.cursor += 1;
        Some((self.cursor, hit))
    }
}

/// The single live dialogue
///
/// Only the controller mutates it. `armed` is false exactly when the state
/// is `Idle`.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    state: DialogueState,
    pub draft: Draft,
    speech_rate: f32,
    pub current_folder: String,
    armed: bool,
    /// Set when the microphone is gone for good; blocks reactivation
    capability_lost: bool,
    pub results: SearchResults,
    /// Messages fetched by the last read flow
    pub last_batch: Vec<Message>,
}

impl Session {
    pub fn new(folder: impl Into<String>, speech_rate: f32) -> Self {
        Self {
            state: DialogueState::Idle,
            draft: Draft::default(),
            speech_rate,
            current_folder: folder.into(),
            armed: false,
            capability_lost: false,
            results: SearchResults::default(),
            last_batch: Vec::new(),
        }
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn speech_rate(&self) -> f32 {
        self.speech_rate
    }

    pub fn capability_lost(&self) -> bool {
        self.capability_lost
    }

    /// Move to a non-idle state. Leaving compose clears the draft.
    pub fn transition(&mut self, next: DialogueState) {
        if next.is_idle() {
            self.disarm();
            return;
        }
        if self.state.is_composing() && !next.is_composing() {
            self.draft.clear();
        }
        if next != DialogueState::ReadingResults {
            self.results = SearchResults::default();
        }
        if self.state != next {
            debug!("State: {} -> {}", self.state, next);
        }
        self.state = next;
        self.armed = true;
    }

    /// End the session: back to `Idle`, nothing scheduled
    pub fn disarm(&mut self) {
        if self.state != DialogueState::Idle {
            debug!("State: {} -> {}", self.state, DialogueState::Idle);
        }
        self.state = DialogueState::Idle;
        self.armed = false;
        self.draft.clear();
        self.results = SearchResults::default();
    }

    /// Disarm for good after the microphone was lost
    pub fn lose_capability(&mut self) {
        self.capability_lost = true;
        self.disarm();
    }

    /// Change the rate by `delta`, clamped to `[min, max]`; returns the new rate
    pub fn adjust_rate(&mut self, delta: f32, min: f32, max: f32) -> f32 {
        self.speech_rate = (self.speech_rate + delta).clamp(min, max);
        self.speech_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle_and_disarmed() {
        let session = Session::new("INBOX", 1.0);
        assert_eq!(session.state(), DialogueState::Idle);
        assert!(!session.is_armed());
        assert!(session.draft.is_empty());
    }

    #[test]
    fn test_armed_iff_not_idle() {
        let mut session = Session::new("INBOX", 1.0);
        session.transition(DialogueState::Listening);
        assert!(session.is_armed());

        session.transition(DialogueState::Idle);
        assert!(!session.is_armed());
        assert!(session.state().is_idle());
    }

    #[test]
    fn test_leaving_compose_clears_draft() {
        let mut session = Session::new("INBOX", 1.0);
        session.transition(DialogueState::ComposeTo);
        session.draft.recipient = Some("a@b.com".into());
        session.transition(DialogueState::ComposeSubject);
        assert_eq!(session.draft.recipient.as_deref(), Some("a@b.com"));

        session.transition(DialogueState::Listening);
        assert!(session.draft.is_empty());
    }

    #[test]
    fn test_rate_clamped() {
        let mut session = Session::new("INBOX", 1.0);
        for _ in 0..10 {
            session.adjust_rate(0.25, 0.5, 2.0);
        }
        assert_eq!(session.speech_rate(), 2.0);
        for _ in 0..10 {
            session.adjust_rate(-0.25, 0.5, 2.0);
        }
        assert_eq!(session.speech_rate(), 0.5);
    }

    #[test]
    fn test_search_results_cursor() {
        let mut results = SearchResults::new(vec![
            Message::new("1", "a", "s1", ""),
            Message::new("2", "b", "s2", ""),
        ]);
        assert_eq!(results.next_hit().map(|(i, m)| (i, m.id.clone())), Some((1, "1".to_string())));
        assert_eq!(results.next_hit().map(|(i, _)| i), Some(2));
        assert!(results.next_hit().is_none());
    }

    #[test]
    fn test_lost_capability_disarms() {
        let mut session = Session::new("INBOX", 1.0);
        session.transition(DialogueState::Searching);
        session.lose_capability();
        assert!(session.capability_lost());
        assert!(!session.is_armed());
        assert_eq!(session.state(), DialogueState::Idle);
    }
}
