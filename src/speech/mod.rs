//! Speech capability boundary
//!
//! The dialogue controller reaches recognition and synthesis only through
//! [`SpeechCapability`]. Two adapters are provided:
//! - [`ConsoleSpeech`]: transcripts arrive as typed lines, utterances are printed
//! - [`ScriptedSpeech`]: replays a fixed list of recognitions and records all output

pub mod console;
pub mod scripted;

pub use console::{ConsoleSpeech, TranscriptFeed};
pub use scripted::{Scenario, ScenarioStep, ScriptedSpeech, SpokenUtterance};

use crate::audio::Cue;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Failure to set up speech input/output at all. Fatal to the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("No input device available")]
    NoInputDevice,

    #[error("Speech engine unavailable: {0}")]
    EngineUnavailable(String),
}

/// A single recognition attempt failed. Displayed using the engine's error code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("no-speech")]
    NoSpeech,

    #[error("audio-capture")]
    AudioCapture,

    #[error("not-allowed")]
    NotAllowed,

    #[error("network")]
    Network,

    #[error("aborted")]
    Aborted,

    #[error("{0}")]
    Other(String),
}

impl RecognitionError {
    /// Map an engine error code to a typed error
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "no-speech" => RecognitionError::NoSpeech,
            "audio-capture" => RecognitionError::AudioCapture,
            "not-allowed" | "service-not-allowed" => RecognitionError::NotAllowed,
            "network" => RecognitionError::Network,
            "aborted" => RecognitionError::Aborted,
            other => RecognitionError::Other(other.to_string()),
        }
    }

    /// Whether the microphone permission was revoked mid-session
    pub fn is_permission_loss(&self) -> bool {
        matches!(self, RecognitionError::NotAllowed)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Speech output unavailable")]
    Unavailable,
}

/// Outcome of one recognition cycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recognition {
    /// A final transcript was produced
    Heard(String),
    /// The engine reported an error for this attempt
    Failed(RecognitionError),
    /// Listening was stopped before anything was recognized
    Stopped,
}

/// How an utterance ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Completed,
    /// Cut short by `cancel_speech` or by a newer utterance
    Interrupted,
}

/// Platform speech input and output
///
/// Recognition is single-shot: each `listen` call yields at most one final
/// transcript. At most one utterance plays at a time; `speak` cancels any
/// utterance still in flight before starting.
#[async_trait]
pub trait SpeechCapability: Send + Sync {
    /// One-time setup, including the microphone permission check
    async fn enable(&self) -> Result<(), CapabilityError>;

    /// Run one recognition cycle and wait for its outcome
    async fn listen(&self) -> Recognition;

    /// Stop an active recognition cycle; it resolves as `Recognition::Stopped`
    fn stop_listening(&self);

    /// Stop listening for good; every later cycle resolves as `Recognition::Stopped`
    fn close(&self) {
        self.stop_listening();
    }

    /// Speak `text` at `rate` and wait for playback to finish
    async fn speak(&self, text: &str, rate: f32) -> Result<Playback, SpeechError>;

    /// Stop any in-flight utterance. Idempotent.
    fn cancel_speech(&self);

    /// Play a short audible cue
    fn play_cue(&self, cue: Cue) {
        debug!(?cue, "Cue requested (no audio output)");
    }
}
