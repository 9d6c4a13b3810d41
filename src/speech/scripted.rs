//! Scripted speech adapter
//!
//! Replays a predefined sequence of recognition outcomes and records every
//! utterance, cue and control call. Scenarios can be written as TOML:
//!
//! ```toml
//! [scenario]
//! name = "compose"
//!
//! [[steps]]
//! type = "heard"
//! text = "compose"
//!
//! [[steps]]
//! type = "error"
//! code = "no-speech"
//! ```

use super::{CapabilityError, Playback, Recognition, RecognitionError, SpeechCapability, SpeechError};
use crate::audio::Cue;
use crate::{Result, VoxmailError};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// A scripted dialogue loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub scenario: ScenarioMetadata,
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// One recognition cycle in a scenario
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// The engine hears `text`
    Heard { text: String },
    /// The engine fails with an error code such as `no-speech`
    Error { code: String },
}

impl ScenarioStep {
    fn into_recognition(self) -> Recognition {
        match self {
            ScenarioStep::Heard { text } => Recognition::Heard(text),
            ScenarioStep::Error { code } => Recognition::Failed(RecognitionError::from_code(&code)),
        }
    }
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            VoxmailError::ConfigError(format!(
                "Failed to read scenario '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content).map_err(|e| match e {
            VoxmailError::ConfigError(msg) => {
                VoxmailError::ConfigError(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Parse a scenario from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)
            .map_err(|e| VoxmailError::ConfigError(format!("Failed to parse scenario: {}", e)))?;
        if scenario.steps.is_empty() {
            return Err(VoxmailError::ConfigError(
                "Scenario must have at least one step".to_string(),
            ));
        }
        Ok(scenario)
    }
}

/// Something the adapter was asked to say
#[derive(Clone, Debug, PartialEq)]
pub struct SpokenUtterance {
    pub text: String,
    pub rate: f32,
}

/// Speech adapter driven by a fixed script
pub struct ScriptedSpeech {
    script: Mutex<VecDeque<Recognition>>,
    spoken: Mutex<Vec<SpokenUtterance>>,
    cues: Mutex<Vec<Cue>>,
    enable_error: Option<CapabilityError>,
    failing_phrase: Mutex<Option<String>>,
    listen_count: AtomicUsize,
    stop_count: AtomicUsize,
    cancel_count: AtomicUsize,
}

impl ScriptedSpeech {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            spoken: Mutex::new(Vec::new()),
            cues: Mutex::new(Vec::new()),
            enable_error: None,
            failing_phrase: Mutex::new(None),
            listen_count: AtomicUsize::new(0),
            stop_count: AtomicUsize::new(0),
            cancel_count: AtomicUsize::new(0),
        }
    }

    /// Build an adapter that replays a loaded scenario
    pub fn from_scenario(scenario: Scenario) -> Self {
        let speech = Self::new();
        info!(
            "Loaded scenario '{}' with {} steps",
            scenario.scenario.name,
            scenario.steps.len()
        );
        speech
            .script
            .lock()
            .extend(scenario.steps.into_iter().map(ScenarioStep::into_recognition));
        speech
    }

    /// Make `enable` fail with the given error
    pub fn with_enable_error(mut self, error: CapabilityError) -> Self {
        self.enable_error = Some(error);
        self
    }

    /// Queue a transcript for a later `listen`
    pub fn push_heard(&self, text: impl Into<String>) {
        self.script.lock().push_back(Recognition::Heard(text.into()));
    }

    /// Queue a recognition failure for a later `listen`
    pub fn push_error(&self, error: RecognitionError) {
        self.script.lock().push_back(Recognition::Failed(error));
    }

    /// Make every utterance containing `phrase` fail
    pub fn fail_speech_containing(&self, phrase: impl Into<String>) {
        *self.failing_phrase.lock() = Some(phrase.into());
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }

    pub fn spoken(&self) -> Vec<SpokenUtterance> {
        self.spoken.lock().clone()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken.lock().iter().map(|u| u.text.clone()).collect()
    }

    /// Return and forget everything spoken so far
    pub fn take_spoken(&self) -> Vec<String> {
        self.spoken.lock().drain(..).map(|u| u.text).collect()
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().clone()
    }

    pub fn listen_count(&self) -> usize {
        self.listen_count.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechCapability for ScriptedSpeech {
    async fn enable(&self) -> std::result::Result<(), CapabilityError> {
        match &self.enable_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn listen(&self) -> Recognition {
        self.listen_count.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        match next {
            Some(recognition) => {
                debug!(?recognition, "Scripted recognition");
                recognition
            }
            None => Recognition::Stopped,
        }
    }

    fn stop_listening(&self) {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
    }

    async fn speak(&self, text: &str, rate: f32) -> std::result::Result<Playback, SpeechError> {
        self.spoken.lock().push(SpokenUtterance {
            text: text.to_string(),
            rate,
        });
        info!(rate, "Speaking: {}", text);

        let failing = self.failing_phrase.lock().clone();
        if let Some(phrase) = failing {
            if text.contains(&phrase) {
                return Err(SpeechError::Synthesis(format!("scripted failure on '{}'", phrase)));
            }
        }
        Ok(Playback::Completed)
    }

    fn cancel_speech(&self) {
        self.cancel_count.fetch_add(1, Ordering::SeqCst);
    }

    fn play_cue(&self, cue: Cue) {
        self.cues.lock().push(cue);
    }
}
