//! Terminal speech adapter
//!
//! Recognition reads transcripts pushed through a [`TranscriptFeed`] (the
//! binary feeds it from stdin). Synthesis prints the utterance and holds for
//! roughly as long as it would take to say it at the requested rate, so
//! pacing and interruption behave like a real voice.

use super::{CapabilityError, Playback, Recognition, RecognitionError, SpeechCapability, SpeechError};
use crate::audio::Cue;
use crate::integration::config::SpeechConfig;
use crate::{Result, VoxmailError};
use async_trait::async_trait;
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, warn};

/// Sending half for typed transcripts
#[derive(Clone)]
pub struct TranscriptFeed {
    tx: Sender<String>,
}

impl TranscriptFeed {
    pub fn send(&self, transcript: impl Into<String>) -> Result<()> {
        self.tx
            .send(transcript.into())
            .map_err(|e| VoxmailError::ChannelError(format!("Failed to send transcript: {}", e)))
    }
}

pub struct ConsoleSpeech {
    config: SpeechConfig,
    transcripts: Receiver<String>,
    stop_tx: Sender<()>,
    stop_rx: Receiver<()>,
    closed: AtomicBool,
    interrupt: Arc<Notify>,
}

impl ConsoleSpeech {
    pub fn new(config: SpeechConfig) -> (Self, TranscriptFeed) {
        let (tx, transcripts) = unbounded();
        let (stop_tx, stop_rx) = bounded(1);

        let speech = Self {
            config,
            transcripts,
            stop_tx,
            stop_rx,
            closed: AtomicBool::new(false),
            interrupt: Arc::new(Notify::new()),
        };

        (speech, TranscriptFeed { tx })
    }
}

/// Approximate time needed to say `text` at `rate`
pub fn utterance_duration(text: &str, rate: f32, words_per_minute: u32) -> Duration {
    let words = text.split_whitespace().count().max(1) as f32;
    let wpm = (words_per_minute.max(1) as f32) * rate.max(0.1);
    Duration::from_secs_f32(words * 60.0 / wpm)
}

#[async_trait]
impl SpeechCapability for ConsoleSpeech {
    async fn enable(&self) -> std::result::Result<(), CapabilityError> {
        if !self.config.require_microphone {
            return Ok(());
        }

        #[cfg(feature = "audio-io")]
        {
            let device = crate::audio::probe_microphone()?;
            debug!("Microphone available: {}", device);
            Ok(())
        }

        #[cfg(not(feature = "audio-io"))]
        {
            Err(CapabilityError::EngineUnavailable(
                "built without audio-io support".to_string(),
            ))
        }
    }

    async fn listen(&self) -> Recognition {
        let transcripts = self.transcripts.clone();
        let stop = self.stop_rx.clone();
        let timeout = Duration::from_millis(self.config.listen_timeout_ms);

        // A stop only applies to a cycle that is running
        while stop.try_recv().is_ok() {}
        if self.closed.load(Ordering::SeqCst) {
            return Recognition::Stopped;
        }

        let outcome = tokio::task::spawn_blocking(move || {
            select! {
                recv(transcripts) -> msg => match msg {
                    Ok(text) => Recognition::Heard(text),
                    Err(_) => Recognition::Failed(RecognitionError::AudioCapture),
                },
                recv(stop) -> _ => Recognition::Stopped,
                default(timeout) => Recognition::Failed(RecognitionError::NoSpeech),
            }
        })
        .await;

        outcome.unwrap_or_else(|e| Recognition::Failed(RecognitionError::Other(e.to_string())))
    }

    fn stop_listening(&self) {
        // A full buffer means a stop is already pending
        let _ = self.stop_tx.try_send(());
    }

    fn close(&self) {
        // Flag first: a cycle that drains this stop still sees the flag
        self.closed.store(true, Ordering::SeqCst);
        self.stop_listening();
    }

    async fn speak(&self, text: &str, rate: f32) -> std::result::Result<Playback, SpeechError> {
        self.interrupt.notify_waiters();

        println!("🔊 {}", text);
        let duration = utterance_duration(text, rate, self.config.words_per_minute);

        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(Playback::Completed),
            _ = self.interrupt.notified() => {
                debug!("Utterance interrupted");
                Ok(Playback::Interrupted)
            }
        }
    }

    fn cancel_speech(&self) {
        self.interrupt.notify_waiters();
    }

    fn play_cue(&self, cue: Cue) {
        debug!(?cue, "Playing cue");

        if !self.config.cue_tones {
            return;
        }

        #[cfg(feature = "audio-io")]
        {
            std::thread::spawn(move || {
                if let Err(e) = crate::audio::play_cue(cue) {
                    warn!("Failed to play cue: {}", e);
                }
            });
        }

        #[cfg(not(feature = "audio-io"))]
        {
            warn!(?cue, "Cue tones need the audio-io feature");
        }
    }
}
