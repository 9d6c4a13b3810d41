//! Audio helpers
//!
//! Cue tone synthesis is always available. Device access (microphone probe,
//! cue playback) needs the `audio-io` feature.

pub mod cues;
#[cfg(feature = "audio-io")]
pub mod input;
#[cfg(feature = "audio-io")]
pub mod output;

pub use cues::{cue_tone, Cue};
#[cfg(feature = "audio-io")]
pub use input::probe_microphone;
#[cfg(feature = "audio-io")]
pub use output::play_cue;
