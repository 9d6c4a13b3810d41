//! Short audible cues for success, error and notification feedback

use serde::{Deserialize, Serialize};

/// Fade applied at both ends of a tone to avoid clicks
const FADE_MS: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Success,
    Error,
    Notification,
}

impl Cue {
    pub fn frequency_hz(&self) -> f32 {
        match self {
            Cue::Success => 880.0,
            Cue::Error => 220.0,
            Cue::Notification => 660.0,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Cue::Success => 180,
            Cue::Error => 300,
            Cue::Notification => 120,
        }
    }

    pub fn volume(&self) -> f32 {
        match self {
            Cue::Success => 0.5,
            Cue::Error => 0.5,
            Cue::Notification => 0.3,
        }
    }
}

/// Render a cue as mono f32 samples at `sample_rate`
pub fn cue_tone(cue: Cue, sample_rate: u32) -> Vec<f32> {
    let total = (sample_rate as u64 * cue.duration_ms() / 1000) as usize;
    let fade = ((sample_rate as u64 * FADE_MS / 1000) as usize).max(1);
    let step = 2.0 * std::f32::consts::PI * cue.frequency_hz() / sample_rate as f32;

    (0..total)
        .map(|i| {
            let from_edge = i.min(total - 1 - i);
            let envelope = (from_edge as f32 / fade as f32).min(1.0);
            (i as f32 * step).sin() * cue.volume() * envelope
        })
        .collect()
}
