use super::cues::{cue_tone, Cue};
use crate::speech::CapabilityError;
use crate::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Play a cue on the default output device, blocking until it has finished
pub fn play_cue(cue: Cue) -> Result<()> {
    let host = cpal::default_host();

    let device = host.default_output_device().ok_or_else(|| {
        CapabilityError::EngineUnavailable("No output device available".into())
    })?;

    let config: cpal::StreamConfig = device
        .default_output_config()
        .map_err(|e| CapabilityError::EngineUnavailable(format!("Failed to get output config: {}", e)))?
        .into();

    let channels = config.channels as usize;
    let samples = cue_tone(cue, config.sample_rate.0);
    let buffer = Arc::new(Mutex::new(samples));

    let err_fn = |err| {
        error!("Audio output stream error: {}", err);
    };

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut buf = buffer.lock();
                let frames_needed = data.len() / channels;
                let frames_available = buf.len().min(frames_needed);

                for (i, sample) in buf.drain(0..frames_available).enumerate() {
                    for c in 0..channels {
                        data[i * channels + c] = sample;
                    }
                }

                // Silence after the tone ends
                data[frames_available * channels..].fill(0.0);
            },
            err_fn,
            None,
        )
        .map_err(|e| CapabilityError::EngineUnavailable(format!("Failed to build output stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| CapabilityError::EngineUnavailable(format!("Failed to start output stream: {}", e)))?;

    debug!(?cue, "Cue playing");
    std::thread::sleep(Duration::from_millis(cue.duration_ms() + 50));
    drop(stream);

    Ok(())
}
