use crate::speech::CapabilityError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

/// Check once that the default microphone can be opened
///
/// The stream is started and dropped immediately so the device is released
/// again. Returns the device name.
pub fn probe_microphone() -> Result<String, CapabilityError> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .ok_or(CapabilityError::NoInputDevice)?;

    let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    info!("Probing input device: {}", name);

    let config: cpal::StreamConfig = device
        .default_input_config()
        .map_err(|e| {
            CapabilityError::EngineUnavailable(format!("Failed to get input config: {}", e))
        })?
        .into();

    let err_fn = |err| {
        error!("Audio input stream error: {}", err);
    };

    let stream = device
        .build_input_stream(
            &config,
            move |_data: &[f32], _: &cpal::InputCallbackInfo| {},
            err_fn,
            None,
        )
        .map_err(|e| {
            error!("Failed to open microphone: {}", e);
            CapabilityError::PermissionDenied
        })?;

    stream.play().map_err(|e| {
        error!("Failed to start microphone stream: {}", e);
        CapabilityError::PermissionDenied
    })?;
    drop(stream);

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_microphone() {
        // CI machines usually have no input device
        match probe_microphone() {
            Ok(name) => assert!(!name.is_empty()),
            Err(e) => assert!(matches!(
                e,
                CapabilityError::NoInputDevice
                    | CapabilityError::PermissionDenied
                    | CapabilityError::EngineUnavailable(_)
            )),
        }
    }
}
