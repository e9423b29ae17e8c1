//! ALSA capture device enumeration via the device name hints.
//!
//! Lists the PCM hints that support capture, with their descriptions as
//! reported by the ALSA configuration.

use alsa::device_name::HintIter;
use alsa::Direction;

use pcm_capture_core::models::audio_models::CaptureDeviceInfo;
use pcm_capture_core::models::error::CaptureError;

/// Name ALSA resolves to the configured default device.
pub const DEFAULT_DEVICE: &str = "default";

/// Audio device enumerator using the ALSA name hints.
#[derive(Debug, Default)]
pub struct DeviceEnumerator;

impl DeviceEnumerator {
    pub fn new() -> Self {
        Self
    }

    /// List PCMs usable for capture.
    pub fn list_capture_devices(&self) -> Result<Vec<CaptureDeviceInfo>, CaptureError> {
        let hints = HintIter::new_str(None, "pcm").map_err(|e| CaptureError::DeviceUnavailable {
            device: "pcm hints".into(),
            reason: e.to_string(),
        })?;

        let devices: Vec<CaptureDeviceInfo> = hints
            .filter(|hint| hint.direction.map_or(true, |d| d == Direction::Capture))
            .filter_map(|hint| {
                let id = hint.name?;
                let description = hint
                    .desc
                    .map(|desc| desc.replace('\n', " "))
                    .unwrap_or_else(|| id.clone());
                Some(CaptureDeviceInfo {
                    is_default: id == DEFAULT_DEVICE,
                    id,
                    description,
                })
            })
            .collect();

        log::debug!("Found {} ALSA capture devices", devices.len());
        Ok(devices)
    }
}
