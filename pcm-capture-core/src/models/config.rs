use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CaptureError;
use super::format::SampleEncoding;

/// How captured periods are handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    /// Raw PCM in network byte order.
    #[default]
    None,
    /// One Opus packet per 20 ms period.
    Opus,
}

impl CompressionMode {
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for CompressionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Opus => f.write_str("opus"),
        }
    }
}

impl FromStr for CompressionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "opus" => Ok(Self::Opus),
            other => Err(format!("unknown compression mode: {}", other)),
        }
    }
}

/// Parameters for opening a capture device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureParameters {
    /// ALSA PCM name, e.g. `default` or `hw:1,0` (default: `default`).
    pub device: String,

    /// Acceptable sample encodings, most preferred first
    /// (default: S16_BE, S16_LE).
    pub formats: Vec<SampleEncoding>,

    /// Requested sample rate in Hz (default: 44100). The hardware may grant
    /// a nearby rate instead.
    pub sample_rate: u32,

    /// Requested channel count (default: 2).
    pub channels: u32,

    /// Compression applied to each period (default: none).
    pub compression: CompressionMode,
}

impl CaptureParameters {
    pub fn validate(&self) -> Result<(), String> {
        if self.device.trim().is_empty() {
            return Err("device name must not be empty".into());
        }
        if self.formats.is_empty() {
            return Err("format preference list must not be empty".into());
        }
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if self.channels == 0 {
            return Err("channel count must be positive".into());
        }
        Ok(())
    }

    /// Parse parameters from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CaptureError> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| CaptureError::InvalidConfiguration(e.to_string()))?;
        params.validate().map_err(CaptureError::InvalidConfiguration)?;
        Ok(params)
    }

    /// Preference list rendered for log lines and errors.
    pub fn formats_label(&self) -> String {
        self.formats
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for CaptureParameters {
    fn default() -> Self {
        Self {
            device: "default".into(),
            formats: vec![SampleEncoding::S16Be, SampleEncoding::S16Le],
            sample_rate: 44100,
            channels: 2,
            compression: CompressionMode::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = CaptureParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.formats_label(), "S16_BE, S16_LE");
    }

    #[test]
    fn validate_rejects_unusable_values() {
        let mut params = CaptureParameters::default();
        params.formats.clear();
        assert!(params.validate().is_err());

        let mut params = CaptureParameters::default();
        params.formats = vec![SampleEncoding::Mpeg, SampleEncoding::S16Le];
        assert!(params.validate().is_ok());

        let params = CaptureParameters {
            channels: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = CaptureParameters {
            device: "  ".into(),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn compression_mode_parsing() {
        assert_eq!("OPUS".parse::<CompressionMode>(), Ok(CompressionMode::Opus));
        assert_eq!("none".parse::<CompressionMode>(), Ok(CompressionMode::None));
        assert!("aac".parse::<CompressionMode>().is_err());
        assert!(CompressionMode::Opus.is_compressed());
    }

    #[test]
    fn from_json_fills_defaults() {
        let params = CaptureParameters::from_json(
            r#"{ "device": "hw:1,0", "formats": ["S32_LE", "S16_LE"], "compression": "opus" }"#,
        )
        .unwrap();
        assert_eq!(params.device, "hw:1,0");
        assert_eq!(params.formats, vec![SampleEncoding::S32Le, SampleEncoding::S16Le]);
        assert_eq!(params.sample_rate, 44100);
        assert_eq!(params.compression, CompressionMode::Opus);
    }

    #[test]
    fn from_json_rejects_invalid_parameters() {
        let err = CaptureParameters::from_json(r#"{ "sample_rate": 0 }"#).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidConfiguration(_)));

        let err = CaptureParameters::from_json(r#"{ "formats": ["S16"] }"#).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidConfiguration(_)));
    }
}
