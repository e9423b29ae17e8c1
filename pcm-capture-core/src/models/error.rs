use thiserror::Error;

/// Errors surfaced by capture device open and, for diagnostics, by reads.
///
/// Every open-time variant names the device and carries the underlying
/// hardware error string. `TransientUnderrun` is never returned from
/// `read`; it is only recorded in the pipeline diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("invalid capture parameters: {0}")]
    InvalidConfiguration(String),

    #[error("device {device} unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    #[error("device {device} accepts none of the requested formats [{requested}]")]
    NoSupportedFormat { device: String, requested: String },

    #[error("device {device} rejected {parameter}: {reason}")]
    ParameterRejected {
        device: String,
        parameter: String,
        reason: String,
    },

    #[error("encoder init failed on device {device}: {reason}")]
    EncoderInitFailed { device: String, reason: String },

    #[error("transient underrun on device {device}: {reason}")]
    TransientUnderrun { device: String, reason: String },
}

/// Coarse classification of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareErrorKind {
    Busy,
    PermissionDenied,
    NotFound,
    /// The capture ring overflowed (xrun).
    Overrun,
    Suspended,
    WouldBlock,
    /// The requested configuration value is not supported.
    Rejected,
    Other,
}

/// Error reported by a hardware backend call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HardwareError {
    pub kind: HardwareErrorKind,
    /// Positive errno, when the backend reports one.
    pub errno: Option<i32>,
    pub message: String,
}

impl HardwareError {
    pub fn new(kind: HardwareErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            errno: None,
            message: message.into(),
        }
    }

    pub fn with_errno(mut self, errno: i32) -> Self {
        self.errno = Some(errno);
        self
    }

    /// Whether a retry after recovery can be expected to succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            HardwareErrorKind::Overrun | HardwareErrorKind::Suspended | HardwareErrorKind::WouldBlock
        )
    }
}
