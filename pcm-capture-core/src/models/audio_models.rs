use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::CaptureError;

/// A capture-capable PCM reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDeviceInfo {
    /// Name to pass as `CaptureParameters::device`.
    pub id: String,
    pub description: String,
    pub is_default: bool,
}

/// Counters for debugging a capture pipeline.
#[derive(Debug, Clone, Default)]
pub struct CaptureDiagnostics {
    pub reads: u64,
    /// Reads that acquired no frames.
    pub empty_reads: u64,
    /// Reads that hit a hardware error and went through recovery.
    pub transient_failures: u64,
    /// Reads that hit a hardware error recovery cannot fix (device gone, busy).
    pub hardware_failures: u64,
    pub encoder_failures: u64,
    pub bytes_delivered: u64,
    /// Wall-clock time between the two most recent deliveries.
    pub last_interval: Option<Duration>,
    pub last_transient: Option<CaptureError>,
}
