//! # pcm-capture-core
//!
//! Platform-agnostic PCM capture core library.
//!
//! Provides format negotiation against a caller preference list, period
//! planning, byte-order normalization, Opus compression and the pull-based
//! capture pipeline. Platform backends (ALSA on Linux) implement the
//! `CaptureBackend` / `CaptureHardware` traits and plug into the generic
//! `CapturePipeline`.
//!
//! ## Architecture
//!
//! ```text
//! pcm-capture-core (this crate)
//! ├── traits/       ← CaptureBackend, CaptureHardware, HardwareParams, FrameEncoder
//! ├── models/       ← CaptureError, CaptureState, CaptureParameters, SampleEncoding, etc.
//! ├── processing/   ← BufferPlan, FormatCatalog, network byte order, Opus encoder
//! └── session/      ← CaptureDevice, CapturePipeline, ReadinessPort
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{CaptureDeviceInfo, CaptureDiagnostics};
pub use models::config::{CaptureParameters, CompressionMode};
pub use models::error::{CaptureError, HardwareError, HardwareErrorKind};
pub use models::format::{ByteOrder, NegotiatedFormat, SampleEncoding};
pub use models::state::CaptureState;
pub use processing::buffer_plan::BufferPlan;
pub use processing::format_catalog::FormatCatalog;
pub use processing::opus_encoder::OpusFrameEncoder;
pub use session::device::CaptureDevice;
pub use session::pipeline::CapturePipeline;
pub use session::readiness::{ReadinessDescriptor, ReadinessPort};
pub use traits::capture_hardware::{CaptureBackend, CaptureHardware, HardwareParams};
pub use traits::frame_encoder::FrameEncoder;
