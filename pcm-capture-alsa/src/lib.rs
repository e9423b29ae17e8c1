//! # pcm-capture-alsa
//!
//! Linux ALSA backend for pcm-capture.
//!
//! Provides:
//! - `AlsaBackend` / `AlsaPcm`: Capture handles implementing the core hardware traits
//! - `DeviceEnumerator`: Capture device listing via ALSA name hints
//! - `wait_readable`: Blocking wait on a pipeline's readiness descriptor
//!
//! ## Platform Requirements
//! - Linux with libasound2 (and its development headers for linking)
//!
//! ## Usage
//! ```ignore
//! use pcm_capture_alsa::{wait_readable, AlsaBackend};
//! use pcm_capture_core::{CaptureParameters, CapturePipeline};
//!
//! let mut pipeline = CapturePipeline::open(&AlsaBackend, CaptureParameters::default()).unwrap();
//! let fd = pipeline.readiness_descriptor().unwrap();
//! let mut buf = vec![0u8; pipeline.plan().buffer_bytes];
//! if wait_readable(&fd, 1000).unwrap() {
//!     let n = pipeline.read(&mut buf);
//! }
//! ```

#[cfg(target_os = "linux")]
pub mod alsa_pcm;
#[cfg(target_os = "linux")]
pub mod device_enumerator;
#[cfg(target_os = "linux")]
pub mod readiness;

#[cfg(target_os = "linux")]
pub use alsa_pcm::{AlsaBackend, AlsaPcm};
#[cfg(target_os = "linux")]
pub use device_enumerator::DeviceEnumerator;
#[cfg(target_os = "linux")]
pub use readiness::wait_readable;
