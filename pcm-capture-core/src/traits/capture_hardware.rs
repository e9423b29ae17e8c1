use crate::models::error::HardwareError;
use crate::models::format::SampleEncoding;
use crate::session::readiness::ReadinessDescriptor;

/// Opens capture handles by device name.
///
/// Implemented by:
/// - `AlsaBackend` (Linux)
pub trait CaptureBackend {
    type Handle: CaptureHardware;

    /// Open `device` exclusively for capture, in blocking mode.
    fn open_capture(&self, device: &str) -> Result<Self::Handle, HardwareError>;
}

/// A configuration space being narrowed down before it is installed.
///
/// Every setter constrains the space further; nothing reaches the
/// hardware until `CaptureHardware::install`.
pub trait HardwareParams {
    /// Whether the space still contains `encoding`. Does not constrain.
    fn accepts(&self, encoding: SampleEncoding) -> bool;

    fn request_interleaved(&self) -> Result<(), HardwareError>;

    fn request_encoding(&self, encoding: SampleEncoding) -> Result<(), HardwareError>;

    /// Request `rate`, returning the closest rate the hardware supports.
    fn request_rate_near(&self, rate: u32) -> Result<u32, HardwareError>;

    fn request_channels(&self, channels: u32) -> Result<(), HardwareError>;

    /// Request an exact period size in frames.
    fn request_period(&self, frames: usize) -> Result<(), HardwareError>;
}

/// An open capture handle.
///
/// Dropping the handle closes it.
pub trait CaptureHardware {
    type Params<'a>: HardwareParams
    where
        Self: 'a;

    /// A fresh, unconstrained configuration space for this handle.
    fn hw_params(&self) -> Result<Self::Params<'_>, HardwareError>;

    fn install(&self, params: &Self::Params<'_>) -> Result<(), HardwareError>;

    fn prepare(&self) -> Result<(), HardwareError>;

    fn start(&self) -> Result<(), HardwareError>;

    /// Blocking interleaved read filling at most `buf.len()` bytes of whole
    /// frames. Returns the number of frames acquired.
    fn read_interleaved(&mut self, buf: &mut [u8]) -> Result<usize, HardwareError>;

    /// Bring the stream back to a readable state after a failed read.
    fn recover(&mut self, error: &HardwareError) -> Result<(), HardwareError>;

    fn poll_descriptors(&self) -> Result<Vec<ReadinessDescriptor>, HardwareError>;
}
