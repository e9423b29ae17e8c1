//! ALSA capture handle.
//!
//! Opens a PCM in blocking capture mode and exposes it to the core through
//! `CaptureBackend` / `CaptureHardware`. Format negotiation, planning and
//! byte order all live in `pcm-capture-core`; this module only translates.

use alsa::pcm::{Access, Format, Frames, HwParams, PCM};
use alsa::{Direction, PollDescriptors, ValueOr};

use pcm_capture_core::models::error::{HardwareError, HardwareErrorKind};
use pcm_capture_core::models::format::SampleEncoding;
use pcm_capture_core::session::readiness::ReadinessDescriptor;
use pcm_capture_core::traits::capture_hardware::{CaptureBackend, CaptureHardware, HardwareParams};

/// Opens ALSA capture PCMs by name (`default`, `hw:1,0`, `plughw:0`, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct AlsaBackend;

impl CaptureBackend for AlsaBackend {
    type Handle = AlsaPcm;

    fn open_capture(&self, device: &str) -> Result<AlsaPcm, HardwareError> {
        let pcm = PCM::new(device, Direction::Capture, false).map_err(hardware_error)?;
        log::debug!("Opened ALSA PCM \"{}\" for capture", device);
        Ok(AlsaPcm {
            pcm,
            device: device.to_string(),
        })
    }
}

/// An open ALSA capture PCM. Closed on drop.
pub struct AlsaPcm {
    pcm: PCM,
    device: String,
}

/// Hardware parameter space of an [`AlsaPcm`].
pub struct AlsaParams<'a>(HwParams<'a>);

impl HardwareParams for AlsaParams<'_> {
    fn accepts(&self, encoding: SampleEncoding) -> bool {
        self.0.test_format(alsa_format(encoding)).is_ok()
    }

    fn request_interleaved(&self) -> Result<(), HardwareError> {
        self.0.set_access(Access::RWInterleaved).map_err(hardware_error)
    }

    fn request_encoding(&self, encoding: SampleEncoding) -> Result<(), HardwareError> {
        self.0.set_format(alsa_format(encoding)).map_err(hardware_error)
    }

    fn request_rate_near(&self, rate: u32) -> Result<u32, HardwareError> {
        self.0.set_rate_near(rate, ValueOr::Nearest).map_err(hardware_error)
    }

    fn request_channels(&self, channels: u32) -> Result<(), HardwareError> {
        self.0.set_channels(channels).map_err(hardware_error)
    }

    fn request_period(&self, frames: usize) -> Result<(), HardwareError> {
        self.0
            .set_period_size(frames as Frames, ValueOr::Nearest)
            .map_err(hardware_error)
    }
}

impl CaptureHardware for AlsaPcm {
    type Params<'a>
        = AlsaParams<'a>
    where
        Self: 'a;

    fn hw_params(&self) -> Result<AlsaParams<'_>, HardwareError> {
        HwParams::any(&self.pcm).map(AlsaParams).map_err(hardware_error)
    }

    fn install(&self, params: &AlsaParams<'_>) -> Result<(), HardwareError> {
        self.pcm.hw_params(&params.0).map_err(hardware_error)
    }

    fn prepare(&self) -> Result<(), HardwareError> {
        self.pcm.prepare().map_err(hardware_error)
    }

    fn start(&self) -> Result<(), HardwareError> {
        self.pcm.start().map_err(hardware_error)
    }

    fn read_interleaved(&mut self, buf: &mut [u8]) -> Result<usize, HardwareError> {
        self.pcm.io_bytes().readi(buf).map_err(hardware_error)
    }

    fn recover(&mut self, error: &HardwareError) -> Result<(), HardwareError> {
        let errno = error.errno.unwrap_or(libc::EIO);
        log::debug!("Recovering ALSA PCM \"{}\" from errno {}", self.device, errno);
        self.pcm.recover(-errno.abs(), true).map_err(hardware_error)
    }

    fn poll_descriptors(&self) -> Result<Vec<ReadinessDescriptor>, HardwareError> {
        let fds = PollDescriptors::get(&self.pcm).map_err(hardware_error)?;
        Ok(fds
            .into_iter()
            .map(|pfd| ReadinessDescriptor {
                fd: pfd.fd,
                events: pfd.events,
            })
            .collect())
    }
}

/// Classify an ALSA error by its errno.
pub(crate) fn error_kind(errno: i32) -> HardwareErrorKind {
    match errno.abs() {
        libc::EBUSY => HardwareErrorKind::Busy,
        libc::EACCES | libc::EPERM => HardwareErrorKind::PermissionDenied,
        libc::ENOENT | libc::ENODEV | libc::ENXIO => HardwareErrorKind::NotFound,
        libc::EPIPE => HardwareErrorKind::Overrun,
        libc::ESTRPIPE => HardwareErrorKind::Suspended,
        libc::EAGAIN => HardwareErrorKind::WouldBlock,
        libc::EINVAL => HardwareErrorKind::Rejected,
        _ => HardwareErrorKind::Other,
    }
}

pub(crate) fn hardware_error(e: alsa::Error) -> HardwareError {
    let errno = e.errno();
    HardwareError::new(error_kind(errno), e.to_string()).with_errno(errno.abs())
}

/// The ALSA format constant for an encoding.
pub fn alsa_format(encoding: SampleEncoding) -> Format {
    use SampleEncoding::*;
    match encoding {
        S8 => Format::S8,
        U8 => Format::U8,
        S16Le => Format::S16LE,
        S16Be => Format::S16BE,
        U16Le => Format::U16LE,
        U16Be => Format::U16BE,
        S24Le => Format::S24LE,
        S24Be => Format::S24BE,
        U24Le => Format::U24LE,
        U24Be => Format::U24BE,
        S32Le => Format::S32LE,
        S32Be => Format::S32BE,
        U32Le => Format::U32LE,
        U32Be => Format::U32BE,
        FloatLe => Format::FloatLE,
        FloatBe => Format::FloatBE,
        Float64Le => Format::Float64LE,
        Float64Be => Format::Float64BE,
        Iec958SubframeLe => Format::IEC958SubframeLE,
        Iec958SubframeBe => Format::IEC958SubframeBE,
        MuLaw => Format::MuLaw,
        ALaw => Format::ALaw,
        ImaAdpcm => Format::ImaAdPCM,
        Mpeg => Format::MPEG,
        Gsm => Format::GSM,
        Special => Format::Special,
        S243Le => Format::S243LE,
        S243Be => Format::S243BE,
        U243Le => Format::U243LE,
        U243Be => Format::U243BE,
        S203Le => Format::S203LE,
        S203Be => Format::S203BE,
        U203Le => Format::U203LE,
        U203Be => Format::U203BE,
        S183Le => Format::S183LE,
        S183Be => Format::S183BE,
        U183Le => Format::U183LE,
        U183Be => Format::U183BE,
    }
}
