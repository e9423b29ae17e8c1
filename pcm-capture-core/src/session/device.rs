use std::fmt;

use crate::models::config::{CaptureParameters, CompressionMode};
use crate::models::error::{CaptureError, HardwareError};
use crate::models::format::NegotiatedFormat;
use crate::models::state::CaptureState;
use crate::processing::buffer_plan::BufferPlan;
use crate::processing::format_catalog::FormatCatalog;
use crate::processing::opus_encoder::OpusFrameEncoder;
use crate::session::readiness::{ReadinessDescriptor, ReadinessPort};
use crate::traits::capture_hardware::{CaptureBackend, CaptureHardware, HardwareParams};
use crate::traits::frame_encoder::FrameEncoder;

/// The steps of opening a capture device, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpenStep {
    Validate,
    Open,
    AllocateParams,
    SetAccess,
    SetFormat,
    SetRate,
    SetChannels,
    CreateEncoder,
    SetPeriod,
    Install,
    Prepare,
    Start,
}

impl OpenStep {
    /// Which `ParameterRejected` parameter a failure of this step refers to.
    fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::SetRate => Some("sample rate"),
            Self::SetChannels => Some("channel count"),
            Self::SetPeriod => Some("period size"),
            _ => None,
        }
    }
}

impl fmt::Display for OpenStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Validate => "validate parameters",
            Self::Open => "open audio device",
            Self::AllocateParams => "initialize hardware parameter structure",
            Self::SetAccess => "set access type",
            Self::SetFormat => "set sample format",
            Self::SetRate => "set sample rate",
            Self::SetChannels => "set channel count",
            Self::CreateEncoder => "create encoder",
            Self::SetPeriod => "set period size",
            Self::Install => "set parameters",
            Self::Prepare => "prepare audio interface",
            Self::Start => "start audio interface",
        };
        f.write_str(text)
    }
}

/// Map a failed open step to the caller-facing error, logging it.
fn step_failed(device: &str, step: OpenStep, reason: impl fmt::Display) -> CaptureError {
    log::error!("cannot {} on device {}: {}", step, device, reason);

    let device = device.to_string();
    let reason = reason.to_string();
    match step {
        OpenStep::Validate => CaptureError::InvalidConfiguration(reason),
        OpenStep::CreateEncoder => CaptureError::EncoderInitFailed { device, reason },
        _ => match step.parameter() {
            Some(parameter) => CaptureError::ParameterRejected {
                device,
                parameter: parameter.to_string(),
                reason,
            },
            None => CaptureError::DeviceUnavailable { device, reason },
        },
    }
}

/// Encoder plus the PCM staging area it consumes from.
pub(crate) struct EncoderStage {
    pub(crate) encoder: Box<dyn FrameEncoder>,
    pub(crate) scratch: Vec<u8>,
}

/// Everything negotiated on the parameter space before it is installed.
struct Negotiated {
    format: NegotiatedFormat,
    catalog: FormatCatalog,
    plan: BufferPlan,
    encoder: Option<EncoderStage>,
}

/// Constructor for the compression encoder of a device.
pub type EncoderResult = Result<Box<dyn FrameEncoder>, String>;

/// Built-in encoder selection by compression mode.
pub fn builtin_encoder(mode: CompressionMode, format: &NegotiatedFormat, plan: &BufferPlan) -> EncoderResult {
    match mode {
        CompressionMode::None => Err("no encoder for uncompressed capture".into()),
        CompressionMode::Opus => Ok(Box::new(OpusFrameEncoder::new(format, plan.period_frames)?)),
    }
}

/// An open, configured and started capture handle with its negotiated format.
///
/// Owns the hardware handle, the encoder and the encoder's scratch buffer
/// exclusively; all of them are released on `close` or drop.
pub struct CaptureDevice<H: CaptureHardware> {
    pub(crate) hardware: Option<H>,
    pub(crate) params: CaptureParameters,
    pub(crate) format: NegotiatedFormat,
    pub(crate) catalog: FormatCatalog,
    pub(crate) plan: BufferPlan,
    pub(crate) encoder: Option<EncoderStage>,
    pub(crate) state: CaptureState,
}

impl<H: CaptureHardware> CaptureDevice<H> {
    /// Open `params.device`, negotiate its format and start capturing.
    pub fn open<B>(backend: &B, params: CaptureParameters) -> Result<Self, CaptureError>
    where
        B: CaptureBackend<Handle = H>,
    {
        Self::open_with_encoder(backend, params, builtin_encoder)
    }

    /// Like [`CaptureDevice::open`], with a caller-supplied encoder constructor
    /// used when compression is configured.
    pub fn open_with_encoder<B, F>(backend: &B, params: CaptureParameters, make_encoder: F) -> Result<Self, CaptureError>
    where
        B: CaptureBackend<Handle = H>,
        F: FnOnce(CompressionMode, &NegotiatedFormat, &BufferPlan) -> EncoderResult,
    {
        log::info!("Open capture device: \"{}\"", params.device);

        params
            .validate()
            .map_err(|reason| step_failed(&params.device, OpenStep::Validate, reason))?;

        // Dropping `hardware` on any later failure closes the handle.
        let hardware = backend
            .open_capture(&params.device)
            .map_err(|e| step_failed(&params.device, OpenStep::Open, e))?;

        let negotiated = negotiate(&hardware, &params, make_encoder)?;

        log::info!(
            "Capture device \"{}\": format {} buffer_size {} period_size {} rate {} channels {}",
            params.device,
            negotiated.format.encoding,
            negotiated.plan.buffer_bytes,
            negotiated.plan.period_frames,
            negotiated.format.sample_rate,
            negotiated.format.channels
        );

        Ok(Self {
            hardware: Some(hardware),
            params,
            format: negotiated.format,
            catalog: negotiated.catalog,
            plan: negotiated.plan,
            encoder: negotiated.encoder,
            state: CaptureState::Ready,
        })
    }

    pub fn params(&self) -> &CaptureParameters {
        &self.params
    }

    pub fn format(&self) -> &NegotiatedFormat {
        &self.format
    }

    /// Encodings the hardware reported before the format was committed.
    pub fn catalog(&self) -> &FormatCatalog {
        &self.catalog
    }

    pub fn plan(&self) -> &BufferPlan {
        &self.plan
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.hardware.is_some()
    }

    pub fn readiness(&self) -> ReadinessPort<'_, H> {
        ReadinessPort::new(&self.params.device, self.hardware.as_ref())
    }

    /// First poll descriptor of the handle; `None` once closed.
    pub fn readiness_descriptor(&self) -> Option<ReadinessDescriptor> {
        self.readiness().descriptor()
    }

    /// Release the hardware handle and the encoder. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.encoder = None;
        if let Some(hardware) = self.hardware.take() {
            drop(hardware);
            log::info!("Closed capture device: \"{}\"", self.params.device);
        }
        self.state = CaptureState::Closed;
    }
}

impl<H: CaptureHardware> Drop for CaptureDevice<H> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Run every configuration step against `hardware`, stopping at the first
/// failure. Nothing allocated here outlives a failure.
fn negotiate<H, F>(hardware: &H, params: &CaptureParameters, make_encoder: F) -> Result<Negotiated, CaptureError>
where
    H: CaptureHardware,
    F: FnOnce(CompressionMode, &NegotiatedFormat, &BufferPlan) -> EncoderResult,
{
    let device = params.device.as_str();
    let fail = |step: OpenStep| move |e: HardwareError| step_failed(device, step, e);

    let hw_params = hardware.hw_params().map_err(fail(OpenStep::AllocateParams))?;
    hw_params.request_interleaved().map_err(fail(OpenStep::SetAccess))?;

    let catalog = FormatCatalog::discover(&hw_params);
    log::debug!(
        "Device \"{}\" supports: {}",
        device,
        catalog.iter().map(|e| e.name()).collect::<Vec<_>>().join(", ")
    );

    let encoding = params
        .formats
        .iter()
        .copied()
        .filter(|encoding| {
            let usable = encoding.bytes_per_sample().is_some();
            if !usable {
                log::debug!("skip sample format {} on device {}: no whole-byte sample width", encoding, device);
            }
            usable
        })
        .find(|encoding| match hw_params.request_encoding(*encoding) {
            Ok(()) => {
                log::info!("set sample format device: {} to: {} ok", device, encoding);
                true
            }
            Err(e) => {
                log::debug!("cannot set sample format device: {} to: {} error: {}", device, encoding, e);
                false
            }
        })
        .ok_or_else(|| {
            log::error!("cannot {} on device {}: none of [{}] accepted", OpenStep::SetFormat, device, params.formats_label());
            CaptureError::NoSupportedFormat {
                device: device.to_string(),
                requested: params.formats_label(),
            }
        })?;

    let sample_rate = hw_params
        .request_rate_near(params.sample_rate)
        .map_err(fail(OpenStep::SetRate))?;
    if sample_rate != params.sample_rate {
        log::info!("Device \"{}\" granted {} Hz instead of {} Hz", device, sample_rate, params.sample_rate);
    }

    hw_params
        .request_channels(params.channels)
        .map_err(fail(OpenStep::SetChannels))?;

    let format = NegotiatedFormat::new(encoding, sample_rate, params.channels)
        .ok_or_else(|| step_failed(device, OpenStep::SetFormat, format!("{} has no whole-byte sample width", encoding)))?;
    let plan = BufferPlan::new(&format, params.compression);

    let encoder = if params.compression.is_compressed() {
        let encoder = make_encoder(params.compression, &format, &plan)
            .map_err(|reason| step_failed(device, OpenStep::CreateEncoder, reason))?;
        Some(EncoderStage {
            encoder,
            scratch: vec![0; plan.scratch_bytes],
        })
    } else {
        None
    };

    hw_params
        .request_period(plan.period_frames)
        .map_err(|e| step_failed(device, OpenStep::SetPeriod, format!("{} frames: {}", plan.period_frames, e)))?;
    hardware.install(&hw_params).map_err(fail(OpenStep::Install))?;
    hardware.prepare().map_err(fail(OpenStep::Prepare))?;
    hardware.start().map_err(fail(OpenStep::Start))?;

    Ok(Negotiated {
        format,
        catalog,
        plan,
        encoder,
    })
}
