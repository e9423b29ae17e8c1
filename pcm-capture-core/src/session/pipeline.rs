use std::time::Instant;

use crate::models::audio_models::CaptureDiagnostics;
use crate::models::config::CaptureParameters;
use crate::models::error::CaptureError;
use crate::models::format::NegotiatedFormat;
use crate::models::state::CaptureState;
use crate::processing::buffer_plan::BufferPlan;
use crate::processing::byte_order;
use crate::processing::format_catalog::FormatCatalog;
use crate::session::device::CaptureDevice;
use crate::session::readiness::{ReadinessDescriptor, ReadinessPort};
use crate::traits::capture_hardware::{CaptureBackend, CaptureHardware};

/// Pull-based capture: one hardware period per `read`.
///
/// Data flow:
/// ```text
/// compressed: [hardware] → [scratch period] → [encoder] → caller buffer
/// raw:        [hardware] → caller buffer → [network byte order]
/// ```
///
/// Not thread-safe; drive it from one thread, calling `read` when the
/// readiness descriptor signals.
pub struct CapturePipeline<H: CaptureHardware> {
    device: CaptureDevice<H>,
    last_delivery: Option<Instant>,
    diagnostics: CaptureDiagnostics,
}

impl<H: CaptureHardware> CapturePipeline<H> {
    pub fn open<B>(backend: &B, params: CaptureParameters) -> Result<Self, CaptureError>
    where
        B: CaptureBackend<Handle = H>,
    {
        Ok(Self::from_device(CaptureDevice::open(backend, params)?))
    }

    pub fn from_device(device: CaptureDevice<H>) -> Self {
        Self {
            device,
            last_delivery: None,
            diagnostics: CaptureDiagnostics::default(),
        }
    }

    /// Acquire one period and write it to `output`, compressed or in network
    /// byte order. Returns the number of bytes written.
    ///
    /// Zero means nothing was delivered this time (no frames yet, a recovered
    /// hardware error, an empty packet, or a closed device); the caller
    /// should wait for readiness and call again. Never fails.
    ///
    /// Blocks for up to one period if called before the readiness
    /// descriptor signals.
    pub fn read(&mut self, output: &mut [u8]) -> usize {
        if !self.device.state.is_ready() {
            log::debug!("read on capture device \"{}\" in state {:?}", self.device.params.device, self.device.state);
            return 0;
        }

        self.device.state = CaptureState::Reading;
        self.diagnostics.reads += 1;
        let written = if self.device.encoder.is_some() {
            self.read_compressed(output)
        } else {
            self.read_raw(output)
        };
        self.device.state = CaptureState::Ready;

        if written > 0 {
            let now = Instant::now();
            let interval = self.last_delivery.map(|last| now.duration_since(last));
            self.last_delivery = Some(now);
            self.diagnostics.last_interval = interval;
            self.diagnostics.bytes_delivered += written as u64;
            log::debug!(
                "capture device \"{}\": {} bytes interval: {}ms",
                self.device.params.device,
                written,
                interval.map_or(0, |i| i.as_millis())
            );
        }
        written
    }

    fn read_compressed(&mut self, output: &mut [u8]) -> usize {
        let CaptureDevice {
            hardware,
            params,
            encoder,
            format,
            ..
        } = &mut self.device;
        let (Some(hardware), Some(stage)) = (hardware.as_mut(), encoder.as_mut()) else {
            return 0;
        };

        let frames = acquire(hardware, &mut stage.scratch, &params.device, &mut self.diagnostics);
        log::debug!(
            "pcm_readi period: {} bytes, acquired: {} bytes",
            stage.scratch.len(),
            frames * format.frame_bytes()
        );
        if frames == 0 {
            return 0;
        }

        match stage.encoder.encode(&stage.scratch, frames, output) {
            Ok(len) => {
                log::debug!("{} encode: {} frames -> {} bytes", stage.encoder.codec(), frames, len);
                len
            }
            Err(e) => {
                self.diagnostics.encoder_failures += 1;
                log::warn!("{} encode failed on device {}: {}", stage.encoder.codec(), params.device, e);
                0
            }
        }
    }

    fn read_raw(&mut self, output: &mut [u8]) -> usize {
        let CaptureDevice {
            hardware,
            params,
            format,
            plan,
            ..
        } = &mut self.device;
        let Some(hardware) = hardware.as_mut() else {
            return 0;
        };

        let frame_bytes = format.frame_bytes();
        let frames_wanted = plan.period_frames.min(output.len() / frame_bytes);
        if frames_wanted == 0 {
            log::warn!(
                "output buffer of {} bytes cannot hold a frame of {} bytes on device {}",
                output.len(),
                frame_bytes,
                params.device
            );
            return 0;
        }

        let region = &mut output[..frames_wanted * frame_bytes];
        let frames = acquire(hardware, region, &params.device, &mut self.diagnostics);
        log::debug!(
            "pcm_readi period: {} bytes, acquired: {} bytes",
            region.len(),
            frames * frame_bytes
        );
        if frames == 0 {
            return 0;
        }

        let size = frames.min(frames_wanted) * frame_bytes;
        byte_order::to_network_order(&mut region[..size], format);
        size
    }

    pub fn negotiated_format(&self) -> &NegotiatedFormat {
        self.device.format()
    }

    pub fn plan(&self) -> &BufferPlan {
        self.device.plan()
    }

    pub fn supported_formats(&self) -> &FormatCatalog {
        self.device.catalog()
    }

    pub fn params(&self) -> &CaptureParameters {
        self.device.params()
    }

    pub fn state(&self) -> CaptureState {
        self.device.state()
    }

    pub fn diagnostics(&self) -> &CaptureDiagnostics {
        &self.diagnostics
    }

    pub fn readiness(&self) -> ReadinessPort<'_, H> {
        self.device.readiness()
    }

    pub fn readiness_descriptor(&self) -> Option<ReadinessDescriptor> {
        self.device.readiness_descriptor()
    }

    pub fn device(&self) -> &CaptureDevice<H> {
        &self.device
    }

    /// Stop capturing and release the device. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.device.close();
    }
}

/// One blocking acquisition into `buf`. Hardware errors are reported as zero
/// frames; transient ones are recovered first.
fn acquire<H: CaptureHardware>(
    hardware: &mut H,
    buf: &mut [u8],
    device: &str,
    diagnostics: &mut CaptureDiagnostics,
) -> usize {
    match hardware.read_interleaved(buf) {
        Ok(0) => {
            diagnostics.empty_reads += 1;
            0
        }
        Ok(frames) => frames,
        Err(err) if !err.is_transient() => {
            diagnostics.hardware_failures += 1;
            log::warn!("pcm_readi on device {} failed ({:?}): {}", device, err.kind, err);
            0
        }
        Err(err) => {
            diagnostics.transient_failures += 1;
            log::debug!("pcm_readi on device {} failed: {}", device, err);
            if let Err(e) = hardware.recover(&err) {
                log::warn!("cannot recover capture device {}: {}", device, e);
            }
            diagnostics.last_transient = Some(CaptureError::TransientUnderrun {
                device: device.to_string(),
                reason: err.message,
            });
            0
        }
    }
}
