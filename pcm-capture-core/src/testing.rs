//! In-memory capture backend used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::models::error::{HardwareError, HardwareErrorKind};
use crate::models::format::SampleEncoding;
use crate::session::readiness::ReadinessDescriptor;
use crate::traits::capture_hardware::{CaptureBackend, CaptureHardware, HardwareParams};
use crate::traits::frame_encoder::FrameEncoder;

/// One scripted result for `read_interleaved`.
pub(crate) enum MockRead {
    Bytes(Vec<u8>),
    Error(HardwareErrorKind),
}

#[derive(Default)]
struct Shared {
    opens: Cell<usize>,
    open_handles: Cell<usize>,
    closes: Cell<usize>,
    committed: Cell<Option<SampleEncoding>>,
    period: Cell<Option<usize>>,
    started: Cell<bool>,
    recoveries: Cell<usize>,
    reads: RefCell<VecDeque<MockRead>>,
}

#[derive(Clone)]
struct Capabilities {
    supported: Vec<SampleEncoding>,
    granted_rate: Option<u32>,
    max_channels: u32,
    reject_period: bool,
    descriptors: Vec<ReadinessDescriptor>,
}

/// Backend that behaves like a single exclusive capture device.
pub(crate) struct MockBackend {
    caps: Capabilities,
    fail_open: Option<HardwareErrorKind>,
    shared: Rc<Shared>,
}

impl MockBackend {
    pub(crate) fn new(supported: Vec<SampleEncoding>) -> Self {
        Self {
            caps: Capabilities {
                supported,
                granted_rate: None,
                max_channels: 2,
                reject_period: false,
                descriptors: vec![ReadinessDescriptor { fd: 7, events: 1 }],
            },
            fail_open: None,
            shared: Rc::new(Shared::default()),
        }
    }

    pub(crate) fn granting_rate(mut self, rate: u32) -> Self {
        self.caps.granted_rate = Some(rate);
        self
    }

    pub(crate) fn with_max_channels(mut self, channels: u32) -> Self {
        self.caps.max_channels = channels;
        self
    }

    pub(crate) fn rejecting_period(mut self) -> Self {
        self.caps.reject_period = true;
        self
    }

    pub(crate) fn with_descriptors(mut self, descriptors: Vec<ReadinessDescriptor>) -> Self {
        self.caps.descriptors = descriptors;
        self
    }

    pub(crate) fn failing_open(mut self, kind: HardwareErrorKind) -> Self {
        self.fail_open = Some(kind);
        self
    }

    pub(crate) fn push_read(&self, read: MockRead) {
        self.shared.reads.borrow_mut().push_back(read);
    }

    pub(crate) fn opens(&self) -> usize {
        self.shared.opens.get()
    }

    pub(crate) fn open_handles(&self) -> usize {
        self.shared.open_handles.get()
    }

    pub(crate) fn closes(&self) -> usize {
        self.shared.closes.get()
    }

    pub(crate) fn committed_encoding(&self) -> Option<SampleEncoding> {
        self.shared.committed.get()
    }

    pub(crate) fn requested_period(&self) -> Option<usize> {
        self.shared.period.get()
    }

    pub(crate) fn started(&self) -> bool {
        self.shared.started.get()
    }

    pub(crate) fn recoveries(&self) -> usize {
        self.shared.recoveries.get()
    }
}

impl CaptureBackend for MockBackend {
    type Handle = MockPcm;

    fn open_capture(&self, _device: &str) -> Result<MockPcm, HardwareError> {
        self.shared.opens.set(self.shared.opens.get() + 1);
        if let Some(kind) = self.fail_open {
            return Err(HardwareError::new(kind, "No such file or directory").with_errno(2));
        }
        if self.shared.open_handles.get() > 0 {
            return Err(HardwareError::new(HardwareErrorKind::Busy, "Device or resource busy").with_errno(16));
        }
        self.shared.open_handles.set(1);
        Ok(MockPcm {
            caps: self.caps.clone(),
            shared: Rc::clone(&self.shared),
            frame_bytes: Cell::new(0),
        })
    }
}

pub(crate) struct MockPcm {
    caps: Capabilities,
    shared: Rc<Shared>,
    frame_bytes: Cell<usize>,
}

impl Drop for MockPcm {
    fn drop(&mut self) {
        self.shared.open_handles.set(self.shared.open_handles.get() - 1);
        self.shared.closes.set(self.shared.closes.get() + 1);
    }
}

pub(crate) struct MockParams<'a> {
    pcm: &'a MockPcm,
    encoding: Cell<Option<SampleEncoding>>,
    channels: Cell<u32>,
}

fn rejected() -> HardwareError {
    HardwareError::new(HardwareErrorKind::Rejected, "Invalid argument").with_errno(22)
}

impl HardwareParams for MockParams<'_> {
    fn accepts(&self, encoding: SampleEncoding) -> bool {
        self.pcm.caps.supported.contains(&encoding)
            && self.encoding.get().map_or(true, |current| current == encoding)
    }

    fn request_interleaved(&self) -> Result<(), HardwareError> {
        Ok(())
    }

    fn request_encoding(&self, encoding: SampleEncoding) -> Result<(), HardwareError> {
        if !self.accepts(encoding) {
            return Err(rejected());
        }
        self.encoding.set(Some(encoding));
        Ok(())
    }

    fn request_rate_near(&self, rate: u32) -> Result<u32, HardwareError> {
        Ok(self.pcm.caps.granted_rate.unwrap_or(rate))
    }

    fn request_channels(&self, channels: u32) -> Result<(), HardwareError> {
        if channels > self.pcm.caps.max_channels {
            return Err(rejected());
        }
        self.channels.set(channels);
        Ok(())
    }

    fn request_period(&self, frames: usize) -> Result<(), HardwareError> {
        if self.pcm.caps.reject_period {
            return Err(rejected());
        }
        self.pcm.shared.period.set(Some(frames));
        Ok(())
    }
}

impl CaptureHardware for MockPcm {
    type Params<'a>
        = MockParams<'a>
    where
        Self: 'a;

    fn hw_params(&self) -> Result<MockParams<'_>, HardwareError> {
        Ok(MockParams {
            pcm: self,
            encoding: Cell::new(None),
            channels: Cell::new(0),
        })
    }

    fn install(&self, params: &MockParams<'_>) -> Result<(), HardwareError> {
        let encoding = params.encoding.get().ok_or_else(rejected)?;
        let width = encoding.bytes_per_sample().ok_or_else(rejected)?;
        self.frame_bytes.set(width * params.channels.get() as usize);
        self.shared.committed.set(Some(encoding));
        Ok(())
    }

    fn prepare(&self) -> Result<(), HardwareError> {
        Ok(())
    }

    fn start(&self) -> Result<(), HardwareError> {
        self.shared.started.set(true);
        Ok(())
    }

    fn read_interleaved(&mut self, buf: &mut [u8]) -> Result<usize, HardwareError> {
        match self.shared.reads.borrow_mut().pop_front() {
            None => Ok(0),
            Some(MockRead::Bytes(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n / self.frame_bytes.get())
            }
            Some(MockRead::Error(kind)) => Err(HardwareError::new(kind, "Broken pipe").with_errno(32)),
        }
    }

    fn recover(&mut self, _error: &HardwareError) -> Result<(), HardwareError> {
        self.shared.recoveries.set(self.shared.recoveries.get() + 1);
        Ok(())
    }

    fn poll_descriptors(&self) -> Result<Vec<ReadinessDescriptor>, HardwareError> {
        Ok(self.caps.descriptors.clone())
    }
}

/// Encoder emitting a fixed-size packet per period.
pub(crate) struct FixedPacketEncoder {
    pub(crate) packet_len: usize,
}

impl FrameEncoder for FixedPacketEncoder {
    fn encode(&mut self, _period: &[u8], _frames: usize, output: &mut [u8]) -> Result<usize, String> {
        let n = self.packet_len.min(output.len());
        output[..n].fill(0xab);
        Ok(n)
    }

    fn codec(&self) -> &str {
        "fixed"
    }
}
