use std::os::fd::{AsRawFd, RawFd};

use crate::traits::capture_hardware::CaptureHardware;

/// A file descriptor plus the `poll(2)` events to wait for on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessDescriptor {
    pub fd: RawFd,
    pub events: i16,
}

impl AsRawFd for ReadinessDescriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

/// Readiness view of an open capture device.
///
/// An external event loop waits on [`ReadinessPort::descriptor`] and calls
/// `read` once it signals. Calling `read` without waiting blocks the caller
/// for up to one period, stalling everything else on that loop.
///
/// Handles backed by several descriptors (e.g. multi-queue hardware) expose
/// only the first one.
pub struct ReadinessPort<'a, H: CaptureHardware> {
    device: &'a str,
    hardware: Option<&'a H>,
}

impl<'a, H: CaptureHardware> ReadinessPort<'a, H> {
    pub(crate) fn new(device: &'a str, hardware: Option<&'a H>) -> Self {
        Self { device, hardware }
    }

    /// The descriptor to poll, or `None` when the device is closed or the
    /// handle reports no descriptor.
    pub fn descriptor(&self) -> Option<ReadinessDescriptor> {
        let descriptors = self.descriptors();
        if descriptors.len() > 1 {
            log::debug!(
                "Capture device \"{}\" has {} poll descriptors; exposing the first",
                self.device,
                descriptors.len()
            );
        }
        descriptors.first().copied()
    }

    /// Number of descriptors the handle reports.
    pub fn count(&self) -> usize {
        self.descriptors().len()
    }

    fn descriptors(&self) -> Vec<ReadinessDescriptor> {
        let Some(hardware) = self.hardware else {
            return Vec::new();
        };
        match hardware.poll_descriptors() {
            Ok(descriptors) => descriptors,
            Err(e) => {
                log::error!("cannot get poll descriptors of device {}: {}", self.device, e);
                Vec::new()
            }
        }
    }
}
