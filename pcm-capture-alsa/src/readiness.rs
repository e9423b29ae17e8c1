//! Waiting on a capture readiness descriptor.

use alsa::poll::{poll, pollfd};

use pcm_capture_core::models::error::HardwareError;
use pcm_capture_core::session::readiness::ReadinessDescriptor;

use crate::alsa_pcm::hardware_error;

/// Block until `descriptor` signals or `timeout_ms` elapses (`-1` waits
/// forever). Returns whether it signalled.
pub fn wait_readable(descriptor: &ReadinessDescriptor, timeout_ms: i32) -> Result<bool, HardwareError> {
    let mut fds = [pollfd {
        fd: descriptor.fd,
        events: descriptor.events,
        revents: 0,
    }];
    let ready = poll(&mut fds, timeout_ms).map_err(hardware_error)?;
    Ok(ready > 0 && fds[0].revents != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_signals_once_written() {
        let mut ends = [0; 2];
        assert_eq!(unsafe { libc::pipe(ends.as_mut_ptr()) }, 0);
        let descriptor = ReadinessDescriptor {
            fd: ends[0],
            events: libc::POLLIN,
        };

        assert!(!wait_readable(&descriptor, 0).unwrap());

        let byte = [1u8];
        assert_eq!(unsafe { libc::write(ends[1], byte.as_ptr().cast(), 1) }, 1);
        assert!(wait_readable(&descriptor, 100).unwrap());

        unsafe {
            libc::close(ends[0]);
            libc::close(ends[1]);
        }
    }
}
