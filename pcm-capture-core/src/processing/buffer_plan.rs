use crate::models::config::CompressionMode;
use crate::models::format::NegotiatedFormat;

/// Period length when each period becomes one Opus packet.
pub const COMPRESSED_PERIOD_MS: u32 = 20;

/// Period length for raw PCM delivery.
pub const RAW_PERIOD_MS: u32 = 120;

/// Output capacity recommended for one compressed packet.
pub const COMPRESSED_BUFFER_BYTES: usize = 4096;

/// Period and buffer sizes derived from the negotiated format.
///
/// ```text
/// compressed: period = rate * 20 / 1000 frames, scratch = one period of PCM
/// raw:        period = rate * 120 / 1000 frames, buffer = one period of PCM
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPlan {
    pub period_frames: usize,
    /// Size the caller's output buffer should have.
    pub buffer_bytes: usize,
    /// Internal PCM staging area; zero in raw mode.
    pub scratch_bytes: usize,
}

impl BufferPlan {
    pub fn new(format: &NegotiatedFormat, compression: CompressionMode) -> Self {
        let period_bytes = |frames: usize| frames * format.frame_bytes();

        if compression.is_compressed() {
            let period_frames = period_frames(format.sample_rate, COMPRESSED_PERIOD_MS);
            Self {
                period_frames,
                buffer_bytes: COMPRESSED_BUFFER_BYTES,
                scratch_bytes: period_bytes(period_frames),
            }
        } else {
            let period_frames = period_frames(format.sample_rate, RAW_PERIOD_MS);
            Self {
                period_frames,
                buffer_bytes: period_bytes(period_frames),
                scratch_bytes: 0,
            }
        }
    }
}

fn period_frames(sample_rate: u32, period_ms: u32) -> usize {
    (sample_rate as u64 * period_ms as u64 / 1000) as usize
}
