/// Compresses one captured period at a time.
///
/// An encoder is created per capture device and is never shared.
pub trait FrameEncoder: Send {
    /// Encode `frames` interleaved frames held in `period` into `output`.
    ///
    /// Returns the packet length, which may legitimately be zero.
    fn encode(&mut self, period: &[u8], frames: usize, output: &mut [u8]) -> Result<usize, String>;

    /// Codec identifier for log lines (e.g. "opus").
    fn codec(&self) -> &str;
}
