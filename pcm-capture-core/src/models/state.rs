/// Capture instance state machine.
///
/// State transitions:
/// ```text
/// ready ⇄ reading
///   ↓
/// closed
/// ```
///
/// Opening is atomic: a failed open never yields an instance, so there is
/// no opening or failed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Closed,
    Ready,
    Reading,
}

impl CaptureState {
    /// Whether a read may be issued.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}
