//! Network byte-order normalization for captured PCM.
//!
//! Samples are swapped in place, one physical sample at a time, so the hot
//! path never allocates.

use crate::models::format::NegotiatedFormat;

/// Rewrite `samples` into big-endian order if `format` is little endian.
///
/// Trailing bytes that do not make up a whole sample are left untouched.
pub fn to_network_order(samples: &mut [u8], format: &NegotiatedFormat) {
    if format.is_network_order() || format.bytes_per_sample < 2 {
        return;
    }
    swap_samples(samples, format.bytes_per_sample);
}

/// Reverse the bytes of every `width`-byte sample.
pub(crate) fn swap_samples(samples: &mut [u8], width: usize) {
    if width == 2 {
        for pair in samples.chunks_exact_mut(2) {
            pair.swap(0, 1);
        }
    } else {
        for sample in samples.chunks_exact_mut(width) {
            sample.reverse();
        }
    }
}
