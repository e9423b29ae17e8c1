use crate::models::format::{ByteOrder, NegotiatedFormat, SampleEncoding};
use crate::traits::frame_encoder::FrameEncoder;

/// How captured bytes are decoded into encoder input.
#[derive(Debug, Clone, Copy)]
enum PcmLayout {
    Int16(ByteOrder),
    Float32(ByteOrder),
}

/// Opus encoder fed with whole capture periods.
///
/// Accepts S16 and FLOAT captures in either byte order, mono or stereo, at
/// any rate libopus supports (8, 12, 16, 24 or 48 kHz). The rate passed in is
/// the one the hardware granted, so a "near" rate libopus cannot use fails
/// here instead of at the first encode.
pub struct OpusFrameEncoder {
    encoder: opus::Encoder,
    layout: PcmLayout,
    channels: usize,
    int_samples: Vec<i16>,
    float_samples: Vec<f32>,
}

impl OpusFrameEncoder {
    pub fn new(format: &NegotiatedFormat, period_frames: usize) -> Result<Self, String> {
        let layout = match format.encoding {
            SampleEncoding::S16Le => PcmLayout::Int16(ByteOrder::Little),
            SampleEncoding::S16Be => PcmLayout::Int16(ByteOrder::Big),
            SampleEncoding::FloatLe => PcmLayout::Float32(ByteOrder::Little),
            SampleEncoding::FloatBe => PcmLayout::Float32(ByteOrder::Big),
            other => return Err(format!("opus cannot encode {} samples", other)),
        };

        let channels = match format.channels {
            1 => opus::Channels::Mono,
            2 => opus::Channels::Stereo,
            n => return Err(format!("opus supports 1 or 2 channels, got {}", n)),
        };

        let encoder = opus::Encoder::new(format.sample_rate, channels, opus::Application::Voip)
            .map_err(|e| format!("opus_encoder_create at {} Hz: {}", format.sample_rate, e))?;

        let samples = period_frames * format.channels as usize;
        let (int_samples, float_samples) = match layout {
            PcmLayout::Int16(_) => (vec![0; samples], Vec::new()),
            PcmLayout::Float32(_) => (Vec::new(), vec![0.0; samples]),
        };

        Ok(Self {
            encoder,
            layout,
            channels: format.channels as usize,
            int_samples,
            float_samples,
        })
    }
}

impl FrameEncoder for OpusFrameEncoder {
    fn encode(&mut self, period: &[u8], frames: usize, output: &mut [u8]) -> Result<usize, String> {
        let count = frames * self.channels;

        let result = match self.layout {
            PcmLayout::Int16(order) => {
                if count > self.int_samples.len() || period.len() < count * 2 {
                    return Err(format!("{} frames exceed the encoder period", frames));
                }
                for (dst, src) in self.int_samples.iter_mut().zip(period.chunks_exact(2)).take(count) {
                    let bytes = [src[0], src[1]];
                    *dst = match order {
                        ByteOrder::Little => i16::from_le_bytes(bytes),
                        ByteOrder::Big => i16::from_be_bytes(bytes),
                    };
                }
                self.encoder.encode(&self.int_samples[..count], output)
            }
            PcmLayout::Float32(order) => {
                if count > self.float_samples.len() || period.len() < count * 4 {
                    return Err(format!("{} frames exceed the encoder period", frames));
                }
                for (dst, src) in self.float_samples.iter_mut().zip(period.chunks_exact(4)).take(count) {
                    let bytes = [src[0], src[1], src[2], src[3]];
                    *dst = match order {
                        ByteOrder::Little => f32::from_le_bytes(bytes),
                        ByteOrder::Big => f32::from_be_bytes(bytes),
                    };
                }
                self.encoder.encode_float(&self.float_samples[..count], output)
            }
        };

        result.map_err(|e| format!("opus_encode: {}", e))
    }

    fn codec(&self) -> &str {
        "opus"
    }
}
