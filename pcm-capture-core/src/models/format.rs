use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Byte order of a multi-byte sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Little,
    Big,
}

macro_rules! sample_encodings {
    ($($variant:ident => $name:tt,)+) => {
        /// A PCM sample encoding, named after its ALSA `SND_PCM_FORMAT_*` constant.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum SampleEncoding {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl SampleEncoding {
            /// Every encoding a capture handle can be probed for, in probe order.
            pub const ALL: &'static [SampleEncoding] = &[$(SampleEncoding::$variant,)+];

            /// ALSA name, e.g. `S16_LE`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(SampleEncoding::$variant => $name,)+
                }
            }
        }
    };
}

sample_encodings! {
    S8 => "S8",
    U8 => "U8",
    S16Le => "S16_LE",
    S16Be => "S16_BE",
    U16Le => "U16_LE",
    U16Be => "U16_BE",
    S24Le => "S24_LE",
    S24Be => "S24_BE",
    U24Le => "U24_LE",
    U24Be => "U24_BE",
    S32Le => "S32_LE",
    S32Be => "S32_BE",
    U32Le => "U32_LE",
    U32Be => "U32_BE",
    FloatLe => "FLOAT_LE",
    FloatBe => "FLOAT_BE",
    Float64Le => "FLOAT64_LE",
    Float64Be => "FLOAT64_BE",
    Iec958SubframeLe => "IEC958_SUBFRAME_LE",
    Iec958SubframeBe => "IEC958_SUBFRAME_BE",
    MuLaw => "MU_LAW",
    ALaw => "A_LAW",
    ImaAdpcm => "IMA_ADPCM",
    Mpeg => "MPEG",
    Gsm => "GSM",
    Special => "SPECIAL",
    S243Le => "S24_3LE",
    S243Be => "S24_3BE",
    U243Le => "U24_3LE",
    U243Be => "U24_3BE",
    S203Le => "S20_3LE",
    S203Be => "S20_3BE",
    U203Le => "U20_3LE",
    U203Be => "U20_3BE",
    S183Le => "S18_3LE",
    S183Be => "S18_3BE",
    U183Le => "U18_3LE",
    U183Be => "U18_3BE",
}

impl SampleEncoding {
    /// Bits one sample occupies in memory, padding included.
    ///
    /// `None` for container formats (MPEG, GSM, SPECIAL) with no fixed width.
    pub fn physical_width(&self) -> Option<u32> {
        use SampleEncoding::*;
        match self {
            ImaAdpcm => Some(4),
            S8 | U8 | MuLaw | ALaw => Some(8),
            S16Le | S16Be | U16Le | U16Be => Some(16),
            S243Le | S243Be | U243Le | U243Be | S203Le | S203Be | U203Le | U203Be | S183Le
            | S183Be | U183Le | U183Be => Some(24),
            S24Le | S24Be | U24Le | U24Be | S32Le | S32Be | U32Le | U32Be | FloatLe | FloatBe
            | Iec958SubframeLe | Iec958SubframeBe => Some(32),
            Float64Le | Float64Be => Some(64),
            Mpeg | Gsm | Special => None,
        }
    }

    /// Whole bytes per sample, or `None` when samples are not byte aligned.
    pub fn bytes_per_sample(&self) -> Option<usize> {
        self.physical_width()
            .filter(|bits| bits % 8 == 0)
            .map(|bits| (bits / 8) as usize)
    }

    /// Byte order of the encoding; `None` for single-byte and opaque encodings.
    pub fn byte_order(&self) -> Option<ByteOrder> {
        use SampleEncoding::*;
        match self {
            S16Le | U16Le | S24Le | U24Le | S32Le | U32Le | FloatLe | Float64Le
            | Iec958SubframeLe | S243Le | U243Le | S203Le | U203Le | S183Le | U183Le => {
                Some(ByteOrder::Little)
            }
            S16Be | U16Be | S24Be | U24Be | S32Be | U32Be | FloatBe | Float64Be
            | Iec958SubframeBe | S243Be | U243Be | S203Be | U203Be | S183Be | U183Be => {
                Some(ByteOrder::Big)
            }
            S8 | U8 | MuLaw | ALaw | ImaAdpcm | Mpeg | Gsm | Special => None,
        }
    }
}

impl fmt::Display for SampleEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SampleEncoding::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown sample encoding: {}", s))
    }
}

/// The format a capture handle actually accepted at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedFormat {
    pub encoding: SampleEncoding,
    /// Rate granted by the hardware, which may differ from the requested one.
    pub sample_rate: u32,
    pub channels: u32,
    pub bytes_per_sample: usize,
    pub byte_order: Option<ByteOrder>,
}

impl NegotiatedFormat {
    /// Returns `None` if `encoding` has no whole-byte sample width.
    pub fn new(encoding: SampleEncoding, sample_rate: u32, channels: u32) -> Option<Self> {
        Some(Self {
            encoding,
            sample_rate,
            channels,
            bytes_per_sample: encoding.bytes_per_sample()?,
            byte_order: encoding.byte_order(),
        })
    }

    /// Bytes in one interleaved frame (one sample per channel).
    pub fn frame_bytes(&self) -> usize {
        self.bytes_per_sample * self.channels as usize
    }

    /// Whether captured bytes are already big-endian (or byte-order agnostic).
    pub fn is_network_order(&self) -> bool {
        self.byte_order != Some(ByteOrder::Little)
    }
}
