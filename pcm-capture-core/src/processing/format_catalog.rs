use crate::models::format::SampleEncoding;
use crate::traits::capture_hardware::HardwareParams;

/// Sample encodings a capture handle reports as supported.
///
/// Kept for diagnostics and capability queries; negotiation does not
/// depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatCatalog {
    supported: Vec<SampleEncoding>,
}

impl FormatCatalog {
    /// Probe every known encoding against `params` without constraining it.
    pub fn discover<P: HardwareParams + ?Sized>(params: &P) -> Self {
        let supported = SampleEncoding::ALL
            .iter()
            .copied()
            .filter(|encoding| params.accepts(*encoding))
            .collect();
        Self { supported }
    }

    pub fn contains(&self, encoding: SampleEncoding) -> bool {
        self.supported.contains(&encoding)
    }

    pub fn iter(&self) -> impl Iterator<Item = SampleEncoding> + '_ {
        self.supported.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.supported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supported.is_empty()
    }
}
