//! Limits enforced while transcoding records.

/// Largest text or byte field the u16 length prefix can describe.
pub const MAX_VARIABLE_LEN: usize = u16::MAX as usize;

/// Codec-specific limits enforced during decoding and encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum nested-record depth below the top-level record.
    pub max_nesting_depth: usize,
    /// Maximum byte length of a text or byte field. Capped at
    /// [`MAX_VARIABLE_LEN`] regardless of this setting.
    pub max_variable_len: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_nesting_depth: 64,
            max_variable_len: MAX_VARIABLE_LEN,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_nesting_depth: 8,
            max_variable_len: 256,
        }
    }

    /// Creates limits with no restrictions beyond what the wire format can express.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_nesting_depth: usize::MAX,
            max_variable_len: MAX_VARIABLE_LEN,
        }
    }

    /// The variable-length limit after applying the wire format cap.
    #[must_use]
    pub fn effective_variable_len(&self) -> usize {
        self.max_variable_len.min(MAX_VARIABLE_LEN)
    }
}
