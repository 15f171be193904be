//! Unsigned width helpers.
//!
//! Integer fields may travel on the wire as a narrower unsigned value. These
//! helpers zero-extend such values into signed integers on decode and
//! range-check them before narrowing on encode.

use std::fmt;

use crate::error::{ByteError, ByteResult};

/// Unsigned on-wire width used by narrowed integer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsignedWidth {
    /// One byte, `0..=255`.
    U8,
    /// Two bytes, `0..=65535`.
    U16,
    /// Four bytes, `0..=4294967295`.
    U32,
}

impl UnsignedWidth {
    /// Number of bytes this width occupies on the wire.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Largest value representable at this width.
    #[must_use]
    pub const fn max_value(self) -> u32 {
        match self {
            Self::U8 => u8::MAX as u32,
            Self::U16 => u16::MAX as u32,
            Self::U32 => u32::MAX,
        }
    }

    /// Maps a byte count back to a width.
    pub const fn from_bytes(len: usize) -> ByteResult<Self> {
        match len {
            1 => Ok(Self::U8),
            2 => Ok(Self::U16),
            4 => Ok(Self::U32),
            _ => Err(ByteError::InvalidWidth { len }),
        }
    }
}

impl fmt::Display for UnsignedWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
        };
        write!(f, "{name}")
    }
}

/// Big-endian bytes of a narrowed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Narrowed {
    bytes: [u8; 4],
    width: UnsignedWidth,
}

impl Narrowed {
    /// The encoded bytes, most significant first.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[4 - self.width.bytes()..]
    }

    /// Width the value was narrowed to.
    #[must_use]
    pub const fn width(&self) -> UnsignedWidth {
        self.width
    }
}

/// Zero-extends a big-endian unsigned value of 1, 2 or 4 bytes.
pub fn widen_unsigned(bytes: &[u8]) -> ByteResult<i64> {
    let width = UnsignedWidth::from_bytes(bytes.len())?;
    let mut buf = [0u8; 4];
    buf[4 - width.bytes()..].copy_from_slice(bytes);
    Ok(i64::from(u32::from_be_bytes(buf)))
}

/// Narrows `value` to `width` after checking it fits the unsigned range.
pub fn narrow_checked(value: i64, width: UnsignedWidth) -> ByteResult<Narrowed> {
    let fits = u32::try_from(value).is_ok_and(|v| v <= width.max_value());
    if !fits {
        return Err(ByteError::ValueOutOfRange { value, width });
    }
    // Checked above: value is within u32 range.
    let bytes = (value as u32).to_be_bytes();
    Ok(Narrowed { bytes, width })
}
