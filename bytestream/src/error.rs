//! Error types for byte-level operations.

use std::fmt;

use crate::width::UnsignedWidth;

/// Result type for byte stream operations.
pub type ByteResult<T> = Result<T, ByteError>;

/// Errors that can occur while reading from a source or writing to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteError {
    /// Attempted to read past the end of the source.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Attempted to write more bytes than the sink can hold.
    BufferOverflow {
        /// Number of bytes attempted to write.
        attempted: usize,
        /// Remaining capacity in bytes.
        capacity: usize,
    },

    /// Value does not fit the narrower unsigned wire width.
    ValueOutOfRange {
        /// The value that was out of range.
        value: i64,
        /// Target wire width.
        width: UnsignedWidth,
    },

    /// Byte slice length is not a supported unsigned width (1, 2 or 4).
    InvalidWidth {
        /// The length provided.
        len: usize,
    },

    /// Underlying I/O transport failed for a reason other than end of data.
    Io {
        /// Kind reported by the transport.
        kind: std::io::ErrorKind,
    },
}

impl fmt::Display for ByteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::BufferOverflow {
                attempted,
                capacity,
            } => {
                write!(
                    f,
                    "attempted to write {attempted} bytes but only {capacity} bytes of capacity remain"
                )
            }
            Self::ValueOutOfRange { value, width } => {
                write!(f, "value {value} cannot be represented as {width}")
            }
            Self::InvalidWidth { len } => {
                write!(f, "invalid unsigned width of {len} bytes, expected 1, 2 or 4")
            }
            Self::Io { kind } => write!(f, "transport error: {kind}"),
        }
    }
}

impl std::error::Error for ByteError {}
