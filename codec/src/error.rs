//! Error types for codec operations.

use std::fmt;

use bytestream::{ByteError, UnsignedWidth};
use schema::SchemaError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while building a codec or transcoding a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Schema analysis rejected the record type.
    Schema(SchemaError),

    /// Byte source or sink error.
    Bytes(ByteError),

    /// A fixed layout was requested for a self-nesting record.
    CyclicSchema { record: &'static str },

    /// A fixed layout was requested for a record without a static size.
    NoFixedLayout { record: &'static str },

    /// The source holds fewer bytes than the fixed record size.
    InsufficientData {
        record: &'static str,
        needed: usize,
        available: usize,
    },

    /// The sink has less room than the fixed record size.
    InsufficientCapacity {
        record: &'static str,
        needed: usize,
        available: usize,
    },

    /// Enum ordinal does not name a variant.
    OutOfRangeOrdinal {
        record: &'static str,
        field: &'static str,
        ordinal: usize,
        variants: usize,
    },

    /// A field value cannot be encoded under the record's schema.
    InvalidValue {
        record: &'static str,
        field: &'static str,
        reason: ValueReason,
    },

    /// A text field held bytes that are not valid UTF-8.
    InvalidUtf8 {
        record: &'static str,
        field: &'static str,
    },

    /// A value did not match the Rust type it was converted into.
    ValueMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A record was built from the wrong number of field values.
    FieldCountMismatch {
        record: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// The generated field plan disagrees with the analyzed schema.
    CodecGenerationFailure {
        record: &'static str,
        detail: String,
    },
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    NestingDepth,
    VariableLength,
}

/// Details for invalid value errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueReason {
    UnsignedOutOfRange {
        width: UnsignedWidth,
        value: i64,
    },
    TooLong {
        len: usize,
        max: usize,
    },
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "schema error: {e}"),
            Self::Bytes(e) => write!(f, "byte stream error: {e}"),
            Self::CyclicSchema { record } => {
                write!(f, "record {record} nests itself and has no fixed layout")
            }
            Self::NoFixedLayout { record } => {
                write!(f, "record {record} has no fixed layout")
            }
            Self::InsufficientData {
                record,
                needed,
                available,
            } => {
                write!(
                    f,
                    "insufficient data for {record}: need {needed} bytes, have {available}"
                )
            }
            Self::InsufficientCapacity {
                record,
                needed,
                available,
            } => {
                write!(
                    f,
                    "insufficient capacity for {record}: need {needed} bytes, have {available}"
                )
            }
            Self::OutOfRangeOrdinal {
                record,
                field,
                ordinal,
                variants,
            } => {
                write!(
                    f,
                    "ordinal {ordinal} out of range for {record}.{field} ({variants} variants)"
                )
            }
            Self::InvalidValue {
                record,
                field,
                reason,
            } => {
                write!(f, "invalid value for {record}.{field}: {reason}")
            }
            Self::InvalidUtf8 { record, field } => {
                write!(f, "invalid UTF-8 in {record}.{field}")
            }
            Self::ValueMismatch { expected, found } => {
                write!(f, "expected {expected} value but got {found}")
            }
            Self::FieldCountMismatch {
                record,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{record} expects {expected} field values, got {actual}"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::CodecGenerationFailure { record, detail } => {
                write!(f, "codec generation failed for {record}: {detail}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NestingDepth => "nesting depth",
            Self::VariableLength => "variable length",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsignedOutOfRange { width, value } => {
                write!(f, "value {value} does not fit in {width}")
            }
            Self::TooLong { len, max } => {
                write!(f, "length {len} exceeds maximum {max}")
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected} but got {found}")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            Self::Bytes(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchemaError> for CodecError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<ByteError> for CodecError {
    fn from(err: ByteError) -> Self {
        Self::Bytes(err)
    }
}
