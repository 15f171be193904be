//! Schema build errors.

use std::fmt;

use crate::WidthOverride;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when analyzing a record schema.
///
/// These are raised at the first analysis of a type and are remembered by
/// the [`SchemaRegistry`](crate::SchemaRegistry) as a permanent failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Field kind has no fixed wire width (text, byte arrays).
    UnsupportedFieldKind {
        record: &'static str,
        field: &'static str,
        kind: &'static str,
    },

    /// Boolean fields have no wire representation.
    BooleanFieldNotPermitted {
        record: &'static str,
        field: &'static str,
    },

    /// Enum has more variants than a single ordinal byte allows.
    TooManyEnumOrdinals {
        record: &'static str,
        field: &'static str,
        variants: usize,
    },

    /// Width override is not valid for the field kind.
    InvalidWidthOverride {
        record: &'static str,
        field: &'static str,
        kind: &'static str,
        width: WidthOverride,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFieldKind {
                record,
                field,
                kind,
            } => {
                write!(
                    f,
                    "field {record}.{field} of kind {kind} has no fixed wire width"
                )
            }
            Self::BooleanFieldNotPermitted { record, field } => {
                write!(f, "field {record}.{field} is a bool, which is not permitted")
            }
            Self::TooManyEnumOrdinals {
                record,
                field,
                variants,
            } => {
                write!(
                    f,
                    "enum field {record}.{field} has {variants} variants, at most 255 are allowed"
                )
            }
            Self::InvalidWidthOverride {
                record,
                field,
                kind,
                width,
            } => {
                write!(
                    f,
                    "width override {width} is not valid on {kind} field {record}.{field}"
                )
            }
        }
    }
}

impl std::error::Error for SchemaError {}
