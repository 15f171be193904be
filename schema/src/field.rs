//! Field kind and width override definitions.

use std::fmt;

use bytestream::UnsignedWidth;

use crate::record::{RecordRef, Reflect};

/// Marks an integer field as travelling on the wire as a narrower unsigned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WidthOverride {
    /// Full declared width.
    #[default]
    None,
    /// One unsigned byte. Valid on `Int32` and `Int64`.
    AsU8,
    /// Two unsigned bytes. Valid on `Int32` and `Int64`.
    AsU16,
    /// Four unsigned bytes. Valid on `Int64` only.
    AsU32,
}

impl WidthOverride {
    /// The unsigned wire width, if overridden.
    #[must_use]
    pub const fn unsigned_width(self) -> Option<UnsignedWidth> {
        match self {
            Self::None => None,
            Self::AsU8 => Some(UnsignedWidth::U8),
            Self::AsU16 => Some(UnsignedWidth::U16),
            Self::AsU32 => Some(UnsignedWidth::U32),
        }
    }
}

impl fmt::Display for WidthOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::AsU8 => "as u8",
            Self::AsU16 => "as u16",
            Self::AsU32 => "as u32",
        };
        write!(f, "{name}")
    }
}

/// The declared kind of a record field, as reported by the reflector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// UTF-16 code unit.
    Char16,
    /// Packed bit scalar. Has no wire representation and is rejected.
    Bool,
    /// Fieldless enum, encoded as its ordinal.
    Enum { variants: usize },
    /// UTF-8 text (variable length).
    Text,
    /// Raw byte array (variable length).
    Bytes,
    /// Another record, inlined in place.
    Nested(RecordRef),
}

impl FieldKind {
    /// Short human-readable name for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Char16 => "char16",
            Self::Bool => "bool",
            Self::Enum { .. } => "enum",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Nested(_) => "nested record",
        }
    }

    /// Returns `true` for kinds whose encoded length depends on the value.
    #[must_use]
    pub const fn is_variable_length(&self) -> bool {
        matches!(self, Self::Text | Self::Bytes)
    }

    /// The nested record, if this is a nested field.
    #[must_use]
    pub const fn nested(&self) -> Option<RecordRef> {
        match self {
            Self::Nested(record) => Some(*record),
            _ => None,
        }
    }
}

/// Field definition within a record, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub width: WidthOverride,
}

impl FieldDef {
    /// Creates a field definition at its full declared width.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            width: WidthOverride::None,
        }
    }

    /// Creates a field holding a nested record of type `T`.
    #[must_use]
    pub fn nested<T: Reflect>(name: &'static str) -> Self {
        Self::new(name, FieldKind::Nested(RecordRef::of::<T>()))
    }

    /// Sets the width override for a field definition.
    #[must_use]
    pub const fn width(mut self, width: WidthOverride) -> Self {
        self.width = width;
        self
    }
}
