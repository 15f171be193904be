//! Field values and the conversions between Rust types and records.

use schema::{FieldKind, RecordRef, Reflect};

use crate::error::{CodecError, CodecResult, ValueReason};

/// A decoded field value, one variant per wire kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// UTF-16 code unit.
    Char(u16),
    /// Enum ordinal.
    Enum(usize),
    Text(String),
    Bytes(Vec<u8>),
    /// Nested record fields in declaration order.
    Record(Vec<Value>),
}

impl Value {
    /// Short name of the variant for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::I8(_) => "int8",
            Self::I16(_) => "int16",
            Self::I32(_) => "int32",
            Self::I64(_) => "int64",
            Self::F32(_) => "float32",
            Self::F64(_) => "float64",
            Self::Char(_) => "char16",
            Self::Enum(_) => "enum",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Record(_) => "nested record",
        }
    }
}

/// A UTF-16 code unit carried by a `Char16` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Char16(pub u16);

impl Char16 {
    /// Converts a character from the basic multilingual plane.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        u16::try_from(u32::from(c)).ok().map(Self)
    }

    /// The character for this code unit, or `None` for a lone surrogate.
    #[must_use]
    pub fn to_char(self) -> Option<char> {
        char::from_u32(u32::from(self.0))
    }
}

impl From<u16> for Char16 {
    fn from(unit: u16) -> Self {
        Self(unit)
    }
}

/// A Rust type that can occupy one record field.
pub trait FieldType: Sized {
    /// The field kind reported to the schema analyzer.
    fn field_kind() -> FieldKind;

    /// Converts the field into its value form.
    fn to_value(&self) -> Value;

    /// Converts a decoded value back into the field type.
    fn from_value(value: Value) -> CodecResult<Self>;
}

/// A record type that can be transcoded by a generated codec.
///
/// Values are exchanged in declaration order, matching
/// [`Reflect::record_def`].
pub trait Record: Reflect + Sized {
    /// Splits the record into its field values.
    fn to_values(&self) -> Vec<Value>;

    /// Assembles a record from its decoded field values.
    fn from_values(values: Vec<Value>) -> CodecResult<Self>;
}

/// A fieldless enum encoded as its ordinal.
pub trait WireEnum: Copy + 'static {
    /// All variants, indexed by ordinal.
    const VARIANTS: &'static [Self];

    /// Position of this variant in [`VARIANTS`](Self::VARIANTS).
    fn ordinal(self) -> usize;

    /// The variant at `ordinal`, if any.
    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::VARIANTS.get(ordinal).copied()
    }
}

/// Hands out decoded field values in order while assembling a record.
#[derive(Debug)]
pub struct RecordValues {
    record: &'static str,
    values: std::vec::IntoIter<Value>,
}

impl RecordValues {
    /// Wraps `values`, checking there is exactly one per field.
    pub fn new(record: &'static str, values: Vec<Value>, fields: usize) -> CodecResult<Self> {
        if values.len() != fields {
            return Err(CodecError::FieldCountMismatch {
                record,
                expected: fields,
                actual: values.len(),
            });
        }
        Ok(Self {
            record,
            values: values.into_iter(),
        })
    }

    /// Converts the next value into the type of field `field`.
    pub fn take<F: FieldType>(&mut self, field: &'static str) -> CodecResult<F> {
        let value = self.values.next().ok_or(CodecError::ValueMismatch {
            expected: "field value",
            found: "end of record",
        })?;
        F::from_value(value).map_err(|err| match err {
            CodecError::ValueMismatch { expected, found } => CodecError::InvalidValue {
                record: self.record,
                field,
                reason: ValueReason::TypeMismatch { expected, found },
            },
            other => other,
        })
    }
}

fn mismatch(expected: &'static str, found: &Value) -> CodecError {
    CodecError::ValueMismatch {
        expected,
        found: found.kind_name(),
    }
}

macro_rules! primitive_field {
    ($ty:ty, $kind:ident, $variant:ident, $name:literal) => {
        impl FieldType for $ty {
            fn field_kind() -> FieldKind {
                FieldKind::$kind
            }

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(value: Value) -> CodecResult<Self> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(mismatch($name, &other)),
                }
            }
        }
    };
}

primitive_field!(i8, Int8, I8, "int8");
primitive_field!(i16, Int16, I16, "int16");
primitive_field!(i32, Int32, I32, "int32");
primitive_field!(i64, Int64, I64, "int64");
primitive_field!(f32, Float32, F32, "float32");
primitive_field!(f64, Float64, F64, "float64");
primitive_field!(String, Text, Text, "text");
primitive_field!(Vec<u8>, Bytes, Bytes, "bytes");

impl FieldType for Char16 {
    fn field_kind() -> FieldKind {
        FieldKind::Char16
    }

    fn to_value(&self) -> Value {
        Value::Char(self.0)
    }

    fn from_value(value: Value) -> CodecResult<Self> {
        match value {
            Value::Char(unit) => Ok(Self(unit)),
            other => Err(mismatch("char16", &other)),
        }
    }
}

/// Reported as [`FieldKind::Bool`], which the analyzer always rejects.
impl FieldType for bool {
    fn field_kind() -> FieldKind {
        FieldKind::Bool
    }

    fn to_value(&self) -> Value {
        Value::I8(i8::from(*self))
    }

    fn from_value(value: Value) -> CodecResult<Self> {
        Err(mismatch("bool", &value))
    }
}

impl<T: FieldType> FieldType for Box<T> {
    fn field_kind() -> FieldKind {
        T::field_kind()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: Value) -> CodecResult<Self> {
        T::from_value(value).map(Self::new)
    }
}

/// Field kind of a nested record of type `T`.
#[must_use]
pub fn nested_kind<T: Reflect>() -> FieldKind {
    FieldKind::Nested(RecordRef::of::<T>())
}

/// Converts a nested record value back into `T`.
pub fn nested_from_value<T: Record>(value: Value) -> CodecResult<T> {
    match value {
        Value::Record(values) => T::from_values(values),
        other => Err(mismatch("nested record", &other)),
    }
}

/// Field kind of enum `E`.
#[must_use]
pub fn enum_kind<E: WireEnum>() -> FieldKind {
    FieldKind::Enum {
        variants: E::VARIANTS.len(),
    }
}

/// Converts an ordinal value back into enum `E`.
pub fn enum_from_value<E: WireEnum>(value: Value) -> CodecResult<E> {
    match value {
        Value::Enum(ordinal) => E::from_ordinal(ordinal).ok_or(CodecError::ValueMismatch {
            expected: "enum ordinal",
            found: "out-of-range ordinal",
        }),
        other => Err(mismatch("enum", &other)),
    }
}
