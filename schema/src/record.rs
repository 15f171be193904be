//! Record reflection: the field list a record type reports about itself.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::FieldDef;

/// Implemented by every record type that can be analyzed.
///
/// The returned definition is authoritative: field order is wire order.
pub trait Reflect: 'static {
    /// Returns the ordered field list for this record type.
    fn record_def() -> RecordDef;
}

/// An ordered field list for one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDef {
    pub name: &'static str,
    pub fields: Vec<FieldDef>,
}

impl RecordDef {
    /// Creates a new record with no fields.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Creates a record with the provided fields.
    #[must_use]
    pub const fn with_fields(name: &'static str, fields: Vec<FieldDef>) -> Self {
        Self { name, fields }
    }

    /// Adds a field to the record.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

/// A lightweight handle to a reflected record type.
///
/// Equality and hashing use the type identity only. The field list is
/// produced lazily through [`describe`](Self::describe), so self-referencing
/// records can be described without recursing.
#[derive(Clone, Copy)]
pub struct RecordRef {
    id: TypeId,
    type_name: &'static str,
    describe: fn() -> RecordDef,
}

impl RecordRef {
    /// Returns the handle for record type `T`.
    #[must_use]
    pub fn of<T: Reflect>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            describe: T::record_def,
        }
    }

    /// The identity of the record type.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Fully-qualified Rust type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Reflects the record's field list.
    #[must_use]
    pub fn describe(&self) -> RecordDef {
        (self.describe)()
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecordRef {}

impl Hash for RecordRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.type_name).finish()
    }
}
