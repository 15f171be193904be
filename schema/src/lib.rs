//! Record schema reflection and layout analysis for the recbin codec.
//!
//! This crate describes how a record type is laid out on the wire:
//! - Field reflection through the [`Reflect`] trait and [`RecordRef`] handles
//! - Field kinds and unsigned width overrides
//! - Schema analysis: wire widths, cyclic nesting, fixed total size
//! - A memoizing [`SchemaRegistry`]
//! - Deterministic wire-layout fingerprints
//!
//! # Design Principles
//!
//! - **Explicit registration** - Record types describe themselves; there is
//!   no runtime reflection over arbitrary Rust types.
//! - **Declaration order is wire order** - The field list is the single
//!   source of truth for both decode and encode.
//! - **Analyze once** - A type's schema is immutable after first analysis.

mod analyze;
mod error;
mod field;
mod hash;
mod record;
mod registry;

pub use analyze::{
    analyze, is_infinitely_nested, resolve_wire_kind, sum_field_sizes, FieldLayout,
    RecordSchema, WireKind, MAX_ENUM_VARIANTS,
};
pub use error::{SchemaError, SchemaResult};
pub use field::{FieldDef, FieldKind, WidthOverride};
pub use hash::schema_hash;
pub use record::{RecordDef, RecordRef, Reflect};
pub use registry::SchemaRegistry;

#[cfg(test)]
mod tests {
    use super::*;

    struct Normal;

    impl Reflect for Normal {
        fn record_def() -> RecordDef {
            RecordDef::new("Normal")
                .field(FieldDef::new("foo", FieldKind::Int32))
                .field(FieldDef::new("bar", FieldKind::Int8))
        }
    }

    #[test]
    fn public_api_exports() {
        let registry = SchemaRegistry::new();
        let schema = registry.schema_of::<Normal>().unwrap();
        let _ = schema_hash(schema.record());
        let _: SchemaResult<()> = Ok(());
        assert_eq!(MAX_ENUM_VARIANTS, 255);
    }

    #[test]
    fn normal_record_is_five_bytes() {
        let schema = SchemaRegistry::new().schema_of::<Normal>().unwrap();
        assert_eq!(schema.name(), "Normal");
        assert_eq!(schema.fixed_size(), Some(5));
        assert!(!schema.is_cyclic());
        assert_eq!(schema.fields()[0].wire, WireKind::I32);
        assert_eq!(schema.fields()[1].wire, WireKind::I8);
    }
}
