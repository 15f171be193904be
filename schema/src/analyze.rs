//! Schema analysis: per-field wire kind and width, cyclic nesting, fixed size.

use std::any::TypeId;
use std::collections::HashSet;

use bytestream::UnsignedWidth;

use crate::error::{SchemaError, SchemaResult};
use crate::{FieldDef, FieldKind, RecordRef, SchemaRegistry, WidthOverride};

/// Largest enum variant count that fits the single ordinal byte.
pub const MAX_ENUM_VARIANTS: usize = 255;

/// How a field is transcoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireKind {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char16,
    /// Narrow unsigned value zero-extended into a 32-bit field.
    UnsignedI32(UnsignedWidth),
    /// Narrow unsigned value zero-extended into a 64-bit field.
    UnsignedI64(UnsignedWidth),
    /// Ordinal byte.
    Enum { variants: usize },
    /// Length-prefixed UTF-8.
    Text,
    /// Length-prefixed raw bytes.
    Bytes,
    /// Nested record inlined without a prefix.
    Nested(RecordRef),
}

impl WireKind {
    /// Wire width for kinds that do not depend on another schema or the value.
    #[must_use]
    pub const fn primitive_width(&self) -> Option<usize> {
        match self {
            Self::I8 | Self::Enum { .. } => Some(1),
            Self::I16 | Self::Char16 => Some(2),
            Self::I32 | Self::F32 => Some(4),
            Self::I64 | Self::F64 => Some(8),
            Self::UnsignedI32(width) | Self::UnsignedI64(width) => Some(width.bytes()),
            Self::Text | Self::Bytes | Self::Nested(_) => None,
        }
    }
}

/// One analyzed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub kind: FieldKind,
    pub wire: WireKind,
    /// Bytes on the wire, or `None` when not statically known.
    pub width: Option<usize>,
}

/// The analyzed, immutable description of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    record: RecordRef,
    name: &'static str,
    fields: Vec<FieldLayout>,
    fixed_size: Option<usize>,
    cyclic: bool,
}

impl RecordSchema {
    /// Handle of the analyzed record type.
    #[must_use]
    pub const fn record(&self) -> RecordRef {
        self.record
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in wire order.
    #[must_use]
    pub fn fields(&self) -> &[FieldLayout] {
        &self.fields
    }

    /// Total wire size, defined only for non-cyclic all-fixed records.
    #[must_use]
    pub const fn fixed_size(&self) -> Option<usize> {
        self.fixed_size
    }

    /// Returns `true` if following nested fields can reach this record again.
    #[must_use]
    pub const fn is_cyclic(&self) -> bool {
        self.cyclic
    }
}

/// Validates a field and resolves how it travels on the wire.
pub fn resolve_wire_kind(record: &'static str, field: &FieldDef) -> SchemaResult<WireKind> {
    let invalid_width = || SchemaError::InvalidWidthOverride {
        record,
        field: field.name,
        kind: field.kind.name(),
        width: field.width,
    };

    let wire = match (field.kind, field.width) {
        (FieldKind::Bool, _) => {
            return Err(SchemaError::BooleanFieldNotPermitted {
                record,
                field: field.name,
            });
        }
        (FieldKind::Int32, WidthOverride::None) => WireKind::I32,
        (FieldKind::Int32, WidthOverride::AsU32) => return Err(invalid_width()),
        (FieldKind::Int32, width) => {
            WireKind::UnsignedI32(width.unsigned_width().ok_or_else(invalid_width)?)
        }
        (FieldKind::Int64, WidthOverride::None) => WireKind::I64,
        (FieldKind::Int64, width) => {
            WireKind::UnsignedI64(width.unsigned_width().ok_or_else(invalid_width)?)
        }
        (_, WidthOverride::AsU8 | WidthOverride::AsU16 | WidthOverride::AsU32) => {
            return Err(invalid_width());
        }
        (FieldKind::Int8, WidthOverride::None) => WireKind::I8,
        (FieldKind::Int16, WidthOverride::None) => WireKind::I16,
        (FieldKind::Float32, WidthOverride::None) => WireKind::F32,
        (FieldKind::Float64, WidthOverride::None) => WireKind::F64,
        (FieldKind::Char16, WidthOverride::None) => WireKind::Char16,
        (FieldKind::Enum { variants }, WidthOverride::None) => {
            if variants > MAX_ENUM_VARIANTS {
                return Err(SchemaError::TooManyEnumOrdinals {
                    record,
                    field: field.name,
                    variants,
                });
            }
            WireKind::Enum { variants }
        }
        (FieldKind::Text, WidthOverride::None) => WireKind::Text,
        (FieldKind::Bytes, WidthOverride::None) => WireKind::Bytes,
        (FieldKind::Nested(nested), WidthOverride::None) => WireKind::Nested(nested),
    };
    Ok(wire)
}

/// Detects whether a record can reach itself through nested record fields.
///
/// Every nested field is treated as always present, so any cycle counts,
/// direct or through intermediaries. Sibling branches are evaluated
/// independently: two fields sharing a non-cyclic type are not a cycle.
#[must_use]
pub fn is_infinitely_nested(record: RecordRef) -> bool {
    CycleWalk::default().check(record)
}

/// Depth-first cycle search over nested record edges.
///
/// `path` holds the records on the current branch only. Records fully
/// explored without reaching a cycle land in `acyclic` and are not walked
/// again, so shared subtrees cost one visit per walk.
#[derive(Default)]
struct CycleWalk {
    path: HashSet<TypeId>,
    acyclic: HashSet<TypeId>,
}

impl CycleWalk {
    fn check(&mut self, record: RecordRef) -> bool {
        self.path.clear();
        self.visit(record)
    }

    fn visit(&mut self, record: RecordRef) -> bool {
        if self.acyclic.contains(&record.id()) {
            return false;
        }
        if !self.path.insert(record.id()) {
            return true;
        }

        for field in record.describe().fields {
            if let FieldKind::Nested(nested) = field.kind {
                if self.visit(nested) {
                    return true;
                }
            }
        }

        self.path.remove(&record.id());
        self.acyclic.insert(record.id());
        false
    }
}

/// Sums field widths, failing on the first field without a fixed width.
pub fn sum_field_sizes(record: &'static str, fields: &[FieldLayout]) -> SchemaResult<usize> {
    fields.iter().try_fold(0usize, |total, field| {
        field
            .width
            .map(|width| total + width)
            .ok_or(SchemaError::UnsupportedFieldKind {
                record,
                field: field.name,
                kind: field.kind.name(),
            })
    })
}

/// Analyzes a record, consulting `registry` for nested non-cyclic records.
pub fn analyze(record: RecordRef, registry: &SchemaRegistry) -> SchemaResult<RecordSchema> {
    let def = record.describe();
    let mut walk = CycleWalk::default();
    let cyclic = walk.check(record);

    let mut fields = Vec::with_capacity(def.fields.len());
    for field in &def.fields {
        let wire = resolve_wire_kind(def.name, field)?;
        let width = match wire {
            // Only acyclic nested records are analyzed eagerly; cyclic ones
            // are validated when a codec is generated for them.
            WireKind::Nested(nested) if !cyclic || !walk.check(nested) => {
                registry.schema(nested)?.fixed_size()
            }
            other => other.primitive_width(),
        };
        fields.push(FieldLayout {
            name: field.name,
            kind: field.kind,
            wire,
            width,
        });
    }

    let fixed_size = if cyclic {
        None
    } else {
        match sum_field_sizes(def.name, &fields) {
            Ok(size) => Some(size),
            Err(SchemaError::UnsupportedFieldKind { .. }) => None,
            Err(err) => return Err(err),
        }
    };

    Ok(RecordSchema {
        record,
        name: def.name,
        fields,
        fixed_size,
        cyclic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordDef, Reflect};

    macro_rules! reflect {
        ($name:ident { $($field:expr),* $(,)? }) => {
            struct $name;

            impl Reflect for $name {
                fn record_def() -> RecordDef {
                    RecordDef::with_fields(stringify!($name), vec![$($field),*])
                }
            }
        };
    }

    reflect!(Simple {
        FieldDef::new("x", FieldKind::Int32),
        FieldDef::new("y", FieldKind::Float32),
    });
    reflect!(DirectSelf { FieldDef::nested::<DirectSelf>("next") });
    reflect!(IndirectA { FieldDef::nested::<IndirectB>("b") });
    reflect!(IndirectB { FieldDef::nested::<IndirectC>("c") });
    reflect!(IndirectC { FieldDef::nested::<IndirectA>("a") });
    reflect!(Tree {
        FieldDef::nested::<Tree>("left"),
        FieldDef::nested::<Tree>("right"),
    });
    reflect!(FlatReference { FieldDef::nested::<Simple>("other") });
    reflect!(Mixed {
        FieldDef::nested::<Simple>("simple"),
        FieldDef::nested::<DirectSelf>("self_ref"),
    });
    reflect!(Diamond {
        FieldDef::nested::<Simple>("left"),
        FieldDef::nested::<Simple>("right"),
    });
    reflect!(Named {
        FieldDef::new("id", FieldKind::Int16),
        FieldDef::new("label", FieldKind::Text),
    });
    reflect!(Empty {});

    macro_rules! diamond_chain {
        ($base:ident => $($name:ident),+) => {
            diamond_chain!(@step $base, $($name),+);
        };
        (@step $prev:ident, $name:ident $(, $rest:ident)*) => {
            reflect!($name {
                FieldDef::nested::<$prev>("left"),
                FieldDef::nested::<$prev>("right"),
            });
            diamond_chain!(@step $name $(, $rest)*);
        };
        (@step $prev:ident) => {};
    }

    diamond_chain!(Simple =>
        W01, W02, W03, W04, W05, W06, W07, W08, W09, W10,
        W11, W12, W13, W14, W15, W16, W17, W18, W19, W20,
        W21, W22, W23, W24, W25, W26, W27, W28, W29, W30,
        W31, W32, W33, W34, W35, W36, W37, W38, W39, W40
    );

    fn analyze_fresh<T: Reflect>() -> SchemaResult<RecordSchema> {
        analyze(RecordRef::of::<T>(), &SchemaRegistry::new())
    }

    #[test]
    fn flat_record_is_not_cyclic() {
        assert!(!is_infinitely_nested(RecordRef::of::<Simple>()));
        assert!(!is_infinitely_nested(RecordRef::of::<FlatReference>()));
    }

    #[test]
    fn direct_self_reference_is_cyclic() {
        assert!(is_infinitely_nested(RecordRef::of::<DirectSelf>()));
        assert!(is_infinitely_nested(RecordRef::of::<Tree>()));
    }

    #[test]
    fn indirect_cycle_is_cyclic_from_every_member() {
        assert!(is_infinitely_nested(RecordRef::of::<IndirectA>()));
        assert!(is_infinitely_nested(RecordRef::of::<IndirectB>()));
        assert!(is_infinitely_nested(RecordRef::of::<IndirectC>()));
    }

    #[test]
    fn reaching_a_cycle_is_cyclic() {
        assert!(is_infinitely_nested(RecordRef::of::<Mixed>()));
    }

    #[test]
    fn diamond_is_not_cyclic() {
        assert!(!is_infinitely_nested(RecordRef::of::<Diamond>()));
        let schema = analyze_fresh::<Diamond>().unwrap();
        assert_eq!(schema.fixed_size(), Some(16));
    }

    #[test]
    fn primitive_widths() {
        let cases = [
            (FieldKind::Int8, WidthOverride::None, 1),
            (FieldKind::Int16, WidthOverride::None, 2),
            (FieldKind::Char16, WidthOverride::None, 2),
            (FieldKind::Int32, WidthOverride::None, 4),
            (FieldKind::Float32, WidthOverride::None, 4),
            (FieldKind::Int64, WidthOverride::None, 8),
            (FieldKind::Float64, WidthOverride::None, 8),
            (FieldKind::Enum { variants: 3 }, WidthOverride::None, 1),
            (FieldKind::Int32, WidthOverride::AsU8, 1),
            (FieldKind::Int32, WidthOverride::AsU16, 2),
            (FieldKind::Int64, WidthOverride::AsU8, 1),
            (FieldKind::Int64, WidthOverride::AsU16, 2),
            (FieldKind::Int64, WidthOverride::AsU32, 4),
        ];
        for (kind, width, expected) in cases {
            let field = FieldDef::new("f", kind).width(width);
            let wire = resolve_wire_kind("R", &field).unwrap();
            assert_eq!(wire.primitive_width(), Some(expected), "{kind:?} {width:?}");
        }
    }

    #[test]
    fn as_u32_on_int32_is_rejected() {
        let field = FieldDef::new("f", FieldKind::Int32).width(WidthOverride::AsU32);
        let err = resolve_wire_kind("R", &field).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidWidthOverride {
                width: WidthOverride::AsU32,
                ..
            }
        ));
    }

    #[test]
    fn override_on_non_integer_is_rejected() {
        for kind in [FieldKind::Int16, FieldKind::Float64, FieldKind::Text] {
            let field = FieldDef::new("f", kind).width(WidthOverride::AsU8);
            let err = resolve_wire_kind("R", &field).unwrap_err();
            assert!(matches!(err, SchemaError::InvalidWidthOverride { .. }));
        }
    }

    #[test]
    fn bool_is_rejected() {
        let field = FieldDef::new("flag", FieldKind::Bool);
        let err = resolve_wire_kind("R", &field).unwrap_err();
        assert_eq!(
            err,
            SchemaError::BooleanFieldNotPermitted {
                record: "R",
                field: "flag"
            }
        );
    }

    #[test]
    fn enum_ordinal_limit() {
        let ok = FieldDef::new("e", FieldKind::Enum { variants: 255 });
        assert!(resolve_wire_kind("R", &ok).is_ok());

        let too_many = FieldDef::new("e", FieldKind::Enum { variants: 256 });
        let err = resolve_wire_kind("R", &too_many).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TooManyEnumOrdinals { variants: 256, .. }
        ));
    }

    #[test]
    fn text_disqualifies_fixed_size() {
        let schema = analyze_fresh::<Named>().unwrap();
        assert_eq!(schema.fixed_size(), None);
        assert!(!schema.is_cyclic());
        assert_eq!(schema.fields()[0].width, Some(2));
        assert_eq!(schema.fields()[1].width, None);

        let err = sum_field_sizes("Named", schema.fields()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnsupportedFieldKind {
                record: "Named",
                field: "label",
                kind: "text"
            }
        );
    }

    #[test]
    fn cyclic_schema_has_no_fixed_size() {
        let schema = analyze_fresh::<Tree>().unwrap();
        assert!(schema.is_cyclic());
        assert_eq!(schema.fixed_size(), None);
    }

    #[test]
    fn cyclic_record_keeps_acyclic_nested_width() {
        let schema = analyze_fresh::<Mixed>().unwrap();
        assert!(schema.is_cyclic());
        assert_eq!(schema.fields()[0].width, Some(8));
        assert_eq!(schema.fields()[1].width, None);
    }

    #[test]
    fn empty_record_is_fixed_zero() {
        let schema = analyze_fresh::<Empty>().unwrap();
        assert_eq!(schema.fixed_size(), Some(0));
    }

    #[test]
    fn deep_diamond_chain_walks_each_record_once() {
        // Without remembering acyclic records this walk visits 2^40 paths.
        assert!(!is_infinitely_nested(RecordRef::of::<W40>()));
        let schema = analyze_fresh::<W40>().unwrap();
        assert!(!schema.is_cyclic());
        assert_eq!(schema.fixed_size(), Some(8 << 40));
    }
}
