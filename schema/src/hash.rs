//! Deterministic schema fingerprinting.
//!
//! The fingerprint covers what determines the bytes on the wire: field
//! kinds, width overrides and enum variant counts, in order, with nested
//! records expanded in place. Record and field names are not included.

use std::any::TypeId;

use blake3::Hasher;

use crate::{FieldKind, RecordRef, WidthOverride};

/// Computes a deterministic wire-layout fingerprint for `record`.
///
/// A nested record already on the current path is hashed as a back
/// reference to its depth, so cyclic records hash in finite time.
#[must_use]
pub fn schema_hash(record: RecordRef) -> u64 {
    let mut hasher = Hasher::new();
    let mut path = Vec::new();
    write_record(&mut hasher, record, &mut path);

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

fn write_record(hasher: &mut Hasher, record: RecordRef, path: &mut Vec<TypeId>) {
    if let Some(depth) = path.iter().position(|id| *id == record.id()) {
        write_u8(hasher, 0xFF);
        write_u32(hasher, depth as u32);
        return;
    }

    path.push(record.id());
    let def = record.describe();
    write_u32(hasher, def.fields.len() as u32);
    for field in &def.fields {
        write_kind(hasher, field.kind, path);
        write_width(hasher, field.width);
    }
    path.pop();
}

fn write_kind(hasher: &mut Hasher, kind: FieldKind, path: &mut Vec<TypeId>) {
    match kind {
        FieldKind::Int8 => write_u8(hasher, 0),
        FieldKind::Int16 => write_u8(hasher, 1),
        FieldKind::Int32 => write_u8(hasher, 2),
        FieldKind::Int64 => write_u8(hasher, 3),
        FieldKind::Float32 => write_u8(hasher, 4),
        FieldKind::Float64 => write_u8(hasher, 5),
        FieldKind::Char16 => write_u8(hasher, 6),
        FieldKind::Bool => write_u8(hasher, 7),
        FieldKind::Enum { variants } => {
            write_u8(hasher, 8);
            write_u32(hasher, variants as u32);
        }
        FieldKind::Text => write_u8(hasher, 9),
        FieldKind::Bytes => write_u8(hasher, 10),
        FieldKind::Nested(nested) => {
            write_u8(hasher, 11);
            write_record(hasher, nested, path);
        }
    }
}

fn write_width(hasher: &mut Hasher, width: WidthOverride) {
    let tag = match width {
        WidthOverride::None => 0,
        WidthOverride::AsU8 => 1,
        WidthOverride::AsU16 => 2,
        WidthOverride::AsU32 => 3,
    };
    write_u8(hasher, tag);
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}
