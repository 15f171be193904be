//! Memoized schema analysis.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::analyze::{analyze, RecordSchema};
use crate::error::SchemaResult;
use crate::{RecordRef, Reflect};

/// Caches analysis results per record type.
///
/// Analysis is a pure function of a type's shape, so entries are never
/// evicted. Failures are cached too: a type that fails to analyze keeps
/// failing with the same error.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    entries: RwLock<HashMap<TypeId, SchemaResult<Arc<RecordSchema>>>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the schema for record type `T`.
    pub fn schema_of<T: Reflect>(&self) -> SchemaResult<Arc<RecordSchema>> {
        self.schema(RecordRef::of::<T>())
    }

    /// Returns the schema for `record`, analyzing it on first use.
    pub fn schema(&self, record: RecordRef) -> SchemaResult<Arc<RecordSchema>> {
        if let Some(entry) = self.entries.read().get(&record.id()) {
            return entry.clone();
        }

        // Analysis may recurse into this registry for nested records, so it
        // runs without holding the lock. Concurrent analyses of the same type
        // produce equal results and the first insert wins.
        let analyzed = analyze(record, self).map(Arc::new);
        match &analyzed {
            Ok(schema) => tracing::debug!(
                record = schema.name(),
                fixed_size = ?schema.fixed_size(),
                cyclic = schema.is_cyclic(),
                "analyzed record schema"
            ),
            Err(err) => tracing::debug!(
                record = record.type_name(),
                error = %err,
                "record schema rejected"
            ),
        }

        self.entries
            .write()
            .entry(record.id())
            .or_insert(analyzed)
            .clone()
    }

    /// Number of analyzed record types, including failed ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing has been analyzed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
