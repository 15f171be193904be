//! Lazily populated codec cache.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use schema::{RecordSchema, SchemaRegistry};

use crate::codecs::{Codec, CodecMode, DynamicCodec, FixedCodec};
use crate::error::{CodecError, CodecResult};
use crate::generator::{generate, CoreCodec};
use crate::limits::CodecLimits;
use crate::value::Record;

type Slot = Arc<OnceLock<CodecResult<Arc<CoreCodec>>>>;

/// Maps record types to their generated codecs.
///
/// Each record type is analyzed and generated at most once per cache; every
/// later request, from any thread, shares the same core codec. Fixed and
/// dynamic codecs for one type wrap the same core. Entries are never
/// evicted.
#[derive(Debug, Default)]
pub struct CodecCache {
    registry: SchemaRegistry,
    limits: CodecLimits,
    slots: Mutex<HashMap<TypeId, Slot>>,
}

impl CodecCache {
    /// Creates an empty cache with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache whose codecs enforce `limits`.
    #[must_use]
    pub fn with_limits(limits: CodecLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// The process-wide cache, created with default limits on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<CodecCache> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    #[must_use]
    pub const fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    /// The schema registry backing this cache.
    #[must_use]
    pub const fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Number of record types with a generated (or failed) core codec.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Returns the codec for `T` in `mode`, generating it on first use.
    ///
    /// Requesting [`CodecMode::Fixed`] for a record without a fixed layout
    /// fails with [`CodecError::CyclicSchema`] or
    /// [`CodecError::NoFixedLayout`] and caches nothing; a later
    /// [`CodecMode::Dynamic`] request for the same type still succeeds.
    pub fn get_or_create<T: Record>(&self, mode: CodecMode) -> CodecResult<Codec<T>> {
        let schema = self.registry.schema_of::<T>()?;
        if mode == CodecMode::Fixed {
            require_fixed(&schema)?;
        }
        let core = self.core_for(schema)?;
        match mode {
            CodecMode::Fixed => FixedCodec::new(core).map(Codec::Fixed),
            CodecMode::Dynamic => Ok(Codec::Dynamic(DynamicCodec::new(core))),
        }
    }

    /// Returns the fixed codec for `T`.
    pub fn fixed<T: Record>(&self) -> CodecResult<FixedCodec<T>> {
        let schema = self.registry.schema_of::<T>()?;
        require_fixed(&schema)?;
        FixedCodec::new(self.core_for(schema)?)
    }

    /// Returns the dynamic codec for `T`.
    pub fn dynamic<T: Record>(&self) -> CodecResult<DynamicCodec<T>> {
        let schema = self.registry.schema_of::<T>()?;
        Ok(DynamicCodec::new(self.core_for(schema)?))
    }

    /// Returns the fixed codec for `T` if it has a fixed layout, otherwise the
    /// dynamic one.
    pub fn fixed_or_dynamic<T: Record>(&self) -> CodecResult<Codec<T>> {
        let schema = self.registry.schema_of::<T>()?;
        let mode = if schema.fixed_size().is_some() {
            CodecMode::Fixed
        } else {
            CodecMode::Dynamic
        };
        self.get_or_create(mode)
    }

    fn core_for(&self, schema: Arc<RecordSchema>) -> CodecResult<Arc<CoreCodec>> {
        let id = schema.record().id();
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(id).or_default())
        };

        // Generation runs outside the map lock; concurrent callers for the
        // same type block on the slot and share its result.
        if let Some(result) = slot.get() {
            tracing::trace!(record = schema.name(), "codec cache hit");
            return result.clone();
        }
        slot.get_or_init(|| {
            generate(schema, &self.registry, self.limits.clone()).map(Arc::new)
        })
        .clone()
    }
}

fn require_fixed(schema: &RecordSchema) -> CodecResult<()> {
    if schema.fixed_size().is_some() {
        return Ok(());
    }
    let record = schema.name();
    if schema.is_cyclic() {
        Err(CodecError::CyclicSchema { record })
    } else {
        Err(CodecError::NoFixedLayout { record })
    }
}
