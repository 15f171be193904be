//! Codec generation: one core codec per analyzed record schema.

use std::sync::Arc;

use bytestream::{ByteSink, ByteSource};
use schema::{RecordRef, RecordSchema, SchemaRegistry};

use crate::error::CodecResult;
use crate::limits::CodecLimits;
use crate::plan::CodecProgram;
use crate::value::Value;

/// The generated decode/encode logic for one record schema, before it is
/// wrapped as a fixed or dynamic codec.
///
/// Works on untyped [`Value`] lists; the typed wrappers convert to and from
/// the record type.
#[derive(Debug)]
pub struct CoreCodec {
    record: RecordRef,
    program: CodecProgram,
    limits: CodecLimits,
}

/// Compiles `schema` into a core codec.
///
/// Nested schemas are resolved through `registry`, so every record reachable
/// from `schema` must analyze successfully.
pub fn generate(
    schema: Arc<RecordSchema>,
    registry: &SchemaRegistry,
    limits: CodecLimits,
) -> CodecResult<CoreCodec> {
    let record = schema.record();
    let program = CodecProgram::compile(schema, registry)?;
    tracing::debug!(
        record = program.root().name,
        plans = program.records.len(),
        fixed_size = ?program.root().fixed_size,
        "generated record codec"
    );
    Ok(CoreCodec {
        record,
        program,
        limits,
    })
}

impl CoreCodec {
    /// Handle of the record type this codec transcodes.
    #[must_use]
    pub const fn record(&self) -> RecordRef {
        self.record
    }

    #[must_use]
    pub fn record_name(&self) -> &'static str {
        self.program.root().name
    }

    /// Total wire size when the record has a fixed layout.
    #[must_use]
    pub fn fixed_size(&self) -> Option<usize> {
        self.program.root().fixed_size
    }

    #[must_use]
    pub const fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    /// Decodes field values with no size precheck.
    pub fn decode_unchecked<S: ByteSource + ?Sized>(&self, source: &mut S) -> CodecResult<Vec<Value>> {
        self.program.decode_unchecked(source, &self.limits)
    }

    /// Decodes field values, failing with `InsufficientData` before reading
    /// anything if the source is shorter than the fixed size.
    pub fn decode_checked<S: ByteSource + ?Sized>(&self, source: &mut S) -> CodecResult<Vec<Value>> {
        self.program.decode_checked(source, &self.limits)
    }

    /// Validates `values` and writes them in field order.
    ///
    /// Returns the number of bytes written. A value that fails validation
    /// leaves the sink untouched.
    pub fn encode<K: ByteSink + ?Sized>(&self, sink: &mut K, values: &[Value]) -> CodecResult<usize> {
        self.program.encode(sink, values, &self.limits)
    }

    /// Encoded length of `values`, validating them along the way.
    pub fn encoded_len(&self, values: &[Value]) -> CodecResult<usize> {
        self.program.encoded_len(values, &self.limits)
    }
}
