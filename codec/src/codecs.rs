//! Typed codec instances over a shared core codec.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use bytestream::{ByteReader, ByteSink, ByteSource};

use crate::error::{CodecError, CodecResult};
use crate::generator::CoreCodec;
use crate::value::Record;

/// Which codec variant a caller asks the cache for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecMode {
    /// Precomputed size with capacity prechecks. Requires a fixed layout.
    Fixed,
    /// No precomputation; bounds are enforced by the source or sink.
    Dynamic,
}

/// A codec with no statically known size.
///
/// Decode and encode delegate straight to the core codec. Running out of
/// input or room surfaces as the source's or sink's own boundary error.
pub struct DynamicCodec<T> {
    core: Arc<CoreCodec>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> DynamicCodec<T> {
    pub(crate) const fn new(core: Arc<CoreCodec>) -> Self {
        Self {
            core,
            _record: PhantomData,
        }
    }

    pub fn decode<S: ByteSource + ?Sized>(&self, source: &mut S) -> CodecResult<T> {
        T::from_values(self.core.decode_unchecked(source)?)
    }

    pub fn encode<K: ByteSink + ?Sized>(&self, sink: &mut K, value: &T) -> CodecResult<()> {
        self.core.encode(sink, &value.to_values())?;
        Ok(())
    }

    /// Number of bytes `value` encodes to.
    pub fn encoded_len(&self, value: &T) -> CodecResult<usize> {
        self.core.encoded_len(&value.to_values())
    }

    #[must_use]
    pub fn core(&self) -> &Arc<CoreCodec> {
        &self.core
    }
}

/// A codec for a record whose total wire size is statically known.
///
/// Every call checks the source or sink can hold the whole record before
/// touching it, so a short buffer is never partially consumed or written.
pub struct FixedCodec<T> {
    size: usize,
    inner: DynamicCodec<T>,
}

impl<T: Record> FixedCodec<T> {
    /// Wraps `core`, which must have a fixed layout.
    pub(crate) fn new(core: Arc<CoreCodec>) -> CodecResult<Self> {
        let size = core.fixed_size().ok_or(CodecError::NoFixedLayout {
            record: core.record_name(),
        })?;
        Ok(Self {
            size,
            inner: DynamicCodec::new(core),
        })
    }

    /// Wire size of every record.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    pub fn decode<S: ByteSource + ?Sized>(&self, source: &mut S) -> CodecResult<T> {
        let available = source.remaining();
        if available < self.size {
            return Err(CodecError::InsufficientData {
                record: self.inner.core.record_name(),
                needed: self.size,
                available,
            });
        }
        T::from_values(self.inner.core.decode_checked(source)?)
    }

    pub fn encode<K: ByteSink + ?Sized>(&self, sink: &mut K, value: &T) -> CodecResult<()> {
        let available = sink.remaining_capacity();
        if available < self.size {
            return Err(CodecError::InsufficientCapacity {
                record: self.inner.core.record_name(),
                needed: self.size,
                available,
            });
        }
        self.inner.encode(sink, value)
    }

    #[must_use]
    pub fn core(&self) -> &Arc<CoreCodec> {
        self.inner.core()
    }
}

/// A cached codec in either variant.
pub enum Codec<T> {
    Fixed(FixedCodec<T>),
    Dynamic(DynamicCodec<T>),
}

impl<T: Record> Codec<T> {
    pub fn decode<S: ByteSource + ?Sized>(&self, source: &mut S) -> CodecResult<T> {
        match self {
            Self::Fixed(codec) => codec.decode(source),
            Self::Dynamic(codec) => codec.decode(source),
        }
    }

    pub fn encode<K: ByteSink + ?Sized>(&self, sink: &mut K, value: &T) -> CodecResult<()> {
        match self {
            Self::Fixed(codec) => codec.encode(sink, value),
            Self::Dynamic(codec) => codec.encode(sink, value),
        }
    }

    /// Encodes `value` into a new buffer sized for it.
    pub fn encode_to_vec(&self, value: &T) -> CodecResult<Vec<u8>> {
        let values = value.to_values();
        let core = self.core();
        let mut out = Vec::with_capacity(core.encoded_len(&values)?);
        core.encode(&mut out, &values)?;
        Ok(out)
    }

    /// Decodes one record from the front of `bytes`.
    ///
    /// Returns the record and the number of bytes it occupied.
    pub fn decode_from_slice(&self, bytes: &[u8]) -> CodecResult<(T, usize)> {
        let mut reader = ByteReader::new(bytes);
        let value = self.decode(&mut reader)?;
        Ok((value, reader.position()))
    }

    /// Exact encoded size for fixed codecs, `None` for dynamic ones.
    #[must_use]
    pub const fn size_hint(&self) -> Option<usize> {
        match self {
            Self::Fixed(codec) => Some(codec.size()),
            Self::Dynamic(_) => None,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> CodecMode {
        match self {
            Self::Fixed(_) => CodecMode::Fixed,
            Self::Dynamic(_) => CodecMode::Dynamic,
        }
    }

    #[must_use]
    pub fn core(&self) -> &Arc<CoreCodec> {
        match self {
            Self::Fixed(codec) => codec.core(),
            Self::Dynamic(codec) => codec.core(),
        }
    }

    /// Returns `true` if both handles share one generated core codec.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(self.core(), other.core())
    }
}

impl<T> Clone for DynamicCodec<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            _record: PhantomData,
        }
    }
}

impl<T> Clone for FixedCodec<T> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            inner: self.inner.clone(),
        }
    }
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(codec) => Self::Fixed(codec.clone()),
            Self::Dynamic(codec) => Self::Dynamic(codec.clone()),
        }
    }
}

impl<T> fmt::Debug for DynamicCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicCodec")
            .field("record", &self.core.record_name())
            .finish()
    }
}

impl<T> fmt::Debug for FixedCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedCodec")
            .field("record", &self.inner.core.record_name())
            .field("size", &self.size)
            .finish()
    }
}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(codec) => fmt::Debug::fmt(codec, f),
            Self::Dynamic(codec) => fmt::Debug::fmt(codec, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::limits::CodecLimits;
    use crate::value::{RecordValues, Value};
    use bytestream::{ByteError, ByteWriter};
    use schema::{FieldDef, FieldKind, RecordDef, Reflect, SchemaRegistry};

    #[derive(Debug, PartialEq)]
    struct Normal {
        foo: i32,
        bar: i8,
    }

    impl Reflect for Normal {
        fn record_def() -> RecordDef {
            RecordDef::new("Normal")
                .field(FieldDef::new("foo", FieldKind::Int32))
                .field(FieldDef::new("bar", FieldKind::Int8))
        }
    }

    impl Record for Normal {
        fn to_values(&self) -> Vec<Value> {
            vec![Value::I32(self.foo), Value::I8(self.bar)]
        }

        fn from_values(values: Vec<Value>) -> CodecResult<Self> {
            let mut values = RecordValues::new("Normal", values, 2)?;
            Ok(Self {
                foo: values.take("foo")?,
                bar: values.take("bar")?,
            })
        }
    }

    fn core() -> Arc<CoreCodec> {
        let registry = SchemaRegistry::new();
        let schema = registry.schema_of::<Normal>().unwrap();
        Arc::new(generate(schema, &registry, CodecLimits::default()).unwrap())
    }

    const SAMPLE: Normal = Normal { foo: 12_345, bar: 42 };

    #[test]
    fn fixed_decode_rejects_short_source_without_consuming() {
        let codec = FixedCodec::<Normal>::new(core()).unwrap();
        let bytes = [0x00, 0x00, 0x30, 0x39];
        let mut reader = ByteReader::new(&bytes);
        let err = codec.decode(&mut reader).unwrap_err();
        assert_eq!(
            err,
            CodecError::InsufficientData {
                record: "Normal",
                needed: 5,
                available: 4
            }
        );
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn fixed_encode_rejects_small_sink_without_writing() {
        let codec = FixedCodec::<Normal>::new(core()).unwrap();
        let mut buf = [0u8; 4];
        let mut writer = ByteWriter::new(&mut buf);
        let err = codec.encode(&mut writer, &SAMPLE).unwrap_err();
        assert_eq!(
            err,
            CodecError::InsufficientCapacity {
                record: "Normal",
                needed: 5,
                available: 4
            }
        );
        assert_eq!(writer.bytes_written(), 0);
    }

    #[test]
    fn dynamic_encode_surfaces_sink_error() {
        let codec = DynamicCodec::<Normal>::new(core());
        let mut buf = [0u8; 4];
        let mut writer = ByteWriter::new(&mut buf);
        let err = codec.encode(&mut writer, &SAMPLE).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Bytes(ByteError::BufferOverflow { .. })
        ));
    }

    #[test]
    fn codec_round_trip_helpers() {
        let codec = Codec::Fixed(FixedCodec::<Normal>::new(core()).unwrap());
        let bytes = codec.encode_to_vec(&SAMPLE).unwrap();
        assert_eq!(bytes, [0x00, 0x00, 0x30, 0x39, 0x2A]);

        let mut padded = bytes.clone();
        padded.push(0xEE);
        let (decoded, used) = codec.decode_from_slice(&padded).unwrap();
        assert_eq!(decoded, SAMPLE);
        assert_eq!(used, 5);
        assert_eq!(codec.size_hint(), Some(5));
        assert_eq!(codec.mode(), CodecMode::Fixed);
    }

    #[test]
    fn same_instance_tracks_core() {
        let shared = core();
        let a = Codec::<Normal>::Dynamic(DynamicCodec::new(Arc::clone(&shared)));
        let b = a.clone();
        let c = Codec::<Normal>::Dynamic(DynamicCodec::new(core()));
        assert!(a.same_instance(&b));
        assert!(!a.same_instance(&c));
        assert_eq!(a.size_hint(), None);
    }

    #[test]
    fn debug_names_record() {
        let codec = FixedCodec::<Normal>::new(core()).unwrap();
        let debug = format!("{codec:?}");
        assert!(debug.contains("Normal"));
        assert!(debug.contains('5'));
    }

    #[test]
    fn codecs_are_send_and_sync() {
        fn assert_send_sync<C: Send + Sync>() {}
        assert_send_sync::<Codec<Normal>>();
        assert_send_sync::<FixedCodec<Normal>>();
        assert_send_sync::<DynamicCodec<Normal>>();
    }
}
