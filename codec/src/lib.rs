//! Cached binary codecs for record types.
//!
//! This is the main codec crate that ties together bytestream and schema:
//! given a record type, it analyzes the type's field list once, compiles it
//! into a field plan and hands out codecs that decode and encode the record
//! against any byte source or sink.
//!
//! # Features
//!
//! - Fixed codecs with capacity prechecks for records of static size
//! - Dynamic codecs for text, byte arrays and self-nesting records
//! - Unsigned width overrides (`AsU8`, `AsU16`, `AsU32`) on integer fields
//! - Enum fields as single-byte ordinals
//! - A thread-safe cache that generates each codec exactly once
//!
//! # Wire Format
//!
//! Fields are written in declaration order with no framing. Multi-byte
//! values are big-endian. Nested records are inlined. Text and byte fields
//! carry a big-endian `u16` length prefix.
//!
//! # Example
//!
//! ```
//! codec::record! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Normal {
//!         pub foo: i32,
//!         pub bar: i8,
//!     }
//! }
//!
//! let codec = codec::CodecCache::new().fixed_or_dynamic::<Normal>().unwrap();
//! let bytes = codec.encode_to_vec(&Normal { foo: 12345, bar: 42 }).unwrap();
//! assert_eq!(bytes, [0x00, 0x00, 0x30, 0x39, 0x2A]);
//!
//! let (decoded, used) = codec.decode_from_slice(&bytes).unwrap();
//! assert_eq!(decoded, Normal { foo: 12345, bar: 42 });
//! assert_eq!(used, 5);
//! ```
//!
//! # Design Principles
//!
//! - **Generate once** - Analysis and plan compilation are amortized by the cache.
//! - **All or nothing** - A failed decode produces no record; a rejected value
//!   writes no bytes.
//! - **Explicit registration** - Record types describe themselves via macros
//!   or hand-written [`schema::Reflect`] impls.

mod cache;
mod codecs;
mod engine;
mod error;
mod generator;
mod limits;
mod macros;
mod plan;
mod value;

pub use bytestream;
pub use schema;

pub use cache::CodecCache;
pub use codecs::{Codec, CodecMode, DynamicCodec, FixedCodec};
pub use error::{CodecError, CodecResult, LimitKind, ValueReason};
pub use generator::{generate, CoreCodec};
pub use limits::{CodecLimits, MAX_VARIABLE_LEN};
pub use value::{
    enum_from_value, enum_kind, nested_from_value, nested_kind, Char16, FieldType, Record,
    RecordValues, Value, WireEnum,
};
