//! Big-endian byte sources, sinks and width helpers for the recbin codec.
//!
//! This crate provides the [`ByteSource`] and [`ByteSink`] traits that
//! generated codecs read from and write to, buffer-backed implementations
//! ([`ByteReader`], [`ByteWriter`]) and stream implementations for
//! [`std::io::Cursor`] and `Vec<u8>`.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Every read and write is bounds-checked.
//! - **All-or-nothing primitives** - A failed read or write leaves the
//!   position untouched.
//! - **No schema knowledge** - This crate knows nothing about records or fields.
//! - **Big-endian** - Multi-byte values are most-significant byte first.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteReader, ByteSink, ByteSource, ByteWriter, UnsignedWidth};
//!
//! let mut buf = [0u8; 6];
//! let mut writer = ByteWriter::new(&mut buf);
//! writer.write_i32(12345).unwrap();
//! writer.write_unsigned(65535, UnsignedWidth::U16).unwrap();
//! let used = writer.finish();
//!
//! let mut reader = ByteReader::new(&buf[..used]);
//! assert_eq!(reader.read_i32().unwrap(), 12345);
//! assert_eq!(reader.read_unsigned(UnsignedWidth::U16).unwrap(), 65535);
//! ```

mod error;
mod reader;
mod source;
mod width;
mod writer;

pub use error::{ByteError, ByteResult};
pub use reader::ByteReader;
pub use source::{ByteSink, ByteSource};
pub use width::{narrow_checked, widen_unsigned, Narrowed, UnsignedWidth};
pub use writer::ByteWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        let mut buf = [0u8; 0];
        let writer = ByteWriter::new(&mut buf);
        assert_eq!(writer.finish(), 0);

        let reader = ByteReader::new(&buf);
        assert!(reader.is_empty());
    }

    #[test]
    fn mixed_roundtrip() {
        let mut out = Vec::new();
        out.write_i8(-5).unwrap();
        out.write_i16(-300).unwrap();
        out.write_i64(i64::MIN).unwrap();
        out.write_u16(0x00E9).unwrap();
        out.write_unsigned(4_000_000_000, UnsignedWidth::U32).unwrap();

        let mut reader = ByteReader::new(&out);
        assert_eq!(reader.read_i8().unwrap(), -5);
        assert_eq!(reader.read_i16().unwrap(), -300);
        assert_eq!(reader.read_i64().unwrap(), i64::MIN);
        assert_eq!(reader.read_u16().unwrap(), 0x00E9);
        assert_eq!(
            reader.read_unsigned(UnsignedWidth::U32).unwrap(),
            4_000_000_000
        );
        assert!(reader.is_empty());
    }

    #[test]
    fn doctest_example() {
        let mut buf = [0u8; 6];
        let mut writer = ByteWriter::new(&mut buf);
        writer.write_i32(12345).unwrap();
        writer.write_unsigned(65535, UnsignedWidth::U16).unwrap();
        let used = writer.finish();

        let mut reader = ByteReader::new(&buf[..used]);
        assert_eq!(reader.read_i32().unwrap(), 12345);
        assert_eq!(reader.read_unsigned(UnsignedWidth::U16).unwrap(), 65535);
    }
}
