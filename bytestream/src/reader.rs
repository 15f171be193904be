//! Buffer-backed byte reader with bounded operations.

use crate::error::{ByteError, ByteResult};
use crate::source::ByteSource;

/// A byte reader over a borrowed slice.
///
/// All read operations are bounds-checked and return errors on failure.
/// A failed read never advances the position.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the unread tail of the buffer.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn read_slice(&mut self, len: usize) -> ByteResult<&'a [u8]> {
        self.ensure_bytes(len)?;
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn ensure_bytes(&self, len: usize) -> ByteResult<()> {
        let available = self.data.len() - self.pos;
        if len > available {
            return Err(ByteError::UnexpectedEof {
                requested: len,
                available,
            });
        }
        Ok(())
    }
}

impl ByteSource for ByteReader<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_exact(&mut self, out: &mut [u8]) -> ByteResult<()> {
        let bytes = self.read_slice(out.len())?;
        out.copy_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnsignedWidth;

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = ByteReader::new(&[]);
        let result = reader.read_u8();
        assert!(matches!(result, Err(ByteError::UnexpectedEof { .. })));
    }

    #[test]
    fn read_big_endian_i32() {
        let mut reader = ByteReader::new(&[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(reader.read_i32().unwrap(), 0x1234_5678);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_signed_values() {
        let mut reader = ByteReader::new(&[0xFF, 0xFF, 0xFE, 0x80]);
        assert_eq!(reader.read_i16().unwrap(), -1);
        assert_eq!(reader.read_i8().unwrap(), -2);
        assert_eq!(reader.read_i8().unwrap(), i8::MIN);
    }

    #[test]
    fn short_read_keeps_position() {
        let mut reader = ByteReader::new(&[0xAA, 0xBB, 0xCC]);
        reader.read_u8().unwrap();
        let err = reader.read_i64().unwrap_err();
        assert_eq!(
            err,
            ByteError::UnexpectedEof {
                requested: 8,
                available: 2
            }
        );
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.rest(), &[0xBB, 0xCC]);
    }

    #[test]
    fn read_unsigned_u16() {
        let mut reader = ByteReader::new(&[0xFF, 0xFE]);
        assert_eq!(reader.read_unsigned(UnsignedWidth::U16).unwrap(), 0xFFFE);
    }

    #[test]
    fn read_slice_borrows() {
        let data = [1u8, 2, 3, 4];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_slice(3).unwrap(), &[1, 2, 3]);
        assert_eq!(reader.remaining(), 1);
    }
}
