//! Buffer-backed byte writer for encoding into caller-provided storage.

use crate::error::{ByteError, ByteResult};
use crate::source::ByteSink;

/// A byte writer over a caller-provided mutable slice.
///
/// Writes never grow the buffer. Call [`finish`](Self::finish) to get the
/// number of bytes written.
#[derive(Debug)]
pub struct ByteWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> ByteWriter<'a> {
    /// Creates a new `ByteWriter` that writes from the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.len
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Finishes writing and returns the number of bytes used.
    #[must_use]
    pub fn finish(self) -> usize {
        self.len
    }
}

impl ByteSink for ByteWriter<'_> {
    fn remaining_capacity(&self) -> usize {
        self.buf.len() - self.len
    }

    fn write_all(&mut self, bytes: &[u8]) -> ByteResult<()> {
        let capacity = self.remaining_capacity();
        if bytes.len() > capacity {
            return Err(ByteError::BufferOverflow {
                attempted: bytes.len(),
                capacity,
            });
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnsignedWidth;

    #[test]
    fn empty_writer() {
        let mut buf = [0u8; 4];
        let writer = ByteWriter::new(&mut buf);
        assert_eq!(writer.bytes_written(), 0);
        assert_eq!(writer.remaining_capacity(), 4);
        assert_eq!(writer.finish(), 0);
    }

    #[test]
    fn write_big_endian_values() {
        let mut buf = [0u8; 7];
        let mut writer = ByteWriter::new(&mut buf);
        writer.write_i32(12_345).unwrap();
        writer.write_i8(42).unwrap();
        writer.write_i16(-2).unwrap();
        assert_eq!(writer.finish(), 7);
        assert_eq!(buf, [0x00, 0x00, 0x30, 0x39, 0x2A, 0xFF, 0xFE]);
    }

    #[test]
    fn overflow_writes_nothing() {
        let mut buf = [0u8; 3];
        let mut writer = ByteWriter::new(&mut buf);
        writer.write_u8(0xAA).unwrap();
        let err = writer.write_i32(1).unwrap_err();
        assert_eq!(
            err,
            ByteError::BufferOverflow {
                attempted: 4,
                capacity: 2
            }
        );
        assert_eq!(writer.written(), &[0xAA]);
    }

    #[test]
    fn write_unsigned_narrowed() {
        let mut buf = [0u8; 7];
        let mut writer = ByteWriter::new(&mut buf);
        writer.write_unsigned(255, UnsignedWidth::U8).unwrap();
        writer.write_unsigned(65_535, UnsignedWidth::U16).unwrap();
        writer
            .write_unsigned(4_294_967_295, UnsignedWidth::U32)
            .unwrap();
        assert_eq!(writer.finish(), 7);
        assert_eq!(buf, [0xFF; 7]);
    }

    #[test]
    fn write_floats() {
        let mut buf = [0u8; 4];
        let mut writer = ByteWriter::new(&mut buf);
        writer.write_f32(1.0).unwrap();
        assert_eq!(buf, [0x3F, 0x80, 0x00, 0x00]);
    }
}
