//! Byte source and sink abstractions.
//!
//! Codecs only talk to these traits. Buffer-backed implementations live in
//! [`reader`](crate::ByteReader) and [`writer`](crate::ByteWriter); stream
//! transports are provided for [`std::io::Cursor`] and growable `Vec<u8>`.

use std::io::{Cursor, Read};

use crate::error::{ByteError, ByteResult};
use crate::width::{narrow_checked, widen_unsigned, UnsignedWidth};

/// A sequential source of big-endian encoded bytes.
pub trait ByteSource {
    /// Number of bytes that can still be read.
    fn remaining(&self) -> usize;

    /// Fills `out` completely or fails without consuming anything.
    fn read_exact(&mut self, out: &mut [u8]) -> ByteResult<()>;

    /// Reads a single raw byte.
    fn read_u8(&mut self) -> ByteResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads `N` raw bytes.
    fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        let mut out = [0u8; N];
        self.read_exact(&mut out)?;
        Ok(out)
    }

    fn read_i8(&mut self) -> ByteResult<i8> {
        Ok(i8::from_be_bytes(self.read_array()?))
    }

    fn read_i16(&mut self) -> ByteResult<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    fn read_u16(&mut self) -> ByteResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    fn read_i32(&mut self) -> ByteResult<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    fn read_i64(&mut self) -> ByteResult<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    fn read_f32(&mut self) -> ByteResult<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    fn read_f64(&mut self) -> ByteResult<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    /// Reads an unsigned value of `width` bytes and zero-extends it.
    fn read_unsigned(&mut self, width: UnsignedWidth) -> ByteResult<i64> {
        let mut buf = [0u8; 4];
        let slot = &mut buf[..width.bytes()];
        self.read_exact(slot)?;
        widen_unsigned(slot)
    }
}

/// A sequential sink for big-endian encoded bytes.
pub trait ByteSink {
    /// Number of bytes that can still be written.
    fn remaining_capacity(&self) -> usize;

    /// Writes all of `bytes` or fails without writing anything.
    fn write_all(&mut self, bytes: &[u8]) -> ByteResult<()>;

    /// Writes a single raw byte.
    fn write_u8(&mut self, value: u8) -> ByteResult<()> {
        self.write_all(&[value])
    }

    fn write_i8(&mut self, value: i8) -> ByteResult<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_i16(&mut self, value: i16) -> ByteResult<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_u16(&mut self, value: u16) -> ByteResult<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_i32(&mut self, value: i32) -> ByteResult<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_i64(&mut self, value: i64) -> ByteResult<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_f32(&mut self, value: f32) -> ByteResult<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_f64(&mut self, value: f64) -> ByteResult<()> {
        self.write_all(&value.to_be_bytes())
    }

    /// Narrows `value` to `width` bytes, rejecting values outside the range.
    fn write_unsigned(&mut self, value: i64, width: UnsignedWidth) -> ByteResult<()> {
        let narrowed = narrow_checked(value, width)?;
        self.write_all(narrowed.as_bytes())
    }
}

impl<T: AsRef<[u8]>> ByteSource for Cursor<T> {
    fn remaining(&self) -> usize {
        let len = self.get_ref().as_ref().len();
        let pos = usize::try_from(self.position()).unwrap_or(usize::MAX);
        len.saturating_sub(pos)
    }

    fn read_exact(&mut self, out: &mut [u8]) -> ByteResult<()> {
        let available = ByteSource::remaining(self);
        if out.len() > available {
            return Err(ByteError::UnexpectedEof {
                requested: out.len(),
                available,
            });
        }
        Read::read_exact(self, out).map_err(|err| ByteError::Io { kind: err.kind() })
    }
}

impl ByteSink for Vec<u8> {
    fn remaining_capacity(&self) -> usize {
        isize::MAX.unsigned_abs() - self.len()
    }

    fn write_all(&mut self, bytes: &[u8]) -> ByteResult<()> {
        let capacity = self.remaining_capacity();
        if bytes.len() > capacity {
            return Err(ByteError::BufferOverflow {
                attempted: bytes.len(),
                capacity,
            });
        }
        self.extend_from_slice(bytes);
        Ok(())
    }
}
