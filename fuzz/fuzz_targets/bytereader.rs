#![no_main]

use bytestream::{widen_unsigned, ByteReader, ByteSource, UnsignedWidth};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 7;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_i8();
            }
            1 => {
                let _ = reader.read_i16();
            }
            2 => {
                let _ = reader.read_i32();
            }
            3 => {
                let _ = reader.read_f64();
            }
            4 => {
                let width = match data[idx.saturating_sub(1)] % 3 {
                    0 => UnsignedWidth::U8,
                    1 => UnsignedWidth::U16,
                    _ => UnsignedWidth::U32,
                };
                let _ = reader.read_unsigned(width);
            }
            5 => {
                let len = usize::from(data[idx.saturating_sub(1)] % 16);
                let _ = reader.read_slice(len);
            }
            _ => {
                let end = idx.saturating_add(4).min(data.len());
                let _ = widen_unsigned(&data[idx..end]);
            }
        }
    }
});
