#![no_main]

use bytestream::ByteReader;
use codec::{Char16, CodecCache, CodecLimits};
use libfuzzer_sys::fuzz_target;

codec::wire_enum! {
    enum Kind { A, B, C }
}

codec::record! {
    struct Inner {
        kind: Kind,
        #[width(AsU16)]
        count: i32,
        unit: Char16,
    }
}

codec::record! {
    struct Outer {
        id: i64,
        label: String,
        blob: Vec<u8>,
        inner: Inner,
        chain: Box<Chain>,
    }
}

codec::record! {
    struct Chain {
        tag: i8,
        next: Box<Chain>,
    }
}

fuzz_target!(|data: &[u8]| {
    let cache = CodecCache::with_limits(CodecLimits::for_testing());
    let mut reader = ByteReader::new(data);

    // Decode as many records as the input holds; errors must never panic.
    while !reader.is_empty() {
        let before = reader.position();
        let decoded = match cache.dynamic::<Outer>() {
            Ok(codec) => codec.decode(&mut reader),
            Err(_) => return,
        };
        if decoded.is_err() || reader.position() == before {
            break;
        }
    }

    if let Ok(inner) = cache.fixed::<Inner>() {
        let _ = inner.decode(&mut ByteReader::new(data));
    }
});
