//! Encode/decode throughput for fixed and dynamic codecs.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use bytestream::{ByteReader, ByteWriter};
use codec::{CodecCache, CodecMode};

codec::record! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position3D {
        x: f32,
        y: f32,
        z: f32,
    }
}

codec::record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Entity {
        id: i64,
        #[width(AsU16)]
        kind: i32,
        position: Position3D,
        velocity: Position3D,
    }
}

codec::record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Tagged {
        id: i32,
        name: String,
        position: Position3D,
    }
}

fn sample_entity() -> Entity {
    Entity {
        id: 42,
        kind: 7,
        position: Position3D {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        },
        velocity: Position3D {
            x: 0.5,
            y: 0.0,
            z: -0.5,
        },
    }
}

fn bench_fixed(c: &mut Criterion) {
    let cache = CodecCache::new();
    let codec = cache.fixed::<Entity>().unwrap();
    let entity = sample_entity();
    let mut buf = vec![0u8; codec.size()];

    let mut group = c.benchmark_group("fixed/entity");
    group.throughput(Throughput::Bytes(codec.size() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| {
            let mut writer = ByteWriter::new(&mut buf);
            codec.encode(&mut writer, black_box(&entity)).unwrap();
            black_box(writer.finish())
        });
    });

    let encoded = buf.clone();
    group.bench_function("decode", |b| {
        b.iter(|| {
            let mut reader = ByteReader::new(black_box(&encoded));
            black_box(codec.decode(&mut reader).unwrap())
        });
    });

    group.finish();
}

fn bench_dynamic(c: &mut Criterion) {
    let cache = CodecCache::new();
    let codec = cache.get_or_create::<Tagged>(CodecMode::Dynamic).unwrap();
    let tagged = Tagged {
        id: 9,
        name: "player-one".to_string(),
        position: Position3D {
            x: 4.0,
            y: 5.0,
            z: 6.0,
        },
    };
    let encoded = codec.encode_to_vec(&tagged).unwrap();

    let mut group = c.benchmark_group("dynamic/tagged");
    group.throughput(Throughput::Bytes(encoded.len() as u64));

    group.bench_function("encode_to_vec", |b| {
        b.iter(|| black_box(codec.encode_to_vec(black_box(&tagged)).unwrap()));
    });

    group.bench_function("decode_from_slice", |b| {
        b.iter(|| black_box(codec.decode_from_slice(black_box(&encoded)).unwrap()));
    });

    group.finish();
}

fn bench_cache_lookup(c: &mut Criterion) {
    let cache = CodecCache::new();
    cache.fixed::<Entity>().unwrap();

    c.bench_function("cache/warm_lookup", |b| {
        b.iter(|| black_box(cache.fixed::<Entity>().unwrap()));
    });
}

criterion_group!(benches, bench_fixed, bench_dynamic, bench_cache_lookup);
criterion_main!(benches);
