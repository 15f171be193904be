use bytestream::{ByteReader, ByteSink, ByteSource, UnsignedWidth};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    I8(i8),
    I16(i16),
    U16(u16),
    I32(i32),
    I64(i64),
    F32(u32),
    F64(u64),
    Unsigned { width: UnsignedWidth, value: u32 },
}

fn width_strategy() -> impl Strategy<Value = UnsignedWidth> {
    prop_oneof![
        Just(UnsignedWidth::U8),
        Just(UnsignedWidth::U16),
        Just(UnsignedWidth::U32),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i8>().prop_map(Op::I8),
        any::<i16>().prop_map(Op::I16),
        any::<u16>().prop_map(Op::U16),
        any::<i32>().prop_map(Op::I32),
        any::<i64>().prop_map(Op::I64),
        any::<u32>().prop_map(Op::F32),
        any::<u64>().prop_map(Op::F64),
        (width_strategy(), any::<u32>()).prop_map(|(width, value)| Op::Unsigned {
            width,
            value: value & width.max_value(),
        }),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut out = Vec::new();

        for op in &ops {
            match op {
                Op::I8(v) => out.write_i8(*v).unwrap(),
                Op::I16(v) => out.write_i16(*v).unwrap(),
                Op::U16(v) => out.write_u16(*v).unwrap(),
                Op::I32(v) => out.write_i32(*v).unwrap(),
                Op::I64(v) => out.write_i64(*v).unwrap(),
                Op::F32(bits) => out.write_f32(f32::from_bits(*bits)).unwrap(),
                Op::F64(bits) => out.write_f64(f64::from_bits(*bits)).unwrap(),
                Op::Unsigned { width, value } => {
                    out.write_unsigned(i64::from(*value), *width).unwrap();
                }
            }
        }

        let mut reader = ByteReader::new(&out);

        for op in &ops {
            match op {
                Op::I8(v) => prop_assert_eq!(reader.read_i8().unwrap(), *v),
                Op::I16(v) => prop_assert_eq!(reader.read_i16().unwrap(), *v),
                Op::U16(v) => prop_assert_eq!(reader.read_u16().unwrap(), *v),
                Op::I32(v) => prop_assert_eq!(reader.read_i32().unwrap(), *v),
                Op::I64(v) => prop_assert_eq!(reader.read_i64().unwrap(), *v),
                Op::F32(bits) => prop_assert_eq!(reader.read_f32().unwrap().to_bits(), *bits),
                Op::F64(bits) => prop_assert_eq!(reader.read_f64().unwrap().to_bits(), *bits),
                Op::Unsigned { width, value } => {
                    prop_assert_eq!(reader.read_unsigned(*width).unwrap(), i64::from(*value));
                }
            }
        }
        prop_assert!(reader.is_empty());
    }
}
