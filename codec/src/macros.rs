//! Declarative macros that make plain Rust types transcodable.

/// Declares a record struct and implements [`Reflect`](crate::schema::Reflect),
/// [`Record`](crate::Record) and [`FieldType`](crate::FieldType) for it.
///
/// Fields are laid out on the wire in declaration order. An integer field can
/// be narrowed with a `#[width(AsU8)]`, `#[width(AsU16)]` or `#[width(AsU32)]`
/// attribute, placed after any doc comments on the field.
///
/// ```
/// codec::record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Header {
///         pub version: i8,
///         /// Payload length in bytes.
///         #[width(AsU16)]
///         pub length: i32,
///     }
/// }
///
/// let cache = codec::CodecCache::new();
/// let codec = cache.fixed::<Header>().unwrap();
/// assert_eq!(codec.size(), 3);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:expr])*
                $(#[width($width:ident)])?
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::schema::Reflect for $name {
            fn record_def() -> $crate::schema::RecordDef {
                $crate::schema::RecordDef::new(stringify!($name))
                    $(.field(
                        $crate::schema::FieldDef::new(
                            stringify!($field),
                            <$ty as $crate::FieldType>::field_kind(),
                        )
                        $(.width($crate::schema::WidthOverride::$width))?
                    ))*
            }
        }

        impl $crate::Record for $name {
            fn to_values(&self) -> ::std::vec::Vec<$crate::Value> {
                ::std::vec![$($crate::FieldType::to_value(&self.$field)),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn from_values(
                values: ::std::vec::Vec<$crate::Value>,
            ) -> $crate::CodecResult<Self> {
                let mut values = $crate::RecordValues::new(
                    stringify!($name),
                    values,
                    <[&str]>::len(&[$(stringify!($field)),*]),
                )?;
                ::std::result::Result::Ok(Self {
                    $($field: values.take::<$ty>(stringify!($field))?,)*
                })
            }
        }

        impl $crate::FieldType for $name {
            fn field_kind() -> $crate::schema::FieldKind {
                $crate::nested_kind::<Self>()
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Record($crate::Record::to_values(self))
            }

            fn from_value(value: $crate::Value) -> $crate::CodecResult<Self> {
                $crate::nested_from_value(value)
            }
        }
    };
}

/// Declares a fieldless enum encoded as a one-byte ordinal and implements
/// [`WireEnum`](crate::WireEnum) and [`FieldType`](crate::FieldType) for it.
///
/// The enum derives `Clone`, `Copy`, `Debug`, `PartialEq` and `Eq`. Ordinals
/// follow declaration order.
///
/// ```
/// use codec::WireEnum;
///
/// codec::wire_enum! {
///     pub enum Status { Active, Inactive, Banned }
/// }
///
/// assert_eq!(Status::Banned.ordinal(), 2);
/// assert_eq!(Status::from_ordinal(1), Some(Status::Inactive));
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        $vis enum $name {
            $($variant,)+
        }

        impl $crate::WireEnum for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn ordinal(self) -> usize {
                self as usize
            }
        }

        impl $crate::FieldType for $name {
            fn field_kind() -> $crate::schema::FieldKind {
                $crate::enum_kind::<Self>()
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Enum($crate::WireEnum::ordinal(*self))
            }

            fn from_value(value: $crate::Value) -> $crate::CodecResult<Self> {
                $crate::enum_from_value(value)
            }
        }
    };
}
