//! Declaration macros.
//!
//! These expand to the impls a schema code generator would emit.

/// Declares a struct and implements [`Record`](crate::Record),
/// [`Encode`](crate::Encode) and [`Decode`](crate::Decode) for it.
///
/// Each field takes an optional annotation `"wire_name[,omitempty]"`. A field
/// without one, or annotated `"-"`, is kept off the wire. Annotated fields
/// need codec types; unannotated ones only need `Default`.
///
/// ```
/// disorder::record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Point {
///         pub x: i32 => "x",
///         pub y: i32 => "y,omitempty",
///         pub scratch: Vec<u8>,
///     }
/// }
///
/// let p = Point { x: 1, y: 0, scratch: vec![9] };
/// let bytes = disorder::encode(&p).unwrap();
/// assert_eq!(bytes, [0x12, 1, b'x', 0x06, 1, 0, 0, 0, 0x00]);
/// let back: Point = disorder::decode(&bytes).unwrap();
/// assert_eq!(back, Point { x: 1, ..Default::default() });
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $annotation:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            #[allow(unused_variables)]
            fn declare(fields: &mut $crate::FieldSet<Self>) {
                $( $crate::__record_field!(fields, $field $(, $annotation)?); )*
            }
        }

        impl $crate::Encode for $name {
            fn encode(&self, encoder: &mut $crate::Encoder<'_>) -> ::core::result::Result<(), $crate::EncodeError> {
                encoder.write_record(self)
            }

            fn is_zero(&self) -> bool {
                true $( && $crate::__record_field_is_zero!(self, $field $(, $annotation)?) )*
            }
        }

        impl $crate::Decode for $name {
            fn decode(decoder: &mut $crate::Decoder<'_>) -> ::core::result::Result<Self, $crate::DecodeError> {
                decoder.read_record()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field {
    ($fields:ident, $field:ident) => {};
    ($fields:ident, $field:ident, $annotation:literal) => {
        $fields.field(
            stringify!($field),
            $annotation,
            |r: &Self| &r.$field,
            |r: &mut Self| &mut r.$field,
        );
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field_is_zero {
    ($self:ident, $field:ident) => {
        true
    };
    ($self:ident, $field:ident, $annotation:literal) => {
        $crate::Encode::is_zero(&$self.$field)
    };
}

/// Implements [`Encode`](crate::Encode) and [`Decode`](crate::Decode) for
/// types with a hand-written [`Record`](crate::Record) impl.
#[macro_export]
macro_rules! record_codec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Encode for $ty {
                fn encode(&self, encoder: &mut $crate::Encoder<'_>) -> ::core::result::Result<(), $crate::EncodeError> {
                    encoder.write_record(self)
                }
            }

            impl $crate::Decode for $ty {
                fn decode(decoder: &mut $crate::Decoder<'_>) -> ::core::result::Result<Self, $crate::DecodeError> {
                    decoder.read_record()
                }
            }
        )+
    };
}

/// Declares a fieldless enum carried on the wire by canonical name, and
/// implements [`Enum`](crate::Enum), [`Encode`](crate::Encode) and
/// [`Decode`](crate::Decode) for it.
///
/// ```
/// disorder::enumeration! {
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub enum Color {
///         Red => "red",
///         Green => "green",
///     }
/// }
///
/// let bytes = disorder::encode(&Color::Green).unwrap();
/// assert_eq!(bytes, [0x0E, 5, b'g', b'r', b'e', b'e', b'n']);
/// assert_eq!(disorder::decode::<Color>(&bytes).unwrap(), Color::Green);
/// ```
#[macro_export]
macro_rules! enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::Enum for $name {
            fn to_name(&self) -> ::core::result::Result<&str, $crate::EnumError> {
                match self {
                    $( $name::$variant => Ok($wire), )+
                }
            }

            fn from_name(name: &str) -> ::core::result::Result<Self, $crate::EnumError> {
                match name {
                    $( $wire => Ok($name::$variant), )+
                    _ => Err($crate::EnumError::unknown_name::<Self>(name)),
                }
            }
        }

        $crate::enum_codec!($name);
    };
}

/// Implements [`Encode`](crate::Encode) and [`Decode`](crate::Decode) for
/// types with a hand-written [`Enum`](crate::Enum) impl.
#[macro_export]
macro_rules! enum_codec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Encode for $ty {
                fn encode(&self, encoder: &mut $crate::Encoder<'_>) -> ::core::result::Result<(), $crate::EncodeError> {
                    encoder.write_enum(self)
                }
            }

            impl $crate::Decode for $ty {
                fn decode(decoder: &mut $crate::Decoder<'_>) -> ::core::result::Result<Self, $crate::DecodeError> {
                    decoder.read_enum()
                }
            }
        )+
    };
}

/// Implements [`Encode`](crate::Encode) and [`Decode`](crate::Decode) for
/// types that implement [`Marshal`](crate::Marshal).
#[macro_export]
macro_rules! marshal_codec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Encode for $ty {
                fn encode(&self, encoder: &mut $crate::Encoder<'_>) -> ::core::result::Result<(), $crate::EncodeError> {
                    encoder.write_marshal(self)
                }

                fn is_zero(&self) -> bool {
                    $crate::Marshal::is_zero(self)
                }
            }

            impl $crate::Decode for $ty {
                fn decode(decoder: &mut $crate::Decoder<'_>) -> ::core::result::Result<Self, $crate::DecodeError> {
                    decoder.read_marshal()
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use proptest::prelude::*;

    use crate::codec::{Source, Writer};
    use crate::error::ErrorKind;
    use crate::{
        Codec, DecodeError, EncodeError, Enum, EnumError, FieldSet, Marshal, Record, Tag,
        Timestamp, Value,
    };

    record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Tagged {
            count: i32 => "count",
            tags: Vec<String> => "tags",
        }
    }

    record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct OnlyTags {
            tags: Vec<String> => "tags",
        }
    }

    enumeration! {
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        enum Color {
            #[default]
            Red => "red",
            Green => "green",
            Blue => "blue",
        }
    }

    /// Ordinal-backed enum where only some ordinals are named.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    struct Level(u8);

    impl Enum for Level {
        fn to_name(&self) -> Result<&str, EnumError> {
            match self.0 {
                0 => Ok("low"),
                1 => Ok("high"),
                other => Err(EnumError::unnamed::<Self>(other)),
            }
        }

        fn from_name(name: &str) -> Result<Self, EnumError> {
            match name {
                "low" => Ok(Level(0)),
                "high" => Ok(Level(1)),
                _ => Err(EnumError::unknown_name::<Self>(name)),
            }
        }
    }

    enum_codec!(Level);

    /// Packed colour written as a u32-tagged payload.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    struct Rgb {
        r: u8,
        g: u8,
        b: u8,
    }

    impl Marshal for Rgb {
        fn write_self(&self, writer: &mut Writer) -> Result<(), EncodeError> {
            writer.write_tag(Tag::U32);
            writer.write_bytes(&[self.r, self.g, self.b, 0]);
            Ok(())
        }

        fn read_self(source: &mut dyn Source) -> Result<Self, DecodeError> {
            let tag = Tag::try_from(source.read_byte("rgb tag")?)?;
            if tag != Tag::U32 {
                return Err(DecodeError::UnexpectedTag {
                    expected: "rgb",
                    found: tag,
                });
            }
            let mut buf = [0u8; 4];
            source.read_exact(&mut buf, "rgb")?;
            Ok(Rgb {
                r: buf[0],
                g: buf[1],
                b: buf[2],
            })
        }

        fn is_zero(&self) -> bool {
            *self == Rgb::default()
        }
    }

    marshal_codec!(Rgb);

    record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Widget {
            name: String => "name",
            color: Color => "color",
            level: Level => "level,omitempty",
            paint: Rgb => "paint,omitempty",
            palette: Vec<Rgb> => "palette",
            made: Timestamp => "made",
            expires: Option<Timestamp> => "expires,omitempty",
            parts: Vec<Tagged> => "parts",
            labels: BTreeMap<String, String> => "labels",
            cache: Vec<u8>,
        }
    }

    record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Event {
            name: String => "name",
            time: Option<Timestamp> => "time",
        }
    }

    record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct EventV1 {
            name: String => "name",
        }
    }

    record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct EventV2 {
            name: String => "name",
            extra: Widget => "extra",
            more: HashMap<String, Vec<i64>> => "more",
            after: i8 => "after",
        }
    }

    record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Wrapper {
            inner: Event => "inner",
        }
    }

    fn widget() -> Widget {
        let mut labels = BTreeMap::new();
        labels.insert("env".to_string(), "prod".to_string());
        Widget {
            name: "gear".into(),
            color: Color::Blue,
            level: Level(1),
            paint: Rgb { r: 1, g: 2, b: 3 },
            palette: vec![Rgb { r: 9, g: 8, b: 7 }, Rgb::default()],
            made: Timestamp::from_unix_seconds(1_710_513_000),
            expires: Some(Timestamp::from_unix_seconds(1_810_513_000)),
            parts: vec![
                Tagged {
                    count: 2,
                    tags: vec!["x".into()],
                },
                Tagged::default(),
            ],
            labels,
            cache: vec![],
        }
    }

    #[test]
    fn test_record_layout() {
        let value = Tagged {
            count: 3,
            tags: vec!["a".into(), "b".into()],
        };
        let bytes = crate::encode(&value).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x12, 5, b'c', b'o', b'u', b'n', b't', 0x06, 3, 0, 0, 0, 4, b't', b'a', b'g', b's',
                0x10, 0x0C, 1, 0, 0, 0, b'a', 0x0C, 1, 0, 0, 0, b'b', 0x11, 0x00,
            ]
        );
        assert_eq!(crate::decode::<Tagged>(&bytes).unwrap(), value);
    }

    #[test]
    fn test_empty_collection_erasure() {
        let bytes = crate::encode(&OnlyTags::default()).unwrap();
        assert_eq!(bytes, vec![0x12, 0x00]);
        assert_eq!(bytes, crate::encode(&Value::Object(BTreeMap::new())).unwrap());
        assert_eq!(crate::decode::<OnlyTags>(&bytes).unwrap(), OnlyTags::default());

        // Without omitempty, a zero scalar is still written
        let bytes = crate::encode(&Tagged::default()).unwrap();
        assert_eq!(bytes, vec![0x12, 5, b'c', b'o', b'u', b'n', b't', 0x06, 0, 0, 0, 0, 0x00]);
    }

    #[test]
    fn test_typed_roundtrip() {
        let codec = Codec::new();
        let value = widget();
        let bytes = codec.encode(&value).unwrap();
        let decoded: Widget = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, value);
        // Widget, Tagged
        assert_eq!(codec.registry().len(), 2);
    }

    #[test]
    fn test_excluded_field_not_on_wire() {
        let mut value = widget();
        value.cache = vec![1, 2, 3];
        let bytes = crate::encode(&value).unwrap();
        let decoded: Widget = crate::decode(&bytes).unwrap();
        assert!(decoded.cache.is_empty());
        let dynamic: Value = crate::decode(&bytes).unwrap();
        assert!(dynamic.get("cache").is_none());
    }

    #[test]
    fn test_dynamic_parity() {
        let codec = Codec::new();
        let value = widget();
        let bytes = codec.encode(&value).unwrap();

        let dynamic: Value = codec.decode(&bytes).unwrap();
        assert_eq!(dynamic.get("color"), Some(&Value::String("blue".into())));
        assert_eq!(dynamic.get("paint"), Some(&Value::U32(0x0003_0201)));
        assert!(dynamic.get("level").is_some());
        assert!(dynamic.get("expires").is_some());

        let reencoded = codec.encode(&dynamic).unwrap();
        let back: Widget = codec.decode(&reencoded).unwrap();
        assert_eq!(back, value);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_dynamic_json_view() {
        let bytes = crate::encode(&widget()).unwrap();
        let dynamic: Value = crate::decode(&bytes).unwrap();
        let json = serde_json::to_value(&dynamic).unwrap();
        assert_eq!(json["name"], serde_json::json!("gear"));
        assert_eq!(json["color"], serde_json::json!("blue"));
        assert_eq!(json["made"], serde_json::json!("2024-03-15T14:30:00Z"));
        assert_eq!(json["parts"][0], serde_json::json!({"count": 2, "tags": ["x"]}));
        assert_eq!(json["parts"][1], serde_json::json!({"count": 0}));
        assert_eq!(json["labels"], serde_json::json!({"env": "prod"}));
    }

    #[test]
    fn test_top_level_empty_object_dynamic() {
        let value: Value = crate::decode(&[0x12, 0x00]).unwrap();
        assert_eq!(value.as_object().map(BTreeMap::len), Some(0));
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let mut more = HashMap::new();
        more.insert("k".to_string(), vec![1i64, -1]);
        let newer = EventV2 {
            name: "launch".into(),
            extra: widget(),
            more,
            after: 5,
        };
        let bytes = crate::encode(&newer).unwrap();
        let older: EventV1 = crate::decode(&bytes).unwrap();
        assert_eq!(older.name, "launch");
    }

    #[test]
    fn test_enum_written_by_name() {
        let bytes = crate::encode(&Color::Blue).unwrap();
        assert_eq!(bytes, vec![0x0E, 4, b'b', b'l', b'u', b'e']);

        let unknown = [0x0E, 6, b'p', b'u', b'r', b'p', b'l', b'e'];
        let err = crate::decode::<Color>(&unknown).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EnumConversion);
        assert!(matches!(
            err,
            DecodeError::EnumConversion(EnumError::UnknownName { ref value, .. }) if value == "purple"
        ));
    }

    #[test]
    fn test_unnamed_enum_value_aborts_encode() {
        let mut value = widget();
        value.level = Level(7);
        let err = crate::encode(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EnumConversion);
        assert_eq!(err.field_path(), vec!["level"]);
    }

    #[test]
    fn test_absent_option_requires_omitempty() {
        let event = Event {
            name: "tick".into(),
            time: None,
        };
        let err = crate::encode(&event).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(err.field_path(), vec!["time"]);

        let nested = Wrapper { inner: event };
        let err = crate::encode(&nested).unwrap_err();
        assert_eq!(err.field_path(), vec!["inner", "time"]);

        let mut value = widget();
        value.expires = None;
        let bytes = crate::encode(&value).unwrap();
        let decoded: Widget = crate::decode(&bytes).unwrap();
        assert_eq!(decoded.expires, None);
    }

    #[test]
    fn test_field_type_mismatch_names_field() {
        // {"name": 1u8}
        let bytes = [0x12, 4, b'n', b'a', b'm', b'e', 0x03, 1, 0x00];
        let err = crate::decode::<EventV1>(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert_eq!(err.field_path(), vec!["name"]);
    }

    #[test]
    fn test_marshal_inside_containers() {
        let palette = vec![Rgb { r: 1, g: 2, b: 3 }, Rgb { r: 4, g: 5, b: 6 }];
        let bytes = crate::encode(&palette).unwrap();
        assert_eq!(bytes, vec![0x10, 0x07, 1, 2, 3, 0, 0x07, 4, 5, 6, 0, 0x11]);
        assert_eq!(crate::decode::<Vec<Rgb>>(&bytes).unwrap(), palette);

        let err = crate::decode::<Rgb>(&[0x03, 1]).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedTag { expected: "rgb", .. }));
    }

    #[derive(Default)]
    struct LongName {
        v: u8,
    }

    impl Record for LongName {
        fn declare(fields: &mut FieldSet<Self>) {
            let name: &'static str = Box::leak("n".repeat(256).into_boxed_str());
            fields.field("v", name, |r| &r.v, |r| &mut r.v);
        }
    }

    record_codec!(LongName);

    #[derive(Default)]
    struct MaxName {
        v: u8,
    }

    impl Record for MaxName {
        fn declare(fields: &mut FieldSet<Self>) {
            let name: &'static str = Box::leak("n".repeat(255).into_boxed_str());
            fields.field("v", name, |r| &r.v, |r| &mut r.v);
        }
    }

    record_codec!(MaxName);

    #[test]
    fn test_field_name_boundary() {
        let bytes = crate::encode(&MaxName { v: 1 }).unwrap();
        assert_eq!(bytes.len(), 1 + 1 + 255 + 2 + 1);
        assert_eq!(crate::decode::<MaxName>(&bytes).unwrap().v, 1);

        let err = crate::encode(&LongName { v: 1 }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NameTooLong);
    }

    #[test]
    fn test_enum_name_boundary() {
        struct Wide(usize);

        impl Enum for Wide {
            fn to_name(&self) -> Result<&str, EnumError> {
                Ok(Box::leak("e".repeat(self.0).into_boxed_str()))
            }

            fn from_name(name: &str) -> Result<Self, EnumError> {
                Ok(Wide(name.len()))
            }
        }

        enum_codec!(Wide);

        assert!(crate::encode(&Wide(255)).is_ok());
        let err = crate::encode(&Wide(256)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NameTooLong);
    }

    #[test]
    fn test_record_is_zero() {
        use crate::Encode;
        assert!(Tagged::default().is_zero());
        assert!(!widget().is_zero());
    }

    record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Untyped {
            any_field: Value => "any_field",
            any_array: Vec<Value> => "any_array",
            any_map: BTreeMap<String, Value> => "any_map",
        }
    }

    #[test]
    fn test_untyped_fields_roundtrip() {
        let value = Untyped {
            any_field: Value::from("some text"),
            any_array: vec![Value::from("abc"), Value::I64(123), Value::F64(3.25)],
            any_map: BTreeMap::from([
                ("a".to_string(), Value::from("abc")),
                ("b".to_string(), Value::I64(123)),
                ("c".to_string(), Value::F64(3.25)),
            ]),
        };
        let bytes = crate::encode(&value).unwrap();
        assert_eq!(crate::decode::<Untyped>(&bytes).unwrap(), value);

        let dynamic: Value = crate::decode(&bytes).unwrap();
        assert_eq!(dynamic.get("any_field"), Some(&Value::from("some text")));
        assert_eq!(
            dynamic.get("any_map").and_then(|m| m.get("b")),
            Some(&Value::I64(123))
        );

        // An empty untyped field is elided and reads back as the default
        let empty = Untyped::default();
        let bytes = crate::encode(&empty).unwrap();
        assert_eq!(bytes, vec![0x12, 0x00]);
        assert_eq!(crate::decode::<Untyped>(&bytes).unwrap(), empty);
    }

    /// Generic trees that survive the wire unchanged: no empty arrays (they
    /// are elided), no empty keys and no NaN.
    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i8>().prop_map(Value::I8),
            any::<u8>().prop_map(Value::U8),
            any::<i16>().prop_map(Value::I16),
            any::<u16>().prop_map(Value::U16),
            any::<i32>().prop_map(Value::I32),
            any::<u32>().prop_map(Value::U32),
            any::<i64>().prop_map(Value::I64),
            any::<u64>().prop_map(Value::U64),
            (-1.0e6f32..1.0e6).prop_map(Value::F32),
            (-1.0e12f64..1.0e12).prop_map(Value::F64),
            ".{0,12}".prop_map(Value::String),
            any::<i64>().prop_map(|s| Value::Timestamp(Timestamp::from_unix_seconds(s))),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 1..6).prop_map(Value::Array),
                proptest::collection::btree_map("[a-z]{1,8}", inner, 0..6).prop_map(Value::Object),
            ]
        })
    }

    fn arb_tagged() -> impl Strategy<Value = Tagged> {
        (any::<i32>(), proptest::collection::vec(".{0,6}", 0..4))
            .prop_map(|(count, tags)| Tagged { count, tags })
    }

    fn arb_widget() -> impl Strategy<Value = Widget> {
        let color = prop_oneof![Just(Color::Red), Just(Color::Green), Just(Color::Blue)];
        let rgb = any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Rgb { r, g, b });
        (
            ".{0,16}",
            color,
            0u8..2,
            rgb.clone(),
            proptest::collection::vec(rgb, 0..4),
            any::<i64>(),
            proptest::option::of(any::<i64>()),
            proptest::collection::vec(arb_tagged(), 0..4),
            proptest::collection::btree_map("[a-z]{1,8}", ".{0,8}", 0..4),
        )
            .prop_map(
                |(name, color, level, paint, palette, made, expires, parts, labels)| Widget {
                    name,
                    color,
                    level: Level(level),
                    paint,
                    palette,
                    made: Timestamp::from_unix_seconds(made),
                    expires: expires.map(Timestamp::from_unix_seconds),
                    parts,
                    labels,
                    cache: vec![],
                },
            )
    }

    proptest! {
        #[test]
        fn prop_typed_roundtrip(value in arb_widget()) {
            let codec = Codec::new();
            let bytes = codec.encode(&value).unwrap();
            let decoded: Widget = codec.decode(&bytes).unwrap();
            prop_assert_eq!(decoded, value);
        }

        #[test]
        fn prop_dynamic_parity(value in arb_widget()) {
            let codec = Codec::new();
            let bytes = codec.encode(&value).unwrap();
            let dynamic: Value = codec.decode(&bytes).unwrap();
            let reencoded = codec.encode(&dynamic).unwrap();
            let back: Widget = codec.decode(&reencoded).unwrap();
            prop_assert_eq!(back, value);
        }

        #[test]
        fn prop_value_roundtrip(value in arb_value()) {
            let bytes = crate::encode(&value).unwrap();
            let decoded: Value = crate::decode(&bytes).unwrap();
            prop_assert_eq!(decoded, value);
        }

        #[test]
        fn prop_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = crate::decode::<Value>(&bytes);
            let _ = crate::decode::<Widget>(&bytes);
        }
    }
}
