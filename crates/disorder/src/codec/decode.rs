//! Typed decoding.
//!
//! Every [`Decode`] implementation reads its own leading tag. Containers
//! peek one byte per iteration to find their end marker, which is why
//! `EndObject` (`0x00`) can never be the length byte of a key.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use tracing::trace;

use crate::codec::{MapKey, Source, Tag};
use crate::error::DecodeError;
use crate::limits::DecodeLimits;
use crate::model::{Enum, Marshal, Record, Timestamp};
use crate::registry::TypeRegistry;

/// Reads values from a [`Source`], resolving record metadata through a
/// [`TypeRegistry`] and enforcing [`DecodeLimits`].
pub struct Decoder<'a> {
    source: &'a mut dyn Source,
    registry: &'a TypeRegistry,
    limits: DecodeLimits,
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(source: &'a mut dyn Source, registry: &'a TypeRegistry, limits: DecodeLimits) -> Self {
        Self {
            source,
            registry,
            limits,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Direct access to the input, for hand-written decodings.
    pub fn source(&mut self) -> &mut dyn Source {
        &mut *self.source
    }

    // -------------------------------------------------------------------------
    // Tags
    // -------------------------------------------------------------------------

    /// Reads any tag, terminators included.
    pub fn read_tag(&mut self) -> Result<Tag, DecodeError> {
        let byte = self.source.read_byte("tag")?;
        Tag::try_from(byte)
    }

    /// Reads the tag that starts a value. Container terminators are rejected.
    pub fn read_value_tag(&mut self) -> Result<Tag, DecodeError> {
        let tag = self.read_tag()?;
        if tag.is_terminator() {
            return Err(DecodeError::UnexpectedTag {
                expected: "value",
                found: tag,
            });
        }
        Ok(tag)
    }

    /// Consumes `end` if it is the next byte. Running out of input inside a
    /// container is an error.
    fn at_end(&mut self, end: Tag) -> Result<bool, DecodeError> {
        match self.source.peek_byte()? {
            None => Err(DecodeError::UnexpectedEof {
                context: match end {
                    Tag::EndArray => "array",
                    _ => "object",
                },
            }),
            Some(byte) if byte == end.as_u8() => {
                self.source.read_byte("container end")?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    fn mismatch<T>(&self, target: &'static str, found: Tag) -> Result<T, DecodeError> {
        Err(DecodeError::TypeMismatch { target, found })
    }

    // -------------------------------------------------------------------------
    // Payloads (the tag has already been read)
    // -------------------------------------------------------------------------

    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        self.source.read_exact(&mut buf, context)?;
        Ok(buf)
    }

    pub fn read_bool_payload(&mut self) -> Result<bool, DecodeError> {
        match self.source.read_byte("bool")? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(DecodeError::InvalidBool { value }),
        }
    }

    /// Reads the payload of an integer `tag`, widened to i128.
    pub fn read_integer_payload(&mut self, tag: Tag) -> Result<i128, DecodeError> {
        let value = match tag {
            Tag::I8 => self.source.read_byte("i8")? as i8 as i128,
            Tag::U8 => self.source.read_byte("u8")? as i128,
            Tag::I16 => i16::from_le_bytes(self.read_array("i16")?) as i128,
            Tag::U16 => u16::from_le_bytes(self.read_array("u16")?) as i128,
            Tag::I32 => i32::from_le_bytes(self.read_array("i32")?) as i128,
            Tag::U32 => u32::from_le_bytes(self.read_array("u32")?) as i128,
            Tag::I64 => i64::from_le_bytes(self.read_array("i64")?) as i128,
            Tag::U64 => u64::from_le_bytes(self.read_array("u64")?) as i128,
            other => return self.mismatch("integer", other),
        };
        Ok(value)
    }

    /// Reads an integer payload into a target whose range is `min..=max`.
    ///
    /// Only tags whose whole range fits the target are accepted, so a wider
    /// wire integer fails even if this particular value would fit.
    pub fn read_integer(
        &mut self,
        tag: Tag,
        target: &'static str,
        min: i128,
        max: i128,
    ) -> Result<i128, DecodeError> {
        match integer_range(tag) {
            Some((lo, hi)) if lo >= min && hi <= max => self.read_integer_payload(tag),
            _ => self.mismatch(target, tag),
        }
    }

    pub fn read_f32_payload(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_le_bytes(self.read_array("f32")?))
    }

    pub fn read_f64_payload(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.read_array("f64")?))
    }

    pub fn read_timestamp_payload(&mut self) -> Result<Timestamp, DecodeError> {
        let seconds = i64::from_le_bytes(self.read_array("timestamp")?);
        Ok(Timestamp::from_unix_seconds(seconds))
    }

    /// Reads a string payload: 4-byte length then UTF-8.
    pub fn read_string_payload(&mut self) -> Result<String, DecodeError> {
        let len = u32::from_le_bytes(self.read_array("string length")?) as usize;
        if len > self.limits.max_string_len {
            return Err(DecodeError::LengthExceedsLimit {
                field: "string",
                len,
                max: self.limits.max_string_len,
            });
        }
        let bytes = self.source.read_vec(len, "string")?;
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { context: "string" })
    }

    /// Reads a Name: 1-byte length then UTF-8.
    pub fn read_name(&mut self) -> Result<String, DecodeError> {
        let len = self.source.read_byte("name length")? as usize;
        let bytes = self.source.read_vec(len, "name")?;
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { context: "name" })
    }

    // -------------------------------------------------------------------------
    // Typed reads (tag included)
    // -------------------------------------------------------------------------

    /// Reads an enum value by canonical name.
    ///
    /// A plain string is accepted too, which is how an enum comes back after
    /// a trip through [`Value`](crate::Value).
    pub fn read_enum<E: Enum>(&mut self) -> Result<E, DecodeError> {
        let name = match self.read_value_tag()? {
            Tag::Enum => self.read_name()?,
            Tag::String => self.read_string_payload()?,
            other => return self.mismatch(std::any::type_name::<E>(), other),
        };
        Ok(E::from_name(&name)?)
    }

    /// Hands the input to a self-marshaling type.
    pub fn read_marshal<M: Marshal>(&mut self) -> Result<M, DecodeError> {
        M::read_self(&mut *self.source)
    }

    /// Reads the body of an array whose `start-array` tag was consumed,
    /// calling `item` once per element.
    pub fn read_array_items<F>(&mut self, mut item: F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self) -> Result<(), DecodeError>,
    {
        self.enter()?;
        let mut count = 0usize;
        while !self.at_end(Tag::EndArray)? {
            count += 1;
            if count > self.limits.max_elements {
                return Err(DecodeError::LengthExceedsLimit {
                    field: "array",
                    len: count,
                    max: self.limits.max_elements,
                });
            }
            item(self)?;
        }
        self.leave();
        Ok(())
    }

    /// Reads the body of an object whose `start-object` tag was consumed,
    /// calling `entry` with each key. `entry` must consume the value.
    pub fn read_object_entries<F>(&mut self, mut entry: F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self, String) -> Result<(), DecodeError>,
    {
        self.enter()?;
        let mut count = 0usize;
        while !self.at_end(Tag::EndObject)? {
            count += 1;
            if count > self.limits.max_elements {
                return Err(DecodeError::LengthExceedsLimit {
                    field: "object",
                    len: count,
                    max: self.limits.max_elements,
                });
            }
            let key = self.read_name()?;
            entry(self, key)?;
        }
        self.leave();
        Ok(())
    }

    /// Reads a sequence into a vector.
    pub fn read_seq<T: Decode>(&mut self) -> Result<Vec<T>, DecodeError> {
        match self.read_value_tag()? {
            Tag::StartArray => {
                let mut items = Vec::new();
                self.read_array_items(|d| {
                    items.push(T::decode(d)?);
                    Ok(())
                })?;
                Ok(items)
            }
            other => self.mismatch("sequence", other),
        }
    }

    /// Reads a string-keyed object, handing each entry to `insert`.
    pub fn read_map<K, V, F>(&mut self, mut insert: F) -> Result<(), DecodeError>
    where
        K: MapKey,
        V: Decode,
        F: FnMut(K, V),
    {
        match self.read_value_tag()? {
            Tag::StartObject => self.read_object_entries(|d, key| {
                let key = K::from_key(key)?;
                let value = V::decode(d)?;
                insert(key, value);
                Ok(())
            }),
            other => self.mismatch("map", other),
        }
    }

    /// Reads an object into a fresh `R`, matching keys to wire names.
    ///
    /// Keys with no matching field are decoded and discarded.
    pub fn read_record<R: Record>(&mut self) -> Result<R, DecodeError> {
        let tag = self.read_value_tag()?;
        if tag != Tag::StartObject {
            return self.mismatch(std::any::type_name::<R>(), tag);
        }
        let info = self.registry.describe::<R>()?;
        let mut record = R::default();
        self.read_object_entries(|d, key| match info.field(&key) {
            Some(field) => field
                .decode(&mut record, d)
                .map_err(|e| e.in_field(field.name())),
            None => {
                trace!(type_name = info.type_name(), field = %key, "skipping unknown field");
                d.skip_value()
            }
        })?;
        Ok(record)
    }

    /// Parses and discards one value.
    pub fn skip_value(&mut self) -> Result<(), DecodeError> {
        let tag = self.read_value_tag()?;
        if let Some(width) = tag.fixed_width() {
            return self.source.skip(width, "value");
        }
        match tag {
            Tag::String => {
                let len = u32::from_le_bytes(self.read_array("string length")?) as usize;
                self.source.skip(len, "string")
            }
            Tag::Enum => {
                let len = self.source.read_byte("name length")? as usize;
                self.source.skip(len, "name")
            }
            Tag::StartArray => self.read_array_items(|d| d.skip_value()),
            Tag::StartObject => self.read_object_entries(|d, _| d.skip_value()),
            other => Err(DecodeError::UnexpectedTag {
                expected: "value",
                found: other,
            }),
        }
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        if self.depth >= self.limits.max_depth {
            return Err(DecodeError::DepthExceeded {
                max: self.limits.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Inclusive value range of an integer tag.
fn integer_range(tag: Tag) -> Option<(i128, i128)> {
    let range = match tag {
        Tag::I8 => (i8::MIN as i128, i8::MAX as i128),
        Tag::U8 => (0, u8::MAX as i128),
        Tag::I16 => (i16::MIN as i128, i16::MAX as i128),
        Tag::U16 => (0, u16::MAX as i128),
        Tag::I32 => (i32::MIN as i128, i32::MAX as i128),
        Tag::U32 => (0, u32::MAX as i128),
        Tag::I64 => (i64::MIN as i128, i64::MAX as i128),
        Tag::U64 => (0, u64::MAX as i128),
        _ => return None,
    };
    Some(range)
}

/// A type that can be rebuilt from its wire encoding.
pub trait Decode: Sized {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError>;

    /// The value a top-level encoding of zero bytes stands for.
    ///
    /// Empty sequences and maps encode to nothing, so decoding an empty
    /// input yields them; every other type has no such value.
    fn absent() -> Option<Self> {
        None
    }
}

macro_rules! impl_decode_int {
    ($($ty:ty => $min:expr, $max:expr);* $(;)?) => {
        $(
            impl Decode for $ty {
                fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
                    let tag = decoder.read_value_tag()?;
                    let value = decoder.read_integer(tag, stringify!($ty), $min as i128, $max as i128)?;
                    <$ty>::try_from(value).map_err(|_| DecodeError::TypeMismatch {
                        target: stringify!($ty),
                        found: tag,
                    })
                }
            }
        )*
    };
}

impl_decode_int! {
    i8 => i8::MIN, i8::MAX;
    u8 => u8::MIN, u8::MAX;
    i16 => i16::MIN, i16::MAX;
    u16 => u16::MIN, u16::MAX;
    i32 => i32::MIN, i32::MAX;
    u32 => u32::MIN, u32::MAX;
    i64 => i64::MIN, i64::MAX;
    u64 => u64::MIN, u64::MAX;
    // Platform integers travel with the 32-bit tags
    isize => i32::MIN, i32::MAX;
    usize => u32::MIN, u32::MAX;
}

impl Decode for bool {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.read_value_tag()? {
            Tag::Bool => decoder.read_bool_payload(),
            other => decoder.mismatch("bool", other),
        }
    }
}

impl Decode for f32 {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.read_value_tag()? {
            Tag::F32 => decoder.read_f32_payload(),
            other => decoder.mismatch("f32", other),
        }
    }
}

impl Decode for f64 {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.read_value_tag()? {
            Tag::F32 => Ok(decoder.read_f32_payload()? as f64),
            Tag::F64 => decoder.read_f64_payload(),
            other => decoder.mismatch("f64", other),
        }
    }
}

impl Decode for String {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.read_value_tag()? {
            Tag::String => decoder.read_string_payload(),
            // Same reading as the dynamic decode of an enum
            Tag::Enum => decoder.read_name(),
            other => decoder.mismatch("string", other),
        }
    }
}

impl Decode for Timestamp {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.read_value_tag()? {
            Tag::Timestamp => decoder.read_timestamp_payload(),
            other => decoder.mismatch("timestamp", other),
        }
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        T::decode(decoder).map(Box::new)
    }

    fn absent() -> Option<Self> {
        T::absent().map(Box::new)
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        T::decode(decoder).map(Some)
    }

    fn absent() -> Option<Self> {
        T::absent().map(Some)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        decoder.read_seq()
    }

    fn absent() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Decode,
    S: BuildHasher + Default,
{
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let mut map = HashMap::with_hasher(S::default());
        decoder.read_map(|k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }

    fn absent() -> Option<Self> {
        Some(HashMap::with_hasher(S::default()))
    }
}

impl<K: MapKey + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let mut map = BTreeMap::new();
        decoder.read_map(|k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }

    fn absent() -> Option<Self> {
        Some(BTreeMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Reader;
    use crate::error::ErrorKind;

    fn decode_with<T: Decode>(bytes: &[u8], limits: DecodeLimits) -> Result<T, DecodeError> {
        let registry = TypeRegistry::new();
        let mut reader = Reader::new(bytes);
        let mut decoder = Decoder::new(&mut reader, &registry, limits);
        T::decode(&mut decoder)
    }

    fn decode_default<T: Decode>(bytes: &[u8]) -> Result<T, DecodeError> {
        decode_with(bytes, DecodeLimits::default())
    }

    #[test]
    fn test_integer_widening() {
        let i32_bytes = [0x06, 0xfe, 0xff, 0xff, 0xff];
        assert_eq!(decode_default::<i64>(&i32_bytes).unwrap(), -2);
        assert_eq!(decode_default::<i32>(&i32_bytes).unwrap(), -2);
        assert_eq!(decode_default::<isize>(&i32_bytes).unwrap(), -2);

        let u8_bytes = [0x03, 200];
        assert_eq!(decode_default::<i16>(&u8_bytes).unwrap(), 200);
        assert_eq!(decode_default::<u64>(&u8_bytes).unwrap(), 200);

        let i64_bytes = [0x08, 1, 0, 0, 0, 0, 0, 0, 0];
        let err = decode_default::<i32>(&i64_bytes).unwrap_err();
        assert_eq!(err, DecodeError::TypeMismatch { target: "i32", found: Tag::I64 });
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);

        // Signed into unsigned never widens
        assert!(decode_default::<u64>(&[0x02, 1]).is_err());
        assert!(decode_default::<i32>(&[0x0C, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_float_widening() {
        let mut bytes = vec![0x0A];
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        assert_eq!(decode_default::<f64>(&bytes).unwrap(), 1.5);

        let mut bytes = vec![0x0B];
        bytes.extend_from_slice(&1.5f64.to_le_bytes());
        assert!(matches!(
            decode_default::<f32>(&bytes),
            Err(DecodeError::TypeMismatch { target: "f32", .. })
        ));
    }

    #[test]
    fn test_bool_payload() {
        assert!(decode_default::<bool>(&[0x01, 1]).unwrap());
        assert_eq!(
            decode_default::<bool>(&[0x01, 2]).unwrap_err(),
            DecodeError::InvalidBool { value: 2 }
        );
    }

    fn skip_all(bytes: &[u8]) -> Result<(), DecodeError> {
        let registry = TypeRegistry::new();
        let mut reader = Reader::new(bytes);
        let mut decoder = Decoder::new(&mut reader, &registry, DecodeLimits::default());
        decoder.skip_value()
    }

    #[test]
    fn test_malformed_input() {
        let cases: &[&[u8]] = &[
            &[0x06, 1, 2],
            &[0x42],
            &[0x11],
            &[0x00],
            &[0x10, 0x03, 1],
            &[0x12, 1, b'a'],
            &[0x0C, 5, 0, 0, 0, b'a'],
        ];
        for bytes in cases {
            let err = skip_all(bytes).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedStream, "{bytes:?}: {err}");
        }
        assert!(matches!(
            decode_default::<u8>(&[0x42]),
            Err(DecodeError::UnknownTag { byte: 0x42 })
        ));
        assert!(matches!(
            decode_default::<Vec<u8>>(&[0x10, 0x03, 1]),
            Err(DecodeError::UnexpectedEof { context: "array" })
        ));
        assert_eq!(
            decode_default::<String>(&[0x0C, 1, 0, 0, 0, 0xff]).unwrap_err(),
            DecodeError::InvalidUtf8 { context: "string" }
        );
    }

    #[test]
    fn test_string_limit() {
        let bytes = [0x0C, 4, 0, 0, 0, b'a', b'b', b'c', b'd'];
        let limits = DecodeLimits::default().with_max_string_len(3);
        let err = decode_with::<String>(&bytes, limits).unwrap_err();
        assert!(matches!(err, DecodeError::LengthExceedsLimit { len: 4, max: 3, .. }));
        assert_eq!(err.kind(), ErrorKind::MalformedStream);
        assert_eq!(decode_default::<String>(&bytes).unwrap(), "abcd");
    }

    #[test]
    fn test_depth_limit() {
        // [[[1]]]
        let bytes = [0x10, 0x10, 0x10, 0x03, 1, 0x11, 0x11, 0x11];
        let limits = DecodeLimits::default().with_max_depth(2);
        let err = decode_with::<Vec<Vec<Vec<u8>>>>(&bytes, limits).unwrap_err();
        assert_eq!(err, DecodeError::DepthExceeded { max: 2 });
        let ok = decode_with::<Vec<Vec<Vec<u8>>>>(&bytes, limits.with_max_depth(3)).unwrap();
        assert_eq!(ok, vec![vec![vec![1]]]);
    }

    #[test]
    fn test_element_limit() {
        let bytes = [0x10, 0x03, 1, 0x03, 2, 0x03, 3, 0x11];
        let limits = DecodeLimits::default().with_max_elements(2);
        assert!(matches!(
            decode_with::<Vec<u8>>(&bytes, limits),
            Err(DecodeError::LengthExceedsLimit { field: "array", .. })
        ));
        assert_eq!(decode_default::<Vec<u8>>(&bytes).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_map_decode() {
        let bytes = [0x12, 1, b'k', 0x03, 1, 1, b'z', 0x03, 2, 0x00];
        let map: BTreeMap<String, u8> = decode_default(&bytes).unwrap();
        assert_eq!(map.get("k"), Some(&1));
        assert_eq!(map.get("z"), Some(&2));

        let map: HashMap<String, u32> = decode_default(&bytes).unwrap();
        assert_eq!(map.len(), 2);

        let err = decode_default::<BTreeMap<u8, u8>>(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonStringKey);
    }

    #[test]
    fn test_enum_tag_reads_as_string() {
        let bytes = [0x0E, 3, b'r', b'e', b'd'];
        assert_eq!(decode_default::<String>(&bytes).unwrap(), "red");
    }

    #[test]
    fn test_skip_value() {
        // {"a": [1, "xy"], "b": {"c": true}} followed by a u8
        let bytes = [
            0x12, 1, b'a', 0x10, 0x03, 1, 0x0C, 2, 0, 0, 0, b'x', b'y', 0x11, 1, b'b', 0x12, 1,
            b'c', 0x01, 1, 0x00, 0x00, 0x03, 9,
        ];
        let registry = TypeRegistry::new();
        let mut reader = Reader::new(&bytes);
        let mut decoder = Decoder::new(&mut reader, &registry, DecodeLimits::default());
        decoder.skip_value().unwrap();
        assert_eq!(u8::decode(&mut decoder).unwrap(), 9);
    }

    #[test]
    fn test_absent_values() {
        assert_eq!(Vec::<u8>::absent(), Some(vec![]));
        assert_eq!(Option::<Vec<u8>>::absent(), Some(Some(vec![])));
        assert_eq!(u8::absent(), None);
        assert_eq!(String::absent(), None);
    }
}
