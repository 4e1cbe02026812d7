//! Typed encoding.
//!
//! [`Encode`] is implemented for every type the format can carry; dispatch
//! happens at compile time, so a value with no encoding rule is rejected by
//! the type checker rather than at run time.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

use crate::codec::{Tag, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Enum, Marshal, Record, Timestamp};
use crate::registry::TypeRegistry;

/// Writes values into a [`Writer`], resolving record metadata through a
/// [`TypeRegistry`].
pub struct Encoder<'a> {
    writer: &'a mut Writer,
    registry: &'a TypeRegistry,
}

impl<'a> Encoder<'a> {
    pub fn new(writer: &'a mut Writer, registry: &'a TypeRegistry) -> Self {
        Self { writer, registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    /// Direct access to the output, for hand-written encodings.
    pub fn writer_mut(&mut self) -> &mut Writer {
        &mut *self.writer
    }

    pub fn write_bool(&mut self, value: bool) {
        self.writer.write_tag(Tag::Bool);
        self.writer.write_byte(value as u8);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.writer.write_tag(Tag::I8);
        self.writer.write_byte(value as u8);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.writer.write_tag(Tag::U8);
        self.writer.write_byte(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.writer.write_tag(Tag::I16);
        self.writer.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.writer.write_tag(Tag::U16);
        self.writer.write_u16(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.writer.write_tag(Tag::I32);
        self.writer.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.writer.write_tag(Tag::U32);
        self.writer.write_u32(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.writer.write_tag(Tag::I64);
        self.writer.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.writer.write_tag(Tag::U64);
        self.writer.write_u64(value);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.writer.write_tag(Tag::F32);
        self.writer.write_bytes(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.writer.write_tag(Tag::F64);
        self.writer.write_bytes(&value.to_le_bytes());
    }

    pub fn write_str(&mut self, value: &str) -> Result<(), EncodeError> {
        self.writer.write_tag(Tag::String);
        self.writer.write_string(value)
    }

    pub fn write_timestamp(&mut self, value: Timestamp) {
        self.writer.write_tag(Tag::Timestamp);
        self.writer.write_bytes(&value.unix_seconds().to_le_bytes());
    }

    /// Writes the canonical name of an enum value.
    pub fn write_enum<E: Enum>(&mut self, value: &E) -> Result<(), EncodeError> {
        let name = value.to_name()?;
        self.writer.write_tag(Tag::Enum);
        self.writer.write_name(name)
    }

    /// Hands the output to a self-marshaling value.
    pub fn write_marshal<M: Marshal>(&mut self, value: &M) -> Result<(), EncodeError> {
        value.write_self(&mut *self.writer)
    }

    /// Writes a sequence. Empty sequences write nothing, and so do elided
    /// elements.
    pub fn write_seq<T: Encode>(&mut self, items: &[T]) -> Result<(), EncodeError> {
        if items.is_empty() {
            return Ok(());
        }
        self.writer.write_tag(Tag::StartArray);
        for item in items {
            if item.is_elided() {
                continue;
            }
            item.encode(self)?;
        }
        self.writer.write_tag(Tag::EndArray);
        Ok(())
    }

    /// Writes a string-keyed mapping. Empty mappings write nothing.
    pub fn write_map<'m, K, V, I>(&mut self, entries: I) -> Result<(), EncodeError>
    where
        K: MapKey + 'm,
        V: Encode + 'm,
        I: IntoIterator<Item = (&'m K, &'m V)>,
    {
        let mut entries = entries.into_iter().peekable();
        if entries.peek().is_none() {
            return Ok(());
        }
        self.write_object(entries)
    }

    /// Writes `start-object`, the entries, then `end-object`, even when there
    /// are no entries. Entries whose value is elided are skipped.
    pub fn write_object<'m, K, V, I>(&mut self, entries: I) -> Result<(), EncodeError>
    where
        K: MapKey + 'm,
        V: Encode + 'm,
        I: IntoIterator<Item = (&'m K, &'m V)>,
    {
        self.writer.write_tag(Tag::StartObject);
        for (key, value) in entries {
            if value.is_elided() {
                continue;
            }
            self.writer.write_key(key.to_key()?)?;
            value.encode(self)?;
        }
        self.writer.write_tag(Tag::EndObject);
        Ok(())
    }

    /// Writes a record's fields in declaration order.
    ///
    /// Fields that are elided, or zero and marked omitempty, are skipped.
    /// The object delimiters are always written.
    pub fn write_record<R: Record>(&mut self, record: &R) -> Result<(), EncodeError> {
        let info = self.registry.describe::<R>()?;
        self.writer.write_tag(Tag::StartObject);
        for field in info.fields() {
            if field.should_skip(record) {
                continue;
            }
            self.writer.write_name(field.name()).map_err(|e| e.in_field(field.name()))?;
            field.encode(record, self).map_err(|e| e.in_field(field.name()))?;
        }
        self.writer.write_tag(Tag::EndObject);
        Ok(())
    }
}

/// A type with a wire encoding.
pub trait Encode {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError>;

    /// Zero value test used by omitempty fields.
    fn is_zero(&self) -> bool {
        false
    }

    /// True when the value encodes to zero bytes (empty sequences and maps).
    fn is_elided(&self) -> bool {
        false
    }
}

macro_rules! impl_encode_int {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
                    encoder.$method(*self);
                    Ok(())
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_encode_int! {
    i8 => write_i8,
    u8 => write_u8,
    i16 => write_i16,
    u16 => write_u16,
    i32 => write_i32,
    u32 => write_u32,
    i64 => write_i64,
    u64 => write_u64,
}

// The platform integers share the 32-bit tags.
impl Encode for isize {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        let value = i32::try_from(*self).map_err(|_| EncodeError::IntegerOverflow {
            value: *self as i128,
            target: "i32",
        })?;
        encoder.write_i32(value);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl Encode for usize {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        let value = u32::try_from(*self).map_err(|_| EncodeError::IntegerOverflow {
            value: *self as i128,
            target: "u32",
        })?;
        encoder.write_u32(value);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl Encode for bool {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_bool(*self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Encode for f32 {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_f32(*self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Encode for f64 {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_f64(*self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Encode for str {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_str(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Encode for String {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_str(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Encode for Timestamp {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_timestamp(*self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self == Timestamp::UNIX_EPOCH
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        (**self).encode(encoder)
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn is_elided(&self) -> bool {
        (**self).is_elided()
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        (**self).encode(encoder)
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn is_elided(&self) -> bool {
        (**self).is_elided()
    }
}

/// `None` has no encoding. A record field holding `None` must be marked
/// omitempty, which skips it.
impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        match self {
            Some(value) => value.encode(encoder),
            None => Err(EncodeError::InvalidValue { context: "option" }),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn is_elided(&self) -> bool {
        self.as_ref().is_some_and(|value| value.is_elided())
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_seq(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn is_elided(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_seq(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn is_elided(&self) -> bool {
        self.is_empty()
    }
}

impl<K: MapKey, V: Encode, S: BuildHasher> Encode for HashMap<K, V, S> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_map(self.iter())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn is_elided(&self) -> bool {
        self.is_empty()
    }
}

impl<K: MapKey, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_map(self.iter())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn is_elided(&self) -> bool {
        self.is_empty()
    }
}

/// Key type of an encodable mapping.
///
/// Only textual keys have a wire form. Integer, `bool` and `char` keys are
/// accepted by the type checker so that such maps can be declared, but fail
/// at run time with `NonStringKey`.
pub trait MapKey: Sized {
    fn to_key(&self) -> Result<&str, EncodeError>;

    fn from_key(key: String) -> Result<Self, DecodeError>;
}

impl MapKey for String {
    fn to_key(&self) -> Result<&str, EncodeError> {
        Ok(self)
    }

    fn from_key(key: String) -> Result<Self, DecodeError> {
        Ok(key)
    }
}

impl MapKey for Box<str> {
    fn to_key(&self) -> Result<&str, EncodeError> {
        Ok(self)
    }

    fn from_key(key: String) -> Result<Self, DecodeError> {
        Ok(key.into_boxed_str())
    }
}

impl MapKey for Arc<str> {
    fn to_key(&self) -> Result<&str, EncodeError> {
        Ok(self)
    }

    fn from_key(key: String) -> Result<Self, DecodeError> {
        Ok(Arc::from(key))
    }
}

macro_rules! impl_non_string_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MapKey for $ty {
                fn to_key(&self) -> Result<&str, EncodeError> {
                    Err(EncodeError::NonStringKey { key_type: stringify!($ty) })
                }

                fn from_key(_key: String) -> Result<Self, DecodeError> {
                    Err(DecodeError::NonStringKey { key_type: stringify!($ty) })
                }
            }
        )*
    };
}

impl_non_string_key!(i8, u8, i16, u16, i32, u32, i64, u64, isize, usize, bool, char);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn encode_with<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
        let registry = TypeRegistry::new();
        let mut writer = Writer::new();
        value.encode(&mut Encoder::new(&mut writer, &registry))?;
        Ok(writer.into_bytes())
    }

    #[test]
    fn test_primitive_layout() {
        assert_eq!(encode_with(&true).unwrap(), vec![0x01, 1]);
        assert_eq!(encode_with(&-2i8).unwrap(), vec![0x02, 0xfe]);
        assert_eq!(encode_with(&0x0102u16).unwrap(), vec![0x05, 0x02, 0x01]);
        assert_eq!(encode_with(&3i32).unwrap(), vec![0x06, 3, 0, 0, 0]);
        assert_eq!(encode_with(&1u64).unwrap(), vec![0x09, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            encode_with(&1.0f32).unwrap(),
            [vec![0x0A], 1.0f32.to_le_bytes().to_vec()].concat()
        );
        assert_eq!(encode_with("ab").unwrap(), vec![0x0C, 2, 0, 0, 0, b'a', b'b']);
    }

    #[test]
    fn test_platform_ints_share_32_bit_tags() {
        assert_eq!(encode_with(&7isize).unwrap(), encode_with(&7i32).unwrap());
        assert_eq!(encode_with(&7usize).unwrap(), encode_with(&7u32).unwrap());
        #[cfg(target_pointer_width = "64")]
        {
            let err = encode_with(&(u32::MAX as usize + 1)).unwrap_err();
            assert!(matches!(err, EncodeError::IntegerOverflow { target: "u32", .. }));
            assert_eq!(err.kind(), ErrorKind::InvalidValue);
        }
    }

    #[test]
    fn test_timestamp_layout() {
        let bytes = encode_with(&Timestamp::from_unix_seconds(-1)).unwrap();
        assert_eq!(bytes, vec![0x0D, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_empty_collections_write_nothing() {
        assert!(encode_with(&Vec::<i32>::new()).unwrap().is_empty());
        assert!(encode_with(&BTreeMap::<String, i32>::new()).unwrap().is_empty());
        // Empty inner sequences drop out of the outer one
        let nested = vec![vec![], vec![1u8]];
        assert_eq!(
            encode_with(&nested).unwrap(),
            vec![0x10, 0x10, 0x03, 1, 0x11, 0x11]
        );
    }

    #[test]
    fn test_map_layout() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), 1u8);
        map.insert("z".to_string(), 2u8);
        assert_eq!(
            encode_with(&map).unwrap(),
            vec![0x12, 1, b'k', 0x03, 1, 1, b'z', 0x03, 2, 0x00]
        );
    }

    #[test]
    fn test_map_skips_elided_values() {
        let mut map: HashMap<String, Vec<u8>> = HashMap::new();
        map.insert("gone".into(), vec![]);
        assert_eq!(encode_with(&map).unwrap(), vec![0x12, 0x00]);
    }

    #[test]
    fn test_map_key_rules() {
        let mut ints = BTreeMap::new();
        ints.insert(1u32, "x".to_string());
        let err = encode_with(&ints).unwrap_err();
        assert_eq!(err, EncodeError::NonStringKey { key_type: "u32" });
        assert_eq!(err.kind(), ErrorKind::NonStringKey);

        let mut empty_key = BTreeMap::new();
        empty_key.insert(String::new(), 1u8);
        let err = encode_with(&empty_key).unwrap_err();
        assert_eq!(err, EncodeError::EmptyKey);
        assert_eq!(err.kind(), ErrorKind::InvalidValue);

        let mut long_key = BTreeMap::new();
        long_key.insert("k".repeat(256), 1u8);
        assert_eq!(encode_with(&long_key).unwrap_err().kind(), ErrorKind::NameTooLong);
        let mut max_key = BTreeMap::new();
        max_key.insert("k".repeat(255), 1u8);
        assert!(encode_with(&max_key).is_ok());
    }

    #[test]
    fn test_option() {
        assert_eq!(encode_with(&Some(1u8)).unwrap(), vec![0x03, 1]);
        let err = encode_with(&None::<u8>).unwrap_err();
        assert_eq!(err, EncodeError::InvalidValue { context: "option" });
        assert!(None::<u8>.is_zero());
        assert!(Some(Vec::<u8>::new()).is_elided());
        assert!(!Some(0u8).is_zero());
    }

    #[test]
    fn test_zero_values() {
        assert!(0i64.is_zero());
        assert!(!false.is_elided());
        assert!(false.is_zero());
        assert!(String::new().is_zero());
        assert!(Timestamp::UNIX_EPOCH.is_zero());
        assert!(!1.5f64.is_zero());
        assert!(Box::new(0u16).is_zero());
    }
}
