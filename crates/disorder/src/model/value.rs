//! Generic value tree produced by untyped decoding.

use std::collections::BTreeMap;

use crate::codec::Tag;
use crate::model::Timestamp;

/// A dynamically typed disorder value.
///
/// Decoding into `Value` needs no schema: every wire kind maps to a variant.
/// Enum names come back as [`Value::String`] because the wire does not say
/// which enum type produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Timestamp(Timestamp),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// The tag this value is written with.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Bool(_) => Tag::Bool,
            Value::I8(_) => Tag::I8,
            Value::U8(_) => Tag::U8,
            Value::I16(_) => Tag::I16,
            Value::U16(_) => Tag::U16,
            Value::I32(_) => Tag::I32,
            Value::U32(_) => Tag::U32,
            Value::I64(_) => Tag::I64,
            Value::U64(_) => Tag::U64,
            Value::F32(_) => Tag::F32,
            Value::F64(_) => Tag::F64,
            Value::String(_) => Tag::String,
            Value::Timestamp(_) => Tag::Timestamp,
            Value::Array(_) => Tag::StartArray,
            Value::Object(_) => Tag::StartObject,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer that fits in i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(x) => Some(*x as i64),
            Value::I16(x) => Some(*x as i64),
            Value::I32(x) => Some(*x as i64),
            Value::I64(x) => Some(*x),
            Value::U8(x) => Some(*x as i64),
            Value::U16(x) => Some(*x as i64),
            Value::U32(x) => Some(*x as i64),
            Value::U64(x) => i64::try_from(*x).ok(),
            _ => None,
        }
    }

    /// Any non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U8(x) => Some(*x as u64),
            Value::U16(x) => Some(*x as u64),
            Value::U32(x) => Some(*x as u64),
            Value::U64(x) => Some(*x),
            Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::I64(_) => {
                self.as_i64().and_then(|x| u64::try_from(x).ok())
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(x) => Some(*x as f64),
            Value::F64(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }

    /// True for empty arrays and objects.
    pub fn is_empty_container(&self) -> bool {
        match self {
            Value::Array(v) => v.is_empty(),
            Value::Object(m) => m.is_empty(),
            _ => false,
        }
    }
}

/// An empty array, the same value an elided slot decodes to.
impl Default for Value {
    fn default() -> Self {
        Value::Array(Vec::new())
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Timestamp => Timestamp,
    Vec<Value> => Array,
    BTreeMap<String, Value> => Object,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I8(x) => serializer.serialize_i8(*x),
            Value::U8(x) => serializer.serialize_u8(*x),
            Value::I16(x) => serializer.serialize_i16(*x),
            Value::U16(x) => serializer.serialize_u16(*x),
            Value::I32(x) => serializer.serialize_i32(*x),
            Value::U32(x) => serializer.serialize_u32(*x),
            Value::I64(x) => serializer.serialize_i64(*x),
            Value::U64(x) => serializer.serialize_u64(*x),
            Value::F32(x) => serializer.serialize_f32(*x),
            Value::F64(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Timestamp(t) => serde::Serialize::serialize(t, serializer),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
