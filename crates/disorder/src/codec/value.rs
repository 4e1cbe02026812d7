//! Schema-less encoding of [`Value`] trees.

use std::collections::BTreeMap;

use crate::codec::{Decode, Decoder, Encode, Encoder, Tag};
use crate::error::{DecodeError, EncodeError};
use crate::model::Value;

/// Generic objects always write their delimiters: they stand in for
/// records, whose `start-object`/`end-object` pair is never elided. Empty
/// arrays are elided like any sequence.
impl Encode for Value {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        match self {
            Value::Bool(v) => encoder.write_bool(*v),
            Value::I8(v) => encoder.write_i8(*v),
            Value::U8(v) => encoder.write_u8(*v),
            Value::I16(v) => encoder.write_i16(*v),
            Value::U16(v) => encoder.write_u16(*v),
            Value::I32(v) => encoder.write_i32(*v),
            Value::U32(v) => encoder.write_u32(*v),
            Value::I64(v) => encoder.write_i64(*v),
            Value::U64(v) => encoder.write_u64(*v),
            Value::F32(v) => encoder.write_f32(*v),
            Value::F64(v) => encoder.write_f64(*v),
            Value::String(s) => encoder.write_str(s)?,
            Value::Timestamp(t) => encoder.write_timestamp(*t),
            Value::Array(items) => encoder.write_seq(items)?,
            Value::Object(entries) => encoder.write_object(entries.iter())?,
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty_container()
    }

    fn is_elided(&self) -> bool {
        matches!(self, Value::Array(items) if items.is_empty())
    }
}

/// Dynamic decode: every tag maps to the variant of its natural type.
impl Decode for Value {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let tag = decoder.read_value_tag()?;
        let value = match tag {
            Tag::Bool => Value::Bool(decoder.read_bool_payload()?),
            Tag::I8 | Tag::U8 | Tag::I16 | Tag::U16 | Tag::I32 | Tag::U32 | Tag::I64 | Tag::U64 => {
                integer_value(tag, decoder.read_integer_payload(tag)?)
            }
            Tag::F32 => Value::F32(decoder.read_f32_payload()?),
            Tag::F64 => Value::F64(decoder.read_f64_payload()?),
            Tag::String => Value::String(decoder.read_string_payload()?),
            Tag::Timestamp => Value::Timestamp(decoder.read_timestamp_payload()?),
            // The enum type is not on the wire; only its name survives
            Tag::Enum => Value::String(decoder.read_name()?),
            Tag::StartArray => {
                let mut items = Vec::new();
                decoder.read_array_items(|d| {
                    items.push(Value::decode(d)?);
                    Ok(())
                })?;
                Value::Array(items)
            }
            Tag::StartObject => {
                let mut entries = BTreeMap::new();
                decoder.read_object_entries(|d, key| {
                    entries.insert(key, Value::decode(d)?);
                    Ok(())
                })?;
                Value::Object(entries)
            }
            Tag::EndArray | Tag::EndObject => {
                return Err(DecodeError::UnexpectedTag {
                    expected: "value",
                    found: tag,
                });
            }
        };
        Ok(value)
    }

    fn absent() -> Option<Self> {
        Some(Value::Array(Vec::new()))
    }
}

fn integer_value(tag: Tag, raw: i128) -> Value {
    // The payload was read at the tag's own width, so these casts are exact
    match tag {
        Tag::I8 => Value::I8(raw as i8),
        Tag::U8 => Value::U8(raw as u8),
        Tag::I16 => Value::I16(raw as i16),
        Tag::U16 => Value::U16(raw as u16),
        Tag::I32 => Value::I32(raw as i32),
        Tag::U32 => Value::U32(raw as u32),
        Tag::I64 => Value::I64(raw as i64),
        _ => Value::U64(raw as u64),
    }
}
