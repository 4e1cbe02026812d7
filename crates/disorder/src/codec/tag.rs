//! Wire tag table.
//!
//! Every encoded value starts with one tag byte. Containers are delimited by
//! start/end tags instead of a length prefix.
//!
//! `EndObject` is `0x00`: inside an object the decoder peeks one byte, and a
//! zero can only be the end marker because keys are never empty.

/// One-byte discriminant identifying the wire representation that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    EndObject = 0x00,
    Bool = 0x01,
    I8 = 0x02,
    U8 = 0x03,
    I16 = 0x04,
    U16 = 0x05,
    I32 = 0x06,
    U32 = 0x07,
    I64 = 0x08,
    U64 = 0x09,
    F32 = 0x0A,
    F64 = 0x0B,
    String = 0x0C,
    Timestamp = 0x0D,
    Enum = 0x0E,
    StartArray = 0x10,
    EndArray = 0x11,
    StartObject = 0x12,
}

impl Tag {
    /// Every tag, in wire order.
    pub const ALL: [Tag; 18] = [
        Tag::EndObject,
        Tag::Bool,
        Tag::I8,
        Tag::U8,
        Tag::I16,
        Tag::U16,
        Tag::I32,
        Tag::U32,
        Tag::I64,
        Tag::U64,
        Tag::F32,
        Tag::F64,
        Tag::String,
        Tag::Timestamp,
        Tag::Enum,
        Tag::StartArray,
        Tag::EndArray,
        Tag::StartObject,
    ];

    /// Creates a Tag from its wire representation.
    pub fn from_u8(v: u8) -> Option<Tag> {
        match v {
            0x00 => Some(Tag::EndObject),
            0x01 => Some(Tag::Bool),
            0x02 => Some(Tag::I8),
            0x03 => Some(Tag::U8),
            0x04 => Some(Tag::I16),
            0x05 => Some(Tag::U16),
            0x06 => Some(Tag::I32),
            0x07 => Some(Tag::U32),
            0x08 => Some(Tag::I64),
            0x09 => Some(Tag::U64),
            0x0A => Some(Tag::F32),
            0x0B => Some(Tag::F64),
            0x0C => Some(Tag::String),
            0x0D => Some(Tag::Timestamp),
            0x0E => Some(Tag::Enum),
            0x10 => Some(Tag::StartArray),
            0x11 => Some(Tag::EndArray),
            0x12 => Some(Tag::StartObject),
            _ => None,
        }
    }

    /// Returns the wire byte.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Byte width of the fixed payload following this tag, if it has one.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Tag::Bool | Tag::I8 | Tag::U8 => Some(1),
            Tag::I16 | Tag::U16 => Some(2),
            Tag::I32 | Tag::U32 | Tag::F32 => Some(4),
            Tag::I64 | Tag::U64 | Tag::F64 | Tag::Timestamp => Some(8),
            _ => None,
        }
    }

    /// True for the container terminators, which never start a value.
    pub fn is_terminator(self) -> bool {
        matches!(self, Tag::EndArray | Tag::EndObject)
    }
}

impl TryFrom<u8> for Tag {
    type Error = crate::error::DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Tag::from_u8(byte).ok_or(crate::error::DecodeError::UnknownTag { byte })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_table_is_injective() {
        let mut seen = [false; 256];
        for tag in Tag::ALL {
            let byte = tag.as_u8() as usize;
            assert!(!seen[byte], "duplicate byte for {:?}", tag);
            seen[byte] = true;
            assert_eq!(Tag::from_u8(tag.as_u8()), Some(tag));
        }
    }

    #[test]
    fn test_unknown_bytes_rejected() {
        let known = Tag::ALL.iter().filter(|t| t.as_u8() < 0x20).count();
        let decoded = (0u8..=255).filter(|b| Tag::from_u8(*b).is_some()).count();
        assert_eq!(known, decoded);
        assert!(matches!(
            Tag::try_from(0xFF),
            Err(crate::error::DecodeError::UnknownTag { byte: 0xFF })
        ));
    }

    #[test]
    fn test_fixed_widths() {
        assert_eq!(Tag::Bool.fixed_width(), Some(1));
        assert_eq!(Tag::U16.fixed_width(), Some(2));
        assert_eq!(Tag::F32.fixed_width(), Some(4));
        assert_eq!(Tag::Timestamp.fixed_width(), Some(8));
        assert_eq!(Tag::String.fixed_width(), None);
        assert_eq!(Tag::StartObject.fixed_width(), None);
    }
}
