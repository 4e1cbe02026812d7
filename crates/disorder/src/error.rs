//! Error types for disorder encoding, decoding and metadata building.

use std::io;

use thiserror::Error;

use crate::codec::Tag;

/// Coarse error classification shared by every error in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value is absent or out of range where one is required.
    InvalidValue,
    /// No dispatch rule accepts the value (or the decode target).
    UnsupportedType,
    /// A mapping key is not textual.
    NonStringKey,
    /// A Name exceeds 255 bytes.
    NameTooLong,
    /// Unknown tag, truncated payload, bad framing or a violated decode limit.
    MalformedStream,
    /// An enum value has no canonical name, or a name is not in the set.
    EnumConversion,
    /// Two fields of a record resolve to the same wire name.
    DuplicateFieldName,
    /// The underlying sink or source failed.
    Io,
}

impl ErrorKind {
    /// Returns a short stable identifier (e.g., "D005").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidValue => "D001",
            ErrorKind::UnsupportedType => "D002",
            ErrorKind::NonStringKey => "D003",
            ErrorKind::NameTooLong => "D004",
            ErrorKind::MalformedStream => "D005",
            ErrorKind::EnumConversion => "D006",
            ErrorKind::DuplicateFieldName => "D007",
            ErrorKind::Io => "D008",
        }
    }
}

/// Error while building a record's type metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("[D007] {type_name}: fields `{first}` and `{second}` both use wire name {name:?}")]
    DuplicateFieldName {
        type_name: &'static str,
        name: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("[D004] {type_name}: wire name of field `{field}` is {len} bytes (max 255)")]
    NameTooLong {
        type_name: &'static str,
        field: &'static str,
        len: usize,
    },
}

impl MetadataError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MetadataError::DuplicateFieldName { .. } => ErrorKind::DuplicateFieldName,
            MetadataError::NameTooLong { .. } => ErrorKind::NameTooLong,
        }
    }
}

/// Failure converting between an enum value and its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumError {
    #[error("{type_name}: {value:?} is not a known name")]
    UnknownName {
        type_name: &'static str,
        value: String,
    },

    #[error("{type_name}: value {value} has no canonical name")]
    Unnamed {
        type_name: &'static str,
        value: String,
    },
}

impl EnumError {
    /// Builds an [`EnumError::UnknownName`] for enum type `E`.
    pub fn unknown_name<E>(value: &str) -> Self {
        EnumError::UnknownName {
            type_name: std::any::type_name::<E>(),
            value: value.to_string(),
        }
    }

    /// Builds an [`EnumError::Unnamed`] for enum type `E`.
    pub fn unnamed<E>(value: impl std::fmt::Display) -> Self {
        EnumError::Unnamed {
            type_name: std::any::type_name::<E>(),
            value: value.to_string(),
        }
    }
}

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("[D001] invalid value: {context} is absent")]
    InvalidValue { context: &'static str },

    #[error("[D001] integer {value} does not fit the {target} wire width")]
    IntegerOverflow { value: i128, target: &'static str },

    #[error("[D001] object keys must not be empty")]
    EmptyKey,

    #[error("[D003] map key type must be string, found {key_type}")]
    NonStringKey { key_type: &'static str },

    #[error("[D004] name {prefix:?}... is {len} bytes (max 255)")]
    NameTooLong { prefix: String, len: usize },

    #[error("[D001] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("[D006] {0}")]
    EnumConversion(#[from] EnumError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("field {field:?}: {source}")]
    Field {
        field: &'static str,
        source: Box<EncodeError>,
    },

    #[error("[D008] write failed ({kind:?}): {message}")]
    Io { kind: io::ErrorKind, message: String },
}

impl EncodeError {
    /// Returns the classification of the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::InvalidValue { .. }
            | EncodeError::IntegerOverflow { .. }
            | EncodeError::EmptyKey
            | EncodeError::LengthExceedsLimit { .. } => ErrorKind::InvalidValue,
            EncodeError::NonStringKey { .. } => ErrorKind::NonStringKey,
            EncodeError::NameTooLong { .. } => ErrorKind::NameTooLong,
            EncodeError::EnumConversion(_) => ErrorKind::EnumConversion,
            EncodeError::Metadata(e) => e.kind(),
            EncodeError::Field { source, .. } => source.kind(),
            EncodeError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Wraps this error with the wire name of the record field being encoded.
    pub fn in_field(self, field: &'static str) -> Self {
        EncodeError::Field {
            field,
            source: Box::new(self),
        }
    }

    /// Returns the wire field path leading to the innermost error.
    pub fn field_path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        let mut current = self;
        while let EncodeError::Field { field, source } = current {
            path.push(*field);
            current = source;
        }
        path
    }
}

impl From<io::Error> for EncodeError {
    fn from(e: io::Error) -> Self {
        EncodeError::Io {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("[D005] unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("[D005] unknown tag byte 0x{byte:02x}")]
    UnknownTag { byte: u8 },

    #[error("[D005] unexpected {found:?} tag where {expected} was expected")]
    UnexpectedTag { expected: &'static str, found: Tag },

    #[error("[D002] cannot decode {found:?} into {target}")]
    TypeMismatch { target: &'static str, found: Tag },

    #[error("[D005] invalid bool value: {value} (expected 0x00 or 0x01)")]
    InvalidBool { value: u8 },

    #[error("[D005] invalid UTF-8 in {context}")]
    InvalidUtf8 { context: &'static str },

    #[error("[D005] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("[D005] nesting depth exceeds maximum {max}")]
    DepthExceeded { max: usize },

    #[error("[D005] {remaining} trailing bytes after the top-level value")]
    TrailingBytes { remaining: usize },

    #[error("[D003] map key type must be string, found {key_type}")]
    NonStringKey { key_type: &'static str },

    #[error("[D006] {0}")]
    EnumConversion(#[from] EnumError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("field {field:?}: {source}")]
    Field {
        field: &'static str,
        source: Box<DecodeError>,
    },

    #[error("[D008] read failed ({kind:?}): {message}")]
    Io { kind: io::ErrorKind, message: String },
}

impl DecodeError {
    /// Returns the classification of the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::TypeMismatch { .. } => ErrorKind::UnsupportedType,
            DecodeError::NonStringKey { .. } => ErrorKind::NonStringKey,
            DecodeError::EnumConversion(_) => ErrorKind::EnumConversion,
            DecodeError::Metadata(e) => e.kind(),
            DecodeError::Field { source, .. } => source.kind(),
            DecodeError::Io { .. } => ErrorKind::Io,
            _ => ErrorKind::MalformedStream,
        }
    }

    /// Wraps this error with the wire name of the record field being decoded.
    pub fn in_field(self, field: &'static str) -> Self {
        DecodeError::Field {
            field,
            source: Box::new(self),
        }
    }

    /// Returns the wire field path leading to the innermost error.
    pub fn field_path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        let mut current = self;
        while let DecodeError::Field { field, source } = current {
            path.push(*field);
            current = source;
        }
        path
    }
}

impl From<io::Error> for DecodeError {
    fn from(e: io::Error) -> Self {
        DecodeError::Io {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}
