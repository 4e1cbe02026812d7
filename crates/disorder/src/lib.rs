//! disorder: a compact, self-describing binary serialization format.
//!
//! Every value on the wire carries a one-byte tag, so a stream can be decoded
//! either into a known Rust type or, with no schema at all, into a generic
//! [`Value`] tree. Records are written as objects keyed by field name, which
//! lets older readers skip fields they do not know.
//!
//! # Quick Start
//!
//! ```rust
//! use disorder::{record, enumeration, Codec, Value};
//!
//! enumeration! {
//!     #[derive(Debug, Clone, Copy, PartialEq, Default)]
//!     pub enum Status {
//!         #[default]
//!         Active => "active",
//!         Retired => "retired",
//!     }
//! }
//!
//! record! {
//!     #[derive(Debug, Clone, PartialEq, Default)]
//!     pub struct Account {
//!         pub id: u64 => "id",
//!         pub name: String => "name",
//!         pub status: Status => "status",
//!         pub tags: Vec<String> => "tags,omitempty",
//!     }
//! }
//!
//! let codec = Codec::new();
//! let account = Account {
//!     id: 7,
//!     name: "Alice".to_string(),
//!     status: Status::Retired,
//!     tags: vec!["admin".to_string()],
//! };
//!
//! let bytes = codec.encode(&account).unwrap();
//! let decoded: Account = codec.decode(&bytes).unwrap();
//! assert_eq!(decoded, account);
//!
//! // No schema needed for a generic decode
//! let value: Value = codec.decode(&bytes).unwrap();
//! assert_eq!(value.get("status").and_then(Value::as_str), Some("retired"));
//! ```
//!
//! # Modules
//!
//! - [`codec`]: Tags, primitives, typed and dynamic encoding/decoding, streams
//! - [`model`]: Records, capabilities, timestamps and generic values
//! - [`registry`]: Shared cache of record metadata
//! - [`error`]: Error types
//! - [`limits`]: Wire constants and decode limits
//!
//! # Security
//!
//! The decoder is designed to read untrusted input:
//! - Nesting depth, string length and container size are bounded by [`DecodeLimits`]
//! - Length prefixes never drive an up-front allocation
//! - Invalid data is rejected with descriptive errors

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod registry;
pub mod util;

mod macros;

// Re-export commonly used types at crate root
pub use codec::{
    decode, encode, Codec, Decode, Decoder, Encode, Encoder, MapKey, StreamDecoder,
    StreamEncoder, Tag,
};
pub use error::{DecodeError, EncodeError, EnumError, ErrorKind, MetadataError};
pub use limits::DecodeLimits;
pub use model::{Enum, FieldSet, Marshal, Record, RecordInfo, Timestamp, Value};
pub use registry::TypeRegistry;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
