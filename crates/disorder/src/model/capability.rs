//! Extension points for types that customize their own encoding.
//!
//! Generated types implement these traits directly; the [`enumeration!`]
//! and [`marshal_codec!`] macros connect them to [`Encode`]/[`Decode`].
//!
//! [`enumeration!`]: crate::enumeration
//! [`marshal_codec!`]: crate::marshal_codec
//! [`Encode`]: crate::Encode
//! [`Decode`]: crate::Decode

use crate::codec::{Source, Writer};
use crate::error::{DecodeError, EncodeError, EnumError};

/// A value drawn from a fixed set of canonical names.
///
/// Encoded as the `Enum` tag followed by the name, never the ordinal.
pub trait Enum: Sized + 'static {
    /// Canonical name of this value. Values outside the known set fail.
    fn to_name(&self) -> Result<&str, EnumError>;

    /// Reconstructs a value from one of its canonical names.
    fn from_name(name: &str) -> Result<Self, EnumError>;
}

/// A value that owns its byte representation, leading tag included.
///
/// `read_self` must consume exactly the bytes `write_self` produced. The
/// first byte written should be a tag; inside arrays and objects the decoder
/// peeks it to detect the container's end.
pub trait Marshal: Sized {
    fn write_self(&self, writer: &mut Writer) -> Result<(), EncodeError>;

    fn read_self(source: &mut dyn Source) -> Result<Self, DecodeError>;

    /// Whether a record field holding this value may be omitted.
    fn is_zero(&self) -> bool {
        false
    }
}
