//! Binary encoding/decoding for the disorder wire format.
//!
//! Every value is a tag byte followed by a payload; arrays and objects are
//! bracketed by start/end tags. See [`Tag`] for the table.

mod decode;
mod encode;
pub mod primitives;
mod stream;
pub mod tag;
mod value;

pub use decode::{Decode, Decoder};
pub use encode::{Encode, Encoder, MapKey};
pub use primitives::{IoSource, Reader, Source, Writer};
pub use stream::{decode, encode, Codec, StreamDecoder, StreamEncoder};
pub use tag::Tag;
