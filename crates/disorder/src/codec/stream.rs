//! Top-level entry points: [`Codec`], stream adapters and the free
//! [`encode`]/[`decode`] functions.

use std::io::{Read, Write};
use std::sync::Arc;

use tracing::trace;

use crate::codec::{Decode, Decoder, Encode, Encoder, IoSource, Reader, Source, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::DecodeLimits;
use crate::registry::TypeRegistry;

/// Encoder/decoder configuration plus the metadata cache it shares.
///
/// Cloning is cheap and clones share one [`TypeRegistry`].
#[derive(Debug, Clone, Default)]
pub struct Codec {
    registry: Arc<TypeRegistry>,
    limits: DecodeLimits,
}

impl Codec {
    /// A codec with its own registry and default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: DecodeLimits) -> Self {
        Self {
            registry: Arc::default(),
            limits,
        }
    }

    /// A codec that shares `registry` with other codecs.
    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            limits: DecodeLimits::default(),
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Encodes one value into a new buffer.
    pub fn encode<T: Encode + ?Sized>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        self.encode_into(value, &mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Appends the encoding of one value to `writer`.
    pub fn encode_into<T: Encode + ?Sized>(
        &self,
        value: &T,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        value.encode(&mut Encoder::new(writer, &self.registry))
    }

    /// Encodes one value and writes it to `sink`. Nothing is written if
    /// encoding fails.
    pub fn encode_to<T: Encode + ?Sized, W: Write>(
        &self,
        value: &T,
        mut sink: W,
    ) -> Result<(), EncodeError> {
        let bytes = self.encode(value)?;
        sink.write_all(&bytes)?;
        Ok(())
    }

    /// Decodes exactly one value from `bytes`.
    ///
    /// Empty input decodes to [`Decode::absent`] when the target has one.
    /// Bytes left after the value are an error.
    pub fn decode<T: Decode>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        if bytes.is_empty() {
            return T::absent().ok_or(DecodeError::UnexpectedEof { context: "value" });
        }
        let mut reader = Reader::new(bytes);
        let value = self.decode_one::<T>(&mut reader)?;
        if !reader.is_empty() {
            return Err(DecodeError::TrailingBytes {
                remaining: reader.remaining_len(),
            });
        }
        Ok(value)
    }

    /// Decodes one value from `source`, leaving any later bytes unread.
    pub fn decode_from<T: Decode, R: Read>(&self, source: R) -> Result<T, DecodeError> {
        let mut source = IoSource::new(source);
        if source.peek_byte()?.is_none() {
            return T::absent().ok_or(DecodeError::UnexpectedEof { context: "value" });
        }
        self.decode_one(&mut source)
    }

    fn decode_one<T: Decode>(&self, source: &mut dyn Source) -> Result<T, DecodeError> {
        T::decode(&mut Decoder::new(source, &self.registry, self.limits))
    }

    /// Writes consecutive values to `sink`.
    pub fn stream_encoder<W: Write>(&self, sink: W) -> StreamEncoder<W> {
        StreamEncoder {
            codec: self.clone(),
            sink,
            buf: Writer::new(),
        }
    }

    /// Reads consecutive values from `source`.
    pub fn stream_decoder<R: Read>(&self, source: R) -> StreamDecoder<R> {
        StreamDecoder {
            codec: self.clone(),
            source: IoSource::new(source),
        }
    }
}

/// Writes a sequence of top-level values to an [`io::Write`](std::io::Write).
///
/// Each value is encoded into a scratch buffer first, so a failed encode
/// leaves the sink untouched. Values that encode to zero bytes (empty
/// sequences and maps) leave no trace in the stream.
#[derive(Debug)]
pub struct StreamEncoder<W> {
    codec: Codec,
    sink: W,
    buf: Writer,
}

impl<W: Write> StreamEncoder<W> {
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.buf.clear();
        self.codec.encode_into(value, &mut self.buf)?;
        self.sink.write_all(self.buf.as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), EncodeError> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Reads a sequence of top-level values from an [`io::Read`](std::io::Read).
#[derive(Debug)]
pub struct StreamDecoder<R> {
    codec: Codec,
    source: IoSource<R>,
}

impl<R: Read> StreamDecoder<R> {
    /// Decodes the next value, or returns `None` at a clean end of input.
    pub fn decode<T: Decode>(&mut self) -> Result<Option<T>, DecodeError> {
        if self.source.peek_byte()?.is_none() {
            trace!(consumed = self.source.position(), "end of stream");
            return Ok(None);
        }
        self.codec.decode_one(&mut self.source).map(Some)
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.source.position()
    }

    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }
}

/// Encodes `value` with a fresh [`Codec`].
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Codec::new().encode(value)
}

/// Decodes one value from `bytes` with a fresh [`Codec`].
pub fn decode<T: Decode>(bytes: &[u8]) -> Result<T, DecodeError> {
    Codec::new().decode(bytes)
}
