//! Primitive encoding/decoding for the disorder wire format.
//!
//! All multi-byte integers are little-endian. Names carry a 1-byte length,
//! string values a 4-byte length.

use std::io::{self, Read};

use crate::codec::Tag;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{MAX_NAME_LEN, MAX_WIRE_STRING_LEN};

const READ_CHUNK: usize = 8 * 1024;

// =============================================================================
// DECODING
// =============================================================================

/// A byte source the decoder pulls from.
///
/// Object safe so that record field accessors and [`Marshal`](crate::Marshal)
/// implementations can work against any input without being generic.
pub trait Source {
    /// Fills `buf` completely or fails with [`DecodeError::UnexpectedEof`].
    fn read_exact(&mut self, buf: &mut [u8], context: &'static str) -> Result<(), DecodeError>;

    /// Returns the next byte without consuming it, or `None` at end of input.
    fn peek_byte(&mut self) -> Result<Option<u8>, DecodeError>;

    /// Reads a single byte.
    fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf, context)?;
        Ok(buf[0])
    }

    /// Reads exactly `len` bytes into a new vector.
    ///
    /// The default grows the buffer as bytes arrive, so a hostile length
    /// prefix cannot force a large allocation up front.
    fn read_vec(&mut self, len: usize, context: &'static str) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::with_capacity(len.min(READ_CHUNK));
        let mut chunk = [0u8; READ_CHUNK];
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(READ_CHUNK);
            self.read_exact(&mut chunk[..n], context)?;
            out.extend_from_slice(&chunk[..n]);
            remaining -= n;
        }
        Ok(out)
    }

    /// Consumes and discards `len` bytes.
    fn skip(&mut self, len: usize, context: &'static str) -> Result<(), DecodeError> {
        let mut chunk = [0u8; READ_CHUNK];
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(READ_CHUNK);
            self.read_exact(&mut chunk[..n], context)?;
            remaining -= n;
        }
        Ok(())
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn read_exact(&mut self, buf: &mut [u8], context: &'static str) -> Result<(), DecodeError> {
        (**self).read_exact(buf, context)
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        (**self).peek_byte()
    }

    fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        (**self).read_byte(context)
    }

    fn read_vec(&mut self, len: usize, context: &'static str) -> Result<Vec<u8>, DecodeError> {
        (**self).read_vec(len, context)
    }

    fn skip(&mut self, len: usize, context: &'static str) -> Result<(), DecodeError> {
        (**self).skip(len, context)
    }
}

/// Reader for decoding binary data held in memory.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the remaining bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads exactly n bytes, borrowing from the input.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }
}

impl Source for Reader<'_> {
    #[inline]
    fn read_exact(&mut self, buf: &mut [u8], context: &'static str) -> Result<(), DecodeError> {
        let bytes = self.read_bytes(buf.len(), context)?;
        buf.copy_from_slice(bytes);
        Ok(())
    }

    #[inline]
    fn peek_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        Ok(self.data.get(self.pos).copied())
    }

    #[inline]
    fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        let byte = self
            .data
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEof { context })?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_vec(&mut self, len: usize, context: &'static str) -> Result<Vec<u8>, DecodeError> {
        Ok(self.read_bytes(len, context)?.to_vec())
    }

    fn skip(&mut self, len: usize, context: &'static str) -> Result<(), DecodeError> {
        self.read_bytes(len, context).map(|_| ())
    }
}

/// Source over any [`io::Read`] with one byte of lookahead.
///
/// A premature end of input surfaces as [`DecodeError::UnexpectedEof`];
/// every other read failure is [`DecodeError::Io`].
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
    peeked: Option<u8>,
    consumed: u64,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            peeked: None,
            consumed: 0,
        }
    }

    /// Number of bytes handed to the decoder so far.
    pub fn position(&self) -> u64 {
        self.consumed
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns the wrapped reader. A byte held for lookahead is lost.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Source for IoSource<R> {
    fn read_exact(&mut self, buf: &mut [u8], context: &'static str) -> Result<(), DecodeError> {
        if buf.is_empty() {
            return Ok(());
        }
        let rest = match self.peeked.take() {
            Some(byte) => {
                buf[0] = byte;
                &mut buf[1..]
            }
            None => &mut buf[..],
        };
        match self.inner.read_exact(rest) {
            Ok(()) => {
                self.consumed += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(DecodeError::UnexpectedEof { context })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        if let Some(byte) = self.peeked {
            return Ok(Some(byte));
        }
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.peeked = Some(buf[0]);
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discards everything written so far, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a tag byte.
    #[inline]
    pub fn write_tag(&mut self, tag: Tag) {
        self.buf.push(tag.as_u8());
    }

    /// Writes a little-endian u16.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian u64.
    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a Name: 1-byte length followed by the raw bytes.
    pub fn write_name(&mut self, name: &str) -> Result<(), EncodeError> {
        let len = name.len();
        if len > MAX_NAME_LEN {
            return Err(EncodeError::NameTooLong {
                prefix: name_prefix(name),
                len,
            });
        }
        self.buf.push(len as u8);
        self.buf.extend_from_slice(name.as_bytes());
        Ok(())
    }

    /// Writes an object key. Keys are Names that must not be empty.
    pub fn write_key(&mut self, key: &str) -> Result<(), EncodeError> {
        if key.is_empty() {
            return Err(EncodeError::EmptyKey);
        }
        self.write_name(key)
    }

    /// Writes a string payload: 4-byte length followed by UTF-8 bytes.
    pub fn write_string(&mut self, s: &str) -> Result<(), EncodeError> {
        let len = u32::try_from(s.len()).map_err(|_| EncodeError::LengthExceedsLimit {
            field: "string",
            len: s.len(),
            max: MAX_WIRE_STRING_LEN,
        })?;
        self.write_u32(len);
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// First few characters of an oversized name, for error messages.
fn name_prefix(name: &str) -> String {
    name.chars().take(16).collect()
}
