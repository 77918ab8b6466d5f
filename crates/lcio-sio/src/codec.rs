// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Big-endian scalar codec for SIO block bodies.

use std::fmt;
use std::str;

use thiserror::Error;

/// Maximum accepted string length in bytes.
pub const MAX_STRING_LEN: usize = 1 << 20;

/// Errors produced by the SIO primitive stream.
#[derive(Debug, Error)]
pub enum SioError {
    /// Attempted to read beyond the end of the buffer.
    #[error("buffer too short: need {needed} bytes at offset {offset}, have {available}")]
    OutOfBounds {
        /// Read position when the read was attempted.
        offset: usize,
        /// Bytes requested.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },
    /// UTF-8 decoding failed.
    #[error("invalid utf-8 in string")]
    InvalidUtf8,
    /// A length prefix was negative.
    #[error("negative length prefix: {0}")]
    NegativeLength(i32),
    /// Length prefix exceeded the allowed bound.
    #[error("length {len} exceeds max {max}")]
    LengthTooLarge {
        /// Declared length.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A framing marker did not match.
    #[error("bad {what} marker: expected {expected:#010x}, found {found:#010x}")]
    BadMarker {
        /// Which marker (record or block).
        what: &'static str,
        /// Expected marker value.
        expected: u32,
        /// Marker found on the wire.
        found: u32,
    },
    /// Record options requested a feature this stream does not implement.
    #[error("unsupported record options {0:#x} (compressed records are not supported)")]
    UnsupportedOptions(u32),
    /// A record or block header was internally inconsistent.
    #[error("corrupt frame: {0}")]
    CorruptFrame(String),
    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque per-object identity written in place of a cross-object reference.
///
/// `0` is reserved for the null pointer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PointerTag(pub u32);

impl PointerTag {
    /// The null pointer.
    pub const NULL: Self = Self(0);

    /// Returns `true` for the null pointer.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for PointerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ptag#{}", self.0)
    }
}

impl fmt::Display for PointerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Round `len` up to the next multiple of four.
pub const fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// Writer for a single block body.
#[derive(Debug, Default, Clone)]
pub struct SioWriter {
    buf: Vec<u8>,
}

impl SioWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with a pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write raw bytes with no padding.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pad with zeros to the next 4-byte boundary.
    pub fn pad(&mut self) {
        let target = padded_len(self.buf.len());
        self.buf.resize(target, 0);
    }

    /// Write a big-endian i16 (no padding).
    pub fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a big-endian i32.
    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a big-endian u32.
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a big-endian i64.
    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a big-endian f32.
    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a big-endian f64.
    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a collection length as i32.
    pub fn write_len(&mut self, len: usize) -> Result<(), SioError> {
        let len = i32::try_from(len).map_err(|_| SioError::LengthTooLarge {
            len,
            max: i32::MAX as usize,
        })?;
        self.write_i32(len);
        Ok(())
    }

    /// Write a length-prefixed string, zero padded to 4 bytes.
    pub fn write_string(&mut self, value: &str) -> Result<(), SioError> {
        let bytes = value.as_bytes();
        if bytes.len() > MAX_STRING_LEN {
            return Err(SioError::LengthTooLarge {
                len: bytes.len(),
                max: MAX_STRING_LEN,
            });
        }
        self.write_len(bytes.len())?;
        self.write_bytes(bytes);
        self.pad();
        Ok(())
    }

    /// Write a run of i16 values followed by padding.
    pub fn write_i16_array(&mut self, values: &[i16]) {
        for v in values {
            self.write_i16(*v);
        }
        self.pad();
    }

    /// Write the identity tag of the object being encoded.
    pub fn write_ptag(&mut self, tag: PointerTag) {
        self.write_u32(tag.0);
    }

    /// Write a reference to another object's tag (`NULL` for none).
    pub fn write_pntr(&mut self, tag: PointerTag) {
        self.write_u32(tag.0);
    }

    /// Consume the writer and return the buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Borrow the written bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

/// Bounds-checked reader over a single block body.
#[derive(Debug, Clone)]
pub struct SioReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> SioReader<'a> {
    /// Create a reader over `bytes`.
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Current read position.
    pub const fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    pub const fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    /// Returns `true` when every byte has been consumed.
    pub const fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], SioError> {
        let oob = SioError::OutOfBounds {
            offset: self.offset,
            needed: len,
            available: self.remaining(),
        };
        let Some(end) = self.offset.checked_add(len) else {
            return Err(oob);
        };
        if end > self.bytes.len() {
            return Err(oob);
        }
        let out = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], SioError> {
        let chunk = self.take(N)?;
        let mut raw = [0u8; N];
        raw.copy_from_slice(chunk);
        Ok(raw)
    }

    /// Skip to the next 4-byte boundary.
    pub fn skip_padding(&mut self) -> Result<(), SioError> {
        let target = padded_len(self.offset);
        self.take(target - self.offset)?;
        Ok(())
    }

    /// Read raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], SioError> {
        self.take(len)
    }

    /// Read a big-endian i16.
    pub fn read_i16(&mut self) -> Result<i16, SioError> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32, SioError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, SioError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    /// Read a big-endian i64.
    pub fn read_i64(&mut self) -> Result<i64, SioError> {
        Ok(i64::from_be_bytes(self.take_array()?))
    }

    /// Read a big-endian f32.
    pub fn read_f32(&mut self) -> Result<f32, SioError> {
        Ok(f32::from_be_bytes(self.take_array()?))
    }

    /// Read a big-endian f64.
    pub fn read_f64(&mut self) -> Result<f64, SioError> {
        Ok(f64::from_be_bytes(self.take_array()?))
    }

    /// Read an i32 length prefix, rejecting negatives and lengths that could
    /// not possibly fit in the remaining bytes (`min_item_size` each).
    pub fn read_len(&mut self, min_item_size: usize) -> Result<usize, SioError> {
        let raw = self.read_i32()?;
        let len = usize::try_from(raw).map_err(|_| SioError::NegativeLength(raw))?;
        if min_item_size > 0 && len > self.remaining() / min_item_size {
            return Err(SioError::LengthTooLarge {
                len,
                max: self.remaining() / min_item_size,
            });
        }
        Ok(len)
    }

    /// Read a length-prefixed, padded UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, SioError> {
        let len = self.read_len(1)?;
        if len > MAX_STRING_LEN {
            return Err(SioError::LengthTooLarge {
                len,
                max: MAX_STRING_LEN,
            });
        }
        let bytes = self.take(len)?;
        let value = str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| SioError::InvalidUtf8)?;
        self.skip_padding()?;
        Ok(value)
    }

    /// Read `count` i16 values followed by padding.
    pub fn read_i16_array(&mut self, count: usize) -> Result<Vec<i16>, SioError> {
        let mut out = Vec::with_capacity(count.min(self.remaining() / 2));
        for _ in 0..count {
            out.push(self.read_i16()?);
        }
        self.skip_padding()?;
        Ok(out)
    }

    /// Read the identity tag of the object being decoded.
    pub fn read_ptag(&mut self) -> Result<PointerTag, SioError> {
        Ok(PointerTag(self.read_u32()?))
    }

    /// Read a reference token to another object.
    pub fn read_pntr(&mut self) -> Result<PointerTag, SioError> {
        Ok(PointerTag(self.read_u32()?))
    }
}
