// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record and block framing on top of `std::io`.

use std::io::{self, Read, Write};

use crate::codec::{padded_len, SioError, SioReader, SioWriter};

/// Marker word following the length of every record header.
pub const RECORD_MARKER: u32 = 0xabad_cafe;
/// Marker word following the length of every block header.
pub const BLOCK_MARKER: u32 = 0xdead_beef;
/// Record option bit requesting a compressed payload.
pub const OPT_COMPRESS: u32 = 0x0000_0001;
/// Maximum accepted record payload (256 MiB).
pub const MAX_RECORD_LEN: usize = 256 * 1024 * 1024;

/// Fixed part of a record header: length, marker, options, two lengths, name length.
const RECORD_HEADER_FIXED: usize = 24;
/// Fixed part of a block header: length, marker, version, name length.
const BLOCK_HEADER_FIXED: usize = 16;

/// Version declared by a block, packed on the wire as `(major << 16) | minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockVersion {
    /// Major format revision.
    pub major: u16,
    /// Minor format revision.
    pub minor: u16,
}

impl BlockVersion {
    /// Construct a version pair.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Packed wire form.
    pub const fn packed(self) -> u32 {
        ((self.major as u32) << 16) | self.minor as u32
    }

    /// Unpack the wire form.
    pub const fn from_packed(raw: u32) -> Self {
        Self {
            major: (raw >> 16) as u16,
            minor: (raw & 0xffff) as u16,
        }
    }
}

/// One named, versioned block with its undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Block name (the collection name for event data records).
    pub name: String,
    /// Version the body was written with.
    pub version: BlockVersion,
    /// Body bytes, including trailing padding.
    pub body: Vec<u8>,
}

impl RawBlock {
    /// Build a block from a finished body writer.
    pub fn new(name: impl Into<String>, version: BlockVersion, body: SioWriter) -> Self {
        Self {
            name: name.into(),
            version,
            body: body.into_vec(),
        }
    }

    /// Reader positioned at the start of the body.
    pub fn reader(&self) -> SioReader<'_> {
        SioReader::new(&self.body)
    }
}

/// One named record and its blocks in stream order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Record name.
    pub name: String,
    /// Blocks in stream order.
    pub blocks: Vec<RawBlock>,
}

impl RawRecord {
    /// First block with the given name.
    pub fn block(&self, name: &str) -> Option<&RawBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }
}

fn write_name(w: &mut SioWriter, name: &str) -> Result<(), SioError> {
    w.write_len(name.len())?;
    w.write_bytes(name.as_bytes());
    w.pad();
    Ok(())
}

fn read_name(r: &mut SioReader<'_>) -> Result<String, SioError> {
    let len = r.read_u32()? as usize;
    let bytes = r.read_bytes(len)?;
    let name = std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| SioError::InvalidUtf8)?;
    r.skip_padding()?;
    Ok(name)
}

/// Writes framed records to an underlying sink.
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    inner: W,
    records_written: u64,
}

impl<W: Write> RecordWriter<W> {
    /// Wrap a sink.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
        }
    }

    /// Number of records written so far.
    pub const fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Frame and write one record made of `blocks`.
    pub fn write_record(&mut self, name: &str, blocks: &[RawBlock]) -> Result<(), SioError> {
        let mut data = SioWriter::new();
        for block in blocks {
            let name_len = padded_len(block.name.len());
            let body_len = padded_len(block.body.len());
            let block_len = BLOCK_HEADER_FIXED + name_len + body_len;
            data.write_len(block_len)?;
            data.write_u32(BLOCK_MARKER);
            data.write_u32(block.version.packed());
            write_name(&mut data, &block.name)?;
            data.write_bytes(&block.body);
            data.pad();
        }
        if data.len() > MAX_RECORD_LEN {
            return Err(SioError::LengthTooLarge {
                len: data.len(),
                max: MAX_RECORD_LEN,
            });
        }

        let mut header = SioWriter::with_capacity(RECORD_HEADER_FIXED + name.len() + 3);
        header.write_len(RECORD_HEADER_FIXED + padded_len(name.len()))?;
        header.write_u32(RECORD_MARKER);
        header.write_u32(0); // options
        header.write_len(data.len())?;
        header.write_len(data.len())?;
        write_name(&mut header, name)?;

        self.inner.write_all(header.as_slice())?;
        self.inner.write_all(data.as_slice())?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<(), SioError> {
        self.inner.flush()?;
        Ok(())
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Return the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Reads framed records from an underlying source.
#[derive(Debug)]
pub struct RecordReader<R: Read> {
    inner: R,
}

impl<R: Read> RecordReader<R> {
    /// Wrap a source.
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` only if EOF occurs while reading the record length.
    /// EOF anywhere inside a record is an error.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>, SioError> {
        let mut len_bytes = [0u8; 4];
        match self.inner.read_exact(&mut len_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let header_len = u32::from_be_bytes(len_bytes) as usize;
        if !(RECORD_HEADER_FIXED..=RECORD_HEADER_FIXED + 4096).contains(&header_len) {
            return Err(SioError::CorruptFrame(format!(
                "record header length {header_len} out of range"
            )));
        }

        let mut header = vec![0u8; header_len - 4];
        self.inner.read_exact(&mut header)?;
        let mut r = SioReader::new(&header);
        let marker = r.read_u32()?;
        if marker != RECORD_MARKER {
            return Err(SioError::BadMarker {
                what: "record",
                expected: RECORD_MARKER,
                found: marker,
            });
        }
        let options = r.read_u32()?;
        if options & OPT_COMPRESS != 0 {
            return Err(SioError::UnsupportedOptions(options));
        }
        let data_len = r.read_u32()? as usize;
        let uncompressed_len = r.read_u32()? as usize;
        if data_len != uncompressed_len {
            return Err(SioError::CorruptFrame(format!(
                "data length {data_len} differs from uncompressed length {uncompressed_len}"
            )));
        }
        if data_len > MAX_RECORD_LEN {
            return Err(SioError::LengthTooLarge {
                len: data_len,
                max: MAX_RECORD_LEN,
            });
        }
        let name = read_name(&mut r)?;

        let mut data = vec![0u8; data_len];
        self.inner.read_exact(&mut data)?;
        let blocks = parse_blocks(&data)?;
        Ok(Some(RawRecord { name, blocks }))
    }

    /// Return the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

fn parse_blocks(data: &[u8]) -> Result<Vec<RawBlock>, SioError> {
    let mut r = SioReader::new(data);
    let mut blocks = Vec::new();
    while !r.is_exhausted() {
        let start = r.position();
        let block_len = r.read_u32()? as usize;
        let marker = r.read_u32()?;
        if marker != BLOCK_MARKER {
            return Err(SioError::BadMarker {
                what: "block",
                expected: BLOCK_MARKER,
                found: marker,
            });
        }
        let version = BlockVersion::from_packed(r.read_u32()?);
        let name = read_name(&mut r)?;
        let header_len = r.position() - start;
        let Some(body_len) = block_len.checked_sub(header_len) else {
            return Err(SioError::CorruptFrame(format!(
                "block {name:?} length {block_len} shorter than its header"
            )));
        };
        let body = r.read_bytes(body_len)?.to_vec();
        blocks.push(RawBlock {
            name,
            version,
            body,
        });
    }
    Ok(blocks)
}
