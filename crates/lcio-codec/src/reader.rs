// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Event reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use lcio_event::{CollectionId, Event, RunHeader};
use lcio_sio::{RawRecord, RecordReader, SioError};
use tracing::{debug, info, warn};

use crate::config::ReaderConfig;
use crate::context::TagTable;
use crate::header::{
    read_event_header, read_run_header, EventHeader, EVENT_HEADER_BLOCK, EVENT_HEADER_RECORD,
    EVENT_RECORD, RUN_BLOCK, RUN_RECORD,
};
use crate::registry::HandlerRegistry;
use crate::resolve::resolve_event;
use crate::version::check_supported;
use crate::LcioError;

/// Reads events from a record stream.
///
/// Every event is an event header record immediately followed by its data
/// record. Run header records may appear between events and are remembered.
/// Records of any other name are skipped.
#[derive(Debug)]
pub struct LcioReader<R: Read> {
    records: RecordReader<R>,
    registry: Arc<HandlerRegistry>,
    config: ReaderConfig,
    run_header: Option<RunHeader>,
    events_read: u64,
}

impl LcioReader<BufReader<File>> {
    /// Open a file with the default registry and settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LcioError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> LcioReader<R> {
    /// Reader over `inner` with the default registry and settings.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, Arc::new(HandlerRegistry::default()), ReaderConfig::default())
    }

    /// Reader with an explicit registry and settings.
    pub fn with_config(inner: R, registry: Arc<HandlerRegistry>, config: ReaderConfig) -> Self {
        Self {
            records: RecordReader::new(inner),
            registry,
            config,
            run_header: None,
            events_read: 0,
        }
    }

    /// Most recent run header seen.
    pub const fn run_header(&self) -> Option<&RunHeader> {
        self.run_header.as_ref()
    }

    /// Number of events returned so far.
    pub const fn events_read(&self) -> u64 {
        self.events_read
    }

    /// Read the next event, or `None` at the end of the stream.
    ///
    /// # Errors
    /// Any error aborts the event; no partially decoded event is returned.
    pub fn read_event(&mut self) -> Result<Option<Event>, LcioError> {
        let header = loop {
            let Some(record) = self.records.next_record()? else {
                return Ok(None);
            };
            match record.name.as_str() {
                EVENT_HEADER_RECORD => break decode_event_header(&record)?,
                RUN_RECORD => self.take_run_header(&record)?,
                EVENT_RECORD => {
                    return Err(LcioError::RecordOrderViolation {
                        expected: EVENT_HEADER_RECORD,
                        found: record.name,
                    })
                }
                other => debug!(record = other, "skipping record"),
            }
        };

        let data = match self.records.next_record()? {
            Some(record) if record.name == EVENT_RECORD => record,
            Some(record) => {
                return Err(LcioError::RecordOrderViolation {
                    expected: EVENT_RECORD,
                    found: record.name,
                })
            }
            None => {
                return Err(LcioError::RecordOrderViolation {
                    expected: EVENT_RECORD,
                    found: "end of stream".to_owned(),
                })
            }
        };

        let event = self.decode_event(&header, &data)?;
        self.events_read += 1;
        Ok(Some(event))
    }

    /// Skip up to `n` events without decoding their collections. Returns the
    /// number skipped.
    pub fn skip_events(&mut self, n: usize) -> Result<usize, LcioError> {
        let mut skipped = 0;
        while skipped < n {
            let Some(record) = self.records.next_record()? else {
                break;
            };
            match record.name.as_str() {
                EVENT_RECORD => skipped += 1,
                RUN_RECORD => self.take_run_header(&record)?,
                _ => {}
            }
        }
        debug!(skipped, "skipped events");
        Ok(skipped)
    }

    /// Iterate over the remaining events. Iteration stops after the first
    /// error.
    pub fn events(&mut self) -> impl Iterator<Item = Result<Event, LcioError>> + '_ {
        let mut failed = false;
        std::iter::from_fn(move || {
            if failed {
                return None;
            }
            match self.read_event() {
                Ok(event) => event.map(Ok),
                Err(e) => {
                    failed = true;
                    Some(Err(e))
                }
            }
        })
    }

    /// Return the underlying source.
    pub fn into_inner(self) -> R {
        self.records.into_inner()
    }

    fn take_run_header(&mut self, record: &RawRecord) -> Result<(), LcioError> {
        let block = record
            .block(RUN_BLOCK)
            .ok_or_else(|| missing_block(RUN_RECORD, RUN_BLOCK))?;
        let version = check_supported(block.version)?;
        let header = read_run_header(&mut block.reader(), version)?;
        info!(
            run = header.run,
            detector = %header.detector_name,
            "run header"
        );
        self.run_header = Some(header);
        Ok(())
    }

    fn decode_event(&self, header: &EventHeader, data: &RawRecord) -> Result<Event, LcioError> {
        let mut event = header.to_event();
        let mut tags = TagTable::new();
        let mut actions = Vec::new();

        for block in &data.blocks {
            let version = check_supported(block.version)?;
            let Some(wire_type) = header.wire_type_of(&block.name) else {
                warn!(block = %block.name, "block not declared in event header, skipped");
                continue;
            };
            let Some(codec) = self.registry.lookup_by_wire_type(wire_type) else {
                if self.config.skip_unknown_blocks {
                    warn!(block = %block.name, wire_type, "no handler for block, skipped");
                    continue;
                }
                return Err(LcioError::UnknownBlockType {
                    block: block.name.clone(),
                    wire_type: wire_type.to_owned(),
                });
            };
            let id = CollectionId(event.len());
            let mut r = block.reader();
            let (collection, action) = codec.decode(&mut r, id, version, &mut tags)?;
            if !r.is_exhausted() {
                debug!(
                    block = %block.name,
                    trailing = r.remaining(),
                    "ignoring trailing bytes"
                );
            }
            event.add_collection(block.name.clone(), collection)?;
            actions.extend(action);
        }

        resolve_event(&mut event, &tags, &actions)?;
        debug!(
            run = event.run,
            event = event.event_number,
            collections = event.len(),
            "decoded event"
        );
        Ok(event)
    }
}

fn decode_event_header(record: &RawRecord) -> Result<EventHeader, LcioError> {
    let block = record
        .block(EVENT_HEADER_BLOCK)
        .ok_or_else(|| missing_block(EVENT_HEADER_RECORD, EVENT_HEADER_BLOCK))?;
    let version = check_supported(block.version)?;
    read_event_header(&mut block.reader(), version)
}

fn missing_block(record: &str, block: &str) -> LcioError {
    SioError::CorruptFrame(format!("record {record} has no {block} block")).into()
}
