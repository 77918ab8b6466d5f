// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Event writer.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lcio_event::{Collection, CollectionId, Event, Flags, RunHeader};
use lcio_sio::{RawBlock, RecordWriter, SioWriter};
use tracing::{debug, info, warn};

use crate::config::WriterConfig;
use crate::context::TagAssignments;
use crate::envelope::CollectionCodec;
use crate::header::{
    is_valid_collection_name, write_event_header, write_run_header as write_run_body,
    EVENT_HEADER_BLOCK, EVENT_HEADER_RECORD, EVENT_RECORD, RUN_BLOCK, RUN_RECORD,
};
use crate::registry::HandlerRegistry;
use crate::version::{CURRENT, CURRENT_ORDINAL};
use crate::LcioError;

/// Writes events as header/data record pairs.
///
/// A run header record is emitted before an event whenever its run number or
/// detector name differs from the previous event's.
#[derive(Debug)]
pub struct LcioWriter<W: Write> {
    records: Option<RecordWriter<W>>,
    registry: Arc<HandlerRegistry>,
    config: WriterConfig,
    last_run: Option<(i32, String)>,
    path: Option<PathBuf>,
}

impl LcioWriter<BufWriter<File>> {
    /// Create (or truncate) a file with the default registry and settings.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, LcioError> {
        Self::create_with_config(path, Arc::new(HandlerRegistry::default()), WriterConfig::default())
    }

    /// Create (or truncate) a file with an explicit registry and settings.
    pub fn create_with_config(
        path: impl AsRef<Path>,
        registry: Arc<HandlerRegistry>,
        config: WriterConfig,
    ) -> Result<Self, LcioError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        let mut writer = Self::with_config(BufWriter::new(file), registry, config);
        writer.path = Some(path);
        Ok(writer)
    }

    /// Flush and reopen the file in append mode, forgetting the last run
    /// written so the next event is preceded by a run header again.
    pub fn reopen(&mut self) -> Result<(), LcioError> {
        let path = self.path.clone().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "writer has no backing file")
        })?;
        if let Some(records) = self.records.as_mut() {
            records.flush()?;
        }
        let file = OpenOptions::new().append(true).open(&path)?;
        self.records = Some(RecordWriter::new(BufWriter::new(file)));
        self.reset_run_tracking();
        debug!(path = %path.display(), "reopened writer");
        Ok(())
    }
}

struct Planned<'e> {
    id: CollectionId,
    name: &'e str,
    collection: &'e Collection,
    codec: Arc<CollectionCodec>,
}

impl<W: Write> LcioWriter<W> {
    /// Writer over `inner` with the default registry and settings.
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, Arc::new(HandlerRegistry::default()), WriterConfig::default())
    }

    /// Writer with an explicit registry and settings.
    pub fn with_config(inner: W, registry: Arc<HandlerRegistry>, config: WriterConfig) -> Self {
        Self {
            records: Some(RecordWriter::new(inner)),
            registry,
            config,
            last_run: None,
            path: None,
        }
    }

    /// Current settings.
    pub const fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Never write collection `name`.
    pub fn add_ignore(&mut self, name: impl Into<String>) {
        self.config.ignore.insert(name.into());
    }

    /// Undo [`LcioWriter::add_ignore`].
    pub fn remove_ignore(&mut self, name: &str) -> bool {
        self.config.ignore.remove(name)
    }

    /// Empty the ignore list.
    pub fn clear_ignore(&mut self) {
        self.config.ignore.clear();
    }

    /// Restrict writing to the listed collections (cumulative).
    pub fn add_write_only(&mut self, name: impl Into<String>) {
        self.config.only.insert(name.into());
    }

    /// Undo [`LcioWriter::add_write_only`].
    pub fn remove_write_only(&mut self, name: &str) -> bool {
        self.config.only.remove(name)
    }

    /// Empty the allow list; every collection is eligible again.
    pub fn clear_write_only(&mut self) {
        self.config.only.clear();
    }

    /// Forget the last run written.
    pub fn reset_run_tracking(&mut self) {
        self.last_run = None;
    }

    /// Write a run header record now.
    pub fn write_run_header(&mut self, header: &RunHeader) -> Result<(), LcioError> {
        let records = self.records.as_mut().ok_or(LcioError::WriterClosed)?;
        let mut body = SioWriter::new();
        write_run_body(&mut body, header, CURRENT_ORDINAL)?;
        records.write_record(RUN_RECORD, &[RawBlock::new(RUN_BLOCK, CURRENT, body)])?;
        info!(run = header.run, detector = %header.detector_name, "run header written");
        self.last_run = Some((header.run, header.detector_name.clone()));
        Ok(())
    }

    /// Write one event.
    ///
    /// All checks and encoding happen before any bytes reach the sink, so a
    /// failed call leaves the stream unchanged.
    pub fn write_event(&mut self, event: &Event) -> Result<(), LcioError> {
        if self.records.is_none() {
            return Err(LcioError::WriterClosed);
        }
        let plan = self.plan(event)?;

        let mut tags = TagAssignments::new();
        for p in &plan {
            p.codec
                .assign_tags(p.collection, p.id, CURRENT_ORDINAL, &mut tags)?;
        }

        let mut declared = Vec::with_capacity(plan.len());
        let mut blocks = Vec::with_capacity(plan.len());
        for p in &plan {
            let mut body = SioWriter::new();
            let pruned = p
                .codec
                .encode(&mut body, p.collection, p.id, CURRENT_ORDINAL, &mut tags)?;
            if pruned > 0 {
                warn!(
                    collection = p.name,
                    pruned, "references to collections that are not written were dropped"
                );
            }
            declared.push((p.name, p.codec.wire_type()));
            blocks.push(RawBlock::new(p.name, CURRENT, body));
        }
        let mut header = SioWriter::new();
        write_event_header(&mut header, event, &declared, CURRENT_ORDINAL)?;

        let run = (event.run, event.detector_name.clone());
        if self.last_run.as_ref() != Some(&run) {
            self.write_run_header(&RunHeader::new(event.run, event.detector_name.clone()))?;
        }
        let records = self.records.as_mut().ok_or(LcioError::WriterClosed)?;
        records.write_record(
            EVENT_HEADER_RECORD,
            &[RawBlock::new(EVENT_HEADER_BLOCK, CURRENT, header)],
        )?;
        records.write_record(EVENT_RECORD, &blocks)?;
        debug!(
            run = event.run,
            event = event.event_number,
            collections = blocks.len(),
            "wrote event"
        );
        Ok(())
    }

    /// Flush buffered records.
    pub fn flush(&mut self) -> Result<(), LcioError> {
        let records = self.records.as_mut().ok_or(LcioError::WriterClosed)?;
        records.flush()?;
        Ok(())
    }

    /// Flush and release the sink. Later writes fail with
    /// [`LcioError::WriterClosed`]; file-backed writers can be reopened.
    pub fn close(&mut self) -> Result<(), LcioError> {
        if let Some(mut records) = self.records.take() {
            records.flush()?;
        }
        Ok(())
    }

    /// Returns `true` once [`LcioWriter::close`] has been called.
    pub const fn is_closed(&self) -> bool {
        self.records.is_none()
    }

    /// Flush and return the sink.
    pub fn into_inner(mut self) -> Result<W, LcioError> {
        let mut records = self.records.take().ok_or(LcioError::WriterClosed)?;
        records.flush()?;
        Ok(records.into_inner())
    }

    /// Collections of `event` that will be written, with their codecs.
    fn plan<'e>(&self, event: &'e Event) -> Result<Vec<Planned<'e>>, LcioError> {
        let mut plan = Vec::with_capacity(event.len());
        for (id, name, collection) in event.iter() {
            if collection.is_transient() {
                debug!(collection = name, "transient collection not written");
                continue;
            }
            if !self.config.admits(name) {
                debug!(collection = name, "collection filtered out");
                continue;
            }
            if !is_valid_collection_name(name) {
                return Err(LcioError::InvalidCollectionName(name.to_owned()));
            }
            let flags = collection
                .flags()
                .with(Flags::SUBSET, collection.is_subset());
            let Some(codec) = self.registry.lookup_by_kind(collection.kind(), flags) else {
                if self.config.strict_handlers {
                    return Err(LcioError::NoHandler {
                        collection: name.to_owned(),
                        kind: collection.kind(),
                    });
                }
                debug!(collection = name, kind = %collection.kind(), "no handler, not written");
                continue;
            };
            plan.push(Planned {
                id,
                name,
                collection,
                codec,
            });
        }
        Ok(plan)
    }
}
