// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::Table;
use lcio_codec::{HandlerRegistry, LcioReader, LcioWriter};
use lcio_event::{Event, RunHeader};
use tracing::info;

use crate::config::CliPrefs;

fn open(path: &Path, prefs: &CliPrefs) -> Result<LcioReader<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(LcioReader::with_config(
        BufReader::new(file),
        Arc::new(HandlerRegistry::default()),
        prefs.reader.clone(),
    ))
}

fn add_event_rows(table: &mut Table, event: &Event) {
    let run = event.run.to_string();
    let number = event.event_number.to_string();
    if event.is_empty() {
        table.add_row(vec![
            run,
            number,
            event.detector_name.clone(),
            "-".into(),
            "-".into(),
            "0".into(),
        ]);
        return;
    }
    for (_, name, collection) in event.iter() {
        let mut kind = collection.kind().wire_type().to_owned();
        if collection.is_subset() {
            kind.push_str(" (subset)");
        }
        table.add_row(vec![
            run.clone(),
            number.clone(),
            event.detector_name.clone(),
            name.to_owned(),
            kind,
            collection.len().to_string(),
        ]);
    }
}

/// Table of up to `max` events after skipping `skip`, one row per collection.
pub fn dump(path: &Path, skip: usize, max: usize, prefs: &CliPrefs) -> Result<Table> {
    let mut reader = open(path, prefs)?;
    reader.skip_events(skip)?;

    let mut table = Table::new();
    table.set_header(vec!["run", "event", "detector", "collection", "type", "elements"]);
    for _ in 0..max {
        let Some(event) = reader
            .read_event()
            .with_context(|| format!("reading {}", path.display()))?
        else {
            break;
        };
        add_event_rows(&mut table, &event);
    }
    Ok(table)
}

/// Number of events in `path`. Collections are not decoded.
pub fn count(path: &Path, prefs: &CliPrefs) -> Result<usize> {
    let mut reader = open(path, prefs)?;
    reader
        .skip_events(usize::MAX)
        .with_context(|| format!("reading {}", path.display()))
}

/// Copy every event of `input` to `output` through the saved writer filters
/// extended with `ignore` and `only`. Run headers are carried over.
pub fn copy(
    input: &Path,
    output: &Path,
    ignore: &[String],
    only: &[String],
    prefs: &CliPrefs,
) -> Result<usize> {
    let mut reader = open(input, prefs)?;
    let mut config = prefs.writer.clone();
    config.ignore.extend(ignore.iter().cloned());
    config.only.extend(only.iter().cloned());
    let mut writer =
        LcioWriter::create_with_config(output, Arc::new(HandlerRegistry::default()), config)
            .with_context(|| format!("creating {}", output.display()))?;

    let mut last_run: Option<RunHeader> = None;
    let mut copied = 0;
    while let Some(event) = reader
        .read_event()
        .with_context(|| format!("reading {}", input.display()))?
    {
        if let Some(run) = reader.run_header() {
            if last_run.as_ref() != Some(run) {
                writer.write_run_header(run)?;
                last_run = Some(run.clone());
            }
        }
        writer
            .write_event(&event)
            .with_context(|| format!("writing event {} of run {}", event.event_number, event.run))?;
        copied += 1;
    }
    writer.close()?;
    info!(copied, output = %output.display(), "copy finished");
    Ok(copied)
}
