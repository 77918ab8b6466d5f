// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Run and event header bodies, record names and collection name rules.

use lcio_event::{Event, Parameters, RunHeader};
use lcio_sio::{SioReader, SioWriter};

use crate::envelope::{read_parameters, write_parameters, PARAMETERS_SINCE};
use crate::LcioError;

/// Record holding a run header.
pub const RUN_RECORD: &str = "LCRunHeader";
/// Block inside [`RUN_RECORD`].
pub const RUN_BLOCK: &str = "RunHeader";
/// Record holding an event header.
pub const EVENT_HEADER_RECORD: &str = "LCEventHeader";
/// Block inside [`EVENT_HEADER_RECORD`].
pub const EVENT_HEADER_BLOCK: &str = "EventHeader";
/// Record holding the collections of the preceding event header.
pub const EVENT_RECORD: &str = "LCEvent";

/// Decoded event header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventHeader {
    /// Run number.
    pub run: i32,
    /// Event number.
    pub event_number: i32,
    /// Time stamp.
    pub timestamp: i64,
    /// Detector name.
    pub detector_name: String,
    /// `(block name, wire type)` for every block of the data record.
    pub blocks: Vec<(String, String)>,
    /// Event parameters.
    pub parameters: Parameters,
}

impl EventHeader {
    /// Wire type declared for block `name`.
    pub fn wire_type_of(&self, name: &str) -> Option<&str> {
        self.blocks
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.as_str())
    }

    /// Empty event carrying this header's fields.
    pub fn to_event(&self) -> Event {
        let mut event = Event::new(self.run, self.event_number);
        event.timestamp = self.timestamp;
        event.detector_name.clone_from(&self.detector_name);
        event.parameters = self.parameters.clone();
        event
    }
}

/// Read an event header body written at ordinal `version`.
pub fn read_event_header(r: &mut SioReader<'_>, version: u32) -> Result<EventHeader, LcioError> {
    let run = r.read_i32()?;
    let event_number = r.read_i32()?;
    let timestamp = r.read_i64()?;
    let detector_name = r.read_string()?;
    let n = r.read_len(8)?;
    let mut blocks = Vec::with_capacity(n);
    for _ in 0..n {
        let name = r.read_string()?;
        let wire_type = r.read_string()?;
        blocks.push((name, wire_type));
    }
    Ok(EventHeader {
        run,
        event_number,
        timestamp,
        detector_name,
        blocks,
        parameters: read_header_parameters(r, version)?,
    })
}

/// Write the header of `event` at ordinal `version`, declaring `blocks` as
/// its data record.
pub fn write_event_header(
    w: &mut SioWriter,
    event: &Event,
    blocks: &[(&str, String)],
    version: u32,
) -> Result<(), LcioError> {
    w.write_i32(event.run);
    w.write_i32(event.event_number);
    w.write_i64(event.timestamp);
    w.write_string(&event.detector_name)?;
    w.write_len(blocks.len())?;
    for (name, wire_type) in blocks {
        w.write_string(name)?;
        w.write_string(wire_type)?;
    }
    write_header_parameters(w, &event.parameters, version)
}

/// Read a run header body written at ordinal `version`.
pub fn read_run_header(r: &mut SioReader<'_>, version: u32) -> Result<RunHeader, LcioError> {
    let run = r.read_i32()?;
    let detector_name = r.read_string()?;
    let description = r.read_string()?;
    let n = r.read_len(4)?;
    let active_subdetectors = (0..n)
        .map(|_| r.read_string())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RunHeader {
        run,
        detector_name,
        description,
        active_subdetectors,
        parameters: read_header_parameters(r, version)?,
    })
}

/// Write a run header body at ordinal `version`.
pub fn write_run_header(
    w: &mut SioWriter,
    header: &RunHeader,
    version: u32,
) -> Result<(), LcioError> {
    w.write_i32(header.run);
    w.write_string(&header.detector_name)?;
    w.write_string(&header.description)?;
    w.write_len(header.active_subdetectors.len())?;
    for name in &header.active_subdetectors {
        w.write_string(name)?;
    }
    write_header_parameters(w, &header.parameters, version)
}

// Headers gained their parameter section together with collections.
fn read_header_parameters(r: &mut SioReader<'_>, version: u32) -> Result<Parameters, LcioError> {
    if version > PARAMETERS_SINCE {
        read_parameters(r)
    } else {
        Ok(Parameters::default())
    }
}

fn write_header_parameters(
    w: &mut SioWriter,
    parameters: &Parameters,
    version: u32,
) -> Result<(), LcioError> {
    if version > PARAMETERS_SINCE {
        write_parameters(w, parameters)?;
    }
    Ok(())
}

/// Collection names are identifiers: a letter or `_`, then letters, digits
/// or `_`.
pub fn is_valid_collection_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_') && chars.all(|c| c.is_alphanumeric() || c == '_')
}
