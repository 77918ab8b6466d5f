// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Events through the record stream: files, filters, run headers and the
//! failures a reader must report.
#![allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp, clippy::cast_precision_loss)]

mod common;

use common::calo_hit;
use lcio_codec::header::{
    write_event_header, EVENT_HEADER_BLOCK, EVENT_HEADER_RECORD, EVENT_RECORD, RUN_RECORD,
};
use lcio_codec::version::{ordinal, CURRENT};
use lcio_codec::{write_parameters, LcioError, LcioReader, LcioWriter, ReaderConfig, WriterConfig};
use lcio_event::elements::{LcRelation, RawCalorimeterHit};
use lcio_event::flags::{calo, relation};
use lcio_event::{Collection, Element, ElementKind, Event, Flags, ObjRef, Parameters, RunHeader};
use lcio_sio::{BlockVersion, PointerTag, RawBlock, RecordReader, RecordWriter, SioWriter};

/// Three hits with positions but no times, and a weighted relation
/// collection linking hit 0 to hit 2 and hit 1 to hit 0.
fn hits_and_links(run: i32, number: i32) -> Event {
    let mut hits = Collection::new(ElementKind::CalorimeterHit)
        .flagged(calo::LONG, true)
        .flagged(calo::TIME, false);
    for i in 0..3 {
        hits.push(calo_hit(i)).unwrap();
    }
    let mut event = Event::new(run, number);
    event.detector_name = "sidloi3".into();
    let id = event.add_collection("EcalHits", hits).unwrap();

    let mut links = Collection::new(ElementKind::LcRelation).flagged(relation::WEIGHTED, true);
    for (from, to, weight) in [(0, 2, 0.75), (1, 0, 0.25)] {
        links
            .push(LcRelation {
                from: Some(ObjRef::new(id, from)),
                to: Some(ObjRef::new(id, to)),
                weight,
            })
            .unwrap();
    }
    event.add_collection("HitLinks", links).unwrap();
    event
}

fn to_bytes(events: &[Event], config: WriterConfig) -> Vec<u8> {
    let mut writer = LcioWriter::with_config(Vec::new(), Default::default(), config);
    for e in events {
        writer.write_event(e).unwrap();
    }
    writer.into_inner().unwrap()
}

fn record_names(bytes: &[u8]) -> Vec<String> {
    let mut records = RecordReader::new(bytes);
    let mut names = Vec::new();
    while let Some(record) = records.next_record().unwrap() {
        names.push(record.name);
    }
    names
}

/// Header record declaring `blocks`, then a data record holding `data`.
fn raw_event(version: BlockVersion, blocks: &[(&str, String)], data: Vec<RawBlock>) -> Vec<u8> {
    let mut header = SioWriter::new();
    write_event_header(&mut header, &Event::new(1, 1), blocks, ordinal(version)).unwrap();
    let mut records = RecordWriter::new(Vec::new());
    records
        .write_record(
            EVENT_HEADER_RECORD,
            &[RawBlock::new(EVENT_HEADER_BLOCK, version, header)],
        )
        .unwrap();
    records.write_record(EVENT_RECORD, &data).unwrap();
    records.into_inner()
}

#[test]
fn file_round_trip_keeps_values_and_links() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.slcio");
    let event = hits_and_links(5, 17);

    let mut writer = LcioWriter::create(&path).unwrap();
    writer.write_event(&event).unwrap();
    writer.close().unwrap();

    let mut reader = LcioReader::open(&path).unwrap();
    let back = reader.read_event().unwrap().unwrap();
    assert!(reader.read_event().unwrap().is_none());
    assert_eq!(reader.events_read(), 1);
    assert_eq!(reader.run_header().unwrap().run, 5);

    assert_eq!(back.run, 5);
    assert_eq!(back.event_number, 17);
    assert_eq!(back.detector_name, "sidloi3");

    let hits = back.collection("EcalHits").unwrap();
    assert_eq!(hits.flags(), event.collection("EcalHits").unwrap().flags());
    assert_eq!(hits.len(), 3);
    for (i, h) in hits.elements().iter().enumerate() {
        let h = h.as_calorimeter_hit().unwrap();
        let orig = calo_hit(i as i32);
        assert_eq!(h.cell_id0, orig.cell_id0);
        assert_eq!(h.energy, orig.energy);
        assert_eq!(h.position, orig.position);
        // neither TIME nor ID1 was set
        assert_eq!(h.time, 0.0);
        assert_eq!(h.cell_id1, 0);
    }

    let id = back.id_of("EcalHits").unwrap();
    let links = back.collection("HitLinks").unwrap();
    let first = links.get(0).unwrap().as_relation().unwrap();
    assert_eq!(first.from, Some(ObjRef::new(id, 0)));
    assert_eq!(first.to, Some(ObjRef::new(id, 2)));
    assert_eq!(first.weight, 0.75);
    let second = links.get(1).unwrap().as_relation().unwrap();
    assert_eq!(second.to, Some(ObjRef::new(id, 0)));
    assert_eq!(
        back.get(second.from.unwrap()).unwrap().as_calorimeter_hit().unwrap().cell_id0,
        101
    );
}

#[test]
fn subset_collections_point_into_owners() {
    let mut event = hits_and_links(1, 1);
    let id = event.id_of("EcalHits").unwrap();
    let mut picked = Collection::subset(ElementKind::CalorimeterHit);
    picked.push_ref(ObjRef::new(id, 2)).unwrap();
    picked.push_ref(ObjRef::new(id, 0)).unwrap();
    event.add_collection("Selected", picked).unwrap();

    let bytes = to_bytes(&[event], WriterConfig::default());
    let back = LcioReader::new(bytes.as_slice()).read_event().unwrap().unwrap();
    let selected = back.collection("Selected").unwrap();
    assert!(selected.is_subset());
    let id = back.id_of("EcalHits").unwrap();
    assert_eq!(selected.refs(), &[ObjRef::new(id, 2), ObjRef::new(id, 0)]);
}

#[test]
fn references_to_untagged_raw_hits_are_pruned() {
    let mut raw = Collection::new(ElementKind::RawCalorimeterHit).flagged(calo::NO_PTR, true);
    raw.push(RawCalorimeterHit {
        amplitude: 40,
        ..RawCalorimeterHit::default()
    })
    .unwrap();
    let mut event = Event::new(1, 1);
    let raw_id = event.add_collection("RawHits", raw).unwrap();
    let mut hit = calo_hit(1);
    hit.raw_hit = Some(ObjRef::new(raw_id, 0));
    let mut hits = Collection::new(ElementKind::CalorimeterHit);
    hits.push(hit).unwrap();
    event.add_collection("Hits", hits).unwrap();

    let bytes = to_bytes(&[event], WriterConfig::default());
    let back = LcioReader::new(bytes.as_slice()).read_event().unwrap().unwrap();
    let expected = Element::from(RawCalorimeterHit {
        amplitude: 40,
        ..RawCalorimeterHit::default()
    });
    assert_eq!(back.collection("RawHits").unwrap().elements(), &[expected]);
    let hit = back.collection("Hits").unwrap().get(0).unwrap();
    assert_eq!(hit.as_calorimeter_hit().unwrap().raw_hit, None);
}

#[test]
fn relation_subsets_are_written_empty() {
    let mut event = hits_and_links(1, 1);
    let links = event.id_of("HitLinks").unwrap();
    let mut picked = Collection::subset(ElementKind::LcRelation);
    picked.push_ref(ObjRef::new(links, 1)).unwrap();
    event.add_collection("PickedLinks", picked).unwrap();

    let bytes = to_bytes(&[event], WriterConfig::default());
    let back = LcioReader::new(bytes.as_slice()).read_event().unwrap().unwrap();
    let picked = back.collection("PickedLinks").unwrap();
    assert!(picked.is_subset());
    assert!(picked.is_empty());
    assert_eq!(back.collection("HitLinks").unwrap().len(), 2);
}

#[test]
fn transient_and_filtered_collections_are_not_written() {
    let mut event = hits_and_links(1, 1);
    let scratch = Collection::new(ElementKind::LcIntVec).flagged(Flags::TRANSIENT, true);
    event.add_collection("Scratch", scratch).unwrap();

    let bytes = to_bytes(&[event.clone()], WriterConfig::default());
    let back = LcioReader::new(bytes.as_slice()).read_event().unwrap().unwrap();
    assert_eq!(back.names().collect::<Vec<_>>(), ["EcalHits", "HitLinks"]);

    // Links into an ignored collection come back null.
    let mut config = WriterConfig::default();
    config.ignore.insert("EcalHits".into());
    let bytes = to_bytes(&[event.clone()], config);
    let back = LcioReader::new(bytes.as_slice()).read_event().unwrap().unwrap();
    assert_eq!(back.names().collect::<Vec<_>>(), ["HitLinks"]);
    let link = back.collection("HitLinks").unwrap().get(0).unwrap().as_relation().unwrap();
    assert_eq!((link.from, link.to), (None, None));
    assert_eq!(link.weight, 0.75);

    let mut writer = LcioWriter::new(Vec::new());
    writer.add_write_only("EcalHits");
    writer.add_write_only("Scratch");
    writer.write_event(&event).unwrap();
    writer.clear_write_only();
    writer.add_ignore("HitLinks");
    writer.write_event(&event).unwrap();
    assert!(writer.remove_ignore("HitLinks"));
    writer.write_event(&event).unwrap();
    let bytes = writer.into_inner().unwrap();

    let mut reader = LcioReader::new(bytes.as_slice());
    let names: Vec<Vec<String>> = reader
        .events()
        .map(|e| e.unwrap().names().map(str::to_owned).collect())
        .collect();
    assert_eq!(
        names,
        vec![
            vec!["EcalHits".to_owned()],
            vec!["EcalHits".to_owned()],
            vec!["EcalHits".to_owned(), "HitLinks".to_owned()],
        ]
    );
}

#[test]
fn run_headers_follow_run_and_detector_changes() {
    let mut other_detector = hits_and_links(2, 3);
    other_detector.detector_name = "ild".into();
    let events = [
        hits_and_links(1, 1),
        hits_and_links(1, 2),
        hits_and_links(2, 1),
        other_detector,
    ];
    let names = record_names(&to_bytes(&events, WriterConfig::default()));
    let runs = names.iter().filter(|n| *n == RUN_RECORD).count();
    assert_eq!(runs, 3);
    assert_eq!(names[0], RUN_RECORD);
    assert_eq!(names[1], EVENT_HEADER_RECORD);
    assert_eq!(names[2], EVENT_RECORD);
}

#[test]
fn reopening_appends_and_repeats_the_run_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("append.slcio");

    let mut writer = LcioWriter::create(&path).unwrap();
    writer.write_event(&hits_and_links(4, 1)).unwrap();
    writer.close().unwrap();
    assert!(writer.is_closed());
    assert!(matches!(
        writer.write_event(&hits_and_links(4, 2)),
        Err(LcioError::WriterClosed)
    ));

    writer.reopen().unwrap();
    assert!(!writer.is_closed());
    writer.write_event(&hits_and_links(4, 2)).unwrap();
    writer.close().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let names = record_names(&bytes);
    assert_eq!(names.iter().filter(|n| *n == RUN_RECORD).count(), 2);

    let mut reader = LcioReader::new(bytes.as_slice());
    let numbers: Vec<i32> = reader.events().map(|e| e.unwrap().event_number).collect();
    assert_eq!(numbers, [1, 2]);
}

#[test]
fn explicit_run_header_is_read_back() {
    let mut writer = LcioWriter::new(Vec::new());
    let mut run = RunHeader::new(9, "sidloi3");
    run.description = "cosmics".into();
    run.active_subdetectors = vec!["EcalBarrel".into()];
    writer.write_run_header(&run).unwrap();
    // Same run and detector: no second run header.
    writer.write_event(&hits_and_links(9, 1)).unwrap();
    let bytes = writer.into_inner().unwrap();
    assert_eq!(
        record_names(&bytes),
        [RUN_RECORD, EVENT_HEADER_RECORD, EVENT_RECORD]
    );

    let mut reader = LcioReader::new(bytes.as_slice());
    assert!(reader.read_event().unwrap().is_some());
    assert_eq!(reader.run_header(), Some(&run));
}

#[test]
fn skipping_counts_events_and_tracks_runs() {
    let events: Vec<Event> = [(1, 1), (1, 2), (2, 3), (2, 4)]
        .into_iter()
        .map(|(run, n)| hits_and_links(run, n))
        .collect();
    let bytes = to_bytes(&events, WriterConfig::default());

    let mut reader = LcioReader::new(bytes.as_slice());
    assert_eq!(reader.skip_events(3).unwrap(), 3);
    assert_eq!(reader.run_header().unwrap().run, 2);
    assert_eq!(reader.read_event().unwrap().unwrap().event_number, 4);
    assert_eq!(reader.skip_events(5).unwrap(), 0);
    assert!(reader.read_event().unwrap().is_none());
}

#[test]
fn data_record_without_header_is_an_order_violation() {
    let mut records = RecordWriter::new(Vec::new());
    records.write_record(EVENT_RECORD, &[]).unwrap();
    let bytes = records.into_inner();
    let err = LcioReader::new(bytes.as_slice()).read_event().unwrap_err();
    assert!(matches!(
        err,
        LcioError::RecordOrderViolation { expected, .. } if expected == EVENT_HEADER_RECORD
    ));
}

#[test]
fn header_at_end_of_stream_is_an_order_violation() {
    let bytes = raw_event(CURRENT, &[], Vec::new());
    // Drop the data record by writing only the header.
    let mut records = RecordReader::new(bytes.as_slice());
    let header = records.next_record().unwrap().unwrap();
    let mut truncated = RecordWriter::new(Vec::new());
    truncated.write_record(&header.name, &header.blocks).unwrap();
    let bytes = truncated.into_inner();

    match LcioReader::new(bytes.as_slice()).read_event() {
        Err(LcioError::RecordOrderViolation { expected, found }) => {
            assert_eq!(expected, EVENT_RECORD);
            assert_eq!(found, "end of stream");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_wire_types_are_skipped_or_rejected() {
    let mut body = SioWriter::new();
    body.write_i32(0);
    body.write_i32(0);
    let bytes = raw_event(
        CURRENT,
        &[("Mystery", "NoSuchType".to_owned())],
        vec![RawBlock::new("Mystery", CURRENT, body)],
    );

    let event = LcioReader::new(bytes.as_slice()).read_event().unwrap().unwrap();
    assert!(event.is_empty());

    let strict = ReaderConfig {
        skip_unknown_blocks: false,
    };
    let mut reader = LcioReader::with_config(bytes.as_slice(), Default::default(), strict);
    match reader.read_event() {
        Err(LcioError::UnknownBlockType { block, wire_type }) => {
            assert_eq!(block, "Mystery");
            assert_eq!(wire_type, "NoSuchType");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn legacy_event_headers_have_no_parameters() {
    let legacy = BlockVersion::new(0, 8);
    let bytes = raw_event(legacy, &[], Vec::new());
    let event = LcioReader::new(bytes.as_slice()).read_event().unwrap().unwrap();
    assert_eq!((event.run, event.event_number), (1, 1));
    assert!(event.is_empty());
    assert!(event.parameters.is_empty());
}

#[test]
fn versions_below_the_floor_are_rejected() {
    let bytes = raw_event(BlockVersion::new(0, 7), &[], Vec::new());
    let err = LcioReader::new(bytes.as_slice()).read_event().unwrap_err();
    assert!(matches!(err, LcioError::FormatTooOld { major: 0, minor: 7, ordinal: 7 }));
}

#[test]
fn dangling_pointer_aborts_the_event() {
    let mut body = SioWriter::new();
    body.write_i32(0);
    write_parameters(&mut body, &Parameters::new()).unwrap();
    body.write_len(1).unwrap();
    body.write_pntr(PointerTag(99));
    body.write_pntr(PointerTag::NULL);
    let bytes = raw_event(
        CURRENT,
        &[("Links", "LCRelation".to_owned())],
        vec![RawBlock::new("Links", CURRENT, body)],
    );

    match LcioReader::new(bytes.as_slice()).read_event() {
        Err(LcioError::UnresolvedReference { collection, tag }) => {
            assert_eq!(collection, "Links");
            assert_eq!(tag, PointerTag(99));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn invalid_names_leave_the_stream_untouched() {
    let mut event = hits_and_links(1, 1);
    event
        .add_collection("bad name", Collection::new(ElementKind::LcFloatVec))
        .unwrap();
    let mut writer = LcioWriter::new(Vec::new());
    let err = writer.write_event(&event).unwrap_err();
    assert!(matches!(err, LcioError::InvalidCollectionName(ref n) if n == "bad name"));
    assert!(writer.into_inner().unwrap().is_empty());
}

#[test]
fn writer_config_deserializes_with_defaults() {
    let config: WriterConfig = serde_json::from_str(r#"{"ignore": ["Scratch"]}"#).unwrap();
    assert!(config.ignore.contains("Scratch"));
    assert!(config.only.is_empty());
    assert!(!config.strict_handlers);

    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(serde_json::from_str::<WriterConfig>(&json).unwrap(), config);

    let reader: ReaderConfig = serde_json::from_str("{}").unwrap();
    assert!(reader.skip_unknown_blocks);
}
