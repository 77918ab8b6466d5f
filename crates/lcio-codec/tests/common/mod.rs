// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code, clippy::unwrap_used, clippy::cast_precision_loss)]

use lcio_codec::{
    resolve_event, HandlerRegistry, LcioError, TagAssignments, TagTable,
};
use lcio_event::elements::{CalorimeterHit, McParticle};
use lcio_event::{CollectionId, Event};
use lcio_sio::{SioReader, SioWriter};

/// Encode every collection of `event` at `version` and decode the bodies into
/// a fresh event, running reference resolution. Asserts every body is
/// consumed exactly.
pub fn reencode(event: &Event, version: u32) -> Result<Event, LcioError> {
    let registry = HandlerRegistry::default();
    let mut tags = TagAssignments::new();
    for (id, _, c) in event.iter() {
        let codec = registry.lookup_by_kind(c.kind(), c.flags()).unwrap();
        codec.assign_tags(c, id, version, &mut tags)?;
    }

    let mut bodies = Vec::new();
    for (id, name, c) in event.iter() {
        let codec = registry.lookup_by_kind(c.kind(), c.flags()).unwrap();
        let mut w = SioWriter::new();
        codec.encode(&mut w, c, id, version, &mut tags)?;
        bodies.push((name.to_owned(), codec.wire_type(), w.into_vec()));
    }

    let mut out = Event::new(event.run, event.event_number);
    let mut table = TagTable::new();
    let mut actions = Vec::new();
    for (name, wire_type, body) in &bodies {
        let codec = registry.lookup_by_wire_type(wire_type).unwrap();
        let mut r = SioReader::new(body);
        let (c, action) = codec.decode(&mut r, CollectionId(out.len()), version, &mut table)?;
        assert!(r.is_exhausted(), "{name}: {} bytes left", r.remaining());
        out.add_collection(name.clone(), c)?;
        actions.extend(action);
    }
    resolve_event(&mut out, &table, &actions)?;
    Ok(out)
}

/// Particle with a known charge and distinct kinematics.
pub fn particle(pdg: i32, seed: f32) -> McParticle {
    McParticle {
        pdg,
        generator_status: 1,
        vertex: [f64::from(seed), 0.5, -1.0],
        time: seed * 0.1,
        momentum: [seed, 2.0 * seed, 3.0],
        mass: 0.105,
        charge: Some(-1.0),
        ..McParticle::default()
    }
}

/// Calorimeter hit with distinct values.
pub fn calo_hit(i: i32) -> CalorimeterHit {
    CalorimeterHit {
        cell_id0: 100 + i,
        cell_id1: 200 + i,
        energy: 0.25 * i as f32,
        energy_error: 0.01,
        time: 4.0 + i as f32,
        position: [i as f32, 2.0, 3.0],
        hit_type: 1,
        raw_hit: None,
    }
}
