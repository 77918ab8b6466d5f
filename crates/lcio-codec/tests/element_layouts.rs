// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-kind layouts across format versions and flag combinations.
#![allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp, clippy::cast_precision_loss)]

mod common;

use common::{calo_hit, particle, reencode};
use lcio_codec::handlers::ALGORITHM_TYPES_KEY;
use lcio_codec::version::CURRENT_ORDINAL;
use lcio_event::elements::{
    CalorimeterHit, Cluster, LcFloatVec, LcGenericObject, LcIntVec, LcStrVec, McContribution,
    ParticleId, RawCalorimeterHit, ReconstructedParticle, SimCalorimeterHit, SimTrackerHit,
    TpcHit, Track, TrackState, TrackerHit, TrackerRawData, Vertex,
};
use lcio_event::flags::{calo, cluster, simcalo, simtracker, tpc, track, tracker_raw};
use lcio_event::{Collection, CollectionId, Element, ElementKind, Event, ObjRef};

fn at(id: usize, index: usize) -> ObjRef {
    ObjRef::new(CollectionId(id), index)
}

fn event_with(collections: Vec<(&str, Collection)>) -> Event {
    let mut event = Event::new(1, 1);
    for (name, c) in collections {
        event.add_collection(name, c).unwrap();
    }
    event
}

fn elements_of<'e>(event: &'e Event, name: &str) -> &'e [Element] {
    event.collection(name).unwrap().elements()
}

fn particles(n: usize) -> Collection {
    let mut mc = Collection::new(ElementKind::McParticle);
    for i in 0..n {
        let mut p = particle(13, i as f32);
        p.endpoint = Some([1.0, 2.0, 3.0]);
        mc.push(p).unwrap();
    }
    mc
}

#[test]
fn calorimeter_hits_follow_flags_and_versions() {
    let mut raw = Collection::new(ElementKind::RawCalorimeterHit).flagged(calo::ID1, true);
    raw.push(RawCalorimeterHit {
        cell_id0: 1,
        cell_id1: 2,
        amplitude: 900,
        time_stamp: 0,
    })
    .unwrap();

    let mut hits = Collection::new(ElementKind::CalorimeterHit)
        .flagged(calo::ID1, true)
        .flagged(calo::LONG, true)
        .flagged(calo::TIME, true)
        .flagged(calo::ENERGY_ERROR, true);
    let mut h = calo_hit(3);
    h.raw_hit = Some(at(0, 0));
    hits.push(h.clone()).unwrap();

    let event = event_with(vec![("Raw", raw), ("Hits", hits)]);
    let back = reencode(&event, CURRENT_ORDINAL).unwrap();
    assert_eq!(elements_of(&back, "Raw"), elements_of(&event, "Raw"));
    assert_eq!(elements_of(&back, "Hits"), elements_of(&event, "Hits"));

    // 1.2: no time, no type, no error, and the pointer bit is inverted.
    let back = reencode(&event, 1002).unwrap();
    let got = elements_of(&back, "Hits")[0].as_calorimeter_hit().unwrap();
    assert_eq!(got.time, 0.0);
    assert_eq!(got.hit_type, 0);
    assert_eq!(got.energy_error, 0.0);
    assert_eq!(got.position, h.position);
    assert_eq!(got.raw_hit, None);
}

#[test]
fn calorimeter_raw_pointer_polarity_before_1_3() {
    let mut raw = Collection::new(ElementKind::RawCalorimeterHit);
    raw.push(RawCalorimeterHit::default()).unwrap();
    let mut hits = Collection::new(ElementKind::CalorimeterHit).flagged(calo::NO_PTR, true);
    hits.push(CalorimeterHit {
        raw_hit: Some(at(0, 0)),
        ..CalorimeterHit::default()
    })
    .unwrap();
    let event = event_with(vec![("Raw", raw), ("Hits", hits)]);

    let old = reencode(&event, 1002).unwrap();
    let got = elements_of(&old, "Hits")[0].as_calorimeter_hit().unwrap();
    assert_eq!(got.raw_hit, Some(at(0, 0)));

    let new = reencode(&event, CURRENT_ORDINAL).unwrap();
    let got = elements_of(&new, "Hits")[0].as_calorimeter_hit().unwrap();
    assert_eq!(got.raw_hit, None);
}

#[test]
fn simulated_calorimeter_hits_resolve_contributions() {
    let mut hits = Collection::new(ElementKind::SimCalorimeterHit)
        .flagged(simcalo::LONG, true)
        .flagged(simcalo::STEP, true);
    hits.push(SimCalorimeterHit {
        cell_id0: 7,
        energy: 0.3,
        position: [1.0, 2.0, 3.0],
        contributions: vec![
            McContribution {
                particle: Some(at(0, 1)),
                energy: 0.1,
                time: 2.0,
                pdg: 22,
                step_position: [0.5, 0.5, 0.5],
            },
            McContribution {
                particle: Some(at(0, 0)),
                energy: 0.2,
                time: 1.0,
                pdg: 11,
                step_position: [0.1, 0.2, 0.3],
            },
        ],
        ..SimCalorimeterHit::default()
    })
    .unwrap();
    let event = event_with(vec![("MCParticle", particles(2)), ("SimCalo", hits)]);
    let back = reencode(&event, CURRENT_ORDINAL).unwrap();
    assert_eq!(elements_of(&back, "SimCalo"), elements_of(&event, "SimCalo"));

    // Step positions arrived with 1.52.
    let old = reencode(&event, 1051).unwrap();
    let Element::SimCalorimeterHit(h) = &elements_of(&old, "SimCalo")[0] else {
        panic!("wrong kind");
    };
    assert_eq!(h.contributions[0].pdg, 22);
    assert_eq!(h.contributions[0].step_position, [0.0; 3]);
    assert_eq!(h.contributions[1].particle, Some(at(0, 0)));
}

#[test]
fn simulated_tracker_hits_gate_momentum_and_quality() {
    let mut hits = Collection::new(ElementKind::SimTrackerHit)
        .flagged(simtracker::MOMENTUM, true)
        .flagged(simtracker::ID1, true);
    let hit = SimTrackerHit {
        cell_id0: 5,
        cell_id1: 6,
        position: [1.5, -2.5, 300.0],
        edep: 1e-4,
        time: 3.2,
        particle: Some(at(0, 0)),
        momentum: [0.1, 0.2, 0.3],
        path_length: 0.4,
        quality: 3,
    };
    hits.push(hit.clone()).unwrap();
    let event = event_with(vec![("MCParticle", particles(1)), ("Tracker", hits)]);
    assert_eq!(
        elements_of(&reencode(&event, CURRENT_ORDINAL).unwrap(), "Tracker"),
        elements_of(&event, "Tracker")
    );

    let old = reencode(&event, 1006).unwrap();
    let Element::SimTrackerHit(h) = &elements_of(&old, "Tracker")[0] else {
        panic!("wrong kind");
    };
    assert_eq!(h.momentum, hit.momentum);
    assert_eq!(h.path_length, 0.0);
    assert_eq!(h.quality, 0);
    assert_eq!(h.particle, Some(at(0, 0)));
}

#[test]
fn tracker_hits_before_1_3_carry_one_raw_pointer() {
    let mut raw = Collection::new(ElementKind::TrackerRawData).flagged(tracker_raw::ID1, true);
    for i in 0..2 {
        raw.push(TrackerRawData {
            cell_id0: i,
            cell_id1: -i,
            time: 17,
            adc_values: vec![1, -2, 3],
        })
        .unwrap();
    }
    let mut hits = Collection::new(ElementKind::TrackerHit);
    hits.push(TrackerHit {
        cell_id0: 9,
        hit_type: 2,
        position: [1.0, 2.0, 3.0],
        covariance: [0.1; 6],
        edep: 0.5,
        edep_error: 0.05,
        time: 1.0,
        quality: 1,
        raw_hits: vec![at(0, 1), at(0, 0)],
        ..TrackerHit::default()
    })
    .unwrap();
    let event = event_with(vec![("Raw", raw), ("Hits", hits)]);
    let back = reencode(&event, CURRENT_ORDINAL).unwrap();
    assert_eq!(elements_of(&back, "Raw"), elements_of(&event, "Raw"));
    assert_eq!(elements_of(&back, "Hits"), elements_of(&event, "Hits"));

    let old = reencode(&event, 1002).unwrap();
    let Element::TrackerHit(h) = &elements_of(&old, "Hits")[0] else {
        panic!("wrong kind");
    };
    assert_eq!(h.raw_hits, vec![at(0, 1)]);
    assert_eq!(h.cell_id0, 0);
    assert_eq!(h.edep_error, 0.0);
}

#[test]
fn tpc_hits_honour_raw_and_pointer_bits() {
    let mut hits = Collection::new(ElementKind::TpcHit)
        .flagged(tpc::RAW, true)
        .flagged(tpc::NO_PTR, true);
    hits.push(TpcHit {
        cell_id: 4,
        time: 2.0,
        charge: 30.0,
        quality: 0,
        raw_data: vec![5, 6, 7],
    })
    .unwrap();
    let event = event_with(vec![("TPC", hits)]);
    let back = reencode(&event, CURRENT_ORDINAL).unwrap();
    assert_eq!(elements_of(&back, "TPC"), elements_of(&event, "TPC"));
}

fn state(location: i32, omega: f32) -> TrackState {
    TrackState {
        location,
        d0: 0.01,
        phi: 0.3,
        omega,
        z0: -0.2,
        tan_lambda: 0.7,
        covariance: [0.5; 15],
        reference_point: [0.0, 0.0, 1.0],
    }
}

#[test]
fn tracks_use_states_from_2_0() {
    let mut hits = Collection::new(ElementKind::TrackerHit);
    hits.push(TrackerHit::default()).unwrap();
    let mut tracks = Collection::new(ElementKind::Track).flagged(track::HITS, true);
    tracks
        .push(Track {
            track_type: 3,
            states: vec![state(1, 1e-3), state(2, 2e-3)],
            chi2: 12.0,
            ndf: 9,
            dedx: 1.1,
            dedx_error: 0.1,
            radius_of_innermost_hit: 30.0,
            subdetector_hit_numbers: vec![4, 5],
            hits: vec![at(0, 0)],
            ..Track::default()
        })
        .unwrap();
    tracks
        .push(Track {
            tracks: vec![at(1, 0)],
            states: vec![state(0, 0.0)],
            ..Track::default()
        })
        .unwrap();
    let event = event_with(vec![("Hits", hits), ("Tracks", tracks)]);
    let back = reencode(&event, CURRENT_ORDINAL).unwrap();
    assert_eq!(elements_of(&back, "Tracks"), elements_of(&event, "Tracks"));

    let old = reencode(&event, 1011).unwrap();
    let Element::Track(t) = &elements_of(&old, "Tracks")[0] else {
        panic!("wrong kind");
    };
    assert_eq!(t.states, vec![TrackState {
        location: 0,
        ..state(1, 1e-3)
    }]);
    assert_eq!(t.radius_of_innermost_hit, 0.0);
    assert_eq!(t.hits, vec![at(0, 0)]);
}

#[test]
fn clusters_keep_hits_and_fractions_aligned() {
    let mut hits = Collection::new(ElementKind::CalorimeterHit);
    for i in 0..3 {
        hits.push(calo_hit(i)).unwrap();
    }
    let mut clusters = Collection::new(ElementKind::Cluster).flagged(cluster::HITS, true);
    clusters
        .push(Cluster {
            cluster_type: 1,
            energy: 10.0,
            energy_error: 0.5,
            position: [1.0, 2.0, 3.0],
            position_error: [0.1; 6],
            i_theta: 0.2,
            i_phi: 0.4,
            direction_error: [0.01; 3],
            shape: vec![1.0, 2.0],
            particle_ids: vec![ParticleId {
                likelihood: -0.5,
                pid_type: 1,
                pdg: 22,
                algorithm_type: 2,
                parameters: vec![0.9],
            }],
            hits: vec![at(0, 2), at(0, 0)],
            hit_contributions: vec![0.75, 0.25],
            subdetector_energies: vec![6.0, 4.0],
            ..Cluster::default()
        })
        .unwrap();
    clusters
        .push(Cluster {
            clusters: vec![at(1, 0)],
            ..Cluster::default()
        })
        .unwrap();
    let event = event_with(vec![("Hits", hits), ("Clusters", clusters)]);
    let back = reencode(&event, CURRENT_ORDINAL).unwrap();
    assert_eq!(elements_of(&back, "Clusters"), elements_of(&event, "Clusters"));

    // Hits that are not written drop out together with their fractions.
    let mut filtered = Event::new(1, 1);
    filtered
        .add_collection("Empty", Collection::new(ElementKind::CalorimeterHit))
        .unwrap();
    let mut lone = Collection::new(ElementKind::Cluster).flagged(cluster::HITS, true);
    lone.push(Cluster {
        hits: vec![at(5, 0), at(0, 0)],
        hit_contributions: vec![0.6, 0.4],
        ..Cluster::default()
    })
    .unwrap();
    filtered.add_collection("Lone", lone).unwrap();
    let back = reencode(&filtered, CURRENT_ORDINAL).unwrap();
    let Element::Cluster(c) = &elements_of(&back, "Lone")[0] else {
        panic!("wrong kind");
    };
    assert!(c.hits.is_empty());
    assert!(c.hit_contributions.is_empty());
}

#[test]
fn legacy_clusters_have_six_shape_values_and_no_ids() {
    let mut clusters = Collection::new(ElementKind::Cluster);
    clusters
        .push(Cluster {
            energy: 3.0,
            shape: vec![1.0, 2.0, 3.0],
            ..Cluster::default()
        })
        .unwrap();
    let event = event_with(vec![("Clusters", clusters)]);
    let back = reencode(&event, 1002).unwrap();
    let Element::Cluster(c) = &elements_of(&back, "Clusters")[0] else {
        panic!("wrong kind");
    };
    assert_eq!(c.shape, vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);
    assert!(c.particle_ids.is_empty());
}

#[test]
fn reconstructed_particles_and_vertices_link_up() {
    let mut vertices = Collection::new(ElementKind::Vertex);
    vertices
        .push(Vertex {
            primary: true,
            algorithm_type: "ZVTOP".into(),
            chi2: 1.5,
            probability: 0.9,
            position: [0.0, 0.0, 0.1],
            covariance: [0.01; 6],
            parameters: vec![1.0],
            associated_particle: Some(at(1, 1)),
        })
        .unwrap();
    vertices
        .push(Vertex {
            algorithm_type: "LCFIPlus".into(),
            ..Vertex::default()
        })
        .unwrap();

    let mut pfos = Collection::new(ElementKind::ReconstructedParticle);
    pfos.push(ReconstructedParticle {
        particle_type: 11,
        momentum: [1.0, 2.0, 3.0],
        energy: 3.8,
        mass: 0.000_511,
        charge: -1.0,
        particle_ids: vec![ParticleId::default(), ParticleId {
            pdg: 11,
            ..ParticleId::default()
        }],
        pid_used: Some(1),
        goodness_of_pid: 0.8,
        start_vertex: Some(at(0, 0)),
        ..ReconstructedParticle::default()
    })
    .unwrap();
    pfos.push(ReconstructedParticle {
        particles: vec![at(1, 0)],
        ..ReconstructedParticle::default()
    })
    .unwrap();

    let event = event_with(vec![("Vertices", vertices), ("PFOs", pfos)]);
    let back = reencode(&event, CURRENT_ORDINAL).unwrap();
    assert_eq!(elements_of(&back, "Vertices"), elements_of(&event, "Vertices"));
    assert_eq!(elements_of(&back, "PFOs"), elements_of(&event, "PFOs"));
    assert_eq!(
        back.collection("Vertices")
            .unwrap()
            .parameters
            .strings_of(ALGORITHM_TYPES_KEY),
        ["ZVTOP".to_owned(), "LCFIPlus".to_owned()]
    );

    // The start vertex arrived with 1.8.
    let old = reencode(&event, 1007).unwrap();
    let Element::ReconstructedParticle(p) = &elements_of(&old, "PFOs")[0] else {
        panic!("wrong kind");
    };
    assert_eq!(p.start_vertex, None);
    assert_eq!(p.pid_used, Some(1));
}

#[test]
fn generic_objects_and_vectors_round_trip() {
    let mut generic = Collection::new(ElementKind::LcGenericObject);
    generic
        .push(LcGenericObject {
            ints: vec![1],
            floats: vec![],
            doubles: vec![2.5, -1.0],
        })
        .unwrap();
    generic
        .push(LcGenericObject {
            ints: vec![],
            floats: vec![0.5, 0.25],
            doubles: vec![],
        })
        .unwrap();
    let mut floats = Collection::new(ElementKind::LcFloatVec);
    floats.push(LcFloatVec(vec![1.0, 2.0])).unwrap();
    let mut ints = Collection::new(ElementKind::LcIntVec);
    ints.push(LcIntVec(vec![])).unwrap();
    ints.push(LcIntVec(vec![-3])).unwrap();
    let mut strings = Collection::new(ElementKind::LcStrVec);
    strings
        .push(LcStrVec(vec!["abc".into(), String::new(), "four".into()]))
        .unwrap();

    let event = event_with(vec![
        ("Generic", generic),
        ("Floats", floats),
        ("Ints", ints),
        ("Strings", strings),
    ]);
    for version in [1002, CURRENT_ORDINAL] {
        let back = reencode(&event, version).unwrap();
        for name in ["Generic", "Floats", "Ints", "Strings"] {
            assert_eq!(elements_of(&back, name), elements_of(&event, name), "{name}@{version}");
        }
    }
}

#[test]
fn simulated_hits_are_written_through_a_plain_hit_codec() {
    use lcio_codec::handlers::CalorimeterHitCodec;
    use lcio_codec::{CollectionCodec, TagAssignments, TagTable};
    use lcio_sio::{SioReader, SioWriter};
    use std::sync::Arc;

    let mut sims = Collection::new(ElementKind::SimCalorimeterHit).flagged(calo::LONG, true);
    sims.push(SimCalorimeterHit {
        cell_id0: 3,
        energy: 0.7,
        position: [4.0, 5.0, 6.0],
        contributions: vec![McContribution {
            time: 2.5,
            ..McContribution::default()
        }],
        ..SimCalorimeterHit::default()
    })
    .unwrap();
    let codec = CollectionCodec::new(Arc::new(CalorimeterHitCodec));
    let mut w = SioWriter::new();
    codec
        .encode(&mut w, &sims, CollectionId(0), CURRENT_ORDINAL, &mut TagAssignments::new())
        .unwrap();
    let bytes = w.into_vec();
    let (plain, _) = codec
        .decode(&mut SioReader::new(&bytes), CollectionId(0), CURRENT_ORDINAL, &mut TagTable::new())
        .unwrap();
    let hit = plain.get(0).unwrap().as_calorimeter_hit().unwrap();
    assert_eq!(hit.cell_id0, 3);
    assert_eq!(hit.energy, 0.7);
    assert_eq!(hit.position, [4.0, 5.0, 6.0]);
}
