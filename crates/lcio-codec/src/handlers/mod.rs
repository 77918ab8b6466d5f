// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Element codecs, one per kind, plus shared field helpers.

mod calorimeter_hit;
mod cluster;
mod generic_object;
mod mc_particle;
mod particle_id;
mod raw_calorimeter_hit;
mod reconstructed_particle;
mod relation;
mod sim_calorimeter_hit;
mod sim_tracker_hit;
mod tpc_hit;
mod track;
mod tracker_hit;
mod tracker_raw_data;
mod vectors;
mod vertex;

pub use calorimeter_hit::CalorimeterHitCodec;
pub use cluster::ClusterCodec;
pub use generic_object::GenericObjectCodec;
pub use mc_particle::McParticleCodec;
pub use raw_calorimeter_hit::RawCalorimeterHitCodec;
pub use reconstructed_particle::ReconstructedParticleCodec;
pub use relation::RelationCodec;
pub use sim_calorimeter_hit::SimCalorimeterHitCodec;
pub use sim_tracker_hit::SimTrackerHitCodec;
pub use tpc_hit::TpcHitCodec;
pub use track::TrackCodec;
pub use tracker_hit::TrackerHitCodec;
pub use tracker_raw_data::TrackerRawDataCodec;
pub use vectors::{FloatVecCodec, IntVecCodec, StrVecCodec};
pub use vertex::{VertexCodec, ALGORITHM_TYPES_KEY};

use lcio_event::ObjRef;
use lcio_sio::{PointerTag, SioError, SioReader, SioWriter};

use crate::context::EncodeScope;

pub(crate) fn read_f32s<const N: usize>(r: &mut SioReader<'_>) -> Result<[f32; N], SioError> {
    let mut out = [0.0; N];
    for v in &mut out {
        *v = r.read_f32()?;
    }
    Ok(out)
}

pub(crate) fn write_f32s(w: &mut SioWriter, values: &[f32]) {
    for v in values {
        w.write_f32(*v);
    }
}

pub(crate) fn read_f64s<const N: usize>(r: &mut SioReader<'_>) -> Result<[f64; N], SioError> {
    let mut out = [0.0; N];
    for v in &mut out {
        *v = r.read_f64()?;
    }
    Ok(out)
}

pub(crate) fn write_f64s(w: &mut SioWriter, values: &[f64]) {
    for v in values {
        w.write_f64(*v);
    }
}

/// `n:i32` followed by `n` floats.
pub(crate) fn read_f32_vec(r: &mut SioReader<'_>) -> Result<Vec<f32>, SioError> {
    let n = r.read_len(4)?;
    (0..n).map(|_| r.read_f32()).collect()
}

pub(crate) fn write_f32_vec(w: &mut SioWriter, values: &[f32]) -> Result<(), SioError> {
    w.write_len(values.len())?;
    write_f32s(w, values);
    Ok(())
}

/// `n:i32` followed by `n` ints.
pub(crate) fn read_i32_vec(r: &mut SioReader<'_>) -> Result<Vec<i32>, SioError> {
    let n = r.read_len(4)?;
    (0..n).map(|_| r.read_i32()).collect()
}

pub(crate) fn write_i32_vec(w: &mut SioWriter, values: &[i32]) -> Result<(), SioError> {
    w.write_len(values.len())?;
    for v in values {
        w.write_i32(*v);
    }
    Ok(())
}

/// `n:i32` followed by `n` pointer tokens.
pub(crate) fn read_pntr_list(r: &mut SioReader<'_>) -> Result<Vec<PointerTag>, SioError> {
    let n = r.read_len(4)?;
    (0..n).map(|_| r.read_pntr()).collect()
}

/// Counterpart of [`read_pntr_list`]; unwritten targets are dropped.
pub(crate) fn write_pntr_list(
    w: &mut SioWriter,
    scope: &mut EncodeScope<'_>,
    targets: &[ObjRef],
) -> Result<(), SioError> {
    let tags = scope.pntrs(targets);
    w.write_len(tags.len())?;
    for tag in tags {
        w.write_pntr(tag);
    }
    Ok(())
}

