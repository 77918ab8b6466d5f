// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Embedded particle hypotheses shared by clusters and reconstructed particles.

use lcio_event::elements::ParticleId;
use lcio_sio::{PointerTag, SioReader, SioWriter};

use super::{read_f32_vec, write_f32_vec};
use crate::LcioError;

/// Smallest encoded hypothesis, used to bound counts.
pub(crate) const MIN_PID_LEN: usize = 20;

/// Read one hypothesis; `tagged` hypotheses carry their own pointer tag.
pub(crate) fn read_pid(
    r: &mut SioReader<'_>,
    tagged: bool,
) -> Result<(ParticleId, PointerTag), LcioError> {
    let pid = ParticleId {
        likelihood: r.read_f32()?,
        pid_type: r.read_i32()?,
        pdg: r.read_i32()?,
        algorithm_type: r.read_i32()?,
        parameters: read_f32_vec(r)?,
    };
    let tag = if tagged { r.read_ptag()? } else { PointerTag::NULL };
    Ok((pid, tag))
}

pub(crate) fn write_pid(
    w: &mut SioWriter,
    pid: &ParticleId,
    tag: Option<PointerTag>,
) -> Result<(), LcioError> {
    w.write_f32(pid.likelihood);
    w.write_i32(pid.pid_type);
    w.write_i32(pid.pdg);
    w.write_i32(pid.algorithm_type);
    write_f32_vec(w, &pid.parameters)?;
    if let Some(tag) = tag {
        w.write_ptag(tag);
    }
    Ok(())
}
