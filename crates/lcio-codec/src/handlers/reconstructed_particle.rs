// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lcio_event::elements::ReconstructedParticle;
use lcio_event::{Element, ElementKind};
use lcio_sio::{PointerTag, SioReader, SioWriter};

use super::particle_id::{read_pid, write_pid, MIN_PID_LEN};
use super::{read_f32s, read_pntr_list, write_f32s, write_pntr_list};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope, RefSlot};
use crate::LcioError;

/// Codec for [`ReconstructedParticle`].
///
/// Particle hypotheses are embedded and tagged; the "used" hypothesis is a
/// pointer that must name one of the particle's own hypotheses and is
/// resolved on the spot.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReconstructedParticleCodec;

impl ElementCodec for ReconstructedParticleCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::ReconstructedParticle
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let mut p = ReconstructedParticle {
            particle_type: r.read_i32()?,
            momentum: read_f32s(r)?,
            energy: r.read_f32()?,
            covariance: read_f32s(r)?,
            mass: r.read_f32()?,
            charge: r.read_f32()?,
            reference_point: read_f32s(r)?,
            ..ReconstructedParticle::default()
        };

        let n = r.read_len(MIN_PID_LEN + 4)?;
        let mut pid_tags = Vec::with_capacity(n);
        for _ in 0..n {
            let (pid, tag) = read_pid(r, true)?;
            p.particle_ids.push(pid);
            pid_tags.push(tag);
        }
        let used = r.read_pntr()?;
        if !used.is_null() {
            let index = pid_tags.iter().position(|t| *t == used).ok_or_else(|| {
                LcioError::UnresolvedReference {
                    collection: format!("#{}", scope.collection().0),
                    tag: used,
                }
            })?;
            p.pid_used = Some(index);
        }
        p.goodness_of_pid = r.read_f32()?;

        scope.defer(RefSlot::RecoParticles, read_pntr_list(r)?);
        scope.defer(RefSlot::RecoTracks, read_pntr_list(r)?);
        scope.defer(RefSlot::RecoClusters, read_pntr_list(r)?);
        if ctx.version > 1007 {
            scope.defer_one(RefSlot::RecoStartVertex, r.read_pntr()?);
        }
        scope.ptag(r.read_ptag()?)?;
        Ok(p.into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::ReconstructedParticle(p) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        w.write_i32(p.particle_type);
        write_f32s(w, &p.momentum);
        w.write_f32(p.energy);
        write_f32s(w, &p.covariance);
        w.write_f32(p.mass);
        w.write_f32(p.charge);
        write_f32s(w, &p.reference_point);

        w.write_len(p.particle_ids.len())?;
        let mut used = PointerTag::NULL;
        for (i, pid) in p.particle_ids.iter().enumerate() {
            let tag = scope.fresh_tag();
            if p.pid_used == Some(i) {
                used = tag;
            }
            write_pid(w, pid, Some(tag))?;
        }
        w.write_pntr(used);
        w.write_f32(p.goodness_of_pid);

        write_pntr_list(w, scope, &p.particles)?;
        write_pntr_list(w, scope, &p.tracks)?;
        write_pntr_list(w, scope, &p.clusters)?;
        if ctx.version > 1007 {
            let tag = scope.pntr(p.start_vertex);
            w.write_pntr(tag);
        }
        w.write_ptag(scope.own_tag());
        Ok(())
    }
}
