// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `Cluster` codec.

use lcio_event::elements::Cluster;
use lcio_event::flags::cluster;
use lcio_event::{Element, ElementKind};
use lcio_sio::{SioReader, SioWriter};

use super::particle_id::{read_pid, write_pid, MIN_PID_LEN};
use super::{read_f32_vec, read_f32s, read_pntr_list, write_f32_vec, write_f32s, write_pntr_list};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope, RefSlot};
use crate::LcioError;

/// Shape parameter count before the shape became a counted list.
const LEGACY_SHAPE_LEN: usize = 6;

/// Codec for [`Cluster`].
///
/// Hits are stored as `(pointer, energy fraction)` pairs. Pairs with a null
/// pointer are dropped together with their fraction so that `hits` and
/// `hit_contributions` stay index-aligned.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClusterCodec;

impl ElementCodec for ClusterCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::Cluster
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let mut c = Cluster {
            cluster_type: r.read_i32()?,
            energy: r.read_f32()?,
            ..Cluster::default()
        };
        if ctx.version > 1051 {
            c.energy_error = r.read_f32()?;
        }
        c.position = read_f32s(r)?;
        c.position_error = read_f32s(r)?;
        c.i_theta = r.read_f32()?;
        c.i_phi = r.read_f32()?;
        c.direction_error = read_f32s(r)?;

        if ctx.version > 1002 {
            c.shape = read_f32_vec(r)?;
            let n = r.read_len(MIN_PID_LEN)?;
            for _ in 0..n {
                let (pid, _) = read_pid(r, false)?;
                c.particle_ids.push(pid);
            }
        } else {
            c.shape = (0..LEGACY_SHAPE_LEN)
                .map(|_| r.read_f32())
                .collect::<Result<_, _>>()?;
            // particle type weights, superseded by hypotheses
            let _: [f32; 3] = read_f32s(r)?;
        }

        scope.defer(RefSlot::ClusterClusters, read_pntr_list(r)?);
        if ctx.bit(cluster::HITS) {
            let n = r.read_len(8)?;
            let mut tokens = Vec::with_capacity(n);
            for _ in 0..n {
                let tag = r.read_pntr()?;
                let fraction = r.read_f32()?;
                if !tag.is_null() {
                    tokens.push(tag);
                    c.hit_contributions.push(fraction);
                }
            }
            scope.defer(RefSlot::ClusterHits, tokens);
        }
        c.subdetector_energies = read_f32_vec(r)?;
        scope.ptag(r.read_ptag()?)?;
        Ok(c.into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::Cluster(c) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        w.write_i32(c.cluster_type);
        w.write_f32(c.energy);
        if ctx.version > 1051 {
            w.write_f32(c.energy_error);
        }
        write_f32s(w, &c.position);
        write_f32s(w, &c.position_error);
        w.write_f32(c.i_theta);
        w.write_f32(c.i_phi);
        write_f32s(w, &c.direction_error);

        if ctx.version > 1002 {
            write_f32_vec(w, &c.shape)?;
            w.write_len(c.particle_ids.len())?;
            for pid in &c.particle_ids {
                write_pid(w, pid, None)?;
            }
        } else {
            for i in 0..LEGACY_SHAPE_LEN {
                w.write_f32(c.shape.get(i).copied().unwrap_or_default());
            }
            write_f32s(w, &[0.0; 3]);
        }

        write_pntr_list(w, scope, &c.clusters)?;
        if ctx.bit(cluster::HITS) {
            let pairs: Vec<_> = c
                .hits
                .iter()
                .enumerate()
                .filter_map(|(i, hit)| {
                    let tag = scope.pntr(Some(*hit));
                    (!tag.is_null())
                        .then(|| (tag, c.hit_contributions.get(i).copied().unwrap_or_default()))
                })
                .collect();
            w.write_len(pairs.len())?;
            for (tag, fraction) in pairs {
                w.write_pntr(tag);
                w.write_f32(fraction);
            }
        }
        write_f32_vec(w, &c.subdetector_energies)?;
        w.write_ptag(scope.own_tag());
        Ok(())
    }
}
