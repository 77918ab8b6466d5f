// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `MCParticle` codec.
//!
//! Format 0.8 stores each particle's daughters; every later format stores its
//! parents. The reference resolver rebuilds both directions either way.

use std::sync::Arc;

use lcio_event::elements::McParticle;
use lcio_event::flags::{bit_set, bit_test, sim_status};
use lcio_event::{Element, ElementKind};
use lcio_sio::{PointerTag, SioReader, SioWriter};

use super::{read_f32s, read_f64s, read_pntr_list, write_f32s, write_f64s, write_pntr_list};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope, RefSlot};
use crate::providers::ParticlePropertyProvider;
use crate::LcioError;

/// The single format that stores daughters instead of parents.
const DAUGHTER_LAYOUT: u32 = 8;

/// Codec for [`McParticle`].
pub struct McParticleCodec {
    particles: Arc<dyn ParticlePropertyProvider>,
}

impl McParticleCodec {
    /// Codec that fills in unknown charges from `particles`.
    pub fn new(particles: Arc<dyn ParticlePropertyProvider>) -> Self {
        Self { particles }
    }

    fn charge_of(&self, p: &McParticle) -> f32 {
        p.charge.unwrap_or_else(|| {
            self.particles
                .lookup(p.pdg)
                .map_or(0.0, |t| t.charge)
        })
    }
}

impl ElementCodec for McParticleCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::McParticle
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let mut p = McParticle::default();
        scope.ptag(r.read_ptag()?)?;

        let legacy = ctx.version == DAUGHTER_LAYOUT;
        let mut has_endpoint = false;
        if legacy {
            r.read_pntr()?;
            r.read_pntr()?;
            let daughters = read_pntr_list(r)?;
            has_endpoint = daughters.is_empty();
            scope.defer(RefSlot::McDaughters, daughters);
        } else {
            scope.defer(RefSlot::McParents, read_pntr_list(r)?);
        }

        p.pdg = r.read_i32()?;
        p.generator_status = r.read_i32()?;
        if !legacy {
            let status = r.read_u32()?;
            has_endpoint = bit_test(status, sim_status::ENDPOINT);
            p.simulator_status = bit_set(status, sim_status::ENDPOINT, false);
        }
        p.vertex = read_f64s(r)?;
        if ctx.version > 1002 {
            p.time = r.read_f32()?;
        }
        p.momentum = read_f32s(r)?;
        p.mass = r.read_f32()?;
        p.charge = Some(r.read_f32()?);
        if has_endpoint {
            p.endpoint = Some(read_f64s(r)?);
            if ctx.version > 2006 {
                p.momentum_at_endpoint = read_f32s(r)?;
            }
        }
        if ctx.version >= 1060 {
            p.spin = read_f32s(r)?;
            p.color_flow = [r.read_i32()?, r.read_i32()?];
        }
        Ok(p.into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::McParticle(p) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        w.write_ptag(scope.own_tag());

        let legacy = ctx.version == DAUGHTER_LAYOUT;
        let has_endpoint = if legacy {
            w.write_pntr(PointerTag::NULL);
            w.write_pntr(PointerTag::NULL);
            let daughters = scope.pntrs(&p.daughters);
            w.write_len(daughters.len())?;
            for tag in &daughters {
                w.write_pntr(*tag);
            }
            daughters.is_empty()
        } else {
            write_pntr_list(w, scope, &p.parents)?;
            p.endpoint.is_some()
        };

        w.write_i32(p.pdg);
        w.write_i32(p.generator_status);
        if !legacy {
            w.write_u32(bit_set(
                p.simulator_status,
                sim_status::ENDPOINT,
                has_endpoint,
            ));
        }
        write_f64s(w, &p.vertex);
        if ctx.version > 1002 {
            w.write_f32(p.time);
        }
        write_f32s(w, &p.momentum);
        w.write_f32(p.mass);
        w.write_f32(self.charge_of(p));
        if has_endpoint {
            write_f64s(w, &p.endpoint.unwrap_or_default());
            if ctx.version > 2006 {
                write_f32s(w, &p.momentum_at_endpoint);
            }
        }
        if ctx.version >= 1060 {
            write_f32s(w, &p.spin);
            w.write_i32(p.color_flow[0]);
            w.write_i32(p.color_flow[1]);
        }
        Ok(())
    }
}
