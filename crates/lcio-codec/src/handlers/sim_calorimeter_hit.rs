// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lcio_event::elements::{McContribution, SimCalorimeterHit};
use lcio_event::flags::simcalo;
use lcio_event::{Element, ElementKind, Flags};
use lcio_sio::{SioReader, SioWriter};

use super::{read_f32s, write_f32s};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope, RefSlot};
use crate::LcioError;

/// Codec for [`SimCalorimeterHit`].
///
/// Registered ahead of [`CalorimeterHitCodec`](super::CalorimeterHitCodec) so
/// simulated hits keep their contributions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimCalorimeterHitCodec;

impl ElementCodec for SimCalorimeterHitCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::SimCalorimeterHit
    }

    fn writes_tag(&self, _flags: Flags, version: u32) -> bool {
        version > 1000
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let mut h = SimCalorimeterHit {
            cell_id0: r.read_i32()?,
            ..SimCalorimeterHit::default()
        };
        if ctx.bit(simcalo::ID1) {
            h.cell_id1 = r.read_i32()?;
        }
        h.energy = r.read_f32()?;
        if ctx.bit(simcalo::LONG) {
            h.position = read_f32s(r)?;
        }
        // particle pntr + energy + time
        let n = r.read_len(12)?;
        h.contributions.reserve(n);
        for i in 0..n {
            scope.defer_one(RefSlot::SimCaloContribution(i), r.read_pntr()?);
            let mut c = McContribution {
                energy: r.read_f32()?,
                time: r.read_f32()?,
                ..McContribution::default()
            };
            if ctx.bit(simcalo::STEP) {
                c.pdg = r.read_i32()?;
                if ctx.version > 1051 {
                    c.step_position = read_f32s(r)?;
                }
            }
            h.contributions.push(c);
        }
        if self.writes_tag(ctx.flags, ctx.version) {
            scope.ptag(r.read_ptag()?)?;
        }
        Ok(h.into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::SimCalorimeterHit(h) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        w.write_i32(h.cell_id0);
        if ctx.bit(simcalo::ID1) {
            w.write_i32(h.cell_id1);
        }
        w.write_f32(h.energy);
        if ctx.bit(simcalo::LONG) {
            write_f32s(w, &h.position);
        }
        w.write_len(h.contributions.len())?;
        for c in &h.contributions {
            let tag = scope.pntr(c.particle);
            w.write_pntr(tag);
            w.write_f32(c.energy);
            w.write_f32(c.time);
            if ctx.bit(simcalo::STEP) {
                w.write_i32(c.pdg);
                if ctx.version > 1051 {
                    write_f32s(w, &c.step_position);
                }
            }
        }
        if self.writes_tag(ctx.flags, ctx.version) {
            w.write_ptag(scope.own_tag());
        }
        Ok(())
    }
}
