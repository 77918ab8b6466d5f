// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lcio_event::elements::SimTrackerHit;
use lcio_event::flags::simtracker;
use lcio_event::{Element, ElementKind, Flags};
use lcio_sio::{SioReader, SioWriter};

use super::{read_f32s, read_f64s, write_f32s, write_f64s};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope, RefSlot};
use crate::LcioError;

/// Codec for [`SimTrackerHit`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SimTrackerHitCodec;

impl ElementCodec for SimTrackerHitCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::SimTrackerHit
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
        let mut h = SimTrackerHit {
            cell_id0: r.read_i32()?,
            ..SimTrackerHit::default()
        };
        if ctx.bit(simtracker::ID1) {
            h.cell_id1 = r.read_i32()?;
        }
        h.position = read_f64s(r)?;
        h.edep = r.read_f32()?;
        h.time = r.read_f32()?;
        scope.defer_one(RefSlot::SimTrackerParticle, r.read_pntr()?);
        if ctx.bit(simtracker::MOMENTUM) {
            h.momentum = read_f32s(r)?;
            if ctx.version > 1006 {
                h.path_length = r.read_f32()?;
            }
        }
        if ctx.version >= 2008 {
            h.quality = r.read_i32()?;
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
        let Element::SimTrackerHit(h) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        w.write_i32(h.cell_id0);
        if ctx.bit(simtracker::ID1) {
            w.write_i32(h.cell_id1);
        }
        write_f64s(w, &h.position);
        w.write_f32(h.edep);
        w.write_f32(h.time);
        let tag = scope.pntr(h.particle);
        w.write_pntr(tag);
        if ctx.bit(simtracker::MOMENTUM) {
            write_f32s(w, &h.momentum);
            if ctx.version > 1006 {
                w.write_f32(h.path_length);
            }
        }
        if ctx.version >= 2008 {
            w.write_i32(h.quality);
        }
        if self.writes_tag(ctx.flags, ctx.version) {
            w.write_ptag(scope.own_tag());
        }
        Ok(())
    }
}
