// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lcio_event::elements::TrackerHit;
use lcio_event::flags::tracker;
use lcio_event::{Element, ElementKind};
use lcio_sio::{SioReader, SioWriter};

use super::{read_f32s, read_f64s, read_pntr_list, write_f32s, write_f64s, write_pntr_list};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope, RefSlot};
use crate::LcioError;

/// Codec for [`TrackerHit`].
///
/// Up to format 1.2 a hit carried exactly one raw-hit pointer; later formats
/// store a counted list.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackerHitCodec;

impl ElementCodec for TrackerHitCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::TrackerHit
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let mut h = TrackerHit::default();
        if ctx.version > 1051 {
            h.cell_id0 = r.read_i32()?;
            if ctx.bit(tracker::ID1) {
                h.cell_id1 = r.read_i32()?;
            }
        }
        h.hit_type = r.read_i32()?;
        h.position = read_f64s(r)?;
        h.covariance = read_f32s(r)?;
        h.edep = r.read_f32()?;
        if ctx.version > 1012 {
            h.edep_error = r.read_f32()?;
        }
        h.time = r.read_f32()?;
        if ctx.version > 1011 {
            h.quality = r.read_i32()?;
        }
        if ctx.version > 1002 {
            scope.defer(RefSlot::TrackerHitRawHits, read_pntr_list(r)?);
        } else {
            scope.defer_one(RefSlot::TrackerHitRawHits, r.read_pntr()?);
        }
        scope.ptag(r.read_ptag()?)?;
        Ok(h.into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::TrackerHit(h) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        if ctx.version > 1051 {
            w.write_i32(h.cell_id0);
            if ctx.bit(tracker::ID1) {
                w.write_i32(h.cell_id1);
            }
        }
        w.write_i32(h.hit_type);
        write_f64s(w, &h.position);
        write_f32s(w, &h.covariance);
        w.write_f32(h.edep);
        if ctx.version > 1012 {
            w.write_f32(h.edep_error);
        }
        w.write_f32(h.time);
        if ctx.version > 1011 {
            w.write_i32(h.quality);
        }
        if ctx.version > 1002 {
            write_pntr_list(w, scope, &h.raw_hits)?;
        } else {
            let tag = scope.pntr(h.raw_hits.first().copied());
            w.write_pntr(tag);
        }
        w.write_ptag(scope.own_tag());
        Ok(())
    }
}
