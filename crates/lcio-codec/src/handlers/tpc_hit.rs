// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lcio_event::elements::TpcHit;
use lcio_event::flags::tpc;
use lcio_event::{Element, ElementKind, Flags};
use lcio_sio::{SioReader, SioWriter};

use super::{read_i32_vec, write_i32_vec};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope};
use crate::LcioError;

/// Codec for [`TpcHit`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TpcHitCodec;

impl ElementCodec for TpcHitCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::TpcHit
    }

    fn writes_tag(&self, flags: Flags, _version: u32) -> bool {
        !flags.test(tpc::NO_PTR)
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let mut h = TpcHit {
            cell_id: r.read_i32()?,
            time: r.read_f32()?,
            charge: r.read_f32()?,
            quality: r.read_i32()?,
            raw_data: Vec::new(),
        };
        if ctx.bit(tpc::RAW) {
            h.raw_data = read_i32_vec(r)?;
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
        let Element::TpcHit(h) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        w.write_i32(h.cell_id);
        w.write_f32(h.time);
        w.write_f32(h.charge);
        w.write_i32(h.quality);
        if ctx.bit(tpc::RAW) {
            write_i32_vec(w, &h.raw_data)?;
        }
        if self.writes_tag(ctx.flags, ctx.version) {
            w.write_ptag(scope.own_tag());
        }
        Ok(())
    }
}
