// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lcio_event::elements::RawCalorimeterHit;
use lcio_event::flags::calo;
use lcio_event::{Element, ElementKind, Flags};
use lcio_sio::{SioReader, SioWriter};

use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope};
use crate::LcioError;

/// Codec for [`RawCalorimeterHit`]. `NO_PTR` omits the element's own tag.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawCalorimeterHitCodec;

impl ElementCodec for RawCalorimeterHitCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::RawCalorimeterHit
    }

    fn writes_tag(&self, flags: Flags, _version: u32) -> bool {
        !flags.test(calo::NO_PTR)
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let mut h = RawCalorimeterHit {
            cell_id0: r.read_i32()?,
            ..RawCalorimeterHit::default()
        };
        if ctx.bit(calo::ID1) {
            h.cell_id1 = r.read_i32()?;
        }
        h.amplitude = r.read_i32()?;
        if ctx.bit(calo::TIME) {
            h.time_stamp = r.read_i32()?;
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
        let Element::RawCalorimeterHit(h) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        w.write_i32(h.cell_id0);
        if ctx.bit(calo::ID1) {
            w.write_i32(h.cell_id1);
        }
        w.write_i32(h.amplitude);
        if ctx.bit(calo::TIME) {
            w.write_i32(h.time_stamp);
        }
        if self.writes_tag(ctx.flags, ctx.version) {
            w.write_ptag(scope.own_tag());
        }
        Ok(())
    }
}
