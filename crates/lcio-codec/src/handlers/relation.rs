// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lcio_event::elements::LcRelation;
use lcio_event::flags::relation;
use lcio_event::{Element, ElementKind, Flags};
use lcio_sio::{SioReader, SioWriter};

use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope, RefSlot};
use crate::LcioError;

/// Codec for [`LcRelation`]. Relations are never pointed to and carry no
/// tag of their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct RelationCodec;

impl ElementCodec for RelationCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::LcRelation
    }

    fn writes_tag(&self, _flags: Flags, _version: u32) -> bool {
        false
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        scope.defer_one(RefSlot::RelationFrom, r.read_pntr()?);
        scope.defer_one(RefSlot::RelationTo, r.read_pntr()?);
        let weight = if ctx.bit(relation::WEIGHTED) {
            r.read_f32()?
        } else {
            1.0
        };
        Ok(LcRelation {
            from: None,
            to: None,
            weight,
        }
        .into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::LcRelation(rel) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        let from = scope.pntr(rel.from);
        let to = scope.pntr(rel.to);
        w.write_pntr(from);
        w.write_pntr(to);
        if ctx.bit(relation::WEIGHTED) {
            w.write_f32(rel.weight);
        }
        Ok(())
    }
}
