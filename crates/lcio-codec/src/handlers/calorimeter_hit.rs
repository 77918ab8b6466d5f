// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `CalorimeterHit` codec.
//!
//! Layout, in stream order:
//!
//! | field        | present when                                   |
//! |--------------|------------------------------------------------|
//! | cell id 0    | always                                         |
//! | cell id 1    | `ID1`                                          |
//! | energy       | always                                         |
//! | energy error | version >= 1051 and `ENERGY_ERROR`             |
//! | time         | version > 1002 and `TIME`                      |
//! | position     | `LONG`                                         |
//! | type         | version > 1002                                 |
//! | raw hit      | `NO_PTR` clear; up to 1002 `NO_PTR` **set**    |
//! | own tag      | always                                         |

use std::borrow::Cow;

use lcio_event::elements::CalorimeterHit;
use lcio_event::flags::calo;
use lcio_event::{Element, ElementKind};
use lcio_sio::{SioReader, SioWriter};

use super::{read_f32s, write_f32s};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope, RefSlot};
use crate::LcioError;

/// Codec for [`CalorimeterHit`]; also writes simulated hits as plain hits.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalorimeterHitCodec;

/// The raw-hit pointer's presence bit flipped polarity after format 1.2.
fn has_raw_pointer(ctx: &CollectionContext<'_>) -> bool {
    let no_ptr = ctx.bit(calo::NO_PTR);
    if ctx.version > 1002 {
        !no_ptr
    } else {
        no_ptr
    }
}

impl ElementCodec for CalorimeterHitCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::CalorimeterHit
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let mut h = CalorimeterHit {
            cell_id0: r.read_i32()?,
            ..CalorimeterHit::default()
        };
        if ctx.bit(calo::ID1) {
            h.cell_id1 = r.read_i32()?;
        }
        h.energy = r.read_f32()?;
        if ctx.version >= 1051 && ctx.bit(calo::ENERGY_ERROR) {
            h.energy_error = r.read_f32()?;
        }
        if ctx.version > 1002 && ctx.bit(calo::TIME) {
            h.time = r.read_f32()?;
        }
        if ctx.bit(calo::LONG) {
            h.position = read_f32s(r)?;
        }
        if ctx.version > 1002 {
            h.hit_type = r.read_i32()?;
        }
        if has_raw_pointer(ctx) {
            scope.defer_one(RefSlot::CaloRawHit, r.read_pntr()?);
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
        let h: Cow<'_, CalorimeterHit> = match element {
            Element::CalorimeterHit(h) => Cow::Borrowed(h),
            Element::SimCalorimeterHit(sim) => Cow::Owned(CalorimeterHit::from(sim)),
            other => return Err(LcioError::kind_mismatch(self.kind(), other)),
        };
        w.write_i32(h.cell_id0);
        if ctx.bit(calo::ID1) {
            w.write_i32(h.cell_id1);
        }
        w.write_f32(h.energy);
        if ctx.version >= 1051 && ctx.bit(calo::ENERGY_ERROR) {
            w.write_f32(h.energy_error);
        }
        if ctx.version > 1002 && ctx.bit(calo::TIME) {
            w.write_f32(h.time);
        }
        if ctx.bit(calo::LONG) {
            write_f32s(w, &h.position);
        }
        if ctx.version > 1002 {
            w.write_i32(h.hit_type);
        }
        if has_raw_pointer(ctx) {
            let tag = scope.pntr(h.raw_hit);
            w.write_pntr(tag);
        }
        w.write_ptag(scope.own_tag());
        Ok(())
    }
}
