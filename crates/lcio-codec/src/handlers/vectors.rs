// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Codecs for the user vector kinds. Each element is a counted run of values,
//! followed by a tag from format 1.3 on.

use lcio_event::elements::{LcFloatVec, LcIntVec, LcStrVec};
use lcio_event::{Element, ElementKind};
use lcio_sio::{SioReader, SioWriter};

use super::{read_f32_vec, read_i32_vec, write_f32_vec, write_i32_vec};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope};
use crate::LcioError;

fn read_tag(
    r: &mut SioReader<'_>,
    ctx: &CollectionContext<'_>,
    scope: &mut DecodeScope<'_>,
) -> Result<(), LcioError> {
    if ctx.version > 1002 {
        scope.ptag(r.read_ptag()?)?;
    }
    Ok(())
}

fn write_tag(w: &mut SioWriter, ctx: &CollectionContext<'_>, scope: &EncodeScope<'_>) {
    if ctx.version > 1002 {
        w.write_ptag(scope.own_tag());
    }
}

/// Codec for [`LcFloatVec`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FloatVecCodec;

impl ElementCodec for FloatVecCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::LcFloatVec
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let v = LcFloatVec(read_f32_vec(r)?);
        read_tag(r, ctx, scope)?;
        Ok(v.into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::LcFloatVec(v) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        write_f32_vec(w, &v.0)?;
        write_tag(w, ctx, scope);
        Ok(())
    }
}

/// Codec for [`LcIntVec`].
#[derive(Debug, Default, Clone, Copy)]
pub struct IntVecCodec;

impl ElementCodec for IntVecCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::LcIntVec
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let v = LcIntVec(read_i32_vec(r)?);
        read_tag(r, ctx, scope)?;
        Ok(v.into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::LcIntVec(v) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        write_i32_vec(w, &v.0)?;
        write_tag(w, ctx, scope);
        Ok(())
    }
}

/// Codec for [`LcStrVec`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StrVecCodec;

impl ElementCodec for StrVecCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::LcStrVec
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let n = r.read_len(4)?;
        let strings = (0..n)
            .map(|_| r.read_string())
            .collect::<Result<Vec<_>, _>>()?;
        read_tag(r, ctx, scope)?;
        Ok(LcStrVec(strings).into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::LcStrVec(v) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        w.write_len(v.0.len())?;
        for s in &v.0 {
            w.write_string(s)?;
        }
        write_tag(w, ctx, scope);
        Ok(())
    }
}
