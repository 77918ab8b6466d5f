// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lcio_event::elements::LcGenericObject;
use lcio_event::flags::generic;
use lcio_event::{Collection, Element, ElementKind, Flags, Parameters};
use lcio_sio::{SioReader, SioWriter};

use super::{write_f32s, write_f64s};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope};
use crate::LcioError;

/// Codec for [`LcGenericObject`].
///
/// When every element has the same arity the collection is written with the
/// `FIXED` bit and the three counts appear once, ahead of the elements.
/// Otherwise each element carries its own counts.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericObjectCodec;

fn read_arity(r: &mut SioReader<'_>) -> Result<[usize; 3], LcioError> {
    Ok([r.read_len(4)?, r.read_len(4)?, r.read_len(8)?])
}

fn write_arity(w: &mut SioWriter, arity: [usize; 3]) -> Result<(), LcioError> {
    for n in arity {
        w.write_len(n)?;
    }
    Ok(())
}

fn uniform_arity(collection: &Collection) -> Option<[usize; 3]> {
    let mut arities = collection.elements().iter().filter_map(|e| match e {
        Element::LcGenericObject(g) => Some(g.arity()),
        _ => None,
    });
    let first = arities.next()?;
    arities.all(|a| a == first).then_some(first)
}

impl ElementCodec for GenericObjectCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::LcGenericObject
    }

    fn prepare(
        &self,
        collection: &Collection,
        flags: Flags,
        _parameters: &mut Parameters,
    ) -> Result<Flags, LcioError> {
        let fixed = !collection.is_subset() && uniform_arity(collection).is_some();
        Ok(flags.with(generic::FIXED, fixed))
    }

    fn read_prelude(
        &self,
        r: &mut SioReader<'_>,
        flags: Flags,
        _version: u32,
    ) -> Result<Option<[usize; 3]>, LcioError> {
        if flags.test(generic::FIXED) {
            read_arity(r).map(Some)
        } else {
            Ok(None)
        }
    }

    fn write_prelude(
        &self,
        w: &mut SioWriter,
        collection: &Collection,
        flags: Flags,
    ) -> Result<Option<[usize; 3]>, LcioError> {
        if !flags.test(generic::FIXED) {
            return Ok(None);
        }
        let arity = uniform_arity(collection).unwrap_or_default();
        write_arity(w, arity)?;
        Ok(Some(arity))
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let [ni, nf, nd] = match ctx.fixed_arity {
            Some(arity) => arity,
            None => read_arity(r)?,
        };
        let g = LcGenericObject {
            ints: (0..ni).map(|_| r.read_i32()).collect::<Result<_, _>>()?,
            floats: (0..nf).map(|_| r.read_f32()).collect::<Result<_, _>>()?,
            doubles: (0..nd).map(|_| r.read_f64()).collect::<Result<_, _>>()?,
        };
        scope.ptag(r.read_ptag()?)?;
        Ok(g.into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::LcGenericObject(g) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        if ctx.fixed_arity.is_none() {
            write_arity(w, g.arity())?;
        }
        for v in &g.ints {
            w.write_i32(*v);
        }
        write_f32s(w, &g.floats);
        write_f64s(w, &g.doubles);
        w.write_ptag(scope.own_tag());
        Ok(())
    }
}
