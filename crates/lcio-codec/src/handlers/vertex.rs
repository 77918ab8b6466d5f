// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lcio_event::elements::Vertex;
use lcio_event::{Collection, Element, ElementKind, Flags, Parameters};
use lcio_sio::{SioReader, SioWriter};

use super::{read_f32_vec, read_f32s, write_f32_vec, write_f32s};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope, RefSlot};
use crate::LcioError;

/// Collection parameter listing the algorithm names vertices index into.
pub const ALGORITHM_TYPES_KEY: &str = "_lcio.VertexAlgorithmTypes";

/// Codec for [`Vertex`].
///
/// The algorithm name is stored as an index into the collection's
/// [`ALGORITHM_TYPES_KEY`] string parameter, which [`ElementCodec::prepare`]
/// fills in before writing.
#[derive(Debug, Default, Clone, Copy)]
pub struct VertexCodec;

impl ElementCodec for VertexCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::Vertex
    }

    fn prepare(
        &self,
        collection: &Collection,
        flags: Flags,
        parameters: &mut Parameters,
    ) -> Result<Flags, LcioError> {
        let mut names = parameters.strings_of(ALGORITHM_TYPES_KEY).to_vec();
        let before = names.len();
        for element in collection.elements() {
            if let Element::Vertex(v) = element {
                if !names.contains(&v.algorithm_type) {
                    names.push(v.algorithm_type.clone());
                }
            }
        }
        if names.len() != before {
            parameters.set_strings(ALGORITHM_TYPES_KEY, names);
        }
        Ok(flags)
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let primary = r.read_i32()? != 0;
        let algorithm = r.read_i32()?;
        let algorithm_type = usize::try_from(algorithm)
            .ok()
            .and_then(|i| ctx.parameters.strings_of(ALGORITHM_TYPES_KEY).get(i))
            .cloned()
            .unwrap_or_default();
        let v = Vertex {
            primary,
            algorithm_type,
            chi2: r.read_f32()?,
            probability: r.read_f32()?,
            position: read_f32s(r)?,
            covariance: read_f32s(r)?,
            parameters: read_f32_vec(r)?,
            associated_particle: None,
        };
        scope.defer_one(RefSlot::VertexParticle, r.read_pntr()?);
        scope.ptag(r.read_ptag()?)?;
        Ok(v.into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::Vertex(v) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        let algorithm = ctx
            .parameters
            .strings_of(ALGORITHM_TYPES_KEY)
            .iter()
            .position(|name| *name == v.algorithm_type)
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1);
        w.write_i32(i32::from(v.primary));
        w.write_i32(algorithm);
        w.write_f32(v.chi2);
        w.write_f32(v.probability);
        write_f32s(w, &v.position);
        write_f32s(w, &v.covariance);
        write_f32_vec(w, &v.parameters)?;
        let tag = scope.pntr(v.associated_particle);
        w.write_pntr(tag);
        w.write_ptag(scope.own_tag());
        Ok(())
    }
}
