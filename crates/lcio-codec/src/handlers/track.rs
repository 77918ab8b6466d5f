// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `Track` codec.
//!
//! Format 2.0 replaced the single parameter set with a list of track states.
//! Both layouts decode into [`Track::states`]; the derived momentum comes from
//! the first state and the field at the origin.

use std::sync::Arc;

use lcio_event::elements::{Track, TrackState};
use lcio_event::flags::track;
use lcio_event::{Element, ElementKind};
use lcio_sio::{SioReader, SioWriter};

use super::{read_f32s, read_i32_vec, read_pntr_list, write_f32s, write_i32_vec, write_pntr_list};
use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope, RefSlot};
use crate::providers::FieldMap;
use crate::LcioError;

/// First format with track states.
const TRACK_STATES: u32 = 2000;

/// Codec for [`Track`].
pub struct TrackCodec {
    field: Arc<dyn FieldMap>,
}

impl TrackCodec {
    /// Codec that derives momenta using `field`.
    pub fn new(field: Arc<dyn FieldMap>) -> Self {
        Self { field }
    }
}

/// `location` is not on the wire before format 2.0.
fn read_state(r: &mut SioReader<'_>, location: Option<i32>) -> Result<TrackState, LcioError> {
    let location = match location {
        Some(l) => l,
        None => r.read_i32()?,
    };
    Ok(TrackState {
        location,
        d0: r.read_f32()?,
        phi: r.read_f32()?,
        omega: r.read_f32()?,
        z0: r.read_f32()?,
        tan_lambda: r.read_f32()?,
        covariance: read_f32s(r)?,
        reference_point: read_f32s(r)?,
    })
}

fn write_state(w: &mut SioWriter, s: &TrackState, with_location: bool) {
    if with_location {
        w.write_i32(s.location);
    }
    write_f32s(w, &[s.d0, s.phi, s.omega, s.z0, s.tan_lambda]);
    write_f32s(w, &s.covariance);
    write_f32s(w, &s.reference_point);
}

impl ElementCodec for TrackCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::Track
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let mut t = Track {
            track_type: r.read_i32()?,
            ..Track::default()
        };
        if ctx.version < TRACK_STATES {
            t.states.push(read_state(r, Some(0))?);
            if ctx.version > 1002 {
                // reference-point-is-PCA flag, implied by the state model
                r.read_i32()?;
            }
            t.chi2 = r.read_f32()?;
            t.ndf = r.read_i32()?;
            t.dedx = r.read_f32()?;
            t.dedx_error = r.read_f32()?;
            if ctx.version > 1011 {
                t.radius_of_innermost_hit = r.read_f32()?;
            }
        } else {
            t.chi2 = r.read_f32()?;
            t.ndf = r.read_i32()?;
            t.dedx = r.read_f32()?;
            t.dedx_error = r.read_f32()?;
            t.radius_of_innermost_hit = r.read_f32()?;
            // location + 5 params + 15 cov + 3 ref
            let n = r.read_len(96)?;
            t.states.reserve(n);
            for _ in 0..n {
                t.states.push(read_state(r, None)?);
            }
        }
        t.subdetector_hit_numbers = read_i32_vec(r)?;
        scope.defer(RefSlot::TrackTracks, read_pntr_list(r)?);
        if ctx.bit(track::HITS) {
            scope.defer(RefSlot::TrackHits, read_pntr_list(r)?);
        }
        scope.ptag(r.read_ptag()?)?;

        if let Some(first) = t.states.first() {
            let bz = self.field.field_at([0.0; 3])[2];
            t.momentum = first.momentum(bz);
        }
        Ok(t.into())
    }

    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError> {
        let Element::Track(t) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        w.write_i32(t.track_type);
        if ctx.version < TRACK_STATES {
            let first = t.states.first().cloned().unwrap_or_default();
            write_state(w, &first, false);
            if ctx.version > 1002 {
                w.write_i32(1);
            }
            w.write_f32(t.chi2);
            w.write_i32(t.ndf);
            w.write_f32(t.dedx);
            w.write_f32(t.dedx_error);
            if ctx.version > 1011 {
                w.write_f32(t.radius_of_innermost_hit);
            }
        } else {
            w.write_f32(t.chi2);
            w.write_i32(t.ndf);
            w.write_f32(t.dedx);
            w.write_f32(t.dedx_error);
            w.write_f32(t.radius_of_innermost_hit);
            w.write_len(t.states.len())?;
            for s in &t.states {
                write_state(w, s, true);
            }
        }
        write_i32_vec(w, &t.subdetector_hit_numbers)?;
        write_pntr_list(w, scope, &t.tracks)?;
        if ctx.bit(track::HITS) {
            write_pntr_list(w, scope, &t.hits)?;
        }
        w.write_ptag(scope.own_tag());
        Ok(())
    }
}
