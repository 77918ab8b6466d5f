// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lcio_event::elements::TrackerRawData;
use lcio_event::flags::tracker_raw;
use lcio_event::{Element, ElementKind};
use lcio_sio::{SioReader, SioWriter};

use crate::codec::ElementCodec;
use crate::context::{CollectionContext, DecodeScope, EncodeScope};
use crate::LcioError;

/// Codec for [`TrackerRawData`]. ADC samples are a padded `i16` run.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackerRawDataCodec;

impl ElementCodec for TrackerRawDataCodec {
    fn kind(&self) -> ElementKind {
        ElementKind::TrackerRawData
    }

    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError> {
        let mut h = TrackerRawData {
            cell_id0: r.read_i32()?,
            ..TrackerRawData::default()
        };
        if ctx.bit(tracker_raw::ID1) {
            h.cell_id1 = r.read_i32()?;
        }
        h.time = r.read_i32()?;
        let n = r.read_len(2)?;
        h.adc_values = r.read_i16_array(n)?;
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
        let Element::TrackerRawData(h) = element else {
            return Err(LcioError::kind_mismatch(self.kind(), element));
        };
        w.write_i32(h.cell_id0);
        if ctx.bit(tracker_raw::ID1) {
            w.write_i32(h.cell_id1);
        }
        w.write_i32(h.time);
        w.write_len(h.adc_values.len())?;
        w.write_i16_array(&h.adc_values);
        w.write_ptag(scope.own_tag());
        Ok(())
    }
}
