// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The generic collection envelope.
//!
//! Every block body has the same outer shape:
//!
//! ```text
//! flags:u32
//! [parameters]          ordinal > 1001
//! [codec prelude]       e.g. fixed generic-object arity
//! count:i32
//! count × element       (or count × pointer for subset collections)
//! ```

use std::sync::Arc;

use lcio_event::{Collection, CollectionId, Flags, ObjRef, Parameters};
use lcio_sio::{SioReader, SioWriter};
use tracing::debug;

use crate::codec::ElementCodec;
use crate::context::{
    CollectionContext, DecodeScope, EncodeScope, RefSlot, ResolutionAction, TagAssignments,
    TagTable,
};
use crate::LcioError;

/// Suffix marking the reference-only variant of a wire type.
pub const REFERENCES_SUFFIX: &str = "_References";

/// First ordinal whose collections carry a parameter section.
pub(crate) const PARAMETERS_SINCE: u32 = 1001;

/// Reads and writes whole collections through one [`ElementCodec`].
#[derive(Clone)]
pub struct CollectionCodec {
    element: Arc<dyn ElementCodec>,
    references_only: bool,
}

impl std::fmt::Debug for CollectionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionCodec")
            .field("wire_type", &self.wire_type())
            .field("references_only", &self.references_only)
            .finish()
    }
}

impl CollectionCodec {
    /// Value codec around `element`.
    pub fn new(element: Arc<dyn ElementCodec>) -> Self {
        Self {
            element,
            references_only: false,
        }
    }

    /// Reference-only variant sharing this codec's element codec.
    pub fn references(&self) -> Self {
        Self {
            element: Arc::clone(&self.element),
            references_only: true,
        }
    }

    /// Returns `true` for the `_References` variant.
    pub const fn is_references(&self) -> bool {
        self.references_only
    }

    /// Bound element codec.
    pub fn element(&self) -> &Arc<dyn ElementCodec> {
        &self.element
    }

    /// Wire type name, suffixed for the reference-only variant.
    pub fn wire_type(&self) -> String {
        let base = self.element.wire_type();
        if self.references_only {
            format!("{base}{REFERENCES_SUFFIX}")
        } else {
            base.to_owned()
        }
    }

    /// Decode one block body into a collection with id `id`.
    ///
    /// Pointer fields are left unresolved; the returned action must be applied
    /// after the rest of the event has been decoded.
    pub fn decode(
        &self,
        r: &mut SioReader<'_>,
        id: CollectionId,
        version: u32,
        tags: &mut TagTable,
    ) -> Result<(Collection, Option<ResolutionAction>), LcioError> {
        let mut flags = Flags::from_bits(r.read_u32()?);
        if self.references_only {
            flags = flags.with(Flags::SUBSET, true);
        }
        let parameters = if version > PARAMETERS_SINCE {
            read_parameters(r)?
        } else {
            Parameters::default()
        };
        let mut collection = Collection::with_flags(self.element.kind(), flags);
        let mut scope = DecodeScope::new(id, tags);

        if flags.is_subset() {
            let n = r.read_len(4)?;
            let tokens = (0..n).map(|_| r.read_pntr()).collect::<Result<Vec<_>, _>>()?;
            scope.defer(RefSlot::SubsetEntries, tokens);
        } else {
            let fixed_arity = self.element.read_prelude(r, flags, version)?;
            let ctx = CollectionContext {
                flags,
                version,
                parameters: &parameters,
                fixed_arity,
            };
            let n = r.read_len(4)?;
            for index in 0..n {
                scope.begin_element(index);
                let element = self.element.decode(r, &ctx, &mut scope)?;
                collection.push(element)?;
            }
        }
        collection.parameters = parameters;
        debug!(
            wire_type = %self.wire_type(),
            len = collection.len(),
            version,
            "decoded collection"
        );
        Ok((collection, scope.into_action(version)))
    }

    /// Give a tag to every element of `collection` that will carry one on the
    /// wire at `version`. Subset entries and tagless layouts get none, so
    /// references to them are pruned.
    pub fn assign_tags(
        &self,
        collection: &Collection,
        id: CollectionId,
        version: u32,
        tags: &mut TagAssignments,
    ) -> Result<(), LcioError> {
        if collection.is_subset() {
            return Ok(());
        }
        let mut parameters = collection.parameters.clone();
        let flags = self
            .element
            .prepare(collection, collection.flags(), &mut parameters)?;
        if self.element.writes_tag(flags, version) {
            for index in 0..collection.len() {
                tags.assign(ObjRef::new(id, index));
            }
        }
        Ok(())
    }

    /// Encode `collection` (id `id` in its event) as a block body.
    ///
    /// Returns how many references were pruned because their targets are not
    /// being written.
    pub fn encode(
        &self,
        w: &mut SioWriter,
        collection: &Collection,
        id: CollectionId,
        version: u32,
        tags: &mut TagAssignments,
    ) -> Result<usize, LcioError> {
        let mut parameters = collection.parameters.clone();
        let mut scope = EncodeScope::new(id, tags);

        if collection.is_subset() {
            let flags = collection.flags().with(Flags::SUBSET, true);
            w.write_u32(flags.bits());
            if version > PARAMETERS_SINCE {
                write_parameters(w, &parameters)?;
            }
            let entries = scope.pntrs(collection.refs());
            w.write_len(entries.len())?;
            for tag in entries {
                w.write_pntr(tag);
            }
            return Ok(scope.pruned());
        }

        let flags = self
            .element
            .prepare(collection, collection.flags(), &mut parameters)?;
        w.write_u32(flags.bits());
        if version > PARAMETERS_SINCE {
            write_parameters(w, &parameters)?;
        }
        let fixed_arity = self.element.write_prelude(w, collection, flags)?;
        let ctx = CollectionContext {
            flags,
            version,
            parameters: &parameters,
            fixed_arity,
        };
        let elements = collection.elements();
        w.write_len(elements.len())?;
        for (index, element) in elements.iter().enumerate() {
            scope.begin_element(index);
            self.element.encode(w, element, &ctx, &mut scope)?;
        }
        Ok(scope.pruned())
    }
}

/// Parameter section: int, float and string maps, each as
/// `count, (key, n, n × value) × count`.
pub fn read_parameters(r: &mut SioReader<'_>) -> Result<Parameters, LcioError> {
    let mut p = Parameters::default();
    for _ in 0..r.read_len(8)? {
        let key = r.read_string()?;
        let n = r.read_len(4)?;
        let values = (0..n).map(|_| r.read_i32()).collect::<Result<_, _>>()?;
        p.ints.insert(key, values);
    }
    for _ in 0..r.read_len(8)? {
        let key = r.read_string()?;
        let n = r.read_len(4)?;
        let values = (0..n).map(|_| r.read_f32()).collect::<Result<_, _>>()?;
        p.floats.insert(key, values);
    }
    for _ in 0..r.read_len(8)? {
        let key = r.read_string()?;
        let n = r.read_len(4)?;
        let values = (0..n).map(|_| r.read_string()).collect::<Result<_, _>>()?;
        p.strings.insert(key, values);
    }
    Ok(p)
}

/// Counterpart of [`read_parameters`].
pub fn write_parameters(w: &mut SioWriter, p: &Parameters) -> Result<(), LcioError> {
    w.write_len(p.ints.len())?;
    for (key, values) in &p.ints {
        w.write_string(key)?;
        w.write_len(values.len())?;
        for v in values {
            w.write_i32(*v);
        }
    }
    w.write_len(p.floats.len())?;
    for (key, values) in &p.floats {
        w.write_string(key)?;
        w.write_len(values.len())?;
        for v in values {
            w.write_f32(*v);
        }
    }
    w.write_len(p.strings.len())?;
    for (key, values) in &p.strings {
        w.write_string(key)?;
        w.write_len(values.len())?;
        for v in values {
            w.write_string(v)?;
        }
    }
    Ok(())
}
