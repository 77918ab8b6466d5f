// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-collection context and per-event pointer bookkeeping.
//!
//! Decoding never follows a pointer inline. Codecs record the object's own tag
//! in a [`TagTable`] and queue every pointer field as a [`Patch`]; the patches
//! of one collection travel back to the reader as a [`ResolutionAction`] and
//! are applied once the whole event is in memory.
//!
//! Encoding is the mirror image: the writer assigns every written element a
//! tag up front ([`TagAssignments`]) so forward references can be emitted.

use std::collections::HashMap;

use lcio_event::{CollectionId, ElementKind, Flags, ObjRef, Parameters};
use lcio_sio::PointerTag;

use crate::LcioError;

/// What a codec needs to know about the collection it is working on.
#[derive(Debug, Clone, Copy)]
pub struct CollectionContext<'a> {
    /// Collection flag word.
    pub flags: Flags,
    /// Version ordinal of the block.
    pub version: u32,
    /// Collection parameters (already decoded, or about to be written).
    pub parameters: &'a Parameters,
    /// Per-collection arity for fixed-size generic objects.
    pub fixed_arity: Option<[usize; 3]>,
}

impl CollectionContext<'_> {
    /// Returns `true` if `bit` is set in the flag word.
    pub const fn bit(&self, bit: u32) -> bool {
        self.flags.test(bit)
    }
}

/// Pointer field an unresolved token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSlot {
    /// Daughters of a particle (format 0.8 only).
    McDaughters,
    /// Parents of a particle.
    McParents,
    /// Particle of a simulated tracker hit.
    SimTrackerParticle,
    /// Particle of the n-th contribution of a simulated calorimeter hit.
    SimCaloContribution(usize),
    /// Raw hit of a calorimeter hit.
    CaloRawHit,
    /// Raw hits of a tracker hit.
    TrackerHitRawHits,
    /// Sub-tracks of a track.
    TrackTracks,
    /// Hits of a track.
    TrackHits,
    /// Sub-clusters of a cluster.
    ClusterClusters,
    /// Hits of a cluster.
    ClusterHits,
    /// Particle associated with a vertex.
    VertexParticle,
    /// Constituent particles of a reconstructed particle.
    RecoParticles,
    /// Tracks of a reconstructed particle.
    RecoTracks,
    /// Clusters of a reconstructed particle.
    RecoClusters,
    /// Start vertex of a reconstructed particle.
    RecoStartVertex,
    /// Source of a relation.
    RelationFrom,
    /// Target of a relation.
    RelationTo,
    /// Entries of a subset collection.
    SubsetEntries,
}

impl RefSlot {
    /// Kind family every target of this slot must belong to, if constrained.
    pub const fn target_kind(self) -> Option<ElementKind> {
        match self {
            Self::McDaughters
            | Self::McParents
            | Self::SimTrackerParticle
            | Self::SimCaloContribution(_) => Some(ElementKind::McParticle),
            Self::TrackTracks | Self::RecoTracks => Some(ElementKind::Track),
            Self::ClusterClusters | Self::RecoClusters => Some(ElementKind::Cluster),
            Self::ClusterHits => Some(ElementKind::CalorimeterHit),
            Self::VertexParticle | Self::RecoParticles => {
                Some(ElementKind::ReconstructedParticle)
            }
            Self::RecoStartVertex => Some(ElementKind::Vertex),
            Self::CaloRawHit
            | Self::TrackerHitRawHits
            | Self::TrackHits
            | Self::RelationFrom
            | Self::RelationTo
            | Self::SubsetEntries => None,
        }
    }
}

/// Tokens read for one pointer field of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Index of the element inside its collection.
    pub element: usize,
    /// Field the tokens belong to.
    pub slot: RefSlot,
    /// Tokens in stream order (null tokens included).
    pub tokens: Vec<PointerTag>,
}

/// Deferred work for one decoded collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionAction {
    /// Collection the patches apply to.
    pub collection: CollectionId,
    /// Version ordinal the collection was decoded with.
    pub version: u32,
    /// Pending patches in decode order.
    pub patches: Vec<Patch>,
}

/// Token to element table of one event.
#[derive(Debug, Default, Clone)]
pub struct TagTable {
    map: HashMap<PointerTag, ObjRef>,
}

impl TagTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `tag` names `target`. The null tag is ignored.
    pub fn insert(&mut self, tag: PointerTag, target: ObjRef) -> Result<(), LcioError> {
        if tag.is_null() {
            return Ok(());
        }
        if self.map.insert(tag, target).is_some() {
            return Err(LcioError::DuplicatePointerTag(tag));
        }
        Ok(())
    }

    /// Element named by `tag`.
    pub fn get(&self, tag: PointerTag) -> Option<ObjRef> {
        self.map.get(&tag).copied()
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no tags are registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Phase-one state while one collection is decoded.
#[derive(Debug)]
pub struct DecodeScope<'t> {
    collection: CollectionId,
    element: usize,
    tags: &'t mut TagTable,
    patches: Vec<Patch>,
}

impl<'t> DecodeScope<'t> {
    /// Start decoding collection `collection`.
    pub fn new(collection: CollectionId, tags: &'t mut TagTable) -> Self {
        Self {
            collection,
            element: 0,
            tags,
            patches: Vec::new(),
        }
    }

    /// Collection being decoded.
    pub const fn collection(&self) -> CollectionId {
        self.collection
    }

    /// Set the index of the element being decoded.
    pub fn begin_element(&mut self, index: usize) {
        self.element = index;
    }

    /// Register the current element's own tag.
    pub fn ptag(&mut self, tag: PointerTag) -> Result<(), LcioError> {
        self.tags
            .insert(tag, ObjRef::new(self.collection, self.element))
    }

    /// Queue tokens for a field of the current element.
    ///
    /// Nothing is queued when every token is null; the field keeps its empty
    /// default.
    pub fn defer(&mut self, slot: RefSlot, tokens: Vec<PointerTag>) {
        if tokens.iter().all(|t| t.is_null()) {
            return;
        }
        self.patches.push(Patch {
            element: self.element,
            slot,
            tokens,
        });
    }

    /// Queue a single-pointer field.
    pub fn defer_one(&mut self, slot: RefSlot, token: PointerTag) {
        self.defer(slot, vec![token]);
    }

    /// Finish the collection; `None` if nothing needs resolving.
    pub fn into_action(self, version: u32) -> Option<ResolutionAction> {
        if self.patches.is_empty() {
            return None;
        }
        Some(ResolutionAction {
            collection: self.collection,
            version,
            patches: self.patches,
        })
    }
}

/// Element to tag assignment for one event being written.
#[derive(Debug, Clone)]
pub struct TagAssignments {
    map: HashMap<ObjRef, PointerTag>,
    next: u32,
}

impl Default for TagAssignments {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            next: 1,
        }
    }
}

impl TagAssignments {
    /// Empty assignment; the first tag handed out is `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `target` the next tag (or return the one it already has).
    pub fn assign(&mut self, target: ObjRef) -> PointerTag {
        if let Some(tag) = self.map.get(&target) {
            return *tag;
        }
        let tag = self.fresh();
        self.map.insert(target, tag);
        tag
    }

    /// A tag not bound to any element.
    pub fn fresh(&mut self) -> PointerTag {
        let tag = PointerTag(self.next);
        self.next = self.next.wrapping_add(1).max(1);
        tag
    }

    /// Tag of `target`, if it is written.
    pub fn get(&self, target: ObjRef) -> Option<PointerTag> {
        self.map.get(&target).copied()
    }
}

/// Per-collection state while one collection is encoded.
#[derive(Debug)]
pub struct EncodeScope<'t> {
    collection: CollectionId,
    element: usize,
    tags: &'t mut TagAssignments,
    pruned: usize,
}

impl<'t> EncodeScope<'t> {
    /// Start encoding collection `collection`.
    pub fn new(collection: CollectionId, tags: &'t mut TagAssignments) -> Self {
        Self {
            collection,
            element: 0,
            tags,
            pruned: 0,
        }
    }

    /// Set the index of the element being encoded.
    pub fn begin_element(&mut self, index: usize) {
        self.element = index;
    }

    /// Tag of the current element (null if it is not written).
    pub fn own_tag(&self) -> PointerTag {
        self.tags
            .get(ObjRef::new(self.collection, self.element))
            .unwrap_or(PointerTag::NULL)
    }

    /// Tag for a single pointer; unwritten targets become null.
    pub fn pntr(&mut self, target: Option<ObjRef>) -> PointerTag {
        let Some(target) = target else {
            return PointerTag::NULL;
        };
        if let Some(tag) = self.tags.get(target) {
            tag
        } else {
            self.pruned += 1;
            PointerTag::NULL
        }
    }

    /// Tags for a pointer list; unwritten targets are dropped.
    pub fn pntrs(&mut self, targets: &[ObjRef]) -> Vec<PointerTag> {
        let mut out = Vec::with_capacity(targets.len());
        for target in targets {
            match self.tags.get(*target) {
                Some(tag) => out.push(tag),
                None => self.pruned += 1,
            }
        }
        out
    }

    /// Tag for an object embedded in the current element.
    pub fn fresh_tag(&mut self) -> PointerTag {
        self.tags.fresh()
    }

    /// Number of pointers nulled or dropped so far.
    pub const fn pruned(&self) -> usize {
        self.pruned
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_tags_are_rejected() {
        let mut table = TagTable::new();
        let a = ObjRef::new(CollectionId(0), 0);
        table.insert(PointerTag(5), a).unwrap();
        table.insert(PointerTag::NULL, a).unwrap();
        assert!(matches!(
            table.insert(PointerTag(5), a),
            Err(LcioError::DuplicatePointerTag(PointerTag(5)))
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn all_null_fields_queue_nothing() {
        let mut table = TagTable::new();
        let mut scope = DecodeScope::new(CollectionId(2), &mut table);
        scope.begin_element(4);
        scope.defer(RefSlot::TrackHits, vec![PointerTag::NULL]);
        scope.defer_one(RefSlot::CaloRawHit, PointerTag(9));
        let action = scope.into_action(2008).unwrap();
        assert_eq!(action.patches.len(), 1);
        assert_eq!(action.patches[0].element, 4);
        assert_eq!(action.patches[0].slot, RefSlot::CaloRawHit);
    }

    #[test]
    fn unwritten_targets_are_pruned() {
        let mut tags = TagAssignments::new();
        let written = ObjRef::new(CollectionId(0), 0);
        let dropped = ObjRef::new(CollectionId(1), 0);
        assert_eq!(tags.assign(written), PointerTag(1));
        let mut scope = EncodeScope::new(CollectionId(0), &mut tags);
        assert_eq!(scope.own_tag(), PointerTag(1));
        assert_eq!(scope.pntrs(&[written, dropped]), vec![PointerTag(1)]);
        assert_eq!(scope.pntr(Some(dropped)), PointerTag::NULL);
        assert_eq!(scope.pntr(None), PointerTag::NULL);
        assert_eq!(scope.pruned(), 2);
        assert_eq!(scope.fresh_tag(), PointerTag(2));
    }
}
