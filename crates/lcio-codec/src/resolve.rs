// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Phase two of decoding: turning pointer tokens into arena references.
//!
//! Runs once per event, after every block has been decoded, so tokens may
//! name elements that appeared later in the stream. Any token that names no
//! element is fatal for the event. Null tokens are skipped: a null single
//! pointer stays `None`, and null entries of lists and subsets are dropped.

use lcio_event::elements::McParticle;
use lcio_event::{Collection, Element, ElementKind, Event, ObjRef};
use lcio_sio::PointerTag;

use crate::context::{Patch, RefSlot, ResolutionAction, TagTable};
use crate::LcioError;

/// Apply `actions` to `event` in order.
///
/// Particle ancestry comes out bidirectional whichever direction the stream
/// encoded: parent tokens also append the particle to each parent's
/// daughters, daughter tokens also append it to each daughter's parents.
pub fn resolve_event(
    event: &mut Event,
    tags: &TagTable,
    actions: &[ResolutionAction],
) -> Result<(), LcioError> {
    for action in actions {
        for patch in &action.patches {
            let this = ObjRef::new(action.collection, patch.element);
            let targets = lookup(event, tags, this, patch)?;
            apply(event, this, patch.slot, targets)?;
        }
    }
    Ok(())
}

fn collection_name(event: &Event, this: ObjRef) -> String {
    event.name_of(this.collection).unwrap_or_default().to_owned()
}

/// Resolve and type-check the non-null tokens of one patch.
fn lookup(
    event: &Event,
    tags: &TagTable,
    this: ObjRef,
    patch: &Patch,
) -> Result<Vec<ObjRef>, LcioError> {
    let expected = match patch.slot {
        RefSlot::SubsetEntries => event
            .collection_by_id(this.collection)
            .map(Collection::kind),
        slot => slot.target_kind(),
    };
    let mut targets = Vec::with_capacity(patch.tokens.len());
    for &tag in patch.tokens.iter().filter(|t| !t.is_null()) {
        let target = tags.get(tag).ok_or_else(|| unresolved(event, this, tag))?;
        let found = event
            .get(target)
            .map(Element::kind)
            .ok_or_else(|| unresolved(event, this, tag))?;
        if let Some(expected) = expected {
            check_kind(event, this, expected, found)?;
        }
        targets.push(target);
    }
    Ok(targets)
}

fn unresolved(event: &Event, this: ObjRef, tag: PointerTag) -> LcioError {
    LcioError::UnresolvedReference {
        collection: collection_name(event, this),
        tag,
    }
}

fn check_kind(
    event: &Event,
    this: ObjRef,
    expected: ElementKind,
    found: ElementKind,
) -> Result<(), LcioError> {
    if found.is_a(expected) {
        Ok(())
    } else {
        Err(LcioError::ReferenceKindMismatch {
            collection: collection_name(event, this),
            expected,
            found,
        })
    }
}

fn particle_mut(event: &mut Event, target: ObjRef) -> Result<&mut McParticle, LcioError> {
    event
        .get_mut(target)
        .and_then(Element::as_mc_particle_mut)
        .ok_or_else(|| LcioError::InvalidPatch(format!("{target:?} is not an MC particle")))
}

fn apply(
    event: &mut Event,
    this: ObjRef,
    slot: RefSlot,
    targets: Vec<ObjRef>,
) -> Result<(), LcioError> {
    match slot {
        RefSlot::McParents => {
            for parent in &targets {
                particle_mut(event, *parent)?.daughters.push(this);
            }
            particle_mut(event, this)?.parents.extend(targets);
            Ok(())
        }
        RefSlot::McDaughters => {
            for daughter in &targets {
                particle_mut(event, *daughter)?.parents.push(this);
            }
            particle_mut(event, this)?.daughters.extend(targets);
            Ok(())
        }
        RefSlot::SubsetEntries => {
            let refs = event
                .collection_by_id_mut(this.collection)
                .and_then(Collection::refs_mut)
                .ok_or_else(|| {
                    LcioError::InvalidPatch(format!(
                        "collection {} is not a subset",
                        this.collection.0
                    ))
                })?;
            refs.extend(targets);
            Ok(())
        }
        slot => {
            let element = event
                .get_mut(this)
                .ok_or_else(|| LcioError::InvalidPatch(format!("no element at {this:?}")))?;
            if assign(element, slot, targets) {
                Ok(())
            } else {
                Err(LcioError::InvalidPatch(format!(
                    "slot {slot:?} does not belong to {}",
                    element.kind()
                )))
            }
        }
    }
}

/// Store `targets` in the field `slot` names. Returns `false` if the element
/// has no such field.
fn assign(element: &mut Element, slot: RefSlot, targets: Vec<ObjRef>) -> bool {
    let first = targets.first().copied();
    match (slot, element) {
        (RefSlot::SimTrackerParticle, Element::SimTrackerHit(h)) => h.particle = first,
        (RefSlot::SimCaloContribution(i), Element::SimCalorimeterHit(h)) => {
            match h.contributions.get_mut(i) {
                Some(c) => c.particle = first,
                None => return false,
            }
        }
        (RefSlot::CaloRawHit, Element::CalorimeterHit(h)) => h.raw_hit = first,
        (RefSlot::TrackerHitRawHits, Element::TrackerHit(h)) => h.raw_hits = targets,
        (RefSlot::TrackTracks, Element::Track(t)) => t.tracks = targets,
        (RefSlot::TrackHits, Element::Track(t)) => t.hits = targets,
        (RefSlot::ClusterClusters, Element::Cluster(c)) => c.clusters = targets,
        (RefSlot::ClusterHits, Element::Cluster(c)) => c.hits = targets,
        (RefSlot::VertexParticle, Element::Vertex(v)) => v.associated_particle = first,
        (RefSlot::RecoParticles, Element::ReconstructedParticle(p)) => p.particles = targets,
        (RefSlot::RecoTracks, Element::ReconstructedParticle(p)) => p.tracks = targets,
        (RefSlot::RecoClusters, Element::ReconstructedParticle(p)) => p.clusters = targets,
        (RefSlot::RecoStartVertex, Element::ReconstructedParticle(p)) => p.start_vertex = first,
        (RefSlot::RelationFrom, Element::LcRelation(r)) => r.from = first,
        (RefSlot::RelationTo, Element::LcRelation(r)) => r.to = first,
        _ => return false,
    }
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lcio_event::elements::{CalorimeterHit, LcRelation, Track};
    use lcio_event::CollectionId;

    fn tagged(event: &Event, tags: &mut TagTable, name: &str, first_tag: u32) {
        let id = event.id_of(name).unwrap();
        let len = event.collection(name).unwrap().len();
        for (i, tag) in (first_tag..).take(len).enumerate() {
            tags.insert(PointerTag(tag), ObjRef::new(id, i)).unwrap();
        }
    }

    fn action(collection: usize, patches: Vec<Patch>) -> ResolutionAction {
        ResolutionAction {
            collection: CollectionId(collection),
            version: 2008,
            patches,
        }
    }

    fn patch(element: usize, slot: RefSlot, tokens: &[u32]) -> Patch {
        Patch {
            element,
            slot,
            tokens: tokens.iter().copied().map(PointerTag).collect(),
        }
    }

    #[test]
    fn relations_resolve_to_arena_slots() {
        let mut event = Event::new(1, 1);
        let mut hits = Collection::new(ElementKind::CalorimeterHit);
        hits.push(CalorimeterHit::default()).unwrap();
        hits.push(CalorimeterHit::default()).unwrap();
        event.add_collection("Hits", hits).unwrap();
        let mut rel = Collection::new(ElementKind::LcRelation);
        rel.push(LcRelation::default()).unwrap();
        event.add_collection("Rel", rel).unwrap();

        let mut tags = TagTable::new();
        tagged(&event, &mut tags, "Hits", 10);
        let actions = [action(
            1,
            vec![
                patch(0, RefSlot::RelationFrom, &[11]),
                patch(0, RefSlot::RelationTo, &[10]),
            ],
        )];
        resolve_event(&mut event, &tags, &actions).unwrap();
        let r = event.collection("Rel").unwrap().get(0).unwrap().as_relation().unwrap();
        assert_eq!(r.from, Some(ObjRef::new(CollectionId(0), 1)));
        assert_eq!(r.to, Some(ObjRef::new(CollectionId(0), 0)));
    }

    #[test]
    fn unknown_tokens_abort() {
        let mut event = Event::new(1, 1);
        let mut rel = Collection::new(ElementKind::LcRelation);
        rel.push(LcRelation::default()).unwrap();
        event.add_collection("Rel", rel).unwrap();
        let actions = [action(0, vec![patch(0, RefSlot::RelationFrom, &[99])])];
        let err = resolve_event(&mut event, &TagTable::new(), &actions).unwrap_err();
        assert!(matches!(
            err,
            LcioError::UnresolvedReference { ref collection, tag: PointerTag(99) } if collection == "Rel"
        ));
    }

    #[test]
    fn wrong_target_kind_is_rejected() {
        let mut event = Event::new(1, 1);
        let mut hits = Collection::new(ElementKind::CalorimeterHit);
        hits.push(CalorimeterHit::default()).unwrap();
        event.add_collection("Hits", hits).unwrap();
        let mut tracks = Collection::new(ElementKind::Track);
        tracks.push(Track::default()).unwrap();
        event.add_collection("Tracks", tracks).unwrap();
        let mut tags = TagTable::new();
        tagged(&event, &mut tags, "Hits", 1);
        let actions = [action(1, vec![patch(0, RefSlot::TrackTracks, &[1])])];
        assert!(matches!(
            resolve_event(&mut event, &tags, &actions),
            Err(LcioError::ReferenceKindMismatch {
                expected: ElementKind::Track,
                found: ElementKind::CalorimeterHit,
                ..
            })
        ));
    }

    #[test]
    fn null_subset_entries_are_dropped() {
        let mut event = Event::new(1, 1);
        let mut hits = Collection::new(ElementKind::CalorimeterHit);
        hits.push(CalorimeterHit::default()).unwrap();
        hits.push(CalorimeterHit::default()).unwrap();
        event.add_collection("Hits", hits).unwrap();
        event
            .add_collection("Picked", Collection::subset(ElementKind::CalorimeterHit))
            .unwrap();
        let mut tags = TagTable::new();
        tagged(&event, &mut tags, "Hits", 1);
        let actions = [action(1, vec![patch(0, RefSlot::SubsetEntries, &[2, 0, 1])])];
        resolve_event(&mut event, &tags, &actions).unwrap();
        assert_eq!(
            event.collection("Picked").unwrap().refs(),
            &[ObjRef::new(CollectionId(0), 1), ObjRef::new(CollectionId(0), 0)]
        );
    }

    #[test]
    fn parent_tokens_link_both_directions() {
        let mut event = Event::new(1, 1);
        let mut mc = Collection::new(ElementKind::McParticle);
        for _ in 0..3 {
            mc.push(McParticle::default()).unwrap();
        }
        event.add_collection("MCParticle", mc).unwrap();
        let mut tags = TagTable::new();
        tagged(&event, &mut tags, "MCParticle", 1);
        let actions = [action(
            0,
            vec![
                patch(1, RefSlot::McParents, &[1]),
                patch(2, RefSlot::McParents, &[2, 0]),
            ],
        )];
        resolve_event(&mut event, &tags, &actions).unwrap();
        let at = |i| event.particle(ObjRef::new(CollectionId(0), i)).unwrap();
        let r = |i| ObjRef::new(CollectionId(0), i);
        assert_eq!(at(0).daughters, vec![r(1)]);
        assert_eq!(at(1).parents, vec![r(0)]);
        assert_eq!(at(1).daughters, vec![r(2)]);
        assert_eq!(at(2).parents, vec![r(1)]);
    }
}
