// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Event and run containers.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::elements::McParticle;
use crate::{Collection, CollectionId, Element, ElementKind, ObjRef, Parameters};

/// Errors raised while building an event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// A collection with this name is already present.
    #[error("duplicate collection name: {0}")]
    DuplicateCollection(String),
    /// An element does not belong to the collection's kind.
    #[error("element kind mismatch: collection holds {expected}, got {found}")]
    ElementKindMismatch {
        /// Declared kind.
        expected: ElementKind,
        /// Kind of the offending element.
        found: ElementKind,
    },
    /// Owned elements pushed to a subset, or references pushed to an owner.
    #[error("storage mismatch (subset collection: {subset})")]
    StorageMismatch {
        /// Whether the target collection is a subset.
        subset: bool,
    },
}

/// One event: header fields plus named collections in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    /// Run number.
    pub run: i32,
    /// Event number.
    pub event_number: i32,
    /// Time stamp (ns since epoch).
    pub timestamp: i64,
    /// Detector name.
    pub detector_name: String,
    /// Event parameters.
    pub parameters: Parameters,
    collections: Vec<(String, Collection)>,
    by_name: BTreeMap<String, CollectionId>,
}

impl Event {
    /// Empty event.
    pub fn new(run: i32, event_number: i32) -> Self {
        Self {
            run,
            event_number,
            ..Self::default()
        }
    }

    /// Add a collection under a unique name, returning its id.
    pub fn add_collection(
        &mut self,
        name: impl Into<String>,
        collection: Collection,
    ) -> Result<CollectionId, EventError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(EventError::DuplicateCollection(name));
        }
        let id = CollectionId(self.collections.len());
        self.by_name.insert(name.clone(), id);
        self.collections.push((name, collection));
        Ok(id)
    }

    /// Number of collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Returns `true` if the event has no collections.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Id of the collection called `name`.
    pub fn id_of(&self, name: &str) -> Option<CollectionId> {
        self.by_name.get(name).copied()
    }

    /// Collection called `name`.
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.id_of(name).and_then(|id| self.collection_by_id(id))
    }

    /// Mutable collection called `name`.
    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        let id = self.id_of(name)?;
        self.collection_by_id_mut(id)
    }

    /// Collection with id `id`.
    pub fn collection_by_id(&self, id: CollectionId) -> Option<&Collection> {
        self.collections.get(id.0).map(|(_, c)| c)
    }

    /// Mutable collection with id `id`.
    pub fn collection_by_id_mut(&mut self, id: CollectionId) -> Option<&mut Collection> {
        self.collections.get_mut(id.0).map(|(_, c)| c)
    }

    /// Name of the collection with id `id`.
    pub fn name_of(&self, id: CollectionId) -> Option<&str> {
        self.collections.get(id.0).map(|(n, _)| n.as_str())
    }

    /// Collection names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.collections.iter().map(|(n, _)| n.as_str())
    }

    /// `(id, name, collection)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CollectionId, &str, &Collection)> + '_ {
        self.collections
            .iter()
            .enumerate()
            .map(|(i, (n, c))| (CollectionId(i), n.as_str(), c))
    }

    /// Wire type name of the collection called `name`.
    pub fn wire_type(&self, name: &str) -> Option<&'static str> {
        self.collection(name).map(|c| c.kind().wire_type())
    }

    /// Dereference an element.
    pub fn get(&self, target: ObjRef) -> Option<&Element> {
        self.collection_by_id(target.collection)?.get(target.index)
    }

    /// Mutably dereference an element.
    pub fn get_mut(&mut self, target: ObjRef) -> Option<&mut Element> {
        self.collection_by_id_mut(target.collection)?
            .get_mut(target.index)
    }

    /// Elements listed by a subset collection, in order.
    pub fn subset_elements(&self, id: CollectionId) -> impl Iterator<Item = &Element> + '_ {
        self.collection_by_id(id)
            .map(Collection::refs)
            .unwrap_or_default()
            .iter()
            .filter_map(|r| self.get(*r))
    }

    /// Dereference an MC particle.
    pub fn particle(&self, target: ObjRef) -> Option<&McParticle> {
        self.get(target).and_then(Element::as_mc_particle)
    }

    /// End point of a particle: the explicit one if recorded, otherwise the
    /// vertex of the first daughter that starts where its parent ended.
    pub fn particle_end_point(&self, target: ObjRef) -> Option<[f64; 3]> {
        let particle = self.particle(target)?;
        if let Some(end) = particle.endpoint {
            return Some(end);
        }
        particle
            .daughters
            .iter()
            .filter_map(|d| self.particle(*d))
            .find(|d| !d.vertex_is_not_endpoint_of_parent())
            .map(|d| d.vertex)
    }
}

/// Run-level header record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunHeader {
    /// Run number.
    pub run: i32,
    /// Detector name.
    pub detector_name: String,
    /// Free-form description.
    pub description: String,
    /// Active subdetector names.
    pub active_subdetectors: Vec<String>,
    /// Run parameters.
    pub parameters: Parameters,
}

impl RunHeader {
    /// Minimal header for `run` on `detector_name`.
    pub fn new(run: i32, detector_name: impl Into<String>) -> Self {
        Self {
            run,
            detector_name: detector_name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::flags::sim_status;

    #[test]
    fn names_are_unique() {
        let mut ev = Event::new(1, 2);
        ev.add_collection("A", Collection::new(ElementKind::Track))
            .unwrap();
        let err = ev
            .add_collection("A", Collection::new(ElementKind::Cluster))
            .unwrap_err();
        assert_eq!(err, EventError::DuplicateCollection("A".into()));
        assert_eq!(ev.wire_type("A"), Some("Track"));
        assert_eq!(ev.wire_type("B"), None);
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut ev = Event::new(1, 2);
        let b = ev
            .add_collection("B", Collection::new(ElementKind::Track))
            .unwrap();
        let a = ev
            .add_collection("A", Collection::new(ElementKind::Track))
            .unwrap();
        assert_eq!((b, a), (CollectionId(0), CollectionId(1)));
        assert_eq!(ev.names().collect::<Vec<_>>(), ["B", "A"]);
    }

    #[test]
    fn end_point_falls_back_to_daughter_vertex() {
        let mut ev = Event::new(0, 0);
        let id = ev
            .add_collection("MCParticle", Collection::new(ElementKind::McParticle))
            .unwrap();
        let mother = ObjRef::new(id, 0);
        let kid = ObjRef::new(id, 1);
        let coll = ev.collection_by_id_mut(id).unwrap();
        coll.push(McParticle {
            daughters: vec![kid],
            ..McParticle::default()
        })
        .unwrap();
        coll.push(McParticle {
            parents: vec![mother],
            vertex: [1.0, 2.0, 3.0],
            ..McParticle::default()
        })
        .unwrap();
        assert_eq!(ev.particle_end_point(mother), Some([1.0, 2.0, 3.0]));

        if let Some(Element::McParticle(k)) = ev.get_mut(kid) {
            k.simulator_status |= 1 << sim_status::VERTEX_IS_NOT_ENDPOINT_OF_PARENT;
        }
        assert_eq!(ev.particle_end_point(mother), None);
    }
}
