// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire type and element kind to codec lookup.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lcio_event::{ElementKind, Flags};
use thiserror::Error;

use crate::codec::ElementCodec;
use crate::envelope::{CollectionCodec, REFERENCES_SUFFIX};
use crate::handlers::{
    CalorimeterHitCodec, ClusterCodec, FloatVecCodec, GenericObjectCodec, IntVecCodec,
    McParticleCodec, RawCalorimeterHitCodec, ReconstructedParticleCodec, RelationCodec,
    SimCalorimeterHitCodec, SimTrackerHitCodec, StrVecCodec, TpcHitCodec, TrackCodec,
    TrackerHitCodec, TrackerRawDataCodec, VertexCodec,
};
use crate::providers::{FieldMap, ParticlePropertyProvider, StaticParticleTable, UniformField};

/// Errors returned when registering codecs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two codecs claimed the same wire type.
    #[error("duplicate codec registration for wire type {0:?}")]
    DuplicateWireType(&'static str),
}

/// Ordered set of collection codecs.
///
/// Kind-based lookup walks the codecs in registration order and takes the
/// first one that accepts the kind, so subtypes must be registered before
/// their base kinds. Results are memoized per kind; the cache is the only
/// state shared between events and is safe to use from several threads.
///
/// Every value codec gets a reference-only twin at registration, so the
/// `_References` variant returned for subset collections is a stable instance.
pub struct HandlerRegistry {
    values: Vec<Arc<CollectionCodec>>,
    references: Vec<Arc<CollectionCodec>>,
    by_kind: RwLock<HashMap<ElementKind, Option<usize>>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("values", &self.values)
            .field("cached", &self.cache_len())
            .finish_non_exhaustive()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults(
            Arc::new(UniformField::default()),
            Arc::new(StaticParticleTable),
        )
    }
}

impl HandlerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            references: Vec::new(),
            by_kind: RwLock::new(HashMap::new()),
        }
    }

    /// Registry holding a codec for every built-in kind.
    pub fn with_defaults(
        field: Arc<dyn FieldMap>,
        particles: Arc<dyn ParticlePropertyProvider>,
    ) -> Self {
        let codecs: [Arc<dyn ElementCodec>; 17] = [
            Arc::new(McParticleCodec::new(particles)),
            Arc::new(SimTrackerHitCodec),
            Arc::new(SimCalorimeterHitCodec),
            Arc::new(CalorimeterHitCodec),
            Arc::new(RawCalorimeterHitCodec),
            Arc::new(TrackerHitCodec),
            Arc::new(TrackerRawDataCodec),
            Arc::new(TpcHitCodec),
            Arc::new(TrackCodec::new(field)),
            Arc::new(ClusterCodec),
            Arc::new(VertexCodec),
            Arc::new(ReconstructedParticleCodec),
            Arc::new(RelationCodec),
            Arc::new(GenericObjectCodec),
            Arc::new(FloatVecCodec),
            Arc::new(IntVecCodec),
            Arc::new(StrVecCodec),
        ];
        let mut registry = Self::new();
        for codec in codecs {
            registry.push(codec);
        }
        registry
    }

    /// Append `codec`.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateWireType`] if a codec with the same
    /// wire type is already registered.
    pub fn register(&mut self, codec: Arc<dyn ElementCodec>) -> Result<(), RegistryError> {
        let wire_type = codec.wire_type();
        if self
            .values
            .iter()
            .any(|c| c.element().wire_type() == wire_type)
        {
            return Err(RegistryError::DuplicateWireType(wire_type));
        }
        self.push(codec);
        Ok(())
    }

    // Callers guarantee `codec`'s wire type is not registered yet.
    fn push(&mut self, codec: Arc<dyn ElementCodec>) {
        let value = CollectionCodec::new(codec);
        self.references.push(Arc::new(value.references()));
        self.values.push(Arc::new(value));
        self.cache_mut().clear();
    }

    /// Number of registered value codecs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Codec for a block of wire type `name`. The `_References` suffix selects
    /// the reference-only variant of the base codec.
    pub fn lookup_by_wire_type(&self, name: &str) -> Option<Arc<CollectionCodec>> {
        let (base, references) = match name.strip_suffix(REFERENCES_SUFFIX) {
            Some(base) => (base, true),
            None => (name, false),
        };
        let index = self
            .values
            .iter()
            .position(|c| c.element().wire_type() == base)?;
        Some(self.pick(index, references))
    }

    /// Most specific codec able to write a collection of `kind`. A set
    /// `SUBSET` bit in `flags` selects the reference-only variant.
    pub fn lookup_by_kind(&self, kind: ElementKind, flags: Flags) -> Option<Arc<CollectionCodec>> {
        let cached = self
            .by_kind
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&kind)
            .copied();
        let index = match cached {
            Some(hit) => hit,
            None => {
                let found = self.values.iter().position(|c| c.element().accepts(kind));
                self.by_kind
                    .write()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .insert(kind, found);
                found
            }
        }?;
        Some(self.pick(index, flags.is_subset()))
    }

    /// Number of memoized kind lookups.
    pub fn cache_len(&self) -> usize {
        self.by_kind
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    fn pick(&self, index: usize, references: bool) -> Arc<CollectionCodec> {
        let table = if references {
            &self.references
        } else {
            &self.values
        };
        Arc::clone(&table[index])
    }

    fn cache_mut(&mut self) -> &mut HashMap<ElementKind, Option<usize>> {
        self.by_kind
            .get_mut()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn subtype_registered_first_wins() {
        let registry = HandlerRegistry::default();
        let sim = registry
            .lookup_by_kind(ElementKind::SimCalorimeterHit, Flags::default())
            .unwrap();
        assert_eq!(sim.wire_type(), "SimCalorimeterHit");
        let calo = registry
            .lookup_by_kind(ElementKind::CalorimeterHit, Flags::default())
            .unwrap();
        assert_eq!(calo.wire_type(), "CalorimeterHit");
    }

    #[test]
    fn base_codec_serves_subtypes_when_registered_first() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(CalorimeterHitCodec)).unwrap();
        registry.register(Arc::new(SimCalorimeterHitCodec)).unwrap();
        let codec = registry
            .lookup_by_kind(ElementKind::SimCalorimeterHit, Flags::default())
            .unwrap();
        assert_eq!(codec.wire_type(), "CalorimeterHit");
    }

    #[test]
    fn lookups_are_memoized_and_stable() {
        let registry = HandlerRegistry::default();
        assert_eq!(registry.cache_len(), 0);
        let a = registry
            .lookup_by_kind(ElementKind::Track, Flags::default())
            .unwrap();
        let b = registry
            .lookup_by_kind(ElementKind::Track, Flags::default())
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.cache_len(), 1);
    }

    #[test]
    fn subset_flag_selects_reference_variant() {
        let registry = HandlerRegistry::default();
        let flags = Flags::default().with(Flags::SUBSET, true);
        let by_kind = registry.lookup_by_kind(ElementKind::Track, flags).unwrap();
        assert!(by_kind.is_references());
        assert_eq!(by_kind.wire_type(), "Track_References");
        let by_name = registry.lookup_by_wire_type("Track_References").unwrap();
        assert!(Arc::ptr_eq(&by_kind, &by_name));
        assert!(registry.lookup_by_wire_type("Bogus_References").is_none());
    }

    #[test]
    fn duplicate_wire_types_are_rejected() {
        let mut registry = HandlerRegistry::default();
        assert_eq!(
            registry.register(Arc::new(TpcHitCodec)),
            Err(RegistryError::DuplicateWireType("TPCHit"))
        );
        assert_eq!(registry.len(), 17);
    }

    #[test]
    fn built_in_wire_types_are_distinct() {
        let registry = HandlerRegistry::default();
        let mut names: Vec<String> = registry.values.iter().map(|c| c.wire_type()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), registry.len());
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let registry = HandlerRegistry::new();
        assert!(registry
            .lookup_by_kind(ElementKind::McParticle, Flags::default())
            .is_none());
        assert_eq!(registry.cache_len(), 1);
    }
}
