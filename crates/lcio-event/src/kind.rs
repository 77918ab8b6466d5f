// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Element kinds and their wire type names.

use std::fmt;

/// Every element kind an event can hold.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ElementKind {
    /// Generator or simulation particle.
    McParticle,
    /// Simulated tracker energy deposit.
    SimTrackerHit,
    /// Simulated calorimeter cell with per-particle contributions.
    SimCalorimeterHit,
    /// Reconstructed calorimeter cell.
    CalorimeterHit,
    /// Digitised calorimeter amplitude.
    RawCalorimeterHit,
    /// Reconstructed tracker space point.
    TrackerHit,
    /// Digitised tracker ADC samples.
    TrackerRawData,
    /// TPC pad hit.
    TpcHit,
    /// Fitted track.
    Track,
    /// Calorimeter cluster.
    Cluster,
    /// Reconstructed vertex.
    Vertex,
    /// Particle-flow object.
    ReconstructedParticle,
    /// Weighted link between two arbitrary elements.
    LcRelation,
    /// User record of ints, floats and doubles.
    LcGenericObject,
    /// Vector of floats.
    LcFloatVec,
    /// Vector of ints.
    LcIntVec,
    /// Vector of strings.
    LcStrVec,
}

impl ElementKind {
    /// All kinds, in a stable order.
    pub const ALL: [Self; 17] = [
        Self::McParticle,
        Self::SimTrackerHit,
        Self::SimCalorimeterHit,
        Self::CalorimeterHit,
        Self::RawCalorimeterHit,
        Self::TrackerHit,
        Self::TrackerRawData,
        Self::TpcHit,
        Self::Track,
        Self::Cluster,
        Self::Vertex,
        Self::ReconstructedParticle,
        Self::LcRelation,
        Self::LcGenericObject,
        Self::LcFloatVec,
        Self::LcIntVec,
        Self::LcStrVec,
    ];

    /// Wire type name declared in event headers.
    pub const fn wire_type(self) -> &'static str {
        match self {
            Self::McParticle => "MCParticle",
            Self::SimTrackerHit => "SimTrackerHit",
            Self::SimCalorimeterHit => "SimCalorimeterHit",
            Self::CalorimeterHit => "CalorimeterHit",
            Self::RawCalorimeterHit => "RawCalorimeterHit",
            Self::TrackerHit => "TrackerHit",
            Self::TrackerRawData => "TrackerRawData",
            Self::TpcHit => "TPCHit",
            Self::Track => "Track",
            Self::Cluster => "Cluster",
            Self::Vertex => "Vertex",
            Self::ReconstructedParticle => "ReconstructedParticle",
            Self::LcRelation => "LCRelation",
            Self::LcGenericObject => "LCGenericObject",
            Self::LcFloatVec => "LCFloatVec",
            Self::LcIntVec => "LCIntVec",
            Self::LcStrVec => "LCStrVec",
        }
    }

    /// Inverse of [`ElementKind::wire_type`].
    pub fn from_wire_type(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.wire_type() == name)
    }

    /// Returns `true` if an element of this kind may stand in for `family`.
    ///
    /// A simulated calorimeter hit is a calorimeter hit; every other kind is
    /// only itself.
    pub fn is_a(self, family: Self) -> bool {
        self == family || matches!((self, family), (Self::SimCalorimeterHit, Self::CalorimeterHit))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_type())
    }
}
