// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Element structs, one per [`ElementKind`].
//!
//! Pointer-valued fields hold [`ObjRef`](crate::ObjRef)s. Single pointers are
//! `Option`s (a null pointer on the wire is `None`); pointer lists drop null
//! entries.

mod hits;
mod mc;
mod misc;
mod reco;

pub use hits::{
    CalorimeterHit, McContribution, RawCalorimeterHit, SimCalorimeterHit, SimTrackerHit,
    TpcHit, TrackerHit, TrackerRawData,
};
pub use mc::McParticle;
pub use misc::{LcFloatVec, LcGenericObject, LcIntVec, LcRelation, LcStrVec};
pub use reco::{Cluster, ParticleId, ReconstructedParticle, Track, TrackState, Vertex};

use crate::ElementKind;

/// One element of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// See [`McParticle`].
    McParticle(McParticle),
    /// See [`SimTrackerHit`].
    SimTrackerHit(SimTrackerHit),
    /// See [`SimCalorimeterHit`].
    SimCalorimeterHit(SimCalorimeterHit),
    /// See [`CalorimeterHit`].
    CalorimeterHit(CalorimeterHit),
    /// See [`RawCalorimeterHit`].
    RawCalorimeterHit(RawCalorimeterHit),
    /// See [`TrackerHit`].
    TrackerHit(TrackerHit),
    /// See [`TrackerRawData`].
    TrackerRawData(TrackerRawData),
    /// See [`TpcHit`].
    TpcHit(TpcHit),
    /// See [`Track`].
    Track(Track),
    /// See [`Cluster`].
    Cluster(Cluster),
    /// See [`Vertex`].
    Vertex(Vertex),
    /// See [`ReconstructedParticle`].
    ReconstructedParticle(ReconstructedParticle),
    /// See [`LcRelation`].
    LcRelation(LcRelation),
    /// See [`LcGenericObject`].
    LcGenericObject(LcGenericObject),
    /// See [`LcFloatVec`].
    LcFloatVec(LcFloatVec),
    /// See [`LcIntVec`].
    LcIntVec(LcIntVec),
    /// See [`LcStrVec`].
    LcStrVec(LcStrVec),
}

macro_rules! element_variants {
    ($($variant:ident),* $(,)?) => {
        impl Element {
            /// Runtime kind of this element.
            pub const fn kind(&self) -> ElementKind {
                match self {
                    $(Self::$variant(_) => ElementKind::$variant,)*
                }
            }
        }

        $(
            impl From<$variant> for Element {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

element_variants!(
    McParticle,
    SimTrackerHit,
    SimCalorimeterHit,
    CalorimeterHit,
    RawCalorimeterHit,
    TrackerHit,
    TrackerRawData,
    TpcHit,
    Track,
    Cluster,
    Vertex,
    ReconstructedParticle,
    LcRelation,
    LcGenericObject,
    LcFloatVec,
    LcIntVec,
    LcStrVec,
);

impl Element {
    /// Borrow as an MC particle.
    pub const fn as_mc_particle(&self) -> Option<&McParticle> {
        match self {
            Self::McParticle(p) => Some(p),
            _ => None,
        }
    }

    /// Mutably borrow as an MC particle.
    pub fn as_mc_particle_mut(&mut self) -> Option<&mut McParticle> {
        match self {
            Self::McParticle(p) => Some(p),
            _ => None,
        }
    }

    /// Borrow as a calorimeter hit.
    pub const fn as_calorimeter_hit(&self) -> Option<&CalorimeterHit> {
        match self {
            Self::CalorimeterHit(h) => Some(h),
            _ => None,
        }
    }

    /// Borrow as a relation.
    pub const fn as_relation(&self) -> Option<&LcRelation> {
        match self {
            Self::LcRelation(r) => Some(r),
            _ => None,
        }
    }
}
