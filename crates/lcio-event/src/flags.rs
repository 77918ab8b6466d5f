// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Collection flag words.
//!
//! Every collection carries one 32-bit flag word. Bits 16-18 are shared
//! collection metadata ([`Flags::TRANSIENT`], [`Flags::DEFAULT`],
//! [`Flags::SUBSET`]). The remaining high bits belong to the element kind: each
//! kind owns its own namespace, so bit 31 means "store position" for
//! calorimeter hits but "store hit pointers" for tracks. The per-kind modules
//! below name those bits.

use std::fmt;

/// Mask with only `bit` set; `0` for bits outside the word.
pub const fn bit_mask(bit: u32) -> u32 {
    match 1u32.checked_shl(bit) {
        Some(mask) => mask,
        None => 0,
    }
}

/// Returns `true` if `bit` is set in `flag`.
pub const fn bit_test(flag: u32, bit: u32) -> bool {
    flag & bit_mask(bit) != 0
}

/// Returns `flag` with `bit` set or cleared.
pub const fn bit_set(flag: u32, bit: u32, on: bool) -> u32 {
    if on {
        flag | bit_mask(bit)
    } else {
        flag & !bit_mask(bit)
    }
}

/// A collection's flag word.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(pub u32);

impl Flags {
    /// Bit: the collection is never written.
    pub const TRANSIENT: u32 = 16;
    /// Bit: the collection is the default one of its kind.
    pub const DEFAULT: u32 = 17;
    /// Bit: elements are references into another collection.
    pub const SUBSET: u32 = 18;

    /// Create flags from a raw word.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw word.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check whether `bit` is set.
    #[inline]
    pub const fn test(self, bit: u32) -> bool {
        bit_test(self.0, bit)
    }

    /// Copy with `bit` set or cleared.
    #[inline]
    pub const fn with(self, bit: u32, on: bool) -> Self {
        Self(bit_set(self.0, bit, on))
    }

    /// Check if TRANSIENT is set.
    #[inline]
    pub const fn is_transient(self) -> bool {
        self.test(Self::TRANSIENT)
    }

    /// Check if DEFAULT is set.
    #[inline]
    pub const fn is_default(self) -> bool {
        self.test(Self::DEFAULT)
    }

    /// Check if SUBSET is set.
    #[inline]
    pub const fn is_subset(self) -> bool {
        self.test(Self::SUBSET)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flags({:#010x})", self.0)
    }
}

impl From<u32> for Flags {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

/// Bits for `CalorimeterHit` and `RawCalorimeterHit` collections.
pub mod calo {
    /// Store position (long form).
    pub const LONG: u32 = 31;
    /// Barrel rather than endcap.
    pub const BARREL: u32 = 30;
    /// Second cell-id word stored.
    pub const ID1: u32 = 29;
    /// No raw-hit pointer (`CalorimeterHit`), no pointer tag (`RawCalorimeterHit`).
    /// Polarity is inverted for `CalorimeterHit` streams at or below 1.2.
    pub const NO_PTR: u32 = 28;
    /// Store time.
    pub const TIME: u32 = 27;
    /// Store energy error (format 1.51 and later).
    pub const ENERGY_ERROR: u32 = 26;
}

/// Bits for `SimCalorimeterHit` collections.
pub mod simcalo {
    /// Store position (long form).
    pub const LONG: u32 = 31;
    /// Barrel rather than endcap.
    pub const BARREL: u32 = 30;
    /// Second cell-id word stored.
    pub const ID1: u32 = 29;
    /// Store per-step PDG (and step position from 1.51).
    pub const STEP: u32 = 28;
}

/// Bits for `SimTrackerHit` collections.
pub mod simtracker {
    /// Barrel rather than endcap.
    pub const BARREL: u32 = 31;
    /// Store momentum (and path length from 1.6).
    pub const MOMENTUM: u32 = 30;
    /// Second cell-id word stored.
    pub const ID1: u32 = 29;
}

/// Bits for `TrackerHit` collections.
pub mod tracker {
    /// Second cell-id word stored.
    pub const ID1: u32 = 31;
}

/// Bits for `TrackerRawData` collections.
pub mod tracker_raw {
    /// Second cell-id word stored.
    pub const ID1: u32 = 31;
}

/// Bits for `TPCHit` collections.
pub mod tpc {
    /// Store raw data words.
    pub const RAW: u32 = 31;
    /// Omit the pointer tag.
    pub const NO_PTR: u32 = 30;
}

/// Bits for `Track` collections.
pub mod track {
    /// Store hit pointers.
    pub const HITS: u32 = 31;
}

/// Bits for `Cluster` collections.
pub mod cluster {
    /// Store hit pointers and contributions.
    pub const HITS: u32 = 31;
}

/// Bits for `LCRelation` collections.
pub mod relation {
    /// Store a weight per relation.
    pub const WEIGHTED: u32 = 31;
}

/// Bits for `LCGenericObject` collections.
pub mod generic {
    /// Every element has the same arity, stored once per collection.
    pub const FIXED: u32 = 31;
}

/// Bits of `McParticle::simulator_status`.
pub mod sim_status {
    /// End point stored explicitly (wire-only; cleared after decode).
    pub const ENDPOINT: u32 = 31;
    /// Created by the simulation rather than the generator.
    pub const CREATED_IN_SIMULATION: u32 = 30;
    /// Backscattered from a calorimeter.
    pub const BACKSCATTER: u32 = 29;
    /// Production vertex is not the end point of the parent.
    pub const VERTEX_IS_NOT_ENDPOINT_OF_PARENT: u32 = 28;
    /// Decayed in the tracking region.
    pub const DECAYED_IN_TRACKER: u32 = 27;
    /// Decayed in a calorimeter.
    pub const DECAYED_IN_CALORIMETER: u32 = 26;
    /// Left the detector volume.
    pub const LEFT_DETECTOR: u32 = 25;
    /// Stopped inside the detector.
    pub const STOPPED: u32 = 24;
}
