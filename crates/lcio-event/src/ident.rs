// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Arena identifiers for collections and elements within one event.

use std::fmt;

/// Position of a collection in its event's insertion order.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CollectionId(pub usize);

/// Reference to one element of an owning collection in the same event.
///
/// This is what a pointer field holds once references are resolved. Two
/// `ObjRef`s are equal exactly when they name the same stored element.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjRef {
    /// Owning collection.
    pub collection: CollectionId,
    /// Index inside the owning collection.
    pub index: usize,
}

impl ObjRef {
    /// Build a reference.
    pub const fn new(collection: CollectionId, index: usize) -> Self {
        Self { collection, index }
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}:{}", self.collection.0, self.index)
    }
}
