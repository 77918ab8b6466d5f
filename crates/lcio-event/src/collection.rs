// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed element collections.

use crate::event::EventError;
use crate::{Element, ElementKind, Flags, ObjRef, Parameters};

/// Storage of a collection: owned values or references into other collections.
#[derive(Debug, Clone, PartialEq)]
pub enum Elements {
    /// The collection owns its elements.
    Owned(Vec<Element>),
    /// The collection lists elements owned elsewhere in the same event.
    Subset(Vec<ObjRef>),
}

/// One named block's worth of elements plus its flags and parameters.
///
/// The `SUBSET` flag bit always agrees with the storage variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    kind: ElementKind,
    flags: Flags,
    /// Collection parameters.
    pub parameters: Parameters,
    elements: Elements,
}

impl Collection {
    /// Empty owning collection of `kind`.
    pub fn new(kind: ElementKind) -> Self {
        Self::with_flags(kind, Flags::default())
    }

    /// Empty collection of `kind` with an initial flag word.
    ///
    /// A set `SUBSET` bit selects reference storage.
    pub fn with_flags(kind: ElementKind, flags: Flags) -> Self {
        let elements = if flags.is_subset() {
            Elements::Subset(Vec::new())
        } else {
            Elements::Owned(Vec::new())
        };
        Self {
            kind,
            flags,
            parameters: Parameters::default(),
            elements,
        }
    }

    /// Empty subset collection of `kind`.
    pub fn subset(kind: ElementKind) -> Self {
        Self::with_flags(kind, Flags::default().with(Flags::SUBSET, true))
    }

    /// Declared element kind.
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Flag word.
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Set or clear one flag bit. The `SUBSET` bit follows the storage and
    /// cannot be changed here.
    pub fn set_flag(&mut self, bit: u32, on: bool) {
        if bit != Flags::SUBSET {
            self.flags = self.flags.with(bit, on);
        }
    }

    /// Builder form of [`Collection::set_flag`].
    pub fn flagged(mut self, bit: u32, on: bool) -> Self {
        self.set_flag(bit, on);
        self
    }

    /// Returns `true` for reference storage.
    pub const fn is_subset(&self) -> bool {
        matches!(self.elements, Elements::Subset(_))
    }

    /// Returns `true` if the collection is marked transient.
    pub const fn is_transient(&self) -> bool {
        self.flags.is_transient()
    }

    /// Number of elements or references.
    pub fn len(&self) -> usize {
        match &self.elements {
            Elements::Owned(v) => v.len(),
            Elements::Subset(v) => v.len(),
        }
    }

    /// Returns `true` if the collection holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage.
    pub const fn contents(&self) -> &Elements {
        &self.elements
    }

    /// Owned elements (empty for subsets).
    pub fn elements(&self) -> &[Element] {
        match &self.elements {
            Elements::Owned(v) => v,
            Elements::Subset(_) => &[],
        }
    }

    /// Mutable owned elements (empty for subsets).
    pub fn elements_mut(&mut self) -> &mut [Element] {
        match &mut self.elements {
            Elements::Owned(v) => v,
            Elements::Subset(_) => &mut [],
        }
    }

    /// Subset references (empty for owning collections).
    ///
    /// A decoded subset holds only the non-null entries of its block, so it
    /// can be shorter than the count on the wire.
    pub fn refs(&self) -> &[ObjRef] {
        match &self.elements {
            Elements::Subset(v) => v,
            Elements::Owned(_) => &[],
        }
    }

    /// Mutable subset references, `None` for owning collections.
    pub fn refs_mut(&mut self) -> Option<&mut Vec<ObjRef>> {
        match &mut self.elements {
            Elements::Subset(v) => Some(v),
            Elements::Owned(_) => None,
        }
    }

    /// Owned element at `index`.
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements().get(index)
    }

    /// Mutable owned element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.elements_mut().get_mut(index)
    }

    /// Append an owned element. Its kind must belong to the collection's kind.
    pub fn push(&mut self, element: impl Into<Element>) -> Result<usize, EventError> {
        let element = element.into();
        let found = element.kind();
        if !found.is_a(self.kind) {
            return Err(EventError::ElementKindMismatch {
                expected: self.kind,
                found,
            });
        }
        match &mut self.elements {
            Elements::Owned(v) => {
                v.push(element);
                Ok(v.len() - 1)
            }
            Elements::Subset(_) => Err(EventError::StorageMismatch { subset: true }),
        }
    }

    /// Append a reference to a subset collection.
    pub fn push_ref(&mut self, target: ObjRef) -> Result<usize, EventError> {
        match &mut self.elements {
            Elements::Subset(v) => {
                v.push(target);
                Ok(v.len() - 1)
            }
            Elements::Owned(_) => Err(EventError::StorageMismatch { subset: false }),
        }
    }
}
