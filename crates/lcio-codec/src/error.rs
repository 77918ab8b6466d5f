// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type shared by the codec, reader and writer.

use lcio_event::{Element, ElementKind, EventError};
use lcio_sio::{PointerTag, SioError};
use thiserror::Error;

/// Errors produced while encoding or decoding LCIO streams.
///
/// Everything except [`LcioError::UnknownBlockType`] aborts the current event.
#[derive(Debug, Error)]
pub enum LcioError {
    /// A block declared a version below the oldest supported format.
    #[error("format version {major}.{minor} is too old (ordinal {ordinal} < {min})", min = crate::version::MIN_SUPPORTED)]
    FormatTooOld {
        /// Declared major version.
        major: u16,
        /// Declared minor version.
        minor: u16,
        /// `major * 1000 + minor`.
        ordinal: u32,
    },
    /// No codec is registered for a block's declared wire type.
    #[error("no handler for block {block:?} of type {wire_type:?}")]
    UnknownBlockType {
        /// Block (collection) name.
        block: String,
        /// Declared wire type.
        wire_type: String,
    },
    /// Records did not arrive as header followed by data.
    #[error("record order violation: expected {expected}, found {found}")]
    RecordOrderViolation {
        /// Record that should have come next.
        expected: &'static str,
        /// Record that did (or `end of stream`).
        found: String,
    },
    /// A pointer token had no matching object after the whole event was read.
    #[error("unresolved reference {tag} in collection {collection:?}")]
    UnresolvedReference {
        /// Collection holding the dangling pointer.
        collection: String,
        /// The token.
        tag: PointerTag,
    },
    /// A pointer resolved to an element of the wrong kind.
    #[error("reference in collection {collection:?} points to {found}, expected {expected}")]
    ReferenceKindMismatch {
        /// Collection holding the pointer.
        collection: String,
        /// Kind the field requires.
        expected: ElementKind,
        /// Kind of the resolved target.
        found: ElementKind,
    },
    /// Two objects in one event carried the same pointer tag.
    #[error("duplicate pointer tag {0}")]
    DuplicatePointerTag(PointerTag),
    /// A collection name is not a legal identifier.
    #[error("collection name {0:?} is invalid")]
    InvalidCollectionName(String),
    /// No codec can write a collection (strict mode only).
    #[error("no handler can write collection {collection:?} of kind {kind}")]
    NoHandler {
        /// Collection name.
        collection: String,
        /// Declared kind.
        kind: ElementKind,
    },
    /// The writer was closed.
    #[error("writer is closed")]
    WriterClosed,
    /// A resolution patch does not fit the element it targets.
    #[error("invalid resolution patch: {0}")]
    InvalidPatch(String),
    /// Event model violation.
    #[error(transparent)]
    Event(#[from] EventError),
    /// Primitive stream failure (truncation, framing, I/O).
    #[error(transparent)]
    Sio(#[from] SioError),
    /// File system failure outside the primitive stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LcioError {
    /// Element of the wrong variant handed to a codec.
    pub(crate) fn kind_mismatch(expected: ElementKind, element: &Element) -> Self {
        Self::Event(EventError::ElementKindMismatch {
            expected,
            found: element.kind(),
        })
    }
}
