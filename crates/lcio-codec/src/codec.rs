// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The per-kind element codec boundary.

use lcio_event::{Collection, Element, ElementKind, Flags, Parameters};
use lcio_sio::{SioReader, SioWriter};

use crate::context::{CollectionContext, DecodeScope, EncodeScope};
use crate::LcioError;

/// Encodes and decodes single elements of one kind family.
///
/// Contract:
/// - `decode` consumes exactly the bytes `encode` produced for the same flags
///   and version. Field presence is decided only by the version ordinal and the
///   collection flags in `ctx`, evaluated in stream order.
/// - Pointer fields are never resolved here: `decode` queues them on the
///   [`DecodeScope`] and `encode` asks the [`EncodeScope`] for tags.
/// - An element carries its own tag on the wire exactly when `writes_tag`
///   says so; nothing may point at elements that carry none.
pub trait ElementCodec: Send + Sync {
    /// Kind this codec is bound to.
    fn kind(&self) -> ElementKind;

    /// Wire type name.
    fn wire_type(&self) -> &'static str {
        self.kind().wire_type()
    }

    /// Returns `true` if elements of `kind` can be written by this codec.
    fn accepts(&self, kind: ElementKind) -> bool {
        kind.is_a(self.kind())
    }

    /// Returns `true` if elements written with `flags` at ordinal `version`
    /// carry their own pointer tag.
    fn writes_tag(&self, _flags: Flags, _version: u32) -> bool {
        true
    }

    /// Adjust the flag word and parameters of a collection about to be written.
    fn prepare(
        &self,
        _collection: &Collection,
        flags: Flags,
        _parameters: &mut Parameters,
    ) -> Result<Flags, LcioError> {
        Ok(flags)
    }

    /// Read collection-level data that sits between the parameters and the
    /// element count.
    fn read_prelude(
        &self,
        _r: &mut SioReader<'_>,
        _flags: Flags,
        _version: u32,
    ) -> Result<Option<[usize; 3]>, LcioError> {
        Ok(None)
    }

    /// Write collection-level data that sits between the parameters and the
    /// element count.
    fn write_prelude(
        &self,
        _w: &mut SioWriter,
        _collection: &Collection,
        _flags: Flags,
    ) -> Result<Option<[usize; 3]>, LcioError> {
        Ok(None)
    }

    /// Decode one element.
    fn decode(
        &self,
        r: &mut SioReader<'_>,
        ctx: &CollectionContext<'_>,
        scope: &mut DecodeScope<'_>,
    ) -> Result<Element, LcioError>;

    /// Encode one element.
    fn encode(
        &self,
        w: &mut SioWriter,
        element: &Element,
        ctx: &CollectionContext<'_>,
        scope: &mut EncodeScope<'_>,
    ) -> Result<(), LcioError>;
}
