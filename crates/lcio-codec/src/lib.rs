// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! LCIO event codec: collection envelopes, per-kind element layouts,
//! deferred reference resolution and the event record stream.
//!
//! # Decoding
//!
//! [`LcioReader`] pairs each event header record with the data record that
//! follows it. Every block of the data record is decoded by the
//! [`CollectionCodec`] the [`HandlerRegistry`] finds for its declared wire
//! type. Pointer fields are not followed during decoding: codecs register the
//! tag of every element they read and queue the tokens of every pointer field.
//! Once the last block is in memory, [`resolve_event`] turns the queued tokens
//! into [`ObjRef`](lcio_event::ObjRef)s. A token that names nothing aborts the
//! event.
//!
//! # Versions
//!
//! Block versions are folded into an ordinal `major * 1000 + minor`. Each
//! codec decides field presence from that ordinal and from the collection's
//! flag word, field by field in stream order. Ordinals below
//! [`version::MIN_SUPPORTED`] are rejected.
//!
//! # Encoding
//!
//! [`LcioWriter`] filters an event's collections, gives every written element
//! a tag, encodes all blocks and only then writes the header and data records.
//! References into collections that are not written become null pointers.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::use_self
)]

mod codec;
mod config;
mod context;
mod envelope;
mod error;
pub mod handlers;
pub mod header;
pub mod providers;
mod reader;
mod registry;
mod resolve;
pub mod version;
mod writer;

pub use codec::ElementCodec;
pub use config::{ReaderConfig, WriterConfig};
pub use context::{
    CollectionContext, DecodeScope, EncodeScope, Patch, RefSlot, ResolutionAction,
    TagAssignments, TagTable,
};
pub use envelope::{read_parameters, write_parameters, CollectionCodec, REFERENCES_SUFFIX};
pub use error::LcioError;
pub use reader::LcioReader;
pub use registry::{HandlerRegistry, RegistryError};
pub use resolve::resolve_event;
pub use writer::LcioWriter;
