// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! SIO primitive stream for LCIO event files.
//!
//! This crate is the byte-level layer underneath the LCIO collection codecs:
//!
//! - [`SioWriter`] / [`SioReader`] encode and decode big-endian (XDR) scalars,
//!   padded strings and opaque [`PointerTag`]s inside a block body.
//! - [`RecordWriter`] / [`RecordReader`] frame named records made of named,
//!   versioned blocks on top of any `std::io` sink or source.
//!
//! Nothing here knows about particles, hits or collections. Pointer tags are
//! plain `u32` identities; turning them back into objects is the job of the
//! reference resolver in `lcio-codec`.
//!
//! # Record layout
//!
//! ```text
//! record header: header_len:u32  0xabadcafe  options:u32  data_len:u32
//!                uncompressed_len:u32  name_len:u32  name (padded to 4)
//! block:         block_len:u32  0xdeadbeef  version:u32  name_len:u32
//!                name (padded)  body (padded)
//! ```
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
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]

mod codec;
mod record;

pub use codec::{padded_len, PointerTag, SioError, SioReader, SioWriter, MAX_STRING_LEN};
pub use record::{
    BlockVersion, RawBlock, RawRecord, RecordReader, RecordWriter, BLOCK_MARKER, MAX_RECORD_LEN,
    OPT_COMPRESS, RECORD_MARKER,
};
