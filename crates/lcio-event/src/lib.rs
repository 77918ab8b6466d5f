// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory event model for LCIO data.
//!
//! An [`Event`] owns an ordered list of named [`Collection`]s. Each collection
//! holds elements of one [`ElementKind`] (or, for subset collections, bare
//! references to elements owned elsewhere in the same event).
//!
//! # References
//!
//! Cross-object pointers (a hit's MC particle, a track's hits, a particle's
//! parents) are stored as [`ObjRef`] values: the [`CollectionId`] of the owning
//! collection plus the element's index inside it. Collection ids are assigned
//! in insertion order and never reused within an event, so references stay
//! valid for the lifetime of the event. Dereference them with [`Event::get`].
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
    clippy::struct_field_names
)]

mod collection;
pub mod elements;
mod event;
pub mod flags;
mod ident;
mod kind;
mod params;

pub use collection::{Collection, Elements};
pub use elements::Element;
pub use event::{Event, EventError, RunHeader};
pub use flags::{bit_mask, bit_set, bit_test, Flags};
pub use ident::{CollectionId, ObjRef};
pub use kind::ElementKind;
pub use params::Parameters;
