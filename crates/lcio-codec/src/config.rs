// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reader and writer settings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Collection filtering and strictness for [`LcioWriter`](crate::LcioWriter).
///
/// A collection is skipped if it is transient, if `only` is non-empty and does
/// not name it, or if `ignore` names it; checked in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Collections never written.
    pub ignore: BTreeSet<String>,
    /// If non-empty, the only collections written.
    pub only: BTreeSet<String>,
    /// Fail with [`LcioError::NoHandler`](crate::LcioError::NoHandler) instead
    /// of skipping collections no codec can write.
    pub strict_handlers: bool,
}

impl WriterConfig {
    /// Returns `true` if a collection called `name` passes the name lists.
    pub fn admits(&self, name: &str) -> bool {
        (self.only.is_empty() || self.only.contains(name)) && !self.ignore.contains(name)
    }
}

/// Behavior of [`LcioReader`](crate::LcioReader) on unexpected input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Skip blocks with an unregistered wire type (with a warning) instead of
    /// failing with [`LcioError::UnknownBlockType`](crate::LcioError::UnknownBlockType).
    pub skip_unknown_blocks: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            skip_unknown_blocks: true,
        }
    }
}
