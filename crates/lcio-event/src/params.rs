// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Named parameter maps attached to events, runs and collections.

use std::collections::BTreeMap;

/// Three string-keyed maps of fixed value arrays.
///
/// Keys iterate in sorted order, which is also the order they are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    /// Integer parameters.
    pub ints: BTreeMap<String, Vec<i32>>,
    /// Float parameters.
    pub floats: BTreeMap<String, Vec<f32>>,
    /// String parameters.
    pub strings: BTreeMap<String, Vec<String>>,
}

impl Parameters {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if all three maps are empty.
    pub fn is_empty(&self) -> bool {
        self.ints.is_empty() && self.floats.is_empty() && self.strings.is_empty()
    }

    /// Replace the integer values stored under `key`.
    pub fn set_ints(&mut self, key: impl Into<String>, values: Vec<i32>) {
        self.ints.insert(key.into(), values);
    }

    /// Replace the float values stored under `key`.
    pub fn set_floats(&mut self, key: impl Into<String>, values: Vec<f32>) {
        self.floats.insert(key.into(), values);
    }

    /// Replace the string values stored under `key`.
    pub fn set_strings(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.strings.insert(key.into(), values);
    }

    /// First integer stored under `key`.
    pub fn int(&self, key: &str) -> Option<i32> {
        self.ints.get(key).and_then(|v| v.first().copied())
    }

    /// First float stored under `key`.
    pub fn float(&self, key: &str) -> Option<f32> {
        self.floats.get(key).and_then(|v| v.first().copied())
    }

    /// First string stored under `key`.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.strings
            .get(key)
            .and_then(|v| v.first().map(String::as_str))
    }

    /// All strings stored under `key` (empty if absent).
    pub fn strings_of(&self, key: &str) -> &[String] {
        self.strings.get(key).map_or(&[], Vec::as_slice)
    }
}
