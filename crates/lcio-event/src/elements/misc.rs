// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Relations and user data records.

use crate::ObjRef;

/// Weighted link between two elements of any kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LcRelation {
    /// Source element.
    pub from: Option<ObjRef>,
    /// Target element.
    pub to: Option<ObjRef>,
    /// Weight (stored with the `WEIGHTED` bit, otherwise `1.0` on read).
    pub weight: f32,
}

/// User record of ints, floats and doubles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LcGenericObject {
    /// Integer values.
    pub ints: Vec<i32>,
    /// Float values.
    pub floats: Vec<f32>,
    /// Double values.
    pub doubles: Vec<f64>,
}

impl LcGenericObject {
    /// `(n_int, n_float, n_double)`.
    pub fn arity(&self) -> [usize; 3] {
        [self.ints.len(), self.floats.len(), self.doubles.len()]
    }
}

/// Vector of floats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LcFloatVec(pub Vec<f32>);

/// Vector of ints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LcIntVec(pub Vec<i32>);

/// Vector of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LcStrVec(pub Vec<String>);
