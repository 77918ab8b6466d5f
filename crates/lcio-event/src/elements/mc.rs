// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::flags::{bit_test, sim_status};
use crate::ObjRef;

/// A generator or simulation particle.
///
/// `parents` and `daughters` are kept symmetric by the reader: if `a` lists
/// `b` as a daughter then `b` lists `a` as a parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct McParticle {
    /// Parent particles.
    pub parents: Vec<ObjRef>,
    /// Daughter particles.
    pub daughters: Vec<ObjRef>,
    /// PDG particle code.
    pub pdg: i32,
    /// Generator status code.
    pub generator_status: i32,
    /// Simulator status bits (see [`sim_status`]). The end-point bit is wire-only.
    pub simulator_status: u32,
    /// Production vertex (mm).
    pub vertex: [f64; 3],
    /// Production time (ns).
    pub time: f32,
    /// Momentum at production (GeV).
    pub momentum: [f32; 3],
    /// Mass (GeV).
    pub mass: f32,
    /// Charge; `None` means "take it from the particle table on write".
    pub charge: Option<f32>,
    /// Explicit end point, if one was recorded.
    pub endpoint: Option<[f64; 3]>,
    /// Momentum at the end point (GeV).
    pub momentum_at_endpoint: [f32; 3],
    /// Spin.
    pub spin: [f32; 3],
    /// Colour flow.
    pub color_flow: [i32; 2],
}

impl McParticle {
    /// Energy from mass and momentum.
    pub fn energy(&self) -> f64 {
        let m = f64::from(self.mass);
        let p2: f64 = self.momentum.iter().map(|p| f64::from(*p).powi(2)).sum();
        (m * m + p2).sqrt()
    }

    /// Returns `true` if the simulator created this particle.
    pub const fn is_created_in_simulation(&self) -> bool {
        bit_test(self.simulator_status, sim_status::CREATED_IN_SIMULATION)
    }

    /// Returns `true` if this particle's vertex is not its parent's end point.
    pub const fn vertex_is_not_endpoint_of_parent(&self) -> bool {
        bit_test(
            self.simulator_status,
            sim_status::VERTEX_IS_NOT_ENDPOINT_OF_PARENT,
        )
    }

    /// Returns `true` if the particle left the detector.
    pub const fn has_left_detector(&self) -> bool {
        bit_test(self.simulator_status, sim_status::LEFT_DETECTOR)
    }

    /// Returns `true` if the particle stopped inside the detector.
    pub const fn is_stopped(&self) -> bool {
        bit_test(self.simulator_status, sim_status::STOPPED)
    }
}
