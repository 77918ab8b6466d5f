// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reconstruction output: tracks, clusters, vertices and particles.

use crate::ObjRef;

/// Conversion factor from curvature and field to transverse momentum.
const C_GEV_PER_T_MM: f64 = 0.299_792_458e-3;

/// Track parameters at one location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackState {
    /// Location code (at IP, first hit, last hit, calorimeter, other).
    pub location: i32,
    /// Impact parameter in r-phi.
    pub d0: f32,
    /// Azimuth at the point of closest approach.
    pub phi: f32,
    /// Signed curvature (1/mm).
    pub omega: f32,
    /// Impact parameter in z.
    pub z0: f32,
    /// Dip angle tangent.
    pub tan_lambda: f32,
    /// Lower-triangle covariance of the five parameters.
    pub covariance: [f32; 15],
    /// Reference point.
    pub reference_point: [f32; 3],
}

impl TrackState {
    /// Momentum at the point of closest approach for a solenoid field `bz` (tesla).
    ///
    /// Zero curvature yields a zero vector.
    pub fn momentum(&self, bz: f64) -> [f64; 3] {
        let omega = f64::from(self.omega);
        if omega == 0.0 {
            return [0.0; 3];
        }
        let pt = (C_GEV_PER_T_MM * bz / omega).abs();
        let phi = f64::from(self.phi);
        [pt * phi.cos(), pt * phi.sin(), pt * f64::from(self.tan_lambda)]
    }
}

/// Fitted track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    /// Track type bits.
    pub track_type: i32,
    /// Track states; the first is the one at the interaction point.
    pub states: Vec<TrackState>,
    /// Fit chi-square.
    pub chi2: f32,
    /// Degrees of freedom.
    pub ndf: i32,
    /// dE/dx.
    pub dedx: f32,
    /// dE/dx error.
    pub dedx_error: f32,
    /// Radius of the innermost hit.
    pub radius_of_innermost_hit: f32,
    /// Hit counts per subdetector.
    pub subdetector_hit_numbers: Vec<i32>,
    /// Sub-tracks.
    pub tracks: Vec<ObjRef>,
    /// Hits (with the `HITS` bit).
    pub hits: Vec<ObjRef>,
    /// Momentum of the first state, derived on decode from the field at the
    /// origin. Not stored on the wire.
    pub momentum: [f64; 3],
}

/// Particle hypothesis attached to a cluster or reconstructed particle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleId {
    /// Log-likelihood of the hypothesis.
    pub likelihood: f32,
    /// Type code.
    pub pid_type: i32,
    /// PDG code.
    pub pdg: i32,
    /// Algorithm that produced it.
    pub algorithm_type: i32,
    /// Algorithm parameters.
    pub parameters: Vec<f32>,
}

/// Calorimeter cluster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cluster {
    /// Cluster type bits.
    pub cluster_type: i32,
    /// Energy.
    pub energy: f32,
    /// Energy error.
    pub energy_error: f32,
    /// Position.
    pub position: [f32; 3],
    /// Position covariance.
    pub position_error: [f32; 6],
    /// Intrinsic polar angle.
    pub i_theta: f32,
    /// Intrinsic azimuth.
    pub i_phi: f32,
    /// Direction covariance.
    pub direction_error: [f32; 3],
    /// Shape parameters.
    pub shape: Vec<f32>,
    /// Particle hypotheses.
    pub particle_ids: Vec<ParticleId>,
    /// Sub-clusters.
    pub clusters: Vec<ObjRef>,
    /// Calorimeter hits (with the `HITS` bit).
    pub hits: Vec<ObjRef>,
    /// Energy fraction of each entry of `hits`.
    pub hit_contributions: Vec<f32>,
    /// Energy per subdetector.
    pub subdetector_energies: Vec<f32>,
}

/// Reconstructed vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    /// Primary vertex flag.
    pub primary: bool,
    /// Name of the finding algorithm.
    pub algorithm_type: String,
    /// Fit chi-square.
    pub chi2: f32,
    /// Fit probability.
    pub probability: f32,
    /// Position.
    pub position: [f32; 3],
    /// Position covariance.
    pub covariance: [f32; 6],
    /// Algorithm-specific parameters.
    pub parameters: Vec<f32>,
    /// Particle made from this vertex.
    pub associated_particle: Option<ObjRef>,
}

/// Particle-flow object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconstructedParticle {
    /// Type code.
    pub particle_type: i32,
    /// Momentum.
    pub momentum: [f32; 3],
    /// Energy.
    pub energy: f32,
    /// Four-momentum covariance.
    pub covariance: [f32; 10],
    /// Mass.
    pub mass: f32,
    /// Charge.
    pub charge: f32,
    /// Reference point.
    pub reference_point: [f32; 3],
    /// Particle hypotheses.
    pub particle_ids: Vec<ParticleId>,
    /// Index into `particle_ids` of the hypothesis used.
    pub pid_used: Option<usize>,
    /// Goodness of the chosen hypothesis.
    pub goodness_of_pid: f32,
    /// Constituent particles.
    pub particles: Vec<ObjRef>,
    /// Constituent tracks.
    pub tracks: Vec<ObjRef>,
    /// Constituent clusters.
    pub clusters: Vec<ObjRef>,
    /// Vertex the particle starts from.
    pub start_vertex: Option<ObjRef>,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn momentum_from_curvature() {
        let state = TrackState {
            omega: 1.0e-3,
            phi: 0.0,
            tan_lambda: 1.0,
            ..TrackState::default()
        };
        let p = state.momentum(4.0);
        let pt = 0.299_792_458e-3 * 4.0 / 1.0e-3;
        assert!((p[0] - pt).abs() < 1e-9);
        assert!(p[1].abs() < 1e-12);
        assert!((p[2] - pt).abs() < 1e-9);
    }

    #[test]
    fn straight_track_has_no_momentum() {
        assert_eq!(TrackState::default().momentum(5.0), [0.0; 3]);
    }
}
