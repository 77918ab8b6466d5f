// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulated, raw and reconstructed detector hits.

use crate::ObjRef;

/// Simulated energy deposit in a tracking layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimTrackerHit {
    /// Lower cell-id word.
    pub cell_id0: i32,
    /// Upper cell-id word (written only with the `ID1` bit).
    pub cell_id1: i32,
    /// Position (mm).
    pub position: [f64; 3],
    /// Deposited energy (GeV).
    pub edep: f32,
    /// Time (ns).
    pub time: f32,
    /// Particle that caused the hit.
    pub particle: Option<ObjRef>,
    /// Particle momentum at the hit (with the `MOMENTUM` bit).
    pub momentum: [f32; 3],
    /// Path length in the sensitive volume (with the `MOMENTUM` bit).
    pub path_length: f32,
    /// Quality bits.
    pub quality: i32,
}

/// One particle's share of a simulated calorimeter cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct McContribution {
    /// Contributing particle.
    pub particle: Option<ObjRef>,
    /// Energy contributed (GeV).
    pub energy: f32,
    /// Time of the contribution (ns).
    pub time: f32,
    /// PDG of the secondary that deposited the energy (with the `STEP` bit).
    pub pdg: i32,
    /// Step position (with the `STEP` bit).
    pub step_position: [f32; 3],
}

/// Simulated calorimeter cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimCalorimeterHit {
    /// Lower cell-id word.
    pub cell_id0: i32,
    /// Upper cell-id word.
    pub cell_id1: i32,
    /// Total energy (GeV).
    pub energy: f32,
    /// Cell position (with the `LONG` bit).
    pub position: [f32; 3],
    /// Per-particle contributions.
    pub contributions: Vec<McContribution>,
}

impl SimCalorimeterHit {
    /// Earliest contribution time, `0` if there are none.
    pub fn time(&self) -> f32 {
        self.contributions
            .iter()
            .map(|c| c.time)
            .reduce(f32::min)
            .unwrap_or(0.0)
    }
}

/// Reconstructed calorimeter cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalorimeterHit {
    /// Lower cell-id word.
    pub cell_id0: i32,
    /// Upper cell-id word.
    pub cell_id1: i32,
    /// Corrected energy (GeV).
    pub energy: f32,
    /// Energy error.
    pub energy_error: f32,
    /// Time (ns).
    pub time: f32,
    /// Cell position.
    pub position: [f32; 3],
    /// Hit type.
    pub hit_type: i32,
    /// Raw hit this was made from.
    pub raw_hit: Option<ObjRef>,
}

impl From<&SimCalorimeterHit> for CalorimeterHit {
    fn from(sim: &SimCalorimeterHit) -> Self {
        Self {
            cell_id0: sim.cell_id0,
            cell_id1: sim.cell_id1,
            energy: sim.energy,
            energy_error: 0.0,
            time: sim.time(),
            position: sim.position,
            hit_type: 0,
            raw_hit: None,
        }
    }
}

/// Digitised calorimeter amplitude.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCalorimeterHit {
    /// Lower cell-id word.
    pub cell_id0: i32,
    /// Upper cell-id word.
    pub cell_id1: i32,
    /// ADC amplitude.
    pub amplitude: i32,
    /// TDC time stamp (with the `TIME` bit).
    pub time_stamp: i32,
}

/// Reconstructed tracker space point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerHit {
    /// Lower cell-id word.
    pub cell_id0: i32,
    /// Upper cell-id word.
    pub cell_id1: i32,
    /// Hit type.
    pub hit_type: i32,
    /// Position (mm).
    pub position: [f64; 3],
    /// Lower-triangle covariance of the position.
    pub covariance: [f32; 6],
    /// Deposited energy.
    pub edep: f32,
    /// Deposited energy error.
    pub edep_error: f32,
    /// Time (ns).
    pub time: f32,
    /// Quality bits.
    pub quality: i32,
    /// Raw hits this was made from.
    pub raw_hits: Vec<ObjRef>,
}

/// Digitised tracker ADC samples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerRawData {
    /// Lower cell-id word.
    pub cell_id0: i32,
    /// Upper cell-id word.
    pub cell_id1: i32,
    /// Time.
    pub time: i32,
    /// ADC samples.
    pub adc_values: Vec<i16>,
}

/// TPC pad hit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TpcHit {
    /// Pad cell id.
    pub cell_id: i32,
    /// Time.
    pub time: f32,
    /// Charge.
    pub charge: f32,
    /// Quality bits.
    pub quality: i32,
    /// Raw data words (with the `RAW` bit).
    pub raw_data: Vec<i32>,
}
