// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Injected collaborators: magnetic field map and particle property table.

/// Magnetic field lookup.
pub trait FieldMap: Send + Sync {
    /// Field in tesla at `position` (mm).
    fn field_at(&self, position: [f64; 3]) -> [f64; 3];
}

/// Field that is the same everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UniformField {
    /// Field vector in tesla.
    pub b: [f64; 3],
}

impl UniformField {
    /// Solenoid field of `bz` tesla along z.
    pub const fn solenoid(bz: f64) -> Self {
        Self { b: [0.0, 0.0, bz] }
    }
}

impl FieldMap for UniformField {
    fn field_at(&self, _position: [f64; 3]) -> [f64; 3] {
        self.b
    }
}

/// Static properties of one particle species.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleType {
    /// Display name.
    pub name: &'static str,
    /// PDG code.
    pub pdg: i32,
    /// Charge in units of e.
    pub charge: f32,
    /// Mass in GeV.
    pub mass: f32,
}

/// Maps PDG codes to particle properties.
pub trait ParticlePropertyProvider: Send + Sync {
    /// Properties of `pdg`, if known.
    fn lookup(&self, pdg: i32) -> Option<ParticleType>;
}

/// Built-in table of common species and their antiparticles.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticParticleTable;

/// `(pdg, name, charge, mass)` for particles; antiparticles are derived.
const SPECIES: &[(i32, &str, f32, f32)] = &[
    (11, "e-", -1.0, 0.000_511),
    (12, "nu_e", 0.0, 0.0),
    (13, "mu-", -1.0, 0.105_658),
    (14, "nu_mu", 0.0, 0.0),
    (15, "tau-", -1.0, 1.776_86),
    (16, "nu_tau", 0.0, 0.0),
    (21, "g", 0.0, 0.0),
    (22, "gamma", 0.0, 0.0),
    (23, "Z0", 0.0, 91.1876),
    (24, "W+", 1.0, 80.379),
    (25, "H0", 0.0, 125.1),
    (111, "pi0", 0.0, 0.134_977),
    (211, "pi+", 1.0, 0.139_570),
    (130, "K0L", 0.0, 0.497_611),
    (310, "K0S", 0.0, 0.497_611),
    (321, "K+", 1.0, 0.493_677),
    (2112, "n", 0.0, 0.939_565),
    (2212, "p", 1.0, 0.938_272),
    (3122, "Lambda0", 0.0, 1.115_683),
];

/// Self-conjugate species: no separate antiparticle.
const SELF_CONJUGATE: &[i32] = &[21, 22, 23, 25, 111, 130, 310];

impl ParticlePropertyProvider for StaticParticleTable {
    fn lookup(&self, pdg: i32) -> Option<ParticleType> {
        let abs = pdg.checked_abs()?;
        if pdg < 0 && SELF_CONJUGATE.contains(&abs) {
            return None;
        }
        let (code, name, charge, mass) = SPECIES.iter().copied().find(|s| s.0 == abs)?;
        let charge = if pdg < 0 { -charge } else { charge };
        Some(ParticleType {
            name,
            pdg: if pdg < 0 { -code } else { code },
            charge,
            mass,
        })
    }
}
