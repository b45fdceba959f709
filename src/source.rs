use crate::particle::Particle;
use serde::{Deserialize, Serialize};

/// Point source emitting mono-energetic particles isotropically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndependentSource {
    pub space: [f64; 3],
    /// Energy in eV
    pub energy: f64,
    pub particle: Particle,
}

impl IndependentSource {
    /// A 14.06 MeV DT neutron source at the origin.
    pub fn new() -> Self {
        Self {
            space: [0.0, 0.0, 0.0],
            energy: 14.06e6,
            particle: Particle::Neutron,
        }
    }
}

impl Default for IndependentSource {
    fn default() -> Self {
        Self::new()
    }
}
