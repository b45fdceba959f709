use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Particle species a tally can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Particle {
    Neutron,
    Photon,
}

impl Particle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Particle::Neutron => "neutron",
            Particle::Photon => "photon",
        }
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Particle {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "neutron" => Ok(Particle::Neutron),
            "photon" => Ok(Particle::Photon),
            other => Err(ModelError::Validation(format!(
                "unknown particle '{}', expected 'neutron' or 'photon'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_round_trip_through_str() {
        assert_eq!("neutron".parse::<Particle>().unwrap(), Particle::Neutron);
        assert_eq!(Particle::Photon.to_string(), "photon");
        assert!("electron".parse::<Particle>().is_err());
    }
}
