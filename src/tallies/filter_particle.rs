use crate::particle::Particle;
use serde::{Deserialize, Serialize};

/// Restricts scoring to the listed particle species.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticleFilter {
    pub bins: Vec<Particle>,
}

impl ParticleFilter {
    pub fn new(particle: Particle) -> Self {
        Self {
            bins: vec![particle],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_species() {
        let filter = ParticleFilter::new(Particle::Photon);
        assert_eq!(filter.bins, vec![Particle::Photon]);
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json, serde_json::json!({ "bins": ["photon"] }));
    }
}
