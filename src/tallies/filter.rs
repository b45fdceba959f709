use crate::tallies::{
    CellFilter, EnergyFilter, EnergyFunctionFilter, MaterialFilter, MeshFilter, ParticleFilter,
};
use serde::{Deserialize, Serialize};

/// Unified filter enum for tallies
///
/// The position of a filter inside a tally's filter list is significant to
/// the engine and is preserved through serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    Particle(ParticleFilter),
    Energy(EnergyFilter),
    EnergyFunction(EnergyFunctionFilter),
    Mesh(MeshFilter),
    Material(MaterialFilter),
    Cell(CellFilter),
}

impl Filter {
    /// Get the type name of this filter for validation
    pub fn type_name(&self) -> &'static str {
        match self {
            Filter::Particle(_) => "ParticleFilter",
            Filter::Energy(_) => "EnergyFilter",
            Filter::EnergyFunction(_) => "EnergyFunctionFilter",
            Filter::Mesh(_) => "MeshFilter",
            Filter::Material(_) => "MaterialFilter",
            Filter::Cell(_) => "CellFilter",
        }
    }
}

impl From<ParticleFilter> for Filter {
    fn from(filter: ParticleFilter) -> Self {
        Filter::Particle(filter)
    }
}

impl From<EnergyFilter> for Filter {
    fn from(filter: EnergyFilter) -> Self {
        Filter::Energy(filter)
    }
}

impl From<EnergyFunctionFilter> for Filter {
    fn from(filter: EnergyFunctionFilter) -> Self {
        Filter::EnergyFunction(filter)
    }
}

impl From<MeshFilter> for Filter {
    fn from(filter: MeshFilter) -> Self {
        Filter::Mesh(filter)
    }
}

impl From<MaterialFilter> for Filter {
    fn from(filter: MaterialFilter) -> Self {
        Filter::Material(filter)
    }
}

impl From<CellFilter> for Filter {
    fn from(filter: CellFilter) -> Self {
        Filter::Cell(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;

    #[test]
    fn test_type_name_cell() {
        let filter = Filter::from(CellFilter::new(42));
        assert_eq!(filter.type_name(), "CellFilter");
    }

    #[test]
    fn test_type_name_particle() {
        let filter = Filter::from(ParticleFilter::new(Particle::Photon));
        assert_eq!(filter.type_name(), "ParticleFilter");
    }

    #[test]
    fn test_serialized_filter_carries_type_tag() {
        let filter = Filter::from(CellFilter::new(7));
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["type"], "cell");
        assert_eq!(json["cell_id"], 7);
    }
}
