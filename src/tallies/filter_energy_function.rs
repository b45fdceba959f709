use crate::error::{ModelError, ModelResult};
use crate::physics_data::{check_increasing, DoseTable};
use serde::{Deserialize, Serialize};

/// Weights each scoring event by a tabulated function of particle energy,
/// interpolated linearly between points. Used for dose conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnergyFunctionPoints")]
pub struct EnergyFunctionFilter {
    /// Energy points in eV, strictly increasing
    pub energy: Vec<f64>,
    /// Function value at each energy point
    pub y: Vec<f64>,
}

impl EnergyFunctionFilter {
    /// # Errors
    /// * `ModelError::Validation` if `energy` is not strictly increasing or
    ///   `y` has a different length
    pub fn new(energy: Vec<f64>, y: Vec<f64>) -> ModelResult<Self> {
        check_increasing(&energy, "energy function points")?;
        if energy.len() != y.len() {
            return Err(ModelError::Validation(format!(
                "energy function has {} energies but {} values",
                energy.len(),
                y.len()
            )));
        }
        Ok(Self { energy, y })
    }

    pub fn from_dose_table(table: &DoseTable) -> ModelResult<Self> {
        Self::new(table.energy.clone(), table.coefficients.clone())
    }
}

#[derive(Deserialize)]
struct EnergyFunctionPoints {
    energy: Vec<f64>,
    y: Vec<f64>,
}

impl TryFrom<EnergyFunctionPoints> for EnergyFunctionFilter {
    type Error = ModelError;

    fn try_from(raw: EnergyFunctionPoints) -> ModelResult<Self> {
        EnergyFunctionFilter::new(raw.energy, raw.y)
    }
}
