use crate::error::{ModelError, ModelResult};
use crate::physics_data::check_increasing;
use serde::{Deserialize, Serialize};

/// Energy filter for tallies - filters events based on particle energy
/// Energy bins are defined by bin edges [E0, E1, E2, ..., En]
/// This creates bins: [E0, E1), [E1, E2), ..., [En-1, En]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnergyBins")]
pub struct EnergyFilter {
    /// Energy bin boundaries in eV, must be in ascending order
    /// For n boundaries, creates n-1 bins
    pub bins: Vec<f64>,
}

impl EnergyFilter {
    /// Create a new EnergyFilter with the given bin boundaries
    ///
    /// # Errors
    /// * `ModelError::Validation` if there are fewer than 2 edges or the
    ///   edges are not strictly ascending
    pub fn new(bins: Vec<f64>) -> ModelResult<Self> {
        check_increasing(&bins, "energy filter bins")?;
        Ok(Self { bins })
    }

    /// Get the number of energy bins
    pub fn num_bins(&self) -> usize {
        self.bins.len().saturating_sub(1)
    }
}

#[derive(Deserialize)]
struct EnergyBins {
    bins: Vec<f64>,
}

impl TryFrom<EnergyBins> for EnergyFilter {
    type Error = ModelError;

    fn try_from(raw: EnergyBins) -> ModelResult<Self> {
        EnergyFilter::new(raw.bins)
    }
}
