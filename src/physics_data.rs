//! Constant physics tables referenced by the tally catalog.
//!
//! The tally compiler needs two kinds of tabulated data: energy group
//! structures (the `CCFE-709` structure for spectra tallies) and
//! energy-dependent dose conversion coefficients per particle and exposure
//! geometry (ICRP-116 `ISO` for effective dose tallies). Both are supplied
//! from outside the crate as a JSON document:
//!
//! ```json
//! {
//!   "group_structures": { "CCFE-709": [1.0e-5, 1.0e-4, 1.0e9] },
//!   "dose_coefficients": [
//!     { "particle": "neutron", "geometry": "ISO",
//!       "energy": [1.0e-3, 1.0e6], "coefficients": [1.0, 2.0] }
//!   ]
//! }
//! ```
//!
//! Energies are in eV. Tables are validated once when loaded or inserted, so
//! every lookup afterwards returns strictly increasing edges.

use crate::config::Config;
use crate::error::{ModelError, ModelResult};
use crate::particle::Particle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Group structure used by spectra tallies.
pub const SPECTRA_GROUP_STRUCTURE: &str = "CCFE-709";

/// Exposure geometry of a dose coefficient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoseGeometry {
    AP,
    PA,
    LLAT,
    RLAT,
    ROT,
    ISO,
}

impl fmt::Display for DoseGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DoseGeometry::AP => "AP",
            DoseGeometry::PA => "PA",
            DoseGeometry::LLAT => "LLAT",
            DoseGeometry::RLAT => "RLAT",
            DoseGeometry::ROT => "ROT",
            DoseGeometry::ISO => "ISO",
        };
        f.write_str(label)
    }
}

/// Tabulated dose conversion coefficients for one particle and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseTable {
    pub particle: Particle,
    pub geometry: DoseGeometry,
    /// Energy points in eV, strictly increasing
    pub energy: Vec<f64>,
    /// One coefficient per energy point
    pub coefficients: Vec<f64>,
}

impl DoseTable {
    fn validate(&self) -> ModelResult<()> {
        check_increasing(&self.energy, "dose coefficient energies")?;
        if self.energy.len() != self.coefficients.len() {
            return Err(ModelError::Validation(format!(
                "{} {} dose table has {} energies but {} coefficients",
                self.particle,
                self.geometry,
                self.energy.len(),
                self.coefficients.len()
            )));
        }
        Ok(())
    }
}

/// Validated group structures and dose tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsData {
    #[serde(default)]
    group_structures: HashMap<String, Vec<f64>>,
    #[serde(default)]
    dose_coefficients: Vec<DoseTable>,
}

impl PhysicsData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a physics data document.
    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        let data: PhysicsData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Read a physics data document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ModelError::NotFound(format!(
                "physics data file {} not found",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        let data = Self::from_json_str(&contents)?;
        log::debug!(
            "Loaded {} group structures and {} dose tables from {}",
            data.group_structures.len(),
            data.dose_coefficients.len(),
            path.display()
        );
        Ok(data)
    }

    /// Load the file named by the global [`Config`].
    pub fn from_config() -> ModelResult<Self> {
        let path = Config::global().physics_data.clone().ok_or_else(|| {
            ModelError::NotFound("no physics data path configured".to_string())
        })?;
        Self::from_file(path)
    }

    /// Add or replace a named group structure.
    pub fn insert_group_structure(
        &mut self,
        name: impl Into<String>,
        edges: Vec<f64>,
    ) -> ModelResult<()> {
        let name = name.into();
        check_increasing(&edges, &format!("group structure {}", name))?;
        self.group_structures.insert(name, edges);
        Ok(())
    }

    /// Add or replace the dose table for `(particle, geometry)`.
    pub fn insert_dose_coefficients(
        &mut self,
        particle: Particle,
        geometry: DoseGeometry,
        energy: Vec<f64>,
        coefficients: Vec<f64>,
    ) -> ModelResult<()> {
        let table = DoseTable {
            particle,
            geometry,
            energy,
            coefficients,
        };
        table.validate()?;
        self.dose_coefficients
            .retain(|t| !(t.particle == particle && t.geometry == geometry));
        self.dose_coefficients.push(table);
        Ok(())
    }

    pub fn group_structure(&self, name: &str) -> ModelResult<&[f64]> {
        self.group_structures
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ModelError::NotFound(format!("group structure '{}'", name)))
    }

    pub fn dose_coefficients(
        &self,
        particle: Particle,
        geometry: DoseGeometry,
    ) -> ModelResult<&DoseTable> {
        self.dose_coefficients
            .iter()
            .find(|t| t.particle == particle && t.geometry == geometry)
            .ok_or_else(|| {
                ModelError::NotFound(format!(
                    "dose coefficients for {} in {} geometry",
                    particle, geometry
                ))
            })
    }

    fn validate(&self) -> ModelResult<()> {
        for (name, edges) in &self.group_structures {
            check_increasing(edges, &format!("group structure {}", name))?;
        }
        for table in &self.dose_coefficients {
            table.validate()?;
        }
        Ok(())
    }
}

pub(crate) fn check_increasing(values: &[f64], what: &str) -> ModelResult<()> {
    if values.len() < 2 {
        return Err(ModelError::Validation(format!(
            "{} requires at least 2 values, got {}",
            what,
            values.len()
        )));
    }
    if values.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(ModelError::Validation(format!(
            "{} must be strictly increasing",
            what
        )));
    }
    Ok(())
}
