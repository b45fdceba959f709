use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A material composition as handed to the transport engine.
///
/// Only the declarative parts are kept here: nuclide atom fractions, density
/// with units and a temperature key. Resolving physical data for the nuclides
/// is the engine's job. `name` and `material_id` are assigned when the
/// material is placed into a [`crate::materials::MaterialSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Material {
    /// Optional name of the material
    #[serde(default)]
    pub name: Option<String>,
    /// Unique identifier for the material
    #[serde(default)]
    pub material_id: Option<u32>,
    /// Composition of the material as a map of nuclide names to their atomic fractions
    #[serde(default)]
    pub nuclides: BTreeMap<String, f64>,
    /// Density of the material
    #[serde(default)]
    pub density: Option<f64>,
    /// Density unit (default: g/cm3)
    #[serde(default = "default_density_units")]
    pub density_units: String,
    /// Temperature of the material in K
    #[serde(default = "default_temperature")]
    pub temperature: String,
}

fn default_density_units() -> String {
    String::from("g/cm3")
}

fn default_temperature() -> String {
    String::from("294")
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

impl Material {
    pub fn new() -> Self {
        Material {
            name: None,
            material_id: None,
            nuclides: BTreeMap::new(),
            density: None,
            density_units: default_density_units(),
            temperature: default_temperature(),
        }
    }

    /// Create a new material with a specific ID
    pub fn with_id(material_id: u32) -> Self {
        Material {
            material_id: Some(material_id),
            ..Self::new()
        }
    }

    /// Set the name of the material
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Get the name of the material
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the material ID
    pub fn set_material_id(&mut self, material_id: u32) {
        self.material_id = Some(material_id);
    }

    pub fn add_nuclide(&mut self, nuclide: impl AsRef<str>, fraction: f64) -> ModelResult<()> {
        if fraction < 0.0 {
            return Err(ModelError::Validation(format!(
                "fraction for nuclide {} cannot be negative",
                nuclide.as_ref()
            )));
        }
        self.nuclides.insert(String::from(nuclide.as_ref()), fraction);
        Ok(())
    }

    pub fn set_density(&mut self, unit: impl AsRef<str>, value: f64) -> ModelResult<()> {
        if value <= 0.0 {
            return Err(ModelError::Validation(String::from(
                "density must be positive",
            )));
        }
        let unit = unit.as_ref();
        if !matches!(unit, "g/cm3" | "kg/m3" | "atom/b-cm" | "atom/cm3") {
            return Err(ModelError::Validation(format!(
                "unsupported density unit '{}'",
                unit
            )));
        }
        self.density = Some(value);
        self.density_units = String::from(unit);
        Ok(())
    }

    pub fn set_temperature(&mut self, temperature: impl AsRef<str>) {
        self.temperature = String::from(temperature.as_ref());
    }
}

/// How a material is declared in a request: by library name, or inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaterialEntry {
    Library(String),
    Defined(Material),
}

/// Source of named library materials (e.g. "eurofer", "Li4SiO4").
pub trait MaterialLibrary {
    fn get_material(&self, name: &str) -> Option<Material>;
}

impl MaterialLibrary for HashMap<String, Material> {
    fn get_material(&self, name: &str) -> Option<Material> {
        self.get(name).cloned()
    }
}

/// A library with no entries; every library reference is reported missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLibrary;

impl MaterialLibrary for EmptyLibrary {
    fn get_material(&self, _name: &str) -> Option<Material> {
        None
    }
}

impl MaterialEntry {
    /// Produce the concrete material for this entry.
    pub fn resolve(&self, library: &dyn MaterialLibrary) -> ModelResult<Material> {
        match self {
            MaterialEntry::Defined(material) => Ok(material.clone()),
            MaterialEntry::Library(name) => library.get_material(name).ok_or_else(|| {
                ModelError::NotFound(format!("material '{}' is not in the material library", name))
            }),
        }
    }
}
