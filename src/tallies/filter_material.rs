use crate::error::{ModelError, ModelResult};
use crate::material::Material;
use serde::{Deserialize, Serialize};

/// Material filter for tallies - filters events based on which material they occur in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialFilter {
    pub material_id: u32,
    /// Material tag, carried for readability of the exported model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MaterialFilter {
    /// Create a MaterialFilter from a Material object
    ///
    /// # Errors
    /// * `ModelError::Validation` if the material has no material_id
    pub fn new(material: &Material) -> ModelResult<Self> {
        let material_id = material.material_id.ok_or_else(|| {
            ModelError::Validation(format!(
                "cannot filter on material '{}' without a material_id",
                material.get_name().unwrap_or("unnamed")
            ))
        })?;
        Ok(Self {
            material_id,
            name: material.get_name().map(String::from),
        })
    }
}
