use crate::error::{ModelError, ModelResult};
use crate::material::{Material, MaterialEntry, MaterialLibrary};
use serde::{Deserialize, Serialize};

/// Tag of the source-only pseudo-material that never receives per-material tallies.
pub const SOURCE_ONLY_MATERIAL: &str = "DT_plasma";

/// Ordered collection of tagged materials available for filtering.
///
/// `MaterialSet` behaves like a simple growable list keyed by material tag.
/// Tags are unique: inserting a second material with an existing tag is
/// rejected, so a lookup by tag can never be ambiguous. Every inserted
/// material takes its tag as name and the next free material id (starting
/// at 1) unless it already carries one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialSet {
    /// Storage for (tag, material) pairs in insertion order
    materials: Vec<(String, Material)>,
}

impl MaterialSet {
    /// Create a new empty materials collection
    pub fn new() -> Self {
        MaterialSet {
            materials: Vec::new(),
        }
    }

    /// Build a set from declarative entries, resolving library names through `library`.
    pub fn from_entries<'a, I>(entries: I, library: &dyn MaterialLibrary) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a MaterialEntry)>,
    {
        let mut set = MaterialSet::new();
        for (tag, entry) in entries {
            set.insert(tag.clone(), entry.resolve(library)?)?;
        }
        Ok(set)
    }

    /// Append a material under `tag`
    ///
    /// # Errors
    /// * `ModelError::Validation` if `tag` is empty or already present
    /// * `ModelError::Validation` if the material's id is already used
    pub fn insert(&mut self, tag: impl Into<String>, mut material: Material) -> ModelResult<()> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(ModelError::Validation(
                "material tag cannot be empty".to_string(),
            ));
        }
        if self.contains(&tag) {
            return Err(ModelError::Validation(format!(
                "duplicate material tag '{}'",
                tag
            )));
        }
        match material.material_id {
            Some(id) if self.ids().any(|used| used == id) => {
                return Err(ModelError::Validation(format!(
                    "duplicate material_id {} for material '{}'",
                    id, tag
                )));
            }
            Some(_) => {}
            None => {
                let mut next_id = 1;
                while self.ids().any(|used| used == next_id) {
                    next_id += 1;
                }
                material.set_material_id(next_id);
            }
        }
        material.set_name(tag.clone());
        self.materials.push((tag, material));
        Ok(())
    }

    /// Look up a material by exact tag match.
    ///
    /// # Errors
    /// * `ModelError::NotFound` if no material carries `tag`
    pub fn get_material(&self, tag: &str) -> ModelResult<&Material> {
        self.materials
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, m)| m)
            .ok_or_else(|| ModelError::NotFound(format!("no material tagged '{}'", tag)))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.materials.iter().any(|(t, _)| t == tag)
    }

    /// Get the number of materials in the collection
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Iterate over (tag, material) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Material)> {
        self.materials.iter().map(|(t, m)| (t.as_str(), m))
    }

    /// Tags in insertion order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|(t, _)| t.as_str())
    }

    /// Tags that receive per-material tallies (everything but the source-only material)
    pub fn expandable_tags(&self) -> impl Iterator<Item = &str> {
        self.tags().filter(|t| *t != SOURCE_ONLY_MATERIAL)
    }

    fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.materials.iter().filter_map(|(_, m)| m.material_id)
    }
}
