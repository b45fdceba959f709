//! Declarative description of one model assembly.
//!
//! A [`ModelRequest`] can be filled in directly from Rust or parsed from a
//! JSON document such as
//!
//! ```json
//! {
//!   "h5m_filename": "dagmc.h5m",
//!   "materials": { "blanket": "Li4SiO4", "DT_plasma": { "density": 1e-6 } },
//!   "cell_tallies": ["TBR", "spectra"],
//!   "targeted_tallies": [{ "tally_types": ["heating"], "targets": [2, "blanket", null] }],
//!   "mesh_tally_2d": ["heating"],
//!   "mesh_2d_resolution": [400, 400],
//!   "bounding_box": [[-100, -100, -100], [100, 100, 100]]
//! }
//! ```
//!
//! Parsing is the single validation boundary: everything that passes
//! [`ModelRequest::from_value`] and [`ModelRequest::validate`] is structurally
//! sound, so assembly only fails on lookups (materials, physics data, the
//! geometry engine).

use crate::bounding_box::BoundingBox;
use crate::error::{ModelError, ModelResult};
use crate::material::MaterialEntry;
use crate::mesh::MeshLibrary;
use crate::scores::TallyCategory;
use crate::settings::Settings;
use crate::source::IndependentSource;
use crate::tallies::Target;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const KNOWN_KEYS: &[&str] = &[
    "h5m_filename",
    "materials",
    "source",
    "cell_tallies",
    "targeted_tallies",
    "mesh_tally_2d",
    "mesh_tally_3d",
    "mesh_tally_tet",
    "tet_mesh_filename",
    "mesh_2d_resolution",
    "mesh_3d_resolution",
    "mesh_2d_corners",
    "mesh_3d_corners",
    "bounding_box",
    "photon_transport",
    "simulation_batches",
    "simulation_particles_per_batch",
    "max_lost_particles",
];

/// A group of tally types compiled for each of a list of explicit targets.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetedTallies {
    pub tally_types: Vec<String>,
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// DAGMC geometry file
    pub h5m_filename: PathBuf,
    /// Material tag to material, in declaration order
    pub materials: Vec<(String, MaterialEntry)>,
    pub source: IndependentSource,
    pub cell_tallies: Vec<String>,
    pub targeted_tallies: Vec<TargetedTallies>,
    pub mesh_tally_2d: Vec<String>,
    pub mesh_tally_3d: Vec<String>,
    pub mesh_tally_tet: Vec<String>,
    pub tet_mesh_filename: Option<PathBuf>,
    /// `(height, width)` of each 2-D plane mesh
    pub mesh_2d_resolution: (usize, usize),
    pub mesh_3d_resolution: (usize, usize, usize),
    pub mesh_2d_corners: Option<BoundingBox>,
    pub mesh_3d_corners: Option<BoundingBox>,
    /// Pre-computed geometry extent; skips the engine query when set
    pub bounding_box: Option<BoundingBox>,
    pub photon_transport: bool,
    pub simulation_batches: usize,
    pub simulation_particles_per_batch: usize,
    /// 0 keeps the engine default
    pub max_lost_particles: usize,
}

impl Default for ModelRequest {
    fn default() -> Self {
        ModelRequest {
            h5m_filename: PathBuf::from("dagmc.h5m"),
            materials: Vec::new(),
            source: IndependentSource::new(),
            cell_tallies: Vec::new(),
            targeted_tallies: Vec::new(),
            mesh_tally_2d: Vec::new(),
            mesh_tally_3d: Vec::new(),
            mesh_tally_tet: Vec::new(),
            tet_mesh_filename: None,
            mesh_2d_resolution: (400, 400),
            mesh_3d_resolution: (100, 100, 100),
            mesh_2d_corners: None,
            mesh_3d_corners: None,
            bounding_box: None,
            photon_transport: true,
            simulation_batches: 10,
            simulation_particles_per_batch: 1000,
            max_lost_particles: 0,
        }
    }
}

impl ModelRequest {
    pub fn new(h5m_filename: impl AsRef<Path>) -> Self {
        ModelRequest {
            h5m_filename: h5m_filename.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ModelError::NotFound(format!("model request {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Parse and validate a request document.
    ///
    /// # Errors
    /// * `ModelError::Configuration` for unknown keys, lists that are not
    ///   arrays of strings, and malformed resolutions or corners
    /// * `ModelError::TypeKind` for a target that is not a tag, id or null
    /// * `ModelError::Validation` for inverted corners and rejected keywords
    pub fn from_value(value: &Value) -> ModelResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            ModelError::Configuration("model request must be a JSON object".to_string())
        })?;
        if let Some(key) = obj.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            return Err(ModelError::Configuration(format!(
                "unknown model request key '{}'",
                key
            )));
        }

        let defaults = ModelRequest::default();
        let request = ModelRequest {
            h5m_filename: optional_string(obj, "h5m_filename")?
                .map(PathBuf::from)
                .unwrap_or(defaults.h5m_filename),
            materials: parse_materials(obj)?,
            source: match present(obj, "source") {
                Some(v) => serde_json::from_value(v.clone())
                    .map_err(|e| ModelError::Configuration(format!("source: {}", e)))?,
                None => defaults.source,
            },
            cell_tallies: string_list(obj, "cell_tallies")?,
            targeted_tallies: parse_targeted(obj)?,
            mesh_tally_2d: string_list(obj, "mesh_tally_2d")?,
            mesh_tally_3d: string_list(obj, "mesh_tally_3d")?,
            mesh_tally_tet: string_list(obj, "mesh_tally_tet")?,
            tet_mesh_filename: optional_string(obj, "tet_mesh_filename")?.map(PathBuf::from),
            mesh_2d_resolution: match present(obj, "mesh_2d_resolution") {
                Some(v) => {
                    let r = resolution(v, 2, "mesh_2d_resolution")?;
                    (r[0], r[1])
                }
                None => defaults.mesh_2d_resolution,
            },
            mesh_3d_resolution: match present(obj, "mesh_3d_resolution") {
                Some(v) => {
                    let r = resolution(v, 3, "mesh_3d_resolution")?;
                    (r[0], r[1], r[2])
                }
                None => defaults.mesh_3d_resolution,
            },
            mesh_2d_corners: optional_corners(obj, "mesh_2d_corners")?,
            mesh_3d_corners: optional_corners(obj, "mesh_3d_corners")?,
            bounding_box: optional_corners(obj, "bounding_box")?,
            photon_transport: match present(obj, "photon_transport") {
                Some(Value::Bool(b)) => *b,
                Some(other) => {
                    return Err(ModelError::Configuration(format!(
                        "photon_transport must be a boolean, got {}",
                        other
                    )))
                }
                None => defaults.photon_transport,
            },
            simulation_batches: optional_count(obj, "simulation_batches")?
                .unwrap_or(defaults.simulation_batches),
            simulation_particles_per_batch: optional_count(obj, "simulation_particles_per_batch")?
                .unwrap_or(defaults.simulation_particles_per_batch),
            max_lost_particles: optional_count(obj, "max_lost_particles")?
                .unwrap_or(defaults.max_lost_particles),
        };
        request.validate()?;
        Ok(request)
    }

    /// Check keywords, the tet mesh file type, mesh resolutions and run settings.
    pub fn validate(&self) -> ModelResult<()> {
        TallyCategory::Cell.validate(&self.cell_tallies)?;
        TallyCategory::Mesh2D.validate(&self.mesh_tally_2d)?;
        TallyCategory::Mesh3D.validate(&self.mesh_tally_3d)?;
        TallyCategory::TetMesh.validate(&self.mesh_tally_tet)?;
        for group in &self.targeted_tallies {
            TallyCategory::Targeted.validate(&group.tally_types)?;
        }

        match &self.tet_mesh_filename {
            Some(filename) => {
                MeshLibrary::from_path(filename)?;
            }
            None if !self.mesh_tally_tet.is_empty() => {
                return Err(ModelError::Configuration(
                    "mesh_tally_tet requires a tet_mesh_filename".to_string(),
                ))
            }
            None => {}
        }
        let (h, w) = self.mesh_2d_resolution;
        let (x, y, z) = self.mesh_3d_resolution;
        if [h, w, x, y, z].contains(&0) {
            return Err(ModelError::Validation(
                "mesh resolutions must be at least 1 on every axis".to_string(),
            ));
        }
        self.settings().map(|_| ())
    }

    /// Run settings for the real simulation.
    pub fn settings(&self) -> ModelResult<Settings> {
        Settings::fixed_source(
            self.simulation_batches,
            self.simulation_particles_per_batch,
            self.photon_transport,
            self.max_lost_particles,
            self.source.clone(),
        )
    }
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn optional_string(obj: &Map<String, Value>, key: &str) -> ModelResult<Option<String>> {
    match present(obj, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ModelError::Configuration(format!(
            "{} must be a string, got {}",
            key, other
        ))),
    }
}

fn optional_count(obj: &Map<String, Value>, key: &str) -> ModelResult<Option<usize>> {
    match present(obj, key) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                ModelError::Configuration(format!(
                    "{} must be a non-negative integer, got {}",
                    key, v
                ))
            }),
    }
}

/// A list of keywords; absent or null is the empty list.
fn string_list(obj: &Map<String, Value>, key: &str) -> ModelResult<Vec<String>> {
    match present(obj, key) {
        None => Ok(Vec::new()),
        Some(v) => strings(v, key),
    }
}

fn strings(value: &Value, key: &str) -> ModelResult<Vec<String>> {
    let items = value.as_array().ok_or_else(|| {
        ModelError::Configuration(format!("{} must be a list, got {}", key, value))
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str().map(String::from).ok_or_else(|| {
                ModelError::Configuration(format!(
                    "{} entries must be strings, got {}",
                    key, item
                ))
            })
        })
        .collect()
}

fn resolution(value: &Value, arity: usize, key: &str) -> ModelResult<Vec<usize>> {
    let malformed = || {
        ModelError::Configuration(format!(
            "{} must be a list of {} integers, got {}",
            key, arity, value
        ))
    };
    let items = value.as_array().ok_or_else(malformed)?;
    if items.len() != arity {
        return Err(malformed());
    }
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(malformed)
        })
        .collect()
}

fn optional_corners(obj: &Map<String, Value>, key: &str) -> ModelResult<Option<BoundingBox>> {
    let Some(value) = present(obj, key) else {
        return Ok(None);
    };
    let malformed = || {
        ModelError::Configuration(format!(
            "{} must be two points [[x, y, z], [x, y, z]], got {}",
            key, value
        ))
    };
    let points = value.as_array().filter(|p| p.len() == 2).ok_or_else(malformed)?;
    let mut corners = [[0.0; 3]; 2];
    for (corner, point) in corners.iter_mut().zip(points) {
        let coords = point.as_array().filter(|c| c.len() == 3).ok_or_else(malformed)?;
        for (slot, coord) in corner.iter_mut().zip(coords) {
            *slot = coord.as_f64().ok_or_else(malformed)?;
        }
    }
    BoundingBox::new(corners[0], corners[1])
        .map(Some)
        .map_err(|e| ModelError::Validation(format!("{}: {}", key, e)))
}

fn parse_materials(obj: &Map<String, Value>) -> ModelResult<Vec<(String, MaterialEntry)>> {
    let Some(value) = present(obj, "materials") else {
        return Ok(Vec::new());
    };
    let entries = value.as_object().ok_or_else(|| {
        ModelError::Configuration(format!(
            "materials must map material tags to materials, got {}",
            value
        ))
    })?;
    entries
        .iter()
        .map(|(tag, entry)| {
            let entry: MaterialEntry = serde_json::from_value(entry.clone()).map_err(|e| {
                ModelError::Configuration(format!("material '{}': {}", tag, e))
            })?;
            Ok((tag.clone(), entry))
        })
        .collect()
}

fn parse_targeted(obj: &Map<String, Value>) -> ModelResult<Vec<TargetedTallies>> {
    let Some(value) = present(obj, "targeted_tallies") else {
        return Ok(Vec::new());
    };
    let groups = value.as_array().ok_or_else(|| {
        ModelError::Configuration(format!("targeted_tallies must be a list, got {}", value))
    })?;
    groups
        .iter()
        .map(|group| {
            let group = group.as_object().ok_or_else(|| {
                ModelError::Configuration(format!(
                    "targeted_tallies entries must be objects, got {}",
                    group
                ))
            })?;
            let tally_types = match group.get("tally_types") {
                Some(v) => strings(v, "tally_types")?,
                None => {
                    return Err(ModelError::Configuration(
                        "targeted_tallies entry without tally_types".to_string(),
                    ))
                }
            };
            let targets = match group.get("targets") {
                None | Some(Value::Null) => vec![Target::Geometry],
                Some(Value::Array(items)) => items
                    .iter()
                    .map(Target::from_value)
                    .collect::<ModelResult<Vec<_>>>()?,
                Some(other) => {
                    return Err(ModelError::Configuration(format!(
                        "targets must be a list, got {}",
                        other
                    )))
                }
            };
            Ok(TargetedTallies {
                tally_types,
                targets,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let request = ModelRequest::from_json_str("{}").unwrap();
        assert_eq!(request.mesh_2d_resolution, (400, 400));
        assert_eq!(request.mesh_3d_resolution, (100, 100, 100));
        assert!(request.photon_transport);
        assert_eq!(request.simulation_batches, 10);
        assert_eq!(request.h5m_filename, PathBuf::from("dagmc.h5m"));
        assert!(request.bounding_box.is_none());
    }

    #[test]
    fn test_full_document() {
        let request = ModelRequest::from_value(&json!({
            "h5m_filename": "model.h5m",
            "materials": { "zirconium": "Zr", "blanket": { "density": 1.9 } },
            "cell_tallies": ["TBR", "spectra"],
            "targeted_tallies": [{ "tally_types": ["heating"], "targets": [2, "blanket", null] }],
            "mesh_tally_3d": ["effective_dose"],
            "mesh_3d_resolution": [10, 20, 30],
            "mesh_3d_corners": [[0, 0, 0], [1, 1, 1]],
            "photon_transport": false,
            "simulation_batches": 4
        }))
        .unwrap();
        let tags: Vec<&str> = request.materials.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tags, vec!["zirconium", "blanket"]);
        assert_eq!(
            request.targeted_tallies[0].targets,
            vec![Target::Cell(2), Target::from("blanket"), Target::Geometry]
        );
        assert_eq!(request.mesh_3d_resolution, (10, 20, 30));
        assert!(request.mesh_3d_corners.is_some());
        assert!(!request.photon_transport);
    }

    #[test]
    fn test_list_must_be_array() {
        let err = ModelRequest::from_value(&json!({ "cell_tallies": "TBR" })).unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)));
        let err = ModelRequest::from_value(&json!({ "mesh_tally_2d": ["flux", 3] })).unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)));
    }

    #[test]
    fn test_bad_target_kind() {
        let err = ModelRequest::from_value(&json!({
            "targeted_tallies": [{ "tally_types": ["TBR"], "targets": [true] }]
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::TypeKind(_)));
    }

    #[test]
    fn test_inverted_corners() {
        let err = ModelRequest::from_value(&json!({
            "mesh_2d_corners": [[10, 10, 10], [-10, -10, -10]]
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn test_malformed_corners() {
        let err = ModelRequest::from_value(&json!({ "bounding_box": [[0, 0], [1, 1]] })).unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)));
    }

    #[test]
    fn test_unknown_keyword_rejected() {
        let err = ModelRequest::from_value(&json!({ "mesh_tally_2d": ["TBR"] })).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ModelRequest::from_value(&json!({ "cell_tally": ["TBR"] })).unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)));
    }

    #[test]
    fn test_tet_tallies_need_file() {
        let err = ModelRequest::from_value(&json!({ "mesh_tally_tet": ["heating"] })).unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)));
    }

    #[test]
    fn test_single_batch_rejected() {
        let err = ModelRequest::from_value(&json!({ "simulation_batches": 1 })).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn test_misspelled_material_field_rejected() {
        let err = ModelRequest::from_value(&json!({
            "materials": { "blanket": { "densty": 1.0, "nuclide": { "Li6": 1.0 } } }
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)));
    }

    #[test]
    fn test_tet_mesh_extension_checked_without_tallies() {
        let err = ModelRequest::from_value(&json!({ "tet_mesh_filename": "umesh.vtk" })).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));

        let mut request = ModelRequest::new("model.h5m");
        request.tet_mesh_filename = Some(PathBuf::from("umesh.vtk"));
        assert!(request.validate().is_err());
        request.tet_mesh_filename = Some(PathBuf::from("umesh.exo"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_malformed_source() {
        let err = ModelRequest::from_value(&json!({
            "source": { "space": [0, 0], "energy": 14.06e6, "particle": "neutron" }
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)));
    }
}
