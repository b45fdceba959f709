// Whole-model assembly, regeneration and artifact export
use neutronics_model::geometry::UnavailableEngine;
use neutronics_model::material::Material;
use neutronics_model::model::ARTIFACT_FILES;
use neutronics_model::settings::RunMode;
use neutronics_model::{ModelAssembler, ModelError, ModelRequest, PhysicsData};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

fn physics_data() -> PhysicsData {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/physics_data.json");
    PhysicsData::from_file(path).unwrap()
}

fn library() -> HashMap<String, Material> {
    let mut lithium = Material::new();
    lithium.add_nuclide("Li6", 0.9).unwrap();
    lithium.add_nuclide("Li7", 0.1).unwrap();
    lithium.set_density("g/cm3", 0.46).unwrap();
    let mut steel = Material::new();
    steel.add_nuclide("Fe56", 1.0).unwrap();
    steel.set_density("g/cm3", 7.8).unwrap();

    let mut library = HashMap::new();
    library.insert("enriched_lithium".to_string(), lithium);
    library.insert("eurofer".to_string(), steel);
    library
}

#[test]
fn test_second_assembly_has_no_residue() {
    let assembler = ModelAssembler::new(UnavailableEngine, physics_data());
    let first = ModelRequest::from_value(&json!({
        "materials": { "blanket": "enriched_lithium" },
        "cell_tallies": ["TBR", "heating"]
    }))
    .unwrap();
    let second = ModelRequest::from_value(&json!({
        "materials": { "shield": "eurofer" },
        "cell_tallies": ["flux"]
    }))
    .unwrap();

    let mut assembler = assembler.with_library(library());
    assert_eq!(
        assembler.assemble(&first).unwrap().tallies.names(),
        vec!["TBR", "blanket_TBR", "heating"]
    );
    let config = assembler.assemble(&second).unwrap();
    assert_eq!(config.tallies.names(), vec!["flux"]);
    assert_eq!(config.materials.tags().collect::<Vec<_>>(), vec!["shield"]);
}

#[test]
fn test_repeated_assembly_is_identical() {
    let request = ModelRequest::from_value(&json!({
        "materials": { "blanket": "enriched_lithium", "DT_plasma": { "density": 1e-6 } },
        "cell_tallies": ["TBR", "spectra", "effective_dose"],
        "targeted_tallies": [{ "tally_types": ["photon_fast_flux"], "targets": [1, null] }]
    }))
    .unwrap();
    let mut assembler = ModelAssembler::new(UnavailableEngine, physics_data()).with_library(library());
    let first = assembler.assemble(&request).unwrap();
    let second = assembler.assemble(&request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_materials_take_tags_and_sequential_ids() {
    let request = ModelRequest::from_value(&json!({
        "materials": {
            "first_wall": "eurofer",
            "blanket": "enriched_lithium",
            "coolant": { "nuclides": { "H1": 2.0, "O16": 1.0 }, "density": 1.0 }
        }
    }))
    .unwrap();
    let config = ModelAssembler::new(UnavailableEngine, physics_data())
        .with_library(library())
        .assemble(&request)
        .unwrap();

    let ids: Vec<(&str, Option<u32>)> = config
        .materials
        .iter()
        .map(|(tag, m)| (tag, m.material_id))
        .collect();
    assert_eq!(
        ids,
        vec![("first_wall", Some(1)), ("blanket", Some(2)), ("coolant", Some(3))]
    );
    let coolant = config.materials.get_material("coolant").unwrap();
    assert_eq!(coolant.get_name(), Some("coolant"));
    assert_eq!(coolant.nuclides.get("O16"), Some(&1.0));
}

#[test]
fn test_unknown_library_material() {
    let request = ModelRequest::from_value(&json!({ "materials": { "blanket": "FLiBe" } })).unwrap();
    let err = ModelAssembler::new(UnavailableEngine, physics_data())
        .with_library(library())
        .assemble(&request)
        .unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)));
}

#[test]
fn test_settings_follow_request() {
    let request = ModelRequest::from_value(&json!({
        "simulation_batches": 3,
        "simulation_particles_per_batch": 250,
        "max_lost_particles": 20,
        "source": { "space": [0.0, 0.0, 5.0], "energy": 2.45e6, "particle": "neutron" }
    }))
    .unwrap();
    let config = ModelAssembler::new(UnavailableEngine, physics_data())
        .assemble(&request)
        .unwrap();

    assert_eq!(config.settings.run_mode, RunMode::FixedSource);
    assert_eq!(config.settings.batches, 3);
    assert_eq!(config.settings.particles, 250);
    assert_eq!(config.settings.inactive, 0);
    assert_eq!(config.settings.max_lost_particles, Some(20));
    assert_eq!(config.settings.source.energy, 2.45e6);
}

#[test]
fn test_artifacts_written_and_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let mut assembler = ModelAssembler::new(UnavailableEngine, physics_data())
        .with_library(library())
        .with_output_dir(dir.path());

    let first = ModelRequest::from_value(&json!({
        "materials": { "blanket": "enriched_lithium" },
        "cell_tallies": ["TBR"]
    }))
    .unwrap();
    assembler.assemble(&first).unwrap();
    for name in ARTIFACT_FILES {
        assert!(dir.path().join(name).is_file(), "{} missing", name);
    }

    let second = ModelRequest::from_value(&json!({ "cell_tallies": ["heating"] })).unwrap();
    assembler.assemble(&second).unwrap();
    let tallies: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("tallies.json")).unwrap())
            .unwrap();
    let names: Vec<&str> = tallies
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["heating"]);
}

#[test]
fn test_failed_assembly_leaves_no_stale_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let mut assembler = ModelAssembler::new(UnavailableEngine, physics_data())
        .with_output_dir(dir.path());

    let good = ModelRequest::from_value(&json!({ "cell_tallies": ["TBR"] })).unwrap();
    assembler.assemble(&good).unwrap();
    assert!(dir.path().join("tallies.json").is_file());

    // a mesh tally without corners needs the geometry file, which does not exist
    let bad = ModelRequest::from_value(&json!({ "mesh_tally_3d": ["heating"] })).unwrap();
    assert!(assembler.assemble(&bad).is_err());
    for name in ARTIFACT_FILES {
        assert!(!dir.path().join(name).exists(), "{} left behind", name);
    }
}

#[test]
fn test_request_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("request.json");
    fs::write(
        &path,
        r#"{ "cell_tallies": ["TBR"], "mesh_2d_resolution": [10, 20] }"#,
    )
    .unwrap();
    let request = ModelRequest::from_file(&path).unwrap();
    assert_eq!(request.mesh_2d_resolution, (10, 20));
    assert!(matches!(
        ModelRequest::from_file(dir.path().join("absent.json")),
        Err(ModelError::NotFound(_))
    ));
}
