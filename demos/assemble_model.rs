use neutronics_model::geometry::UnavailableEngine;
use neutronics_model::physics_data::SPECTRA_GROUP_STRUCTURE;
use neutronics_model::{
    DoseGeometry, Material, ModelAssembler, ModelRequest, ModelResult, Particle, PhysicsData,
};
use serde_json::json;
use std::collections::HashMap;

fn main() -> ModelResult<()> {
    // Coarse stand-ins for the real tables, enough to show the filter layout
    let mut data = PhysicsData::new();
    let edges: Vec<f64> = (0..=14).map(|i| 1e-5 * 10f64.powi(i)).collect();
    data.insert_group_structure(SPECTRA_GROUP_STRUCTURE, edges)?;
    data.insert_dose_coefficients(
        Particle::Neutron,
        DoseGeometry::ISO,
        vec![1e-3, 1.0, 1e3, 1e6, 2e7],
        vec![2.4, 3.5, 5.1, 298.0, 600.0],
    )?;
    data.insert_dose_coefficients(
        Particle::Photon,
        DoseGeometry::ISO,
        vec![1e4, 1e5, 1e6, 1e7],
        vec![0.0288, 0.298, 4.49, 28.6],
    )?;

    let mut breeder = Material::new();
    breeder.add_nuclide("Li6", 0.6)?;
    breeder.add_nuclide("Li7", 0.4)?;
    breeder.set_density("g/cm3", 0.5)?;
    let mut library = HashMap::new();
    library.insert("Li4SiO4".to_string(), breeder);

    let request = ModelRequest::from_value(&json!({
        "h5m_filename": "dagmc.h5m",
        "materials": {
            "blanket": "Li4SiO4",
            "first_wall": { "nuclides": { "W184": 1.0 }, "density": 19.3 },
            "DT_plasma": { "density": 1e-6 }
        },
        "cell_tallies": ["TBR", "spectra", "heating"],
        "targeted_tallies": [{ "tally_types": ["neutron_fast_flux"], "targets": ["first_wall", 3] }],
        "mesh_tally_2d": ["heating"],
        "mesh_tally_3d": ["effective_dose"],
        "mesh_3d_resolution": [20, 20, 20],
        "bounding_box": [[-300.0, -300.0, -400.0], [300.0, 300.0, 400.0]],
        "simulation_batches": 4,
        "simulation_particles_per_batch": 500
    }))?;

    // The bounding box is supplied, so the engine is never initialised
    let mut assembler = ModelAssembler::new(UnavailableEngine, data).with_library(library);
    let model = assembler.assemble(&request)?;

    println!(
        "Model with {} materials, {} meshes and {} tallies",
        model.materials.len(),
        model.meshes().len(),
        model.tallies.len()
    );
    for tally in &model.tallies {
        println!("{}", tally);
    }
    Ok(())
}
