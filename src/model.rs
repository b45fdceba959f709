use crate::bounding_box::BoundingBoxSource;
use crate::error::{ModelError, ModelResult};
use crate::geometry::{BoundingBoxResolver, GeometryBounds, GeometryEngine};
use crate::material::{EmptyLibrary, MaterialLibrary};
use crate::materials::MaterialSet;
use crate::mesh::{build_2d, build_3d, build_tet, Mesh};
use crate::particle::Particle;
use crate::physics_data::PhysicsData;
use crate::request::ModelRequest;
use crate::settings::Settings;
use crate::tallies::{Filter, MeshFilter, Tallies, TallyCompiler, TallyKind};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Files written by [`ModelConfig::write_json`], in write order.
pub const ARTIFACT_FILES: [&str; 4] = [
    "geometry.json",
    "materials.json",
    "settings.json",
    "tallies.json",
];

/// DAGMC universe filling the whole model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DagmcGeometry {
    pub filename: PathBuf,
}

/// A complete, engine-ready model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    pub geometry: DagmcGeometry,
    pub materials: MaterialSet,
    pub settings: Settings,
    pub tallies: Tallies,
}

impl ModelConfig {
    /// Distinct meshes referenced by mesh filters, in first-use order.
    pub fn meshes(&self) -> Vec<Arc<Mesh>> {
        let mut meshes: Vec<Arc<Mesh>> = Vec::new();
        for tally in &self.tallies {
            for filter in tally.filters() {
                if let Filter::Mesh(f) = filter {
                    if !meshes.iter().any(|m| m.mesh_id() == f.mesh_id()) {
                        meshes.push(Arc::clone(&f.mesh));
                    }
                }
            }
        }
        meshes
    }

    /// Write each part of the model as pretty-printed JSON into `dir`.
    pub fn write_json(&self, dir: impl AsRef<Path>) -> ModelResult<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        write_artifact(&dir.join(ARTIFACT_FILES[0]), &self.geometry)?;
        write_artifact(&dir.join(ARTIFACT_FILES[1]), &self.materials)?;
        write_artifact(&dir.join(ARTIFACT_FILES[2]), &self.settings)?;
        write_artifact(&dir.join(ARTIFACT_FILES[3]), &self.tallies)?;
        log::debug!("Wrote model artifacts to {}", dir.display());
        Ok(())
    }
}

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> ModelResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// Delete the artifacts of a previous assembly; files that do not exist are skipped.
pub fn remove_artifacts(dir: impl AsRef<Path>) -> ModelResult<()> {
    let dir = dir.as_ref();
    for name in ARTIFACT_FILES {
        let path = dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => log::debug!("Removed stale {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(ModelError::Io(e)),
        }
    }
    Ok(())
}

/// Builds [`ModelConfig`]s from [`ModelRequest`]s.
///
/// The assembler owns the bounding-box resolver, so the geometry engine is
/// queried at most once per geometry file over the assembler's lifetime.
/// Every call to [`ModelAssembler::assemble`] starts from an empty tally
/// sequence.
pub struct ModelAssembler<E: GeometryEngine> {
    resolver: BoundingBoxResolver<E>,
    physics_data: PhysicsData,
    library: Box<dyn MaterialLibrary>,
    output_dir: Option<PathBuf>,
}

impl<E: GeometryEngine> ModelAssembler<E> {
    pub fn new(engine: E, physics_data: PhysicsData) -> Self {
        ModelAssembler {
            resolver: BoundingBoxResolver::new(engine),
            physics_data,
            library: Box::new(EmptyLibrary),
            output_dir: None,
        }
    }

    /// Resolve material names through `library`.
    pub fn with_library(mut self, library: impl MaterialLibrary + 'static) -> Self {
        self.library = Box::new(library);
        self
    }

    /// Export every assembled model into `dir`, replacing earlier exports.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn resolver(&self) -> &BoundingBoxResolver<E> {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut BoundingBoxResolver<E> {
        &mut self.resolver
    }

    pub fn physics_data(&self) -> &PhysicsData {
        &self.physics_data
    }

    /// Assemble one model.
    ///
    /// Tet-mesh, 3-D mesh, 2-D mesh, cell and targeted tallies are appended
    /// in that order. Stale artifacts in the output directory are removed
    /// before anything else happens, so a failed assembly leaves no export
    /// behind.
    ///
    /// # Errors
    /// * any error of [`ModelRequest::validate`]
    /// * `ModelError::NotFound` for unresolved materials, missing physics
    ///   tables or a missing geometry file
    /// * `ModelError::Engine` if the bounding box had to be queried and the
    ///   engine failed
    /// * `ModelError::Validation` if two tallies end up with the same name
    pub fn assemble(&mut self, request: &ModelRequest) -> ModelResult<ModelConfig> {
        log::info!(
            "Assembling model for {}",
            request.h5m_filename.display()
        );
        if let Some(dir) = &self.output_dir {
            remove_artifacts(dir)?;
        }
        request.validate()?;

        let materials = MaterialSet::from_entries(
            request.materials.iter().map(|(tag, entry)| (tag, entry)),
            self.library.as_ref(),
        )?;
        let settings = request.settings()?;
        let compiler = TallyCompiler::new(&materials, &self.physics_data);
        let mut bounds = GeometryBounds {
            preset: request.bounding_box,
            resolver: &mut self.resolver,
            geometry: &request.h5m_filename,
            materials: &materials,
        };

        let mut tallies = Tallies::new();
        add_tet_mesh_tallies(&compiler, request, &mut tallies)?;
        add_3d_mesh_tallies(&compiler, request, &mut bounds, &mut tallies)?;
        add_2d_mesh_tallies(&compiler, request, &mut bounds, &mut tallies)?;
        add_cell_tallies(&compiler, request, &mut tallies)?;
        for group in &request.targeted_tallies {
            tallies.extend(compiler.expand(&group.tally_types, &group.targets)?)?;
        }

        let config = ModelConfig {
            geometry: DagmcGeometry {
                filename: request.h5m_filename.clone(),
            },
            materials,
            settings,
            tallies,
        };
        if let Some(dir) = &self.output_dir {
            config.write_json(dir)?;
        }
        log::info!(
            "Assembled model with {} materials and {} tallies",
            config.materials.len(),
            config.tallies.len()
        );
        Ok(config)
    }
}

fn transported_particles(photon_transport: bool) -> Vec<Particle> {
    if photon_transport {
        vec![Particle::Neutron, Particle::Photon]
    } else {
        vec![Particle::Neutron]
    }
}

fn add_tet_mesh_tallies(
    compiler: &TallyCompiler<'_>,
    request: &ModelRequest,
    tallies: &mut Tallies,
) -> ModelResult<()> {
    let Some(filename) = &request.tet_mesh_filename else {
        return Ok(());
    };
    if request.mesh_tally_tet.is_empty() {
        return Ok(());
    }
    let mesh = Arc::new(Mesh::Unstructured(build_tet(filename)?));
    for score in &request.mesh_tally_tet {
        let filter = Filter::Mesh(MeshFilter::new(Arc::clone(&mesh)));
        tallies.push(compiler.build(
            format!("{}_on_3D_u_mesh", score),
            &TallyKind::parse(score)?,
            Some(filter),
        )?)?;
    }
    Ok(())
}

fn add_3d_mesh_tallies(
    compiler: &TallyCompiler<'_>,
    request: &ModelRequest,
    bounds: &mut dyn BoundingBoxSource,
    tallies: &mut Tallies,
) -> ModelResult<()> {
    if request.mesh_tally_3d.is_empty() {
        return Ok(());
    }
    let mesh = Arc::new(Mesh::Regular(build_3d(
        request.mesh_3d_resolution,
        request.mesh_3d_corners,
        bounds,
    )?));
    for score in &request.mesh_tally_3d {
        if score == "effective_dose" {
            for particle in transported_particles(request.photon_transport) {
                let filter = Filter::Mesh(MeshFilter::new(Arc::clone(&mesh)));
                tallies.push(compiler.build(
                    format!("effective_dose_{}_on_3D_mesh", particle),
                    &TallyKind::EffectiveDose(particle),
                    Some(filter),
                )?)?;
            }
        } else {
            let filter = Filter::Mesh(MeshFilter::new(Arc::clone(&mesh)));
            tallies.push(compiler.build(
                format!("{}_on_3D_mesh", score),
                &TallyKind::parse(score)?,
                Some(filter),
            )?)?;
        }
    }
    Ok(())
}

fn add_2d_mesh_tallies(
    compiler: &TallyCompiler<'_>,
    request: &ModelRequest,
    bounds: &mut dyn BoundingBoxSource,
    tallies: &mut Tallies,
) -> ModelResult<()> {
    if request.mesh_tally_2d.is_empty() {
        return Ok(());
    }
    let planes = build_2d(request.mesh_2d_resolution, request.mesh_2d_corners, bounds)?;
    let meshes: Vec<_> = planes
        .iter()
        .map(|(plane, mesh)| (plane, Arc::new(Mesh::Regular(mesh.clone()))))
        .collect();
    for score in &request.mesh_tally_2d {
        let kind = TallyKind::parse(score)?;
        for (plane, mesh) in &meshes {
            let filter = Filter::Mesh(MeshFilter::new(Arc::clone(mesh)));
            tallies.push(compiler.build(
                format!("{}_on_2D_mesh_{}", score, plane),
                &kind,
                Some(filter),
            )?)?;
        }
    }
    Ok(())
}

/// `TBR`, `spectra` and `effective_dose` get a whole-geometry tally plus one
/// per material; `spectra` and `effective_dose` are split by particle.
/// Every other keyword gets a whole-geometry tally only.
fn add_cell_tallies(
    compiler: &TallyCompiler<'_>,
    request: &ModelRequest,
    tallies: &mut Tallies,
) -> ModelResult<()> {
    for tally_type in &request.cell_tallies {
        let expanded: Vec<String> = match tally_type.as_str() {
            "TBR" => vec![tally_type.clone()],
            "spectra" | "effective_dose" => transported_particles(request.photon_transport)
                .into_iter()
                .map(|particle| format!("{}_{}", particle, tally_type))
                .collect(),
            _ => {
                tallies.extend(compiler.expand_whole_geometry(&[tally_type])?)?;
                continue;
            }
        };
        for variant in &expanded {
            tallies.extend(compiler.expand_whole_geometry(&[variant])?)?;
            tallies.extend(compiler.expand_every_material(&[variant])?)?;
        }
    }
    Ok(())
}
