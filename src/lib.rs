mod data;
// First, import the modules and re-export the types for Rust usage
pub mod bounding_box;
pub mod config;
pub mod error;
pub mod geometry;
pub mod material;
pub mod materials;
pub mod mesh;
pub mod model;
pub mod particle;
pub mod physics_data;
pub mod request;
pub mod scores;
pub mod settings;
pub mod source;
pub mod tallies;

pub use bounding_box::{BoundingBox, BoundingBoxSource};
pub use config::Config;
pub use data::{is_reaction, REACTION_MT, REACTION_NAME};
pub use error::{ModelError, ModelResult};
pub use geometry::{BoundingBoxResolver, GeometryEngine, ProbeModel, UnavailableEngine};
pub use material::{Material, MaterialEntry, MaterialLibrary};
pub use materials::MaterialSet;
pub use mesh::{build_2d, build_3d, build_tet, Mesh, MeshLibrary, PlaneMeshes, RegularMesh, UnstructuredMesh};
pub use model::{ModelAssembler, ModelConfig};
pub use particle::Particle;
pub use physics_data::{DoseGeometry, PhysicsData};
pub use request::{ModelRequest, TargetedTallies};
pub use scores::TallyCategory;
pub use settings::Settings;
pub use source::IndependentSource;
pub use tallies::{Filter, Tallies, Tally, TallyCompiler, Target};
