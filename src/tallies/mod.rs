// Tallies module - filters, compiled tally descriptors and the keyword catalog
pub mod catalog;
pub mod expander;
pub mod filter;
pub mod filter_cell;
pub mod filter_energy;
pub mod filter_energy_function;
pub mod filter_material;
pub mod filter_mesh;
pub mod filter_particle;
pub mod target;
pub mod tally;

// Re-export main types for convenience
pub use catalog::{TallyCompiler, TallyKind};
pub use filter::Filter;
pub use filter_cell::CellFilter;
pub use filter_energy::EnergyFilter;
pub use filter_energy_function::EnergyFunctionFilter;
pub use filter_material::MaterialFilter;
pub use filter_mesh::MeshFilter;
pub use filter_particle::ParticleFilter;
pub use target::Target;
pub use tally::{Tallies, Tally};
