use crate::mesh::Mesh;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Scores onto the elements of a mesh. The mesh is shared by every tally
/// that filters on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshFilter {
    pub mesh: Arc<Mesh>,
}

impl MeshFilter {
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self { mesh }
    }

    pub fn mesh_id(&self) -> u32 {
        self.mesh.mesh_id()
    }
}
