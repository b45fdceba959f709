use crate::bounding_box::{BoundingBox, BoundingBoxSource};
use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const MESH_3D_ID: u32 = 1;
pub const MESH_XZ_ID: u32 = 2;
pub const MESH_XY_ID: u32 = 3;
pub const MESH_YZ_ID: u32 = 4;
pub const TET_MESH_ID: u32 = 5;

/// Half-thickness of the slab a derived 2-D mesh spans along its
/// perpendicular axis.
const PLANE_HALF_THICKNESS: f64 = 1.0;

/// Axis-aligned regular grid over a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegularMeshFields")]
pub struct RegularMesh {
    pub mesh_id: u32,
    pub name: String,
    pub dimension: [usize; 3],
    pub lower_left: [f64; 3],
    pub upper_right: [f64; 3],
}

impl RegularMesh {
    /// # Errors
    /// * `ModelError::Validation` if any dimension is zero or the corners are not ordered
    pub fn new(
        mesh_id: u32,
        name: impl Into<String>,
        dimension: [usize; 3],
        lower_left: [f64; 3],
        upper_right: [f64; 3],
    ) -> ModelResult<Self> {
        let name = name.into();
        if dimension.iter().any(|&d| d == 0) {
            return Err(ModelError::Validation(format!(
                "mesh '{}' dimension {:?} must be at least 1 on every axis",
                name, dimension
            )));
        }
        BoundingBox::new(lower_left, upper_right)?;
        Ok(RegularMesh {
            mesh_id,
            name,
            dimension,
            lower_left,
            upper_right,
        })
    }

    pub fn num_cells(&self) -> usize {
        self.dimension.iter().product()
    }
}

#[derive(Deserialize)]
struct RegularMeshFields {
    mesh_id: u32,
    name: String,
    dimension: [usize; 3],
    lower_left: [f64; 3],
    upper_right: [f64; 3],
}

impl TryFrom<RegularMeshFields> for RegularMesh {
    type Error = ModelError;

    fn try_from(raw: RegularMeshFields) -> ModelResult<Self> {
        RegularMesh::new(
            raw.mesh_id,
            raw.name,
            raw.dimension,
            raw.lower_left,
            raw.upper_right,
        )
    }
}

/// Backend that reads an unstructured mesh file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshLibrary {
    /// `.h5m` files
    Moab,
    /// `.exo` files
    Libmesh,
}

impl MeshLibrary {
    pub fn from_path(path: &Path) -> ModelResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("h5m") => Ok(MeshLibrary::Moab),
            Some("exo") => Ok(MeshLibrary::Libmesh),
            _ => Err(ModelError::Validation(format!(
                "unstructured mesh {} must be a .h5m or .exo file",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for MeshLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLibrary::Moab => f.write_str("moab"),
            MeshLibrary::Libmesh => f.write_str("libmesh"),
        }
    }
}

/// Externally defined tetrahedral mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnstructuredMesh {
    pub mesh_id: u32,
    pub name: String,
    pub filename: String,
    pub library: MeshLibrary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mesh {
    Regular(RegularMesh),
    Unstructured(UnstructuredMesh),
}

impl Mesh {
    pub fn mesh_id(&self) -> u32 {
        match self {
            Mesh::Regular(m) => m.mesh_id,
            Mesh::Unstructured(m) => m.mesh_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Mesh::Regular(m) => &m.name,
            Mesh::Unstructured(m) => &m.name,
        }
    }
}

/// One of the three orthogonal slicing planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    XZ,
    XY,
    YZ,
}

impl Plane {
    /// Planes in the order their tallies are emitted.
    pub const ALL: [Plane; 3] = [Plane::XZ, Plane::XY, Plane::YZ];

    pub fn label(&self) -> &'static str {
        match self {
            Plane::XZ => "xz",
            Plane::XY => "xy",
            Plane::YZ => "yz",
        }
    }

    /// Index of the axis the plane is perpendicular to.
    pub fn normal_axis(&self) -> usize {
        match self {
            Plane::YZ => 0,
            Plane::XZ => 1,
            Plane::XY => 2,
        }
    }

    fn mesh_id(&self) -> u32 {
        match self {
            Plane::XZ => MESH_XZ_ID,
            Plane::XY => MESH_XY_ID,
            Plane::YZ => MESH_YZ_ID,
        }
    }

    /// Grid dimensions for a `(height, width)` resolution.
    fn dimension(&self, (height, width): (usize, usize)) -> [usize; 3] {
        match self {
            Plane::XZ => [width, 1, height],
            Plane::XY => [width, height, 1],
            Plane::YZ => [1, width, height],
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three orthogonal 2-D meshes derived from one box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneMeshes {
    pub xz: RegularMesh,
    pub xy: RegularMesh,
    pub yz: RegularMesh,
}

impl PlaneMeshes {
    pub fn get(&self, plane: Plane) -> &RegularMesh {
        match plane {
            Plane::XZ => &self.xz,
            Plane::XY => &self.xy,
            Plane::YZ => &self.yz,
        }
    }

    /// `(plane, mesh)` pairs in xz, xy, yz order.
    pub fn iter(&self) -> impl Iterator<Item = (Plane, &RegularMesh)> + '_ {
        Plane::ALL.into_iter().map(move |plane| (plane, self.get(plane)))
    }
}

/// Regular 3-D mesh over `corners`, or over the geometry's bounding box when
/// no corners are given.
pub fn build_3d(
    resolution: (usize, usize, usize),
    corners: Option<BoundingBox>,
    bounds: &mut dyn BoundingBoxSource,
) -> ModelResult<RegularMesh> {
    let bbox = match corners {
        Some(corners) => corners,
        None => bounds.bounding_box()?,
    };
    RegularMesh::new(
        MESH_3D_ID,
        "3d_mesh",
        [resolution.0, resolution.1, resolution.2],
        bbox.lower_left,
        bbox.upper_right,
    )
}

/// The xz, xy and yz meshes for a `(height, width)` resolution.
///
/// Explicit corners are used verbatim for all three planes. Otherwise each
/// plane takes the bounding-box extents on its two in-plane axes and spans
/// `[-1, 1]` along its perpendicular axis.
pub fn build_2d(
    resolution: (usize, usize),
    corners: Option<BoundingBox>,
    bounds: &mut dyn BoundingBoxSource,
) -> ModelResult<PlaneMeshes> {
    let (bbox, derive) = match corners {
        Some(corners) => (corners, false),
        None => (bounds.bounding_box()?, true),
    };

    let plane_mesh = |plane: Plane| -> ModelResult<RegularMesh> {
        let mut lower_left = bbox.lower_left;
        let mut upper_right = bbox.upper_right;
        if derive {
            let axis = plane.normal_axis();
            lower_left[axis] = -PLANE_HALF_THICKNESS;
            upper_right[axis] = PLANE_HALF_THICKNESS;
        }
        RegularMesh::new(
            plane.mesh_id(),
            format!("2d_mesh_{}", plane),
            plane.dimension(resolution),
            lower_left,
            upper_right,
        )
    };

    Ok(PlaneMeshes {
        xz: plane_mesh(Plane::XZ)?,
        xy: plane_mesh(Plane::XY)?,
        yz: plane_mesh(Plane::YZ)?,
    })
}

/// Unstructured mesh read from `filename`, backend chosen by extension.
///
/// # Errors
/// * `ModelError::Validation` unless the extension is `.h5m` or `.exo`
pub fn build_tet(filename: impl AsRef<Path>) -> ModelResult<UnstructuredMesh> {
    let path = filename.as_ref();
    let library = MeshLibrary::from_path(path)?;
    Ok(UnstructuredMesh {
        mesh_id: TET_MESH_ID,
        name: "tet_mesh".to_string(),
        filename: path.to_string_lossy().into_owned(),
        library,
    })
}
