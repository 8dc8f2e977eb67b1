//! Cave mesh generation
//!
//! Converts a bordered cave grid into renderable geometry:
//! - `squares`: control nodes, shared midpoints and the marching-squares cells
//! - `triangulate`: the 16-case table that turns cells into the floor mesh
//! - `outline`: boundary loops of the floor mesh, extruded into walls
//!
//! The floor mesh lies in the XZ plane at y = 0 and is centred on the origin.

use core::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::grid::CaveGrid;

pub mod outline;
pub mod squares;
pub mod triangulate;

pub use outline::{build_wall_mesh, trace_outlines, Outline};
pub use squares::{ControlNode, Node, NodeArena, NodeId, Square, SquareGrid};
pub use triangulate::{triangulate, FloorMesh, Triangle, TriangleIndex};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Flat vertex and triangle-index buffers, ready for upload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    /// Three indices per triangle
    pub triangles: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate triangles as index triples.
    pub fn triangle_indices(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Floor and wall geometry of one cave.
#[derive(Clone, Debug, Default)]
pub struct CaveMesh {
    pub floor: MeshData,
    pub walls: MeshData,
    pub outlines: Vec<Outline>,
}

/// Triangulate the grid, trace its outlines and extrude them into walls.
pub fn generate_mesh(grid: &CaveGrid, cell_size: f32, wall_height: f32) -> CaveMesh {
    let floor = triangulate(grid, cell_size);
    let outlines = trace_outlines(&floor);
    let walls = build_wall_mesh(&outlines, &floor.mesh.vertices, wall_height);

    log::debug!(
        "mesh: {} floor vertices, {} floor triangles, {} outlines, {} wall vertices",
        floor.mesh.vertex_count(),
        floor.mesh.triangle_count(),
        outlines.len(),
        walls.vertex_count()
    );

    CaveMesh {
        floor: floor.mesh,
        walls,
        outlines,
    }
}
