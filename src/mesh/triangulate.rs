//! Marching-squares triangulation of the floor.

use crate::grid::CaveGrid;
use crate::mesh::squares::{NodeId, Square, SquareGrid};
use crate::mesh::MeshData;

/// The eight points a square can contribute to its polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SquarePoint {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    CentreTop,
    CentreRight,
    CentreBottom,
    CentreLeft,
}

use SquarePoint::*;

/// Polygon for each configuration, wound consistently. Index = configuration bits.
const CASE_TABLE: [&[SquarePoint]; 16] = [
    &[],
    &[CentreLeft, CentreBottom, BottomLeft],
    &[BottomRight, CentreBottom, CentreRight],
    &[CentreRight, BottomRight, BottomLeft, CentreLeft],
    &[TopRight, CentreRight, CentreTop],
    &[CentreTop, TopRight, CentreRight, CentreBottom, BottomLeft, CentreLeft],
    &[CentreTop, TopRight, BottomRight, CentreBottom],
    &[CentreTop, TopRight, BottomRight, BottomLeft, CentreLeft],
    &[TopLeft, CentreTop, CentreLeft],
    &[TopLeft, CentreTop, CentreBottom, BottomLeft],
    &[TopLeft, CentreTop, CentreRight, BottomRight, CentreBottom, CentreLeft],
    &[TopLeft, CentreTop, CentreRight, BottomRight, BottomLeft],
    &[TopLeft, TopRight, CentreRight, CentreLeft],
    &[TopLeft, TopRight, CentreRight, CentreBottom, BottomLeft],
    &[TopLeft, TopRight, BottomRight, CentreBottom, CentreLeft],
    &[TopLeft, TopRight, BottomRight, BottomLeft],
];

fn node_of(square: &Square, point: SquarePoint) -> NodeId {
    match point {
        TopLeft => square.top_left.node,
        TopRight => square.top_right.node,
        BottomRight => square.bottom_right.node,
        BottomLeft => square.bottom_left.node,
        CentreTop => square.centre_top,
        CentreRight => square.centre_right,
        CentreBottom => square.centre_bottom,
        CentreLeft => square.centre_left,
    }
}

/// Three vertex indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle(pub [u32; 3]);

impl Triangle {
    pub fn contains(&self, vertex: u32) -> bool {
        self.0.contains(&vertex)
    }
}

/// For every vertex, the triangles that use it, in creation order.
#[derive(Clone, Debug, Default)]
pub struct TriangleIndex {
    triangles: Vec<Triangle>,
    by_vertex: Vec<Vec<usize>>,
}

impl TriangleIndex {
    fn add(&mut self, triangle: Triangle) {
        let id = self.triangles.len();
        self.triangles.push(triangle);
        for &v in &triangle.0 {
            let v = v as usize;
            if self.by_vertex.len() <= v {
                self.by_vertex.resize_with(v + 1, Vec::new);
            }
            self.by_vertex[v].push(id);
        }
    }

    /// Triangles containing `vertex`.
    pub fn triangles_of(&self, vertex: u32) -> impl Iterator<Item = &Triangle> + '_ {
        self.by_vertex
            .get(vertex as usize)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(move |&id| &self.triangles[id])
    }

    /// Number of triangles containing both `a` and `b`.
    pub fn shared_count(&self, a: u32, b: u32) -> usize {
        self.triangles_of(a).filter(|t| t.contains(b)).count()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Floor triangulation plus the bookkeeping outline tracing needs.
#[derive(Clone, Debug, Default)]
pub struct FloorMesh {
    pub mesh: MeshData,
    pub index: TriangleIndex,
    /// Vertices excluded from outline tracing. Corners of fully walled squares
    /// start out checked since they cannot lie on a boundary.
    pub checked: Vec<bool>,
}

/// Triangulate every square, x-outer / y-inner. Vertices are numbered in the
/// order triangles first touch them; a shared node always maps to one vertex.
pub fn triangulate(grid: &CaveGrid, cell_size: f32) -> FloorMesh {
    let SquareGrid { mut nodes, squares } = SquareGrid::new(grid, cell_size);
    let mut floor = FloorMesh::default();

    for (x, y) in squares.coords_column_major() {
        let square = *squares.get(x, y);
        let points = CASE_TABLE[square.configuration as usize];
        if points.is_empty() {
            continue;
        }

        let polygon: Vec<u32> = points
            .iter()
            .map(|&p| nodes.assign_vertex(node_of(&square, p), &mut floor.mesh.vertices))
            .collect();
        floor.checked.resize(floor.mesh.vertices.len(), false);

        // Fan from the first point.
        for i in 1..polygon.len() - 1 {
            let triangle = Triangle([polygon[0], polygon[i], polygon[i + 1]]);
            floor.mesh.triangles.extend_from_slice(&triangle.0);
            floor.index.add(triangle);
        }

        if square.configuration == 15 {
            for &v in &polygon {
                floor.checked[v as usize] = true;
            }
        }
    }

    floor
}
