//! Outline tracing and wall extrusion.
//!
//! An outline edge is a floor edge used by exactly one triangle. Outlines are
//! followed vertex to vertex until no unchecked boundary neighbour is left, then
//! closed back onto their start.

use serde::{Deserialize, Serialize};

use crate::mesh::triangulate::FloorMesh;
use crate::mesh::{MeshData, Vec3};

/// Floor vertex indices along one boundary, start vertex repeated at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline(pub Vec<u32>);

impl Outline {
    pub fn vertices(&self) -> &[u32] {
        &self.0
    }

    pub fn edge_count(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn is_closed(&self) -> bool {
        self.0.len() > 1 && self.0.first() == self.0.last()
    }
}

pub fn is_outline_edge(floor: &FloorMesh, a: u32, b: u32) -> bool {
    floor.index.shared_count(a, b) == 1
}

/// First unchecked vertex, in triangle order, that shares an outline edge with `vertex`.
fn connected_outline_vertex(floor: &FloorMesh, checked: &[bool], vertex: u32) -> Option<u32> {
    for triangle in floor.index.triangles_of(vertex) {
        for &other in &triangle.0 {
            if other != vertex && !checked[other as usize] && is_outline_edge(floor, vertex, other) {
                return Some(other);
            }
        }
    }
    None
}

/// Trace every outline of the floor mesh, scanning start vertices in index order.
pub fn trace_outlines(floor: &FloorMesh) -> Vec<Outline> {
    let mut checked = floor.checked.clone();
    let mut outlines = Vec::new();

    for start in 0..floor.mesh.vertices.len() as u32 {
        if checked[start as usize] {
            continue;
        }
        let Some(mut current) = connected_outline_vertex(floor, &checked, start) else {
            continue;
        };
        checked[start as usize] = true;

        let mut vertices = vec![start];
        loop {
            vertices.push(current);
            checked[current as usize] = true;
            match connected_outline_vertex(floor, &checked, current) {
                Some(next) => current = next,
                None => break,
            }
        }

        if !is_outline_edge(floor, current, start) {
            log::warn!("outline from vertex {} ends at {} without a closing boundary edge", start, current);
        }
        vertices.push(start);
        outlines.push(Outline(vertices));
    }

    outlines
}

/// Extrude each outline edge into a vertical quad hanging `wall_height` below the floor.
/// Every edge gets its own four vertices so walls can be shaded flat.
pub fn build_wall_mesh(outlines: &[Outline], vertices: &[Vec3], wall_height: f32) -> MeshData {
    let edge_total: usize = outlines.iter().map(Outline::edge_count).sum();
    let mut walls = MeshData {
        vertices: Vec::with_capacity(edge_total * 4),
        triangles: Vec::with_capacity(edge_total * 6),
    };
    let drop = Vec3::UP * wall_height;

    for outline in outlines {
        for (a, b) in outline.edges() {
            let s = walls.vertices.len() as u32;
            let top_a = vertices[a as usize];
            let top_b = vertices[b as usize];
            walls.vertices.extend_from_slice(&[top_a, top_b, top_a - drop, top_b - drop]);
            walls.triangles.extend_from_slice(&[s, s + 2, s + 3, s + 3, s + 1, s]);
        }
    }

    walls
}
