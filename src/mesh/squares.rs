//! Marching-squares cells over a node arena.
//!
//! Every grid cell owns a control node plus the two midpoint nodes "above" and
//! "to the right" of it. A square is assembled from four neighbouring control
//! nodes and borrows their midpoints, so an edge midpoint between two squares is
//! one node, never two.

use crate::grid::CaveGrid;
use crate::mesh::Vec3;
use crate::tilemap::Tilemap;

/// Index into a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A vertex candidate. It receives a vertex index the first time a triangle uses it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub pos: Vec3,
    pub vertex: Option<u32>,
}

#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, pos: Vec3) -> NodeId {
        self.nodes.push(Node { pos, vertex: None });
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Vertex index of `id`, appending its position to `vertices` on first use.
    pub fn assign_vertex(&mut self, id: NodeId, vertices: &mut Vec<Vec3>) -> u32 {
        let node = &mut self.nodes[id.0];
        match node.vertex {
            Some(v) => v,
            None => {
                let v = vertices.len() as u32;
                vertices.push(node.pos);
                node.vertex = Some(v);
                v
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A node on a true grid corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlNode {
    pub node: NodeId,
    /// Source cell is wall
    pub active: bool,
    /// Midpoint half a cell towards +z
    pub above: NodeId,
    /// Midpoint half a cell towards +x
    pub right: NodeId,
}

/// One marching-squares cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    pub top_left: ControlNode,
    pub top_right: ControlNode,
    pub bottom_right: ControlNode,
    pub bottom_left: ControlNode,
    pub centre_top: NodeId,
    pub centre_right: NodeId,
    pub centre_bottom: NodeId,
    pub centre_left: NodeId,
    /// Active corners: top-left 8, top-right 4, bottom-right 2, bottom-left 1
    pub configuration: u8,
}

impl Square {
    pub fn new(top_left: ControlNode, top_right: ControlNode, bottom_right: ControlNode, bottom_left: ControlNode) -> Self {
        let mut configuration = 0;
        if top_left.active {
            configuration |= 8;
        }
        if top_right.active {
            configuration |= 4;
        }
        if bottom_right.active {
            configuration |= 2;
        }
        if bottom_left.active {
            configuration |= 1;
        }
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            centre_top: top_left.right,
            centre_right: bottom_right.above,
            centre_bottom: bottom_left.right,
            centre_left: bottom_left.above,
            configuration,
        }
    }
}

/// All squares of a grid plus the arena holding their nodes.
pub struct SquareGrid {
    pub nodes: NodeArena,
    /// `(width - 1) x (height - 1)` squares
    pub squares: Tilemap<Square>,
}

impl SquareGrid {
    /// Build control nodes (one per cell, wall = active) centred on the origin, then
    /// one square per 2x2 block. Grids narrower than 2 cells have no squares.
    pub fn new(grid: &CaveGrid, cell_size: f32) -> Self {
        let count_x = grid.width;
        let count_y = grid.height;
        let map_width = count_x as f32 * cell_size;
        let map_height = count_y as f32 * cell_size;
        let half = cell_size / 2.0;

        let mut nodes = NodeArena::with_capacity(count_x * count_y * 3);
        let mut controls: Vec<ControlNode> = Vec::with_capacity(count_x * count_y);
        for x in 0..count_x {
            for y in 0..count_y {
                let pos = Vec3::new(
                    -map_width / 2.0 + x as f32 * cell_size + half,
                    0.0,
                    -map_height / 2.0 + y as f32 * cell_size + half,
                );
                let node = nodes.push(pos);
                let above = nodes.push(pos + Vec3::FORWARD * half);
                let right = nodes.push(pos + Vec3::RIGHT * half);
                controls.push(ControlNode {
                    node,
                    active: grid.get(x, y).is_wall(),
                    above,
                    right,
                });
            }
        }
        let control = |x: usize, y: usize| controls[x * count_y + y];

        let sq_w = count_x.saturating_sub(1);
        let sq_h = count_y.saturating_sub(1);
        let mut squares = Vec::with_capacity(sq_w * sq_h);
        for y in 0..sq_h {
            for x in 0..sq_w {
                squares.push(Square::new(
                    control(x, y + 1),
                    control(x + 1, y + 1),
                    control(x + 1, y),
                    control(x, y),
                ));
            }
        }

        Self {
            nodes,
            squares: Tilemap::from_vec(sq_w, sq_h, squares),
        }
    }
}
