//! Region detection and size filtering
//!
//! Connected component analysis over the cave grid (4-connectivity), used to
//! remove tiny wall islands and open pockets and to find the surviving rooms.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::grid::{CaveGrid, Tile};
use crate::params::EdgeTileRule;
use crate::rooms::{EdgeScan, Room};
use crate::tilemap::Tilemap;

/// A grid cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance between two cells.
    pub fn distance_sq(self, other: Coord) -> u64 {
        let dx = self.x.abs_diff(other.x) as u64;
        let dy = self.y.abs_diff(other.y) as u64;
        dx * dx + dy * dy
    }
}

/// A maximal 4-connected set of same-tag cells, in BFS discovery order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub tag: Tile,
    pub tiles: Vec<Coord>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Breadth-first flood fill from `start`, collecting every same-tag cell reachable
/// through up/down/left/right steps.
pub fn flood_fill(grid: &CaveGrid, start: Coord) -> Region {
    let mut visited = Tilemap::new_with(grid.width, grid.height, false);
    flood_fill_marking(grid, start, &mut visited)
}

fn flood_fill_marking(grid: &CaveGrid, start: Coord, visited: &mut Tilemap<bool>) -> Region {
    let tag = *grid.get(start.x, start.y);
    let mut tiles = Vec::new();
    let mut queue = VecDeque::new();

    visited.set(start.x, start.y, true);
    queue.push_back(start);

    while let Some(coord) = queue.pop_front() {
        tiles.push(coord);
        for (nx, ny) in grid.neighbors(coord.x, coord.y) {
            if !*visited.get(nx, ny) && *grid.get(nx, ny) == tag {
                visited.set(nx, ny, true);
                queue.push_back(Coord::new(nx, ny));
            }
        }
    }

    Region { tag, tiles }
}

/// Partition every cell tagged `tag` into regions, seeding fills in x-outer / y-inner
/// order. Each such cell lands in exactly one region.
pub fn get_regions(grid: &CaveGrid, tag: Tile) -> Vec<Region> {
    let mut visited = Tilemap::new_with(grid.width, grid.height, false);
    let mut regions = Vec::new();

    for (x, y) in grid.coords_column_major() {
        if !*visited.get(x, y) && *grid.get(x, y) == tag {
            regions.push(flood_fill_marking(grid, Coord::new(x, y), &mut visited));
        }
    }

    regions
}

/// What the size filter changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFilterStats {
    pub wall_regions: usize,
    pub wall_regions_removed: usize,
    pub open_regions: usize,
    pub open_regions_removed: usize,
}

/// Remove undersized regions and build rooms from the open regions that survive.
///
/// 1. Wall regions smaller than `wall_threshold` become open.
/// 2. On the updated grid, open regions smaller than `room_threshold` become wall;
///    the rest become rooms.
pub fn process_regions(
    grid: &mut CaveGrid,
    wall_threshold: usize,
    room_threshold: usize,
    edge_rule: EdgeTileRule,
) -> (Vec<Room>, RegionFilterStats) {
    let mut stats = RegionFilterStats::default();

    let wall_regions = get_regions(grid, Tile::Wall);
    stats.wall_regions = wall_regions.len();
    for region in wall_regions.iter().filter(|r| r.len() < wall_threshold) {
        flip_region(grid, region);
        stats.wall_regions_removed += 1;
    }

    let open_regions = get_regions(grid, Tile::Open);
    stats.open_regions = open_regions.len();
    let mut surviving = Vec::new();
    for region in open_regions {
        if region.len() < room_threshold {
            flip_region(grid, &region);
            stats.open_regions_removed += 1;
        } else {
            surviving.push(region);
        }
    }

    // Edge tiles are read from the fully filtered grid.
    let edges = EdgeScan::new(grid, edge_rule);
    let rooms = surviving
        .into_iter()
        .enumerate()
        .map(|(id, region)| Room::new(id, region.tiles, &edges))
        .collect();

    log::debug!(
        "region filter: {}/{} wall regions opened, {}/{} open regions filled",
        stats.wall_regions_removed,
        stats.wall_regions,
        stats.open_regions_removed,
        stats.open_regions
    );

    (rooms, stats)
}

fn flip_region(grid: &mut CaveGrid, region: &Region) {
    let replacement = region.tag.flipped();
    for c in &region.tiles {
        grid.set(c.x, c.y, replacement);
    }
}
