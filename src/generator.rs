//! Cave generation pipeline
//!
//! fill -> smooth -> filter regions -> connect rooms -> border -> triangulate -> walls
//!
//! Every call owns its grid and mesh state from start to finish, so independent
//! generations can run on separate threads.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::grid::{self, CaveGrid};
use crate::mesh::{self, CaveMesh};
use crate::params::CaveParams;
use crate::regions::{self, RegionFilterStats};
use crate::rooms::{self, ConnectOptions, Passage, Room};
use crate::seeds::CaveSeed;

/// Summary numbers from one generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaveStats {
    pub seed_value: u64,
    pub open_tiles: usize,
    pub wall_tiles: usize,
    pub regions: RegionFilterStats,
    pub rooms: usize,
    pub passages: usize,
    pub floor_vertices: usize,
    pub floor_triangles: usize,
    pub outlines: usize,
    pub outline_edges: usize,
    pub wall_vertices: usize,
    pub wall_triangles: usize,
}

/// Everything a generation run produces.
#[derive(Clone, Debug)]
pub struct CaveOutput {
    pub params: CaveParams,
    pub seed: CaveSeed,
    /// Processed grid before bordering
    pub grid: CaveGrid,
    /// Grid the mesh was built from
    pub bordered: CaveGrid,
    pub rooms: Vec<Room>,
    pub passages: Vec<Passage>,
    pub mesh: CaveMesh,
    pub stats: CaveStats,
}

/// Fill and smooth a fresh grid for `seed`.
pub fn generate_grid(params: &CaveParams, seed: &CaveSeed) -> CaveGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.value());
    let mut grid = grid::random_fill(params.width, params.height, params.fill_percent, &mut rng);
    grid::smooth(&mut grid, params.smoothing_iterations, params.smoothing);
    grid
}

/// Run the full pipeline. Parameters are assumed to have passed
/// [`CaveParams::validate`].
pub fn generate_cave(params: &CaveParams, seed: &CaveSeed) -> CaveOutput {
    let seed_value = seed.value();
    log::info!(
        "generating {}x{} cave, seed {}, fill {}%",
        params.width,
        params.height,
        seed,
        params.fill_percent
    );

    let mut grid = generate_grid(params, seed);
    let (open, wall) = grid::tile_counts(&grid);
    log::info!(
        "smoothed grid ({} passes, {}): {} open, {} wall",
        params.smoothing_iterations,
        params.smoothing,
        open,
        wall
    );

    let (mut rooms, region_stats) =
        regions::process_regions(&mut grid, params.wall_threshold, params.room_threshold, params.edge_tiles);
    log::info!(
        "regions: removed {} wall and {} open regions, {} rooms remain",
        region_stats.wall_regions_removed,
        region_stats.open_regions_removed,
        rooms.len()
    );

    let passages = rooms::connect_closest_rooms(&mut rooms, &mut grid, ConnectOptions::from(params));
    log::info!("connected {} rooms with {} passages", rooms.len(), passages.len());

    let bordered = grid::add_border(&grid, params.border_size);
    let cave_mesh = mesh::generate_mesh(&bordered, params.cell_size, params.wall_height);
    log::info!(
        "mesh: {} floor triangles, {} outlines, {} wall triangles",
        cave_mesh.floor.triangle_count(),
        cave_mesh.outlines.len(),
        cave_mesh.walls.triangle_count()
    );

    let (open_tiles, wall_tiles) = grid::tile_counts(&grid);
    let stats = CaveStats {
        seed_value,
        open_tiles,
        wall_tiles,
        regions: region_stats,
        rooms: rooms.len(),
        passages: passages.len(),
        floor_vertices: cave_mesh.floor.vertex_count(),
        floor_triangles: cave_mesh.floor.triangle_count(),
        outlines: cave_mesh.outlines.len(),
        outline_edges: cave_mesh.outlines.iter().map(|o| o.edge_count()).sum(),
        wall_vertices: cave_mesh.walls.vertex_count(),
        wall_triangles: cave_mesh.walls.triangle_count(),
    };

    CaveOutput {
        params: params.clone(),
        seed: seed.clone(),
        grid,
        bordered,
        rooms,
        passages,
        mesh: cave_mesh,
        stats,
    }
}
