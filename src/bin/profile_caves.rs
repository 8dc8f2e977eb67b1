//! Profiling tool: per-stage timings for one cave, then a parallel batch

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use cave_generator::{
    generate_cave, grid, mesh, regions, rooms,
    rooms::ConnectOptions,
    seeds::derive_seed,
    CaveParams, CaveSeed,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let params = CaveParams {
        width: 256,
        height: 192,
        ..CaveParams::default()
    };
    let seed = 1337u64;

    println!("=== Cave Generation Profiling ===");
    println!("Map size: {}x{} ({} cells)", params.width, params.height, params.width * params.height);
    println!();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let start = Instant::now();
    let mut cave = grid::random_fill(params.width, params.height, params.fill_percent, &mut rng);
    let fill_time = start.elapsed();
    println!("Random fill: {:?}", fill_time);

    let start = Instant::now();
    grid::smooth(&mut cave, params.smoothing_iterations, params.smoothing);
    let smooth_time = start.elapsed();
    println!("Smoothing ({} passes): {:?}", params.smoothing_iterations, smooth_time);

    let start = Instant::now();
    let (mut room_list, _) =
        regions::process_regions(&mut cave, params.wall_threshold, params.room_threshold, params.edge_tiles);
    let region_time = start.elapsed();
    println!("Region processing: {:?} ({} rooms)", region_time, room_list.len());

    let start = Instant::now();
    let passages = rooms::connect_closest_rooms(&mut room_list, &mut cave, ConnectOptions::from(&params));
    let connect_time = start.elapsed();
    println!("Room connection: {:?} ({} passages)", connect_time, passages.len());

    let start = Instant::now();
    let bordered = grid::add_border(&cave, params.border_size);
    let floor = mesh::triangulate(&bordered, params.cell_size);
    let triangulate_time = start.elapsed();
    println!("Triangulation: {:?} ({} triangles)", triangulate_time, floor.mesh.triangle_count());

    let start = Instant::now();
    let outlines = mesh::trace_outlines(&floor);
    let walls = mesh::build_wall_mesh(&outlines, &floor.mesh.vertices, params.wall_height);
    let outline_time = start.elapsed();
    println!("Outlines + walls: {:?} ({} outlines, {} wall triangles)", outline_time, outlines.len(), walls.triangle_count());

    let total = fill_time + smooth_time + region_time + connect_time + triangulate_time + outline_time;
    let pct = |d: std::time::Duration| 100.0 * d.as_secs_f64() / total.as_secs_f64();
    println!("\n=== Summary ===");
    println!("Fill:          {:>8.2}% ({:?})", pct(fill_time), fill_time);
    println!("Smoothing:     {:>8.2}% ({:?})", pct(smooth_time), smooth_time);
    println!("Regions:       {:>8.2}% ({:?})", pct(region_time), region_time);
    println!("Rooms:         {:>8.2}% ({:?})", pct(connect_time), connect_time);
    println!("Triangulation: {:>8.2}% ({:?})", pct(triangulate_time), triangulate_time);
    println!("Outlines:      {:>8.2}% ({:?})", pct(outline_time), outline_time);
    println!("─────────────────────────────────");
    println!("Total:         {:?}", total);

    // Batch: every generation owns its grid, so seeds run independently.
    let batch = 32;
    println!("\n=== Parallel batch ({} caves) ===", batch);
    let start = Instant::now();
    let results: Vec<_> = (0..batch)
        .into_par_iter()
        .map(|i| {
            let cave_seed = CaveSeed::Number(derive_seed(seed, &format!("batch-{}", i)));
            generate_cave(&params, &cave_seed).stats
        })
        .collect();
    let batch_time = start.elapsed();

    let rooms_total: usize = results.iter().map(|s| s.rooms).sum();
    let tris_total: usize = results.iter().map(|s| s.floor_triangles + s.wall_triangles).sum();
    let max_rooms = results.iter().map(|s| s.rooms).max().unwrap_or(0);
    println!("Batch time: {:?} ({:?} per cave)", batch_time, batch_time / batch as u32);
    println!("Average rooms: {:.1} (max {})", rooms_total as f64 / batch as f64, max_rooms);
    println!("Average triangles: {:.0}", tris_total as f64 / batch as f64);
}
