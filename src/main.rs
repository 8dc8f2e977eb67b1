use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use cave_generator::export::{export_obj, export_summary_json};
use cave_generator::grid;
use cave_generator::params::{CaveParams, EdgeTileRule, SmoothingMode};
use cave_generator::{generate_cave, CaveSeed};

#[derive(Parser, Debug)]
#[command(name = "cave_generator")]
#[command(about = "Generate procedural cave layouts and their floor and wall meshes")]
struct Args {
    /// JSON file with cave parameters (flags below override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed text or number (defaults to 0)
    #[arg(short, long, conflicts_with = "random_seed")]
    seed: Option<String>,

    /// Seed from the current time
    #[arg(long)]
    random_seed: bool,

    /// Grid width in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Chance (0-100) that an interior cell starts as wall
    #[arg(short = 'f', long)]
    fill_percent: Option<u32>,

    /// Number of smoothing passes (1-10)
    #[arg(long)]
    smoothing_iterations: Option<usize>,

    /// Smoothing pass behaviour
    #[arg(long, value_enum)]
    smoothing: Option<SmoothingMode>,

    /// Wall regions smaller than this are opened
    #[arg(long)]
    wall_threshold: Option<usize>,

    /// Open regions smaller than this are filled
    #[arg(long)]
    room_threshold: Option<usize>,

    /// Rule used to pick room edge tiles
    #[arg(long, value_enum)]
    edge_tiles: Option<EdgeTileRule>,

    /// Do not clear passages between joined rooms
    #[arg(long)]
    no_carve: bool,

    /// Radius of carved passages
    #[arg(long)]
    passage_radius: Option<usize>,

    /// Only run the greedy nearest-room pass
    #[arg(long)]
    greedy_only: bool,

    /// Width of the solid border added before meshing
    #[arg(short, long)]
    border_size: Option<usize>,

    /// World-space size of one cell
    #[arg(long)]
    cell_size: Option<f32>,

    /// Wall drop below the floor
    #[arg(long)]
    wall_height: Option<f32>,

    /// Write floor and wall meshes to an OBJ file
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Write a JSON summary of the run
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Print the processed grid
    #[arg(long)]
    print_grid: bool,
}

impl Args {
    fn cave_params(&self) -> Result<CaveParams, Box<dyn Error>> {
        let mut params = match &self.config {
            Some(path) => CaveParams::load_json(path)?,
            None => CaveParams::default(),
        };

        if let Some(v) = self.width {
            params.width = v;
        }
        if let Some(v) = self.height {
            params.height = v;
        }
        if let Some(v) = self.fill_percent {
            params.fill_percent = v;
        }
        if let Some(v) = self.smoothing_iterations {
            params.smoothing_iterations = v;
        }
        if let Some(v) = self.smoothing {
            params.smoothing = v;
        }
        if let Some(v) = self.wall_threshold {
            params.wall_threshold = v;
        }
        if let Some(v) = self.room_threshold {
            params.room_threshold = v;
        }
        if let Some(v) = self.edge_tiles {
            params.edge_tiles = v;
        }
        if self.no_carve {
            params.carve_passages = false;
        }
        if let Some(v) = self.passage_radius {
            params.passage_radius = v;
        }
        if self.greedy_only {
            params.ensure_connectivity = false;
        }
        if let Some(v) = self.border_size {
            params.border_size = v;
        }
        if let Some(v) = self.cell_size {
            params.cell_size = v;
        }
        if let Some(v) = self.wall_height {
            params.wall_height = v;
        }

        params.validate()?;
        Ok(params)
    }

    fn cave_seed(&self) -> CaveSeed {
        if self.random_seed {
            CaveSeed::from_clock()
        } else {
            self.seed.as_deref().map(CaveSeed::parse).unwrap_or_default()
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.cave_params()?;
    let seed = args.cave_seed();

    println!("Generating cave with seed: {}", seed);
    println!("Map size: {}x{} (border {})", params.width, params.height, params.border_size);

    let output = generate_cave(&params, &seed);
    let stats = &output.stats;

    println!(
        "Grid: {} open, {} wall ({:.1}% open)",
        stats.open_tiles,
        stats.wall_tiles,
        100.0 * stats.open_tiles as f64 / (params.width * params.height) as f64
    );
    println!(
        "Regions: {}/{} wall regions opened, {}/{} open regions filled",
        stats.regions.wall_regions_removed,
        stats.regions.wall_regions,
        stats.regions.open_regions_removed,
        stats.regions.open_regions
    );
    println!("Rooms: {} ({} passages)", stats.rooms, stats.passages);
    if let Some(main_room) = output.rooms.iter().find(|r| r.is_main_room) {
        println!("  Main room: #{} with {} tiles", main_room.id.0, main_room.size());
    }
    println!(
        "Floor mesh: {} vertices, {} triangles",
        stats.floor_vertices, stats.floor_triangles
    );
    println!(
        "Walls: {} outlines, {} vertices, {} triangles",
        stats.outlines, stats.wall_vertices, stats.wall_triangles
    );

    if args.print_grid {
        println!();
        print!("{}", grid::to_ascii(&output.grid));
    }

    if let Some(ref path) = args.obj {
        export_obj(&output.mesh, path)?;
        println!("Mesh saved to: {}", path.display());
    }

    if let Some(ref path) = args.summary {
        export_summary_json(&output, path)?;
        println!("Summary saved to: {}", path.display());
    }

    Ok(())
}
