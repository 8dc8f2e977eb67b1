//! Cellular-automaton cave grid
//!
//! Random fill, majority-rule smoothing and the solid border that wraps the
//! finished grid before meshing.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::params::SmoothingMode;
use crate::tilemap::{Tilemap, MOORE_OFFSETS};

/// A cell of the cave grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Open,
    Wall,
}

impl Tile {
    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }

    pub fn flipped(self) -> Self {
        match self {
            Tile::Open => Tile::Wall,
            Tile::Wall => Tile::Open,
        }
    }
}

pub type CaveGrid = Tilemap<Tile>;

/// Neighbour walls above which a cell becomes wall.
const WALL_NEIGHBOR_THRESHOLD: usize = 4;

/// Fill a fresh grid: the perimeter is always wall, interior cells are wall with
/// probability `fill_percent / 100`. The RNG is advanced x-outer / y-inner, one draw
/// per interior cell, so a seed always reproduces the same grid.
pub fn random_fill(width: usize, height: usize, fill_percent: u32, rng: &mut ChaCha8Rng) -> CaveGrid {
    let mut grid = CaveGrid::new(width, height);

    for x in 0..width {
        for y in 0..height {
            let tile = if grid.is_perimeter(x, y) {
                Tile::Wall
            } else if rng.gen_range(0..100u32) < fill_percent {
                Tile::Wall
            } else {
                Tile::Open
            };
            grid.set(x, y, tile);
        }
    }

    grid
}

/// Count walls among the 8 neighbours; cells outside the grid count as wall.
pub fn surrounding_wall_count(grid: &CaveGrid, x: usize, y: usize) -> usize {
    MOORE_OFFSETS
        .iter()
        .filter(|&&(dx, dy)| {
            grid.get_signed(x as i32 + dx, y as i32 + dy)
                .map_or(true, |t| t.is_wall())
        })
        .count()
}

/// Run `iterations` smoothing passes over the grid.
pub fn smooth(grid: &mut CaveGrid, iterations: usize, mode: SmoothingMode) {
    for _ in 0..iterations {
        match mode {
            SmoothingMode::InPlace => smooth_pass_in_place(grid),
            SmoothingMode::DoubleBuffered => smooth_pass_buffered(grid),
        }
    }
}

fn smoothed_tile(wall_neighbors: usize) -> Tile {
    if wall_neighbors > WALL_NEIGHBOR_THRESHOLD { Tile::Wall } else { Tile::Open }
}

// Reads the grid it is writing, so a cell's count may include neighbours already
// updated earlier in the same pass.
fn smooth_pass_in_place(grid: &mut CaveGrid) {
    for x in 0..grid.width {
        for y in 0..grid.height {
            let count = surrounding_wall_count(grid, x, y);
            grid.set(x, y, smoothed_tile(count));
        }
    }
}

fn smooth_pass_buffered(grid: &mut CaveGrid) {
    let previous = grid.clone();
    for x in 0..grid.width {
        for y in 0..grid.height {
            let count = surrounding_wall_count(&previous, x, y);
            grid.set(x, y, smoothed_tile(count));
        }
    }
}

/// Pad the grid with a solid ring `border_size` cells wide on every side.
pub fn add_border(grid: &CaveGrid, border_size: usize) -> CaveGrid {
    let width = grid.width + border_size * 2;
    let height = grid.height + border_size * 2;
    let mut bordered = CaveGrid::new_with(width, height, Tile::Wall);

    for (x, y, &tile) in grid.iter() {
        bordered.set(x + border_size, y + border_size, tile);
    }

    bordered
}

/// Count cells of each kind: (open, wall).
pub fn tile_counts(grid: &CaveGrid) -> (usize, usize) {
    let walls = grid.iter().filter(|(_, _, t)| t.is_wall()).count();
    (grid.len() - walls, walls)
}

/// Render the grid as text rows, top row first (`#` wall, `.` open).
pub fn to_ascii(grid: &CaveGrid) -> String {
    let mut out = String::with_capacity((grid.width + 1) * grid.height);
    for y in (0..grid.height).rev() {
        for x in 0..grid.width {
            out.push(if grid.get(x, y).is_wall() { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

/// Parse rows produced by [`to_ascii`] (top row first). Rows must share one length.
pub fn from_ascii(text: &str) -> CaveGrid {
    let rows: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.chars().count());
    let mut grid = CaveGrid::new(width, height);
    for (row, line) in rows.iter().enumerate() {
        let y = height - 1 - row;
        for (x, c) in line.chars().enumerate().take(width) {
            grid.set(x, y, if c == '#' { Tile::Wall } else { Tile::Open });
        }
    }
    grid
}
