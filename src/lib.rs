//! Cave generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod export;
pub mod generator;
pub mod grid;
pub mod mesh;
pub mod params;
pub mod regions;
pub mod rooms;
pub mod seeds;
pub mod tilemap;

pub use generator::{generate_cave, CaveOutput, CaveStats};
pub use params::CaveParams;
pub use seeds::CaveSeed;
