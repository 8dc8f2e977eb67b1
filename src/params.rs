//! Cave generation parameters and boundary validation
//!
//! The generation stages trust their inputs; everything a user can type is checked
//! here, once, before the pipeline runs.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Largest grid (before bordering) the generator accepts.
pub const MAX_GRID_CELLS: usize = 4096 * 4096;

/// Upper bound on smoothing passes.
pub const MAX_SMOOTHING_ITERATIONS: usize = 10;

/// How a smoothing pass reads neighbour state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Cells are rewritten while scanning, so later cells in a pass see earlier updates.
    #[default]
    InPlace,
    /// Every cell is computed from a snapshot of the previous pass.
    DoubleBuffered,
}

/// Which open tiles of a room count as edge tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EdgeTileRule {
    /// Open tile with a wall directly left, right, above or below it.
    #[default]
    Adjacent,
    /// Open tile at (x, y) with any wall in row y at columns 0..=x, or in column x at rows 0..=y.
    Cumulative,
}

impl std::fmt::Display for SmoothingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InPlace => write!(f, "in-place"),
            Self::DoubleBuffered => write!(f, "double-buffered"),
        }
    }
}

impl std::fmt::Display for EdgeTileRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Adjacent => write!(f, "adjacent"),
            Self::Cumulative => write!(f, "cumulative"),
        }
    }
}

/// Every knob of a cave generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveParams {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Chance (0-100) that an interior cell starts as wall
    pub fill_percent: u32,
    /// Number of cellular-automaton passes
    pub smoothing_iterations: usize,
    pub smoothing: SmoothingMode,
    /// Wall regions with fewer tiles than this are opened up
    pub wall_threshold: usize,
    /// Open regions with fewer tiles than this are filled in
    pub room_threshold: usize,
    pub edge_tiles: EdgeTileRule,
    /// Clear tiles along each room join
    pub carve_passages: bool,
    /// Radius of the disc cleared at each passage tile
    pub passage_radius: usize,
    /// Keep joining rooms until all are reachable from the largest one
    pub ensure_connectivity: bool,
    /// Width of the solid ring added around the finished grid
    pub border_size: usize,
    /// World-space size of one grid cell
    pub cell_size: f32,
    /// How far walls drop below the floor mesh
    pub wall_height: f32,
}

impl Default for CaveParams {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
            fill_percent: 47,
            smoothing_iterations: 5,
            smoothing: SmoothingMode::InPlace,
            wall_threshold: 50,
            room_threshold: 50,
            edge_tiles: EdgeTileRule::Adjacent,
            carve_passages: true,
            passage_radius: 1,
            ensure_connectivity: true,
            border_size: 20,
            cell_size: 1.0,
            wall_height: 5.0,
        }
    }
}

impl CaveParams {
    /// Check the parameters at the boundary. The generator itself never validates.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.width == 0 || self.height == 0 {
            return Err(ParamsError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        let bordered_w = self.width.saturating_add(self.border_size.saturating_mul(2));
        let bordered_h = self.height.saturating_add(self.border_size.saturating_mul(2));
        if bordered_w.saturating_mul(bordered_h) > MAX_GRID_CELLS {
            return Err(ParamsError::GridTooLarge {
                width: bordered_w,
                height: bordered_h,
                max_cells: MAX_GRID_CELLS,
            });
        }
        if self.fill_percent > 100 {
            return Err(ParamsError::OutOfRange {
                name: "fill_percent",
                value: self.fill_percent as f64,
                min: 0.0,
                max: 100.0,
            });
        }
        if self.smoothing_iterations == 0 || self.smoothing_iterations > MAX_SMOOTHING_ITERATIONS {
            return Err(ParamsError::OutOfRange {
                name: "smoothing_iterations",
                value: self.smoothing_iterations as f64,
                min: 1.0,
                max: MAX_SMOOTHING_ITERATIONS as f64,
            });
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ParamsError::NotPositive {
                name: "cell_size",
                value: self.cell_size,
            });
        }
        if !(self.wall_height.is_finite() && self.wall_height > 0.0) {
            return Err(ParamsError::NotPositive {
                name: "wall_height",
                value: self.wall_height,
            });
        }
        Ok(())
    }

    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ParamsError> {
        let contents = std::fs::read_to_string(path)?;
        let params: CaveParams = serde_json::from_str(&contents)?;
        Ok(params)
    }
}

/// Rejected configuration.
#[derive(Debug)]
pub enum ParamsError {
    /// Width or height is zero
    EmptyGrid { width: usize, height: usize },
    /// Bordered grid exceeds the size limit
    GridTooLarge {
        width: usize,
        height: usize,
        max_cells: usize,
    },
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    NotPositive { name: &'static str, value: f32 },
    /// Config file could not be read
    Io(std::io::Error),
    /// Config file is not valid JSON for `CaveParams`
    Parse(String),
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamsError::EmptyGrid { width, height } => {
                write!(f, "Grid dimensions must be positive, got {}x{}", width, height)
            }
            ParamsError::GridTooLarge { width, height, max_cells } => write!(
                f,
                "Bordered grid {}x{} ({} cells) exceeds maximum {} cells",
                width,
                height,
                *width as u64 * *height as u64,
                max_cells
            ),
            ParamsError::OutOfRange { name, value, min, max } => {
                write!(f, "{} = {} is outside {}..={}", name, value, min, max)
            }
            ParamsError::NotPositive { name, value } => {
                write!(f, "{} must be positive, got {}", name, value)
            }
            ParamsError::Io(e) => write!(f, "IO error: {}", e),
            ParamsError::Parse(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for ParamsError {}

impl From<std::io::Error> for ParamsError {
    fn from(e: std::io::Error) -> Self {
        ParamsError::Io(e)
    }
}

impl From<serde_json::Error> for ParamsError {
    fn from(e: serde_json::Error) -> Self {
        ParamsError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CaveParams::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let p = CaveParams { width: 0, ..Default::default() };
        assert!(matches!(p.validate(), Err(ParamsError::EmptyGrid { .. })));

        let p = CaveParams { fill_percent: 101, ..Default::default() };
        assert!(matches!(p.validate(), Err(ParamsError::OutOfRange { name: "fill_percent", .. })));

        let p = CaveParams { smoothing_iterations: 0, ..Default::default() };
        assert!(matches!(p.validate(), Err(ParamsError::OutOfRange { name: "smoothing_iterations", .. })));

        let p = CaveParams { cell_size: 0.0, ..Default::default() };
        assert!(matches!(p.validate(), Err(ParamsError::NotPositive { name: "cell_size", .. })));

        let p = CaveParams { wall_height: f32::NAN, ..Default::default() };
        assert!(matches!(p.validate(), Err(ParamsError::NotPositive { name: "wall_height", .. })));

        let p = CaveParams { width: 5000, height: 5000, ..Default::default() };
        assert!(matches!(p.validate(), Err(ParamsError::GridTooLarge { .. })));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let p: CaveParams =
            serde_json::from_str(r#"{ "width": 32, "smoothing": "double_buffered", "edge_tiles": "cumulative" }"#)
                .unwrap();
        assert_eq!(p.width, 32);
        assert_eq!(p.height, 60);
        assert_eq!(p.smoothing, SmoothingMode::DoubleBuffered);
        assert_eq!(p.edge_tiles, EdgeTileRule::Cumulative);
    }

    #[test]
    fn test_load_json_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(CaveParams::load_json(&missing), Err(ParamsError::Io(_))));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(CaveParams::load_json(&bad), Err(ParamsError::Parse(_))));
    }

    #[test]
    fn test_cli_spellings() {
        assert_eq!(SmoothingMode::from_str("double-buffered", false), Ok(SmoothingMode::DoubleBuffered));
        assert_eq!(SmoothingMode::from_str("in-place", false), Ok(SmoothingMode::InPlace));
        assert_eq!(EdgeTileRule::from_str("cumulative", false), Ok(EdgeTileRule::Cumulative));
        assert!(EdgeTileRule::from_str("diagonal", false).is_err());
        for mode in SmoothingMode::value_variants() {
            let name = mode.to_possible_value().map(|v| v.get_name().to_string());
            assert_eq!(name, Some(mode.to_string()));
        }
    }
}
