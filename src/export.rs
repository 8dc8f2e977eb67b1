//! Export of generated caves: Wavefront OBJ geometry and a JSON run summary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::generator::{CaveOutput, CaveStats};
use crate::mesh::{CaveMesh, MeshData};
use crate::params::CaveParams;
use crate::rooms::{Passage, RoomId};
use crate::seeds::CaveSeed;

/// Write the floor and wall meshes as two objects of one OBJ file.
pub fn export_obj<P: AsRef<Path>>(mesh: &CaveMesh, path: P) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_obj(mesh, &mut out)?;
    out.flush()?;
    Ok(())
}

/// OBJ text for `mesh`. Face indices are 1-based and run across both objects.
pub fn write_obj<W: Write>(mesh: &CaveMesh, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "# cave mesh")?;
    write_object(out, "floor", &mesh.floor, 1)?;
    write_object(out, "walls", &mesh.walls, 1 + mesh.floor.vertex_count())?;
    Ok(())
}

fn write_object<W: Write>(out: &mut W, name: &str, data: &MeshData, first_index: usize) -> std::io::Result<()> {
    writeln!(out, "o {}", name)?;
    for v in &data.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for [a, b, c] in data.triangle_indices() {
        writeln!(
            out,
            "f {} {} {}",
            a as usize + first_index,
            b as usize + first_index,
            c as usize + first_index
        )?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct RoomSummary {
    id: RoomId,
    size: usize,
    edge_tiles: usize,
    is_main_room: bool,
    connected: Vec<RoomId>,
}

#[derive(Debug, Serialize)]
struct CaveSummary<'a> {
    params: &'a CaveParams,
    seed: &'a CaveSeed,
    stats: &'a CaveStats,
    rooms: Vec<RoomSummary>,
    passages: &'a [Passage],
    generated_at: String,
}

/// Write parameters, seed, stats, rooms and passages as pretty-printed JSON.
pub fn export_summary_json<P: AsRef<Path>>(output: &CaveOutput, path: P) -> Result<(), ExportError> {
    let json = summary_json(output)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn summary_json(output: &CaveOutput) -> Result<String, ExportError> {
    let rooms = output
        .rooms
        .iter()
        .map(|r| RoomSummary {
            id: r.id,
            size: r.size(),
            edge_tiles: r.edge_tiles.len(),
            is_main_room: r.is_main_room,
            connected: r.connected.iter().copied().collect(),
        })
        .collect();
    let summary = CaveSummary {
        params: &output.params,
        seed: &output.seed,
        stats: &output.stats,
        rooms,
        passages: &output.passages,
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Export errors
#[derive(Debug)]
pub enum ExportError {
    /// Could not create or write the output file
    Io(std::io::Error),
    /// Summary could not be encoded
    Serialization(serde_json::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "Failed to write export: {}", e),
            ExportError::Serialization(e) => write!(f, "Failed to encode summary: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Serialization(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialization(e)
    }
}
