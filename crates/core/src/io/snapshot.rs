//! Binary grid snapshots
//!
//! A snapshot is `width × height` fixed-size records with no header. Records are
//! stored column-major (every row of column 0, then column 1, ...) and each is
//! four little-endian `f32`s:
//!
//! ```text
//! offset  0: state         0.0 = Normal, 1.0 = Burning, 2.0 = Burned
//! offset  4: material      0.0 = Air, 1.0 = Soil, 2.0 = Wood, 3.0 = Leaf, 4.0 = DryLeaf
//! offset  8: energy
//! offset 12: burn_elapsed
//! ```
//!
//! Dimensions are not stored; readers are told them out of band.

use crate::core_types::{Cell, CombustionState, Material};
use crate::grid::{cell_count, Grid, GridError};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Size of one encoded cell in bytes
pub const RECORD_SIZE: usize = std::mem::size_of::<CellRecord>();

/// On-disk cell record
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct CellRecord {
    pub state: f32,
    pub material: f32,
    pub energy: f32,
    pub burn_elapsed: f32,
}

impl CellRecord {
    /// Encode a cell
    pub fn from_cell(cell: &Cell) -> Self {
        Self {
            state: f32::from(cell.state.code()),
            material: f32::from(cell.material.code()),
            energy: cell.energy,
            burn_elapsed: cell.burn_elapsed,
        }
        .to_le()
    }

    /// Decode a record read from disk
    pub fn to_cell(self) -> Result<Cell, RecordError> {
        let raw = self.to_le();
        let state = decode_code(raw.state)
            .and_then(CombustionState::from_code)
            .ok_or(RecordError::State(raw.state))?;
        let material = decode_code(raw.material)
            .and_then(Material::from_code)
            .ok_or(RecordError::Material(raw.material))?;
        if !raw.energy.is_finite() || raw.energy < 0.0 {
            return Err(RecordError::Energy(raw.energy));
        }
        if !raw.burn_elapsed.is_finite() || raw.burn_elapsed < 0.0 {
            return Err(RecordError::BurnElapsed(raw.burn_elapsed));
        }
        Ok(Cell {
            state,
            material,
            energy: raw.energy,
            burn_elapsed: raw.burn_elapsed,
        })
    }

    /// Swap between native and little-endian byte order (no-op on LE targets)
    fn to_le(self) -> Self {
        let le = |v: f32| f32::from_bits(v.to_bits().to_le());
        Self {
            state: le(self.state),
            material: le(self.material),
            energy: le(self.energy),
            burn_elapsed: le(self.burn_elapsed),
        }
    }
}

fn decode_code(value: f32) -> Option<u8> {
    if value.fract() == 0.0 && (0.0..=f32::from(u8::MAX)).contains(&value) {
        Some(value as u8)
    } else {
        None
    }
}

/// Why a record failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RecordError {
    #[error("invalid combustion state code {0}")]
    State(f32),
    #[error("invalid material code {0}")]
    Material(f32),
    #[error("energy must be finite and non-negative, got {0}")]
    Energy(f32),
    #[error("burn time must be finite and non-negative, got {0}")]
    BurnElapsed(f32),
}

/// Errors from snapshot I/O
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Input snapshot cannot be opened
    #[error("failed to open snapshot {}: {source}", .path.display())]
    MissingOrUnreadableInput { path: PathBuf, source: io::Error },
    /// Output snapshot cannot be created
    #[error("failed to open snapshot {} for writing: {source}", .path.display())]
    UnwritableOutput { path: PathBuf, source: io::Error },
    /// File size does not match the expected grid
    #[error(
        "snapshot {} has {actual} bytes, expected {expected} for the configured grid",
        .path.display()
    )]
    ShortRead {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
    /// Writing failed after the file was created
    #[error("failed to write snapshot {}: {source}", .path.display())]
    ShortWrite { path: PathBuf, source: io::Error },
    /// A record holds values that are not a valid cell
    #[error("snapshot {} has an invalid record at ({x}, {y}): {reason}", .path.display())]
    InvalidRecord {
        path: PathBuf,
        x: usize,
        y: usize,
        reason: RecordError,
    },
    /// Requested dimensions do not describe a grid
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Size in bytes of a snapshot of a `width × height` grid
///
/// # Errors
///
/// Returns `GridError` if the dimensions are zero or the size overflows
pub fn snapshot_len(width: usize, height: usize) -> Result<u64, GridError> {
    cell_count(width, height)?
        .checked_mul(RECORD_SIZE)
        .map(|bytes| bytes as u64)
        .ok_or(GridError::TooLarge { width, height })
}

/// Encode a grid into snapshot records (column-major)
pub fn encode_records(grid: &Grid) -> Vec<CellRecord> {
    let mut records = Vec::with_capacity(grid.len());
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            records.push(CellRecord::from_cell(grid.cell(x, y)));
        }
    }
    records
}

/// Decode column-major records into a grid
///
/// `path` is only used to label errors.
pub fn decode_records(
    records: &[CellRecord],
    width: usize,
    height: usize,
    path: &Path,
) -> Result<Grid, SnapshotError> {
    let expected = snapshot_len(width, height)?;
    let count = cell_count(width, height)?;
    if records.len() != count {
        return Err(SnapshotError::ShortRead {
            path: path.to_path_buf(),
            expected,
            actual: std::mem::size_of_val(records) as u64,
        });
    }
    let mut cells = vec![Cell::default(); count];
    for (i, record) in records.iter().enumerate() {
        let (x, y) = (i / height, i % height);
        cells[y * width + x] = record.to_cell().map_err(|reason| SnapshotError::InvalidRecord {
            path: path.to_path_buf(),
            x,
            y,
            reason,
        })?;
    }
    Ok(Grid::from_cells(width, height, cells)?)
}

/// Load a snapshot of known dimensions
///
/// Returns a fresh grid; nothing is modified on failure.
///
/// # Errors
///
/// - `Grid` if the dimensions are zero or too large, checked before opening
/// - `MissingOrUnreadableInput` if the file cannot be opened or read
/// - `ShortRead` if the file is smaller or larger than `width * height` records
/// - `InvalidRecord` if a record does not decode to a cell
pub fn load_grid<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
) -> Result<Grid, SnapshotError> {
    let path = path.as_ref();
    let unreadable = |source: io::Error| SnapshotError::MissingOrUnreadableInput {
        path: path.to_path_buf(),
        source,
    };

    let expected = snapshot_len(width, height)?;
    let mut file = File::open(path).map_err(unreadable)?;
    let actual = file.metadata().map_err(unreadable)?.len();
    if actual != expected {
        return Err(SnapshotError::ShortRead {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }

    let mut records = vec![CellRecord::zeroed(); cell_count(width, height)?];
    match file.read_exact(bytemuck::cast_slice_mut(&mut records)) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(SnapshotError::ShortRead {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }
        Err(e) => return Err(unreadable(e)),
    }

    let grid = decode_records(&records, width, height, path)?;
    info!("Snapshot loaded: {}", path.display());
    Ok(grid)
}

/// Save a grid as a snapshot, replacing any existing file
///
/// # Errors
///
/// - `UnwritableOutput` if the file cannot be created
/// - `ShortWrite` if writing fails part way
pub fn save_grid<P: AsRef<Path>>(path: P, grid: &Grid) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| SnapshotError::UnwritableOutput {
        path: path.to_path_buf(),
        source,
    })?;

    let records = encode_records(grid);
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytemuck::cast_slice(&records))
        .and_then(|()| writer.flush())
        .map_err(|source| SnapshotError::ShortWrite {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Snapshot saved: {}", path.display());
    Ok(())
}

/// Deterministic per-step snapshot file names
///
/// Step `n` is written to `directory/prefix{n}suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotNaming {
    /// Directory the snapshots are written to
    pub directory: PathBuf,
    /// File name before the step number
    pub prefix: String,
    /// File name after the step number
    pub suffix: String,
}

impl SnapshotNaming {
    /// Naming rooted at `directory` with the default prefix and suffix
    pub fn in_directory<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Path of the snapshot for 1-based `step`
    pub fn path_for_step(&self, step: u32) -> PathBuf {
        self.directory
            .join(format!("{}{}{}", self.prefix, step, self.suffix))
    }
}

impl Default for SnapshotNaming {
    /// `./cells_state_step_{n}.bin`
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            prefix: "cells_state_step_".to_string(),
            suffix: ".bin".to_string(),
        }
    }
}
