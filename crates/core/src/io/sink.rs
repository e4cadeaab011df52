//! Per-step checkpoint destinations

use super::snapshot::{save_grid, SnapshotError, SnapshotNaming};
use crate::grid::Grid;
use std::path::PathBuf;

/// Receives the grid after each completed step
pub trait SnapshotSink {
    /// Persist `grid` as the checkpoint of 1-based `step`
    fn save_step(&mut self, step: u32, grid: &Grid) -> Result<(), SnapshotError>;
}

/// Writes one snapshot file per step
#[derive(Debug, Clone, Default)]
pub struct FileSnapshotSink {
    naming: SnapshotNaming,
}

impl FileSnapshotSink {
    pub fn new(naming: SnapshotNaming) -> Self {
        Self { naming }
    }

    /// Path the checkpoint of `step` is written to
    pub fn path_for_step(&self, step: u32) -> PathBuf {
        self.naming.path_for_step(step)
    }
}

impl SnapshotSink for FileSnapshotSink {
    fn save_step(&mut self, step: u32, grid: &Grid) -> Result<(), SnapshotError> {
        save_grid(self.naming.path_for_step(step), grid)
    }
}

/// Keeps every checkpoint in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotSink {
    /// `(step, grid)` in the order they were saved
    pub snapshots: Vec<(u32, Grid)>,
}

impl MemorySnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checkpoint of `step`, if one was saved
    pub fn get(&self, step: u32) -> Option<&Grid> {
        self.snapshots
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, g)| g)
    }
}

impl SnapshotSink for MemorySnapshotSink {
    fn save_step(&mut self, step: u32, grid: &Grid) -> Result<(), SnapshotError> {
        self.snapshots.push((step, grid.clone()));
        Ok(())
    }
}

/// Discards every checkpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSnapshotSink;

impl SnapshotSink for NullSnapshotSink {
    fn save_step(&mut self, _step: u32, _grid: &Grid) -> Result<(), SnapshotError> {
        Ok(())
    }
}
