//! Step solver trait definition
//!
//! This module defines the `StepSolver` trait, the backend-agnostic interface for
//! the two physics phases. Sequential and parallel CPU implementations exist.

use crate::core_types::MaterialTable;
use crate::grid::Grid;

/// Backend-agnostic interface for one automaton step
///
/// Both phases must observe the simultaneity invariant: every cell's update is
/// computed from the grid as it stood when the phase began.
pub trait StepSolver: Send + Sync {
    /// Add each cell's neighbor emission to its energy
    ///
    /// # Arguments
    ///
    /// * `grid` - Grid to update in place
    /// * `table` - Material constants
    fn step_energy_diffusion(&mut self, grid: &mut Grid, table: &MaterialTable);

    /// Advance every combustible cell's state machine by one step
    ///
    /// Must run after [`StepSolver::step_energy_diffusion`] of the same step.
    fn step_ignition(&mut self, grid: &mut Grid, table: &MaterialTable);

    /// Check if this backend spreads work across threads
    fn is_parallel(&self) -> bool;
}
