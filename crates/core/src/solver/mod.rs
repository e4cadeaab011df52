//! Automaton step solvers
//!
//! One simulation step is two phases run back to back on the same grid:
//! 1. Energy diffusion: every cell absorbs its neighbors' emission
//! 2. Ignition: every combustible cell advances its state machine
//!
//! The phases are exposed as free functions (`step_*_cpu`) and behind the
//! `StepSolver` trait, which has a sequential and a Rayon-parallel backend.
//!
//! # Example
//!
//! ```rust
//! use fire_ca_core::core_types::{Cell, Material, MaterialTable};
//! use fire_ca_core::grid::Grid;
//! use fire_ca_core::solver::{create_step_solver, StepBackend};
//!
//! let mut grid = Grid::filled(3, 3, Cell::new(Material::Wood)).unwrap();
//! grid.set(1, 1, Cell::burning(Material::Wood));
//! let table = MaterialTable::baseline();
//!
//! let mut solver = create_step_solver(StepBackend::Sequential);
//! solver.step_energy_diffusion(&mut grid, &table);
//! solver.step_ignition(&mut grid, &table);
//! assert_eq!(grid.cell(0, 0).energy, 2000.0);
//! ```

mod cpu;
pub mod energy_diffusion;
pub mod ignition;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

// Re-exports
pub use cpu::{ParallelSolver, SequentialSolver};
pub use energy_diffusion::{neighbor_emission, step_energy_diffusion_cpu};
pub use ignition::{decide_transition, step_ignition_cpu, Transition};
pub use r#trait::StepSolver;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Execution backend for the step solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepBackend {
    /// Single-threaded
    #[default]
    Sequential,
    /// Rayon, one row per task
    Parallel,
}

/// Create a step solver for the requested backend
///
/// # Returns
///
/// A boxed `StepSolver` trait object
pub fn create_step_solver(backend: StepBackend) -> Box<dyn StepSolver> {
    match backend {
        StepBackend::Sequential => {
            info!("Using sequential CPU backend");
            Box::new(SequentialSolver::new())
        }
        StepBackend::Parallel => {
            info!(
                "Using parallel CPU backend ({} threads)",
                rayon::current_num_threads()
            );
            Box::new(ParallelSolver::new())
        }
    }
}
