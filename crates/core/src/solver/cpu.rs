//! CPU step solvers
//!
//! Both backends keep their scratch buffers between steps so a long run
//! allocates them once. The parallel backend uses Rayon, one grid row per task,
//! and produces bit-identical grids to the sequential one.

use super::energy_diffusion::step_energy_diffusion_cpu;
use super::ignition::{step_ignition_cpu, Transition};
use super::StepSolver;
use crate::core_types::MaterialTable;
use crate::grid::Grid;

/// Single-threaded solver
#[derive(Debug, Default)]
pub struct SequentialSolver {
    deltas: Vec<f32>,
    transitions: Vec<Transition>,
}

impl SequentialSolver {
    /// Create a solver with empty scratch buffers
    pub fn new() -> Self {
        Self::default()
    }
}

impl StepSolver for SequentialSolver {
    fn step_energy_diffusion(&mut self, grid: &mut Grid, table: &MaterialTable) {
        step_energy_diffusion_cpu(grid, table, &mut self.deltas, false);
    }

    fn step_ignition(&mut self, grid: &mut Grid, table: &MaterialTable) {
        step_ignition_cpu(grid, table, &mut self.transitions, false);
    }

    fn is_parallel(&self) -> bool {
        false
    }
}

/// Rayon-backed solver
#[derive(Debug, Default)]
pub struct ParallelSolver {
    deltas: Vec<f32>,
    transitions: Vec<Transition>,
}

impl ParallelSolver {
    /// Create a solver with empty scratch buffers
    pub fn new() -> Self {
        Self::default()
    }
}

impl StepSolver for ParallelSolver {
    fn step_energy_diffusion(&mut self, grid: &mut Grid, table: &MaterialTable) {
        step_energy_diffusion_cpu(grid, table, &mut self.deltas, true);
    }

    fn step_ignition(&mut self, grid: &mut Grid, table: &MaterialTable) {
        step_ignition_cpu(grid, table, &mut self.transitions, true);
    }

    fn is_parallel(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Cell, Material};

    #[test]
    fn test_backends_agree_over_many_steps() {
        let mut grid = Grid::filled(40, 30, Cell::new(Material::Wood)).unwrap();
        grid.set(20, 15, Cell::burning(Material::Wood));
        let table = MaterialTable::baseline();

        let mut seq_grid = grid.clone();
        let mut par_grid = grid;
        let mut seq = SequentialSolver::new();
        let mut par = ParallelSolver::new();
        for _ in 0..25 {
            seq.step_energy_diffusion(&mut seq_grid, &table);
            seq.step_ignition(&mut seq_grid, &table);
            par.step_energy_diffusion(&mut par_grid, &table);
            par.step_ignition(&mut par_grid, &table);
        }
        assert_eq!(seq_grid, par_grid);
        assert!(!seq.is_parallel());
        assert!(par.is_parallel());
    }
}
