//! Energy diffusion phase
//!
//! Every cell receives the energy emitted by its in-bounds neighbors:
//! ```text
//! E'(x, y) = E(x, y) + Σ emitted[material(n)][state(n)]   for n in N(x, y)
//! ```
//! where `N` is the clipped Moore neighborhood. All sums are computed from the
//! pre-step grid into a separate delta buffer before any energy is written, so
//! the result does not depend on the order in which cells are visited.

use crate::core_types::MaterialTable;
use crate::grid::Grid;
use rayon::prelude::*;

/// Energy flowing into `(x, y)` from its neighbors this step
#[inline]
pub fn neighbor_emission(grid: &Grid, table: &MaterialTable, x: usize, y: usize) -> f32 {
    grid.neighbor_cells(x, y)
        .map(|n| table.emitted_energy(n.material, n.state))
        .sum()
}

/// Fill `deltas` with the neighbor emission of every cell (row-major)
///
/// # Panics
///
/// Panics if `deltas` is not exactly one entry per cell
pub fn compute_energy_deltas(grid: &Grid, table: &MaterialTable, deltas: &mut [f32]) {
    assert_eq!(deltas.len(), grid.len(), "Delta buffer size mismatch");
    let width = grid.width();
    for (y, row) in deltas.chunks_mut(width).enumerate() {
        for (x, delta) in row.iter_mut().enumerate() {
            *delta = neighbor_emission(grid, table, x, y);
        }
    }
}

/// Parallel variant of [`compute_energy_deltas`], one row per task
///
/// # Panics
///
/// Panics if `deltas` is not exactly one entry per cell
pub fn compute_energy_deltas_parallel(grid: &Grid, table: &MaterialTable, deltas: &mut [f32]) {
    assert_eq!(deltas.len(), grid.len(), "Delta buffer size mismatch");
    let width = grid.width();
    deltas
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, delta) in row.iter_mut().enumerate() {
                *delta = neighbor_emission(grid, table, x, y);
            }
        });
}

/// Add each delta to the matching cell's energy
///
/// # Panics
///
/// Panics if `deltas` is not exactly one entry per cell
pub fn apply_energy_deltas(grid: &mut Grid, deltas: &[f32]) {
    assert_eq!(deltas.len(), grid.len(), "Delta buffer size mismatch");
    for (cell, &delta) in grid.cells_mut().iter_mut().zip(deltas) {
        cell.energy += delta;
    }
}

/// Run the diffusion phase on the CPU
///
/// `deltas` is scratch space, resized as needed and reusable across steps.
pub fn step_energy_diffusion_cpu(
    grid: &mut Grid,
    table: &MaterialTable,
    deltas: &mut Vec<f32>,
    parallel: bool,
) {
    deltas.clear();
    deltas.resize(grid.len(), 0.0);
    if parallel {
        compute_energy_deltas_parallel(grid, table, deltas);
    } else {
        compute_energy_deltas(grid, table, deltas);
    }
    apply_energy_deltas(grid, deltas);
}
