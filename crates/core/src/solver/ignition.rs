//! Ignition and burn-out phase
//!
//! Advances every combustible cell's state machine by one step:
//!
//! | from    | condition                                            | to      |
//! |---------|------------------------------------------------------|---------|
//! | Burning | `burn_elapsed + 1 >= burn_duration`                  | Burned  |
//! | Burning | otherwise                                            | Burning |
//! | Normal  | burning neighbor and `energy >= with_source`         | Burning |
//! | Normal  | no burning neighbor and `energy >= spontaneous`      | Burning |
//! | Burned  | -                                                    | Burned  |
//!
//! Air and soil are skipped. The phase is split into decide (read-only over the
//! pre-step grid) and apply, so a neighbor that ignites or burns out in this
//! step is still seen in its pre-step state by every other cell.

use crate::core_types::{Cell, CombustionState, MaterialTable};
use crate::grid::Grid;
use rayon::prelude::*;

/// Outcome of the state machine for one cell
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Transition {
    /// Nothing to write
    #[default]
    Unchanged,
    /// Normal cell catches fire
    Ignite,
    /// Burning cell keeps burning with the new elapsed time
    Burn { elapsed: f32 },
    /// Burning cell burns out with the new elapsed time
    BurnOut { elapsed: f32 },
}

/// Decide the transition of `(x, y)` from the current grid
pub fn decide_transition(grid: &Grid, table: &MaterialTable, x: usize, y: usize) -> Transition {
    let cell = grid.cell(x, y);
    if cell.material.is_inert() {
        return Transition::Unchanged;
    }
    let props = table.properties(cell.material);

    match cell.state {
        CombustionState::Burned => Transition::Unchanged,
        CombustionState::Burning => {
            let elapsed = cell.burn_elapsed + 1.0;
            if elapsed >= props.burn_duration {
                Transition::BurnOut { elapsed }
            } else {
                Transition::Burn { elapsed }
            }
        }
        CombustionState::Normal => {
            let threshold = props.ignition_threshold(grid.has_burning_neighbor(x, y));
            if cell.energy >= threshold {
                Transition::Ignite
            } else {
                Transition::Unchanged
            }
        }
    }
}

/// Write a decided transition into a cell
#[inline]
pub fn apply_transition(cell: &mut Cell, transition: Transition) {
    match transition {
        Transition::Unchanged => {}
        Transition::Ignite => cell.state = CombustionState::Burning,
        Transition::Burn { elapsed } => cell.burn_elapsed = elapsed,
        Transition::BurnOut { elapsed } => {
            cell.burn_elapsed = elapsed;
            cell.state = CombustionState::Burned;
        }
    }
}

/// Decide the transition of every cell (row-major)
///
/// # Panics
///
/// Panics if `transitions` is not exactly one entry per cell
pub fn decide_transitions(grid: &Grid, table: &MaterialTable, transitions: &mut [Transition]) {
    assert_eq!(transitions.len(), grid.len(), "Transition buffer size mismatch");
    let width = grid.width();
    for (y, row) in transitions.chunks_mut(width).enumerate() {
        for (x, t) in row.iter_mut().enumerate() {
            *t = decide_transition(grid, table, x, y);
        }
    }
}

/// Parallel variant of [`decide_transitions`], one row per task
///
/// # Panics
///
/// Panics if `transitions` is not exactly one entry per cell
pub fn decide_transitions_parallel(
    grid: &Grid,
    table: &MaterialTable,
    transitions: &mut [Transition],
) {
    assert_eq!(transitions.len(), grid.len(), "Transition buffer size mismatch");
    let width = grid.width();
    transitions
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, t) in row.iter_mut().enumerate() {
                *t = decide_transition(grid, table, x, y);
            }
        });
}

/// Apply every decided transition
///
/// # Panics
///
/// Panics if `transitions` is not exactly one entry per cell
pub fn apply_transitions(grid: &mut Grid, transitions: &[Transition]) {
    assert_eq!(transitions.len(), grid.len(), "Transition buffer size mismatch");
    for (cell, &t) in grid.cells_mut().iter_mut().zip(transitions) {
        apply_transition(cell, t);
    }
}

/// Run the ignition phase on the CPU
///
/// `transitions` is scratch space, resized as needed and reusable across steps.
pub fn step_ignition_cpu(
    grid: &mut Grid,
    table: &MaterialTable,
    transitions: &mut Vec<Transition>,
    parallel: bool,
) {
    transitions.clear();
    transitions.resize(grid.len(), Transition::Unchanged);
    if parallel {
        decide_transitions_parallel(grid, table, transitions);
    } else {
        decide_transitions(grid, table, transitions);
    }
    apply_transitions(grid, transitions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Material, MaterialProperties};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn step(grid: &mut Grid) {
        step_ignition_cpu(grid, &MaterialTable::baseline(), &mut Vec::new(), false);
    }

    #[test]
    fn test_burning_cell_counts_up() {
        let mut grid = Grid::filled(1, 1, Cell::burning(Material::Wood)).unwrap();
        step(&mut grid);
        assert_eq!(grid.cell(0, 0).burn_elapsed, 1.0);
        assert!(grid.cell(0, 0).is_burning());
    }

    #[test]
    fn test_wood_burns_out_after_duration() {
        let mut grid = Grid::filled(1, 1, Cell::burning(Material::Wood)).unwrap();
        for _ in 0..19 {
            step(&mut grid);
            assert!(grid.cell(0, 0).is_burning());
        }
        step(&mut grid);
        assert!(grid.cell(0, 0).is_burned());
        assert_eq!(grid.cell(0, 0).burn_elapsed, 20.0);
    }

    #[test]
    fn test_leaf_burns_out_in_one_step() {
        let mut grid = Grid::filled(1, 1, Cell::burning(Material::Leaf)).unwrap();
        step(&mut grid);
        assert!(grid.cell(0, 0).is_burned());
    }

    #[test]
    fn test_burned_is_terminal() {
        let burned = Cell {
            state: CombustionState::Burned,
            burn_elapsed: 20.0,
            ..Cell::new(Material::Wood).with_energy(1.0e6)
        };
        let mut grid = Grid::filled(2, 2, burned).unwrap();
        grid.set(0, 0, Cell::burning(Material::Wood));
        step(&mut grid);
        assert_eq!(*grid.cell(1, 1), burned);
    }

    #[test]
    fn test_with_source_threshold_is_inclusive() {
        let mut grid = Grid::filled(2, 1, Cell::new(Material::Wood)).unwrap();
        grid.set(0, 0, Cell::burning(Material::Wood));
        grid.set(1, 0, Cell::new(Material::Wood).with_energy(5000.0));
        step(&mut grid);
        assert!(grid.cell(1, 0).is_burning());
        // Ignition leaves energy and timer untouched.
        assert_eq!(grid.cell(1, 0).energy, 5000.0);
        assert_eq!(grid.cell(1, 0).burn_elapsed, 0.0);
    }

    #[test]
    fn test_below_with_source_threshold_stays_normal() {
        let mut grid = Grid::filled(2, 1, Cell::new(Material::Wood)).unwrap();
        grid.set(0, 0, Cell::burning(Material::Wood));
        grid.set(1, 0, Cell::new(Material::Wood).with_energy(4999.0));
        step(&mut grid);
        assert_eq!(grid.cell(1, 0).state, CombustionState::Normal);
        assert_eq!(grid.cell(1, 0).energy, 4999.0);
    }

    #[test]
    fn test_spontaneous_threshold_without_source() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.set(0, 0, Cell::new(Material::DryLeaf).with_energy(15999.0));
        grid.set(2, 0, Cell::new(Material::DryLeaf).with_energy(16000.0));
        step(&mut grid);
        assert_eq!(grid.cell(0, 0).state, CombustionState::Normal);
        assert!(grid.cell(2, 0).is_burning());
    }

    #[test]
    fn test_with_source_evaluated_when_neighbor_burns() {
        // Spontaneous threshold set below the with-source one: a burning
        // neighbor means only the with-source threshold applies.
        let table = MaterialTable::baseline().with_properties(
            Material::Wood,
            MaterialProperties {
                ignition_threshold_with_source: 9000.0,
                ignition_threshold_spontaneous: 1000.0,
                ..MaterialProperties::WOOD
            },
        );
        let mut grid = Grid::filled(2, 1, Cell::new(Material::Wood).with_energy(5000.0)).unwrap();
        grid.set(0, 0, Cell::burning(Material::Leaf));
        step_ignition_cpu(&mut grid, &table, &mut Vec::new(), false);
        assert_eq!(grid.cell(1, 0).state, CombustionState::Normal);
    }

    #[test]
    fn test_inert_cells_untouched() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(0, 0, Cell::new(Material::Soil).with_energy(1.0e9));
        grid.set(1, 1, Cell::burning(Material::Wood));
        grid.set(2, 2, Cell::burning(Material::Air));
        let before = grid.clone();
        step(&mut grid);
        assert_eq!(grid.cell(0, 0), before.cell(0, 0));
        assert_eq!(grid.cell(2, 2), before.cell(2, 2));
    }

    #[test]
    fn test_neighbor_burning_out_still_ignites() {
        // The leaf burns out this step, but its pre-step state is Burning.
        let mut grid = Grid::filled(2, 1, Cell::new(Material::Wood).with_energy(6000.0)).unwrap();
        grid.set(0, 0, Cell::burning(Material::Leaf));
        step(&mut grid);
        assert!(grid.cell(0, 0).is_burned());
        assert!(grid.cell(1, 0).is_burning());
    }

    #[test]
    fn test_fresh_ignition_does_not_chain() {
        // (1, 0) ignites this step; (2, 0) only sees its pre-step Normal state.
        let mut grid = Grid::filled(3, 1, Cell::new(Material::Wood).with_energy(6000.0)).unwrap();
        grid.set(0, 0, Cell::burning(Material::Wood));
        step(&mut grid);
        assert!(grid.cell(1, 0).is_burning());
        assert_eq!(grid.cell(2, 0).state, CombustionState::Normal);
    }

    #[test]
    fn test_permuted_order_matches() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut grid = Grid::filled(10, 10, Cell::new(Material::Leaf).with_energy(5500.0)).unwrap();
        for idx in (0..grid.len()).step_by(7) {
            grid.cells_mut()[idx] = Cell::burning(Material::Leaf);
        }
        let table = MaterialTable::baseline();

        let mut expected = grid.clone();
        step_ignition_cpu(&mut expected, &table, &mut Vec::new(), false);

        let mut order: Vec<usize> = (0..grid.len()).collect();
        order.shuffle(&mut rng);
        let mut transitions = vec![Transition::Unchanged; grid.len()];
        for idx in order {
            let (x, y) = (idx % grid.width(), idx / grid.width());
            transitions[idx] = decide_transition(&grid, &table, x, y);
        }
        apply_transitions(&mut grid, &transitions);

        assert_eq!(grid, expected);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut seq = Grid::filled(17, 23, Cell::new(Material::Wood).with_energy(5000.0)).unwrap();
        seq.set(8, 11, Cell::burning(Material::Wood));
        seq.set(0, 0, Cell::new(Material::DryLeaf).with_energy(16000.0));
        let mut par = seq.clone();
        let table = MaterialTable::baseline();
        step_ignition_cpu(&mut seq, &table, &mut Vec::new(), false);
        step_ignition_cpu(&mut par, &table, &mut Vec::new(), true);
        assert_eq!(seq, par);
    }
}
