//! Grid summaries for logging and inspection

use crate::core_types::{CombustionState, Material, MATERIAL_COUNT};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts and totals of a grid at one step boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Steps completed when the summary was taken
    pub step: u32,
    /// Unburned cells (including inert ones)
    pub normal_cells: usize,
    /// Burning cells
    pub burning_cells: usize,
    /// Burned-out cells
    pub burned_cells: usize,
    /// Cells per material, indexed by material code
    pub material_counts: [usize; MATERIAL_COUNT],
    /// Sum of every cell's energy
    pub total_energy: f64,
}

impl SimulationStats {
    /// Summarize `grid` as of `step`
    pub fn from_grid(step: u32, grid: &Grid) -> Self {
        let [normal_cells, burning_cells, burned_cells] = grid.count_by_state();
        Self {
            step,
            normal_cells,
            burning_cells,
            burned_cells,
            material_counts: grid.count_by_material(),
            total_energy: grid.total_energy(),
        }
    }

    /// Number of cells in `state`
    pub fn state_count(&self, state: CombustionState) -> usize {
        match state {
            CombustionState::Normal => self.normal_cells,
            CombustionState::Burning => self.burning_cells,
            CombustionState::Burned => self.burned_cells,
        }
    }

    /// Number of cells of `material`
    pub fn material_count(&self, material: Material) -> usize {
        self.material_counts[usize::from(material.code())]
    }

    /// Whether the fire has gone out (nothing left burning)
    pub fn is_extinguished(&self) -> bool {
        self.burning_cells == 0
    }
}

impl fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {}: {} normal, {} burning, {} burned, energy {:.1}",
            self.step, self.normal_cells, self.burning_cells, self.burned_cells, self.total_energy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Cell;

    #[test]
    fn test_from_grid() {
        let mut grid = Grid::filled(3, 2, Cell::new(Material::Leaf)).unwrap();
        grid.set(0, 0, Cell::burning(Material::Wood).with_energy(100.0));
        grid.set(2, 1, Cell::new(Material::Soil));

        let stats = SimulationStats::from_grid(4, &grid);
        assert_eq!(stats.step, 4);
        assert_eq!(stats.state_count(CombustionState::Normal), 5);
        assert_eq!(stats.state_count(CombustionState::Burning), 1);
        assert_eq!(stats.state_count(CombustionState::Burned), 0);
        assert_eq!(stats.material_count(Material::Leaf), 4);
        assert_eq!(stats.material_count(Material::Soil), 1);
        assert_eq!(stats.total_energy, 100.0);
        assert!(!stats.is_extinguished());
        assert_eq!(
            stats.to_string(),
            "step 4: 5 normal, 1 burning, 0 burned, energy 100.0"
        );
    }
}
