//! Dense 2D cell grid
//!
//! Stores cells in row-major order (`y * width + x`). Dimensions are fixed at
//! construction. Neighborhoods are the Moore neighborhood (8 surrounding cells)
//! clipped to the grid bounds, with no wraparound.

use crate::core_types::{Cell, CombustionState, Material, MATERIAL_COUNT};
use thiserror::Error;

/// Offsets of the 8 surrounding positions
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Errors from grid construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height is zero
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: usize, height: usize },
    /// `width * height` cells do not fit in memory
    #[error("grid of {width}x{height} cells is too large")]
    TooLarge { width: usize, height: usize },
    /// Cell buffer length does not match `width * height`
    #[error("expected {expected} cells for the grid, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Cell grid owned by the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Create a grid of default cells (air, unburned, no energy)
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Self::filled(width, height, Cell::default())
    }

    /// Create a grid with every position set to `cell`
    pub fn filled(width: usize, height: usize, cell: Cell) -> Result<Self, GridError> {
        let len = cell_count(width, height)?;
        Ok(Self {
            cells: vec![cell; len],
            width,
            height,
        })
    }

    /// Wrap an existing row-major cell buffer
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        let expected = cell_count(width, height)?;
        if cells.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false, grids have non-zero dimensions
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major index of `(x, y)`
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Whether `(x, y)` lies inside the grid
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Cell at `(x, y)`, or `None` when out of bounds
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Mutable cell at `(x, y)`, or `None` when out of bounds
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Cell at `(x, y)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        &self.cells[self.index(x, y)]
    }

    /// Overwrite the cell at `(x, y)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }

    /// All cells in row-major order
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All cells in row-major order, mutably
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// In-bounds neighbor coordinates of `(x, y)`
    ///
    /// Interior cells have 8 neighbors, edge cells 5 and corner cells 3.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + i64::from(dx);
            let ny = y as i64 + i64::from(dy);
            self.contains(nx, ny).then_some((nx as usize, ny as usize))
        })
    }

    /// In-bounds neighbor cells of `(x, y)`
    pub fn neighbor_cells(&self, x: usize, y: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.neighbors(x, y).map(move |(nx, ny)| self.cell(nx, ny))
    }

    /// Whether any neighbor of `(x, y)` is burning
    pub fn has_burning_neighbor(&self, x: usize, y: usize) -> bool {
        self.neighbor_cells(x, y).any(Cell::is_burning)
    }

    /// Number of cells in each combustion state, indexed by state code
    pub fn count_by_state(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for cell in &self.cells {
            counts[cell.state.index()] += 1;
        }
        counts
    }

    /// Number of cells of each material, indexed by material code
    pub fn count_by_material(&self) -> [usize; MATERIAL_COUNT] {
        let mut counts = [0; MATERIAL_COUNT];
        for cell in &self.cells {
            counts[usize::from(cell.material.code())] += 1;
        }
        counts
    }

    /// Number of cells in `state`
    pub fn count_state(&self, state: CombustionState) -> usize {
        self.count_by_state()[state.index()]
    }

    /// Number of cells of `material`
    pub fn count_material(&self, material: Material) -> usize {
        self.cells.iter().filter(|c| c.material == material).count()
    }

    /// Sum of all cell energies
    pub fn total_energy(&self) -> f64 {
        self.cells.iter().map(|c| f64::from(c.energy)).sum()
    }
}

/// Number of cells in a `width × height` grid
///
/// Fails for zero dimensions and for grids whose cell buffer would exceed the
/// address space.
pub fn cell_count(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::EmptyDimensions { width, height });
    }
    width
        .checked_mul(height)
        .filter(|&n| {
            n.checked_mul(std::mem::size_of::<Cell>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(GridError::TooLarge { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 20).unwrap();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 20);
        assert_eq!(grid.len(), 200);
        assert!(grid.cells().iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            Grid::new(0, 5),
            Err(GridError::EmptyDimensions {
                width: 0,
                height: 5
            })
        );
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert_eq!(
            Grid::new(usize::MAX / 4, 8),
            Err(GridError::TooLarge {
                width: usize::MAX / 4,
                height: 8
            })
        );
        // Cell count fits in usize, the byte size does not.
        assert!(matches!(
            Grid::from_cells(usize::MAX / 32, 8, Vec::new()),
            Err(GridError::TooLarge { .. })
        ));
        assert_eq!(cell_count(150, 100), Ok(15000));
    }

    #[test]
    fn test_from_cells_length_mismatch() {
        let err = Grid::from_cells(3, 3, vec![Cell::default(); 8]).unwrap_err();
        assert_eq!(
            err,
            GridError::LengthMismatch {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn test_grid_get_set_row_major() {
        let mut grid = Grid::new(10, 10).unwrap();
        let wood = Cell::new(Material::Wood).with_energy(123.5);
        grid.set(3, 4, wood);
        assert_eq!(*grid.cell(3, 4), wood);
        assert_eq!(grid.cells()[4 * 10 + 3], wood);
        assert!(grid.get(10, 0).is_none());
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_grid_bounds_check() {
        let grid = Grid::new(10, 10).unwrap();
        let _ = grid.cell(10, 5);
    }

    #[test]
    fn test_neighbor_counts() {
        let grid = Grid::new(5, 4).unwrap();
        assert_eq!(grid.neighbors(0, 0).count(), 3);
        assert_eq!(grid.neighbors(4, 3).count(), 3);
        assert_eq!(grid.neighbors(2, 0).count(), 5);
        assert_eq!(grid.neighbors(0, 2).count(), 5);
        assert_eq!(grid.neighbors(2, 2).count(), 8);
    }

    #[test]
    fn test_corner_neighbors_are_exact() {
        let grid = Grid::new(4, 4).unwrap();
        let mut n: Vec<_> = grid.neighbors(0, 0).collect();
        n.sort_unstable();
        assert_eq!(n, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        let grid = Grid::new(1, 1).unwrap();
        assert_eq!(grid.neighbors(0, 0).count(), 0);
    }

    #[test]
    fn test_burning_neighbor_detection() {
        let mut grid = Grid::filled(3, 3, Cell::new(Material::Wood)).unwrap();
        assert!(!grid.has_burning_neighbor(0, 0));
        grid.set(1, 1, Cell::burning(Material::Wood));
        assert!(grid.has_burning_neighbor(0, 0));
        assert!(!grid.has_burning_neighbor(1, 1));
    }

    #[test]
    fn test_counts_and_energy() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(0, 0, Cell::burning(Material::Wood).with_energy(10.0));
        grid.set(1, 1, Cell::new(Material::Soil).with_energy(2.5));
        assert_eq!(grid.count_by_state(), [3, 1, 0]);
        assert_eq!(grid.count_state(CombustionState::Burning), 1);
        assert_eq!(grid.count_material(Material::Air), 2);
        assert_eq!(grid.count_by_material(), [2, 1, 1, 0, 0]);
        assert_eq!(grid.total_energy(), 12.5);
    }
}
