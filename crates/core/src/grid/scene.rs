//! Initial scene painting
//!
//! Builds starting grids out of simple landscape features: a soil slope rising
//! from the left edge, a layer of dry leaf litter resting on it, and trees made
//! of a tapered trunk, a few horizontal branches and a triangular leaf crown.
//!
//! ```text
//!            ^        crown (Leaf)
//!           /|\       branches (Wood) every 3 rows
//!          / | \
//!            |        trunk (Wood), narrowing upwards
//!   ~~~~~~~~~~~~~~~~  litter (DryLeaf)
//!   ////////////////  slope (Soil)
//! ```
//!
//! Features are painted in call order; later features overwrite earlier ones.
//! Anything that falls outside the grid is clipped.

use super::cell_grid::{Grid, GridError};
use crate::core_types::{Cell, Material};
use std::f64::consts::PI;
use tracing::debug;

/// Tree shape parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeShape {
    /// Base of the trunk `(x, y)`
    pub base: (i64, i64),
    /// Trunk height in cells
    pub height: i64,
    /// Half-width of the trunk at its base, in cells
    pub thickness: f64,
    /// Height above the base where the crown starts
    pub trunk_height: i64,
    /// Half-angle of the crown and branch taper (radians)
    pub sharpness: f64,
    /// Crown height relative to the trunk height
    pub ratio: f64,
}

impl TreeShape {
    /// Tree with the default crown taper (15°) and crown ratio (1.2)
    pub fn new(base: (i64, i64), height: i64, thickness: f64, trunk_height: i64) -> Self {
        Self {
            base,
            height,
            thickness,
            trunk_height,
            sharpness: PI / 12.0,
            ratio: 1.2,
        }
    }
}

/// Paints features onto a grid
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    grid: Grid,
}

impl SceneBuilder {
    /// Start from an all-air grid
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Ok(Self {
            grid: Grid::new(width, height)?,
        })
    }

    /// Start from an existing grid
    pub fn from_grid(grid: Grid) -> Self {
        Self { grid }
    }

    /// Slope, tree and litter on a 30° hillside
    pub fn hillside(width: usize, height: usize) -> Result<Self, GridError> {
        let mut scene = Self::new(width, height)?;
        scene
            .slope(30.0)
            .tree(TreeShape::new((40, 25), 50, 2.0, 10))
            .fallen_leaves(30.0, 3);
        Ok(scene)
    }

    /// Fill every column with soil up to the line `y = tan(deg) * x`
    pub fn slope(&mut self, degrees: f64) -> &mut Self {
        let gradient = (degrees * PI / 180.0).tan();
        for x in 0..self.grid.width() as i64 {
            let surface = surface_height(gradient, x);
            for y in 0..surface {
                self.paint(x, y, Material::Soil);
            }
        }
        debug!("Painted {:.1}° slope", degrees);
        self
    }

    /// Lay `thickness` rows of dry leaves on top of a slope of the same angle
    pub fn fallen_leaves(&mut self, degrees: f64, thickness: i64) -> &mut Self {
        let gradient = (degrees * PI / 180.0).tan();
        for x in 0..self.grid.width() as i64 {
            let surface = surface_height(gradient, x);
            for y in surface..surface + thickness {
                self.paint(x, y, Material::DryLeaf);
            }
        }
        debug!("Painted {} rows of leaf litter", thickness);
        self
    }

    /// Paint a tree: crown first, then trunk, then branches
    pub fn tree(&mut self, shape: TreeShape) -> &mut Self {
        let (x_base, y_base) = shape.base;
        let taper = shape.sharpness.tan();
        let crown_top = (shape.height as f64 * shape.ratio) as i64;

        for y in shape.trunk_height..crown_top {
            let half = (taper * (crown_top - y) as f64) as i64;
            self.paint_row(x_base - half, x_base + half, y_base + y, Material::Leaf);
        }

        // The taper is measured against the absolute row, so the trunk narrows
        // to a single column near its top.
        for y in y_base..=y_base + shape.height {
            let half =
                (shape.thickness / shape.height as f64 * (shape.height - y) as f64).floor() as i64 + 1;
            self.paint_row(x_base - half, x_base + half, y, Material::Wood);
        }

        for y in (shape.trunk_height + 2..shape.height).step_by(3) {
            let half = (taper * (shape.height - y) as f64) as i64;
            self.paint_row(x_base - half, x_base + half, y_base + y, Material::Wood);
        }

        debug!("Painted tree at ({}, {})", x_base, y_base);
        self
    }

    /// Set the material at `(x, y)` and reset the cell; out-of-bounds is ignored
    pub fn paint(&mut self, x: i64, y: i64, material: Material) -> &mut Self {
        if self.grid.contains(x, y) {
            self.grid.set(x as usize, y as usize, Cell::new(material));
        }
        self
    }

    /// Set the cell at `(x, y)` burning; inert and out-of-bounds cells are ignored
    pub fn ignite(&mut self, x: i64, y: i64) -> &mut Self {
        if self.grid.contains(x, y) {
            if let Some(cell) = self.grid.get_mut(x as usize, y as usize) {
                if !cell.material.is_inert() {
                    *cell = Cell::burning(cell.material).with_energy(cell.energy);
                }
            }
        }
        self
    }

    /// Add `energy` to the cell at `(x, y)`; out-of-bounds is ignored
    pub fn inject_energy(&mut self, x: i64, y: i64, energy: f32) -> &mut Self {
        if self.grid.contains(x, y) {
            if let Some(cell) = self.grid.get_mut(x as usize, y as usize) {
                cell.energy += energy.max(0.0);
            }
        }
        self
    }

    /// Borrow the painted grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Finish and take the painted grid
    pub fn build(self) -> Grid {
        self.grid
    }

    fn paint_row(&mut self, x_from: i64, x_to: i64, y: i64, material: Material) {
        for x in x_from..=x_to {
            self.paint(x, y, material);
        }
    }
}

#[inline]
fn surface_height(gradient: f64, x: i64) -> i64 {
    (gradient * x as f64) as i64
}
