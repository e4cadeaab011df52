//! Grid storage and initial scene construction

pub mod cell_grid;
pub mod scene;

pub use cell_grid::{cell_count, Grid, GridError, NEIGHBOR_OFFSETS};
pub use scene::{SceneBuilder, TreeShape};
