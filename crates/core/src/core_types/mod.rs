//! Core types: materials, cells and ambient conditions

pub mod cell;
pub mod environment;
pub mod material;

pub use cell::{Cell, CombustionState};
pub use environment::Environment;
pub use material::{Material, MaterialProperties, MaterialTable, MATERIAL_COUNT};
