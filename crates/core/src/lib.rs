//! Cellular-automaton wildfire spread
//!
//! A 2D grid of cells, each made of one material (air, soil, wood, leaf or dry
//! leaf), evolves in discrete steps. Every step has two phases:
//!
//! 1. **Energy diffusion**: each cell gains the energy emitted by its eight
//!    neighbors, looked up by the neighbor's material and combustion state.
//! 2. **Ignition**: unburned cells whose energy reaches the material threshold
//!    ignite; burning cells count their burn time and burn out.
//!
//! Both phases read only the pre-phase grid, so the result does not depend on
//! cell visiting order and the parallel backend matches the sequential one
//! exactly. The grid after each step is checkpointed to a binary snapshot.
//!
//! ```no_run
//! use fire_ca_core::{FileSnapshotSink, FireSimulation, SimulationConfig};
//!
//! let config = SimulationConfig::default();
//! let mut sink = FileSnapshotSink::new(config.output.clone());
//! let mut sim = FireSimulation::from_config(config)?;
//! let report = sim.run(&mut sink)?;
//! println!("{}", report.final_stats);
//! # Ok::<(), fire_ca_core::SimulationError>(())
//! ```

pub mod config;
pub mod core_types;
pub mod grid;
pub mod io;
pub mod simulation;
pub mod solver;

pub use config::{ConfigError, OutputFailurePolicy, SimulationConfig};
pub use core_types::{
    Cell, CombustionState, Environment, Material, MaterialProperties, MaterialTable,
};
pub use grid::{Grid, GridError, SceneBuilder, TreeShape};
pub use io::{
    load_grid, save_grid, FileSnapshotSink, MemorySnapshotSink, NullSnapshotSink, SnapshotError,
    SnapshotNaming, SnapshotSink,
};
pub use simulation::{FireSimulation, RunReport, SimulationError, SimulationStats};
pub use solver::{create_step_solver, StepBackend, StepSolver};
