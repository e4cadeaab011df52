//! Simulation loop
//!
//! `FireSimulation` owns the grid and drives it one step at a time:
//! energy diffusion, then ignition, then a checkpoint of the resulting grid.
//! Steps never overlap; checkpoint `n` always holds the grid after both phases
//! of step `n`.

mod stats;

pub use stats::SimulationStats;

use crate::config::{ConfigError, OutputFailurePolicy, SimulationConfig};
use crate::core_types::{Environment, MaterialTable};
use crate::grid::{Grid, GridError};
use crate::io::{load_grid, SnapshotError, SnapshotSink};
use crate::solver::{create_step_solver, StepSolver};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that stop a simulation run
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Loading the initial grid or writing a checkpoint failed
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// The configuration is unusable
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The grid could not be built
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Outcome of [`FireSimulation::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Steps executed by this run
    pub steps_completed: u32,
    /// Steps whose checkpoint was written
    pub checkpoints_written: Vec<u32>,
    /// Steps whose checkpoint could not be written
    pub missing_checkpoints: Vec<u32>,
    /// Summary of the final grid
    pub final_stats: SimulationStats,
}

/// Cellular-automaton fire simulation
pub struct FireSimulation {
    grid: Grid,
    table: MaterialTable,
    environment: Environment,
    solver: Box<dyn StepSolver>,
    config: SimulationConfig,
    /// Steps completed so far
    step: u32,
}

impl FireSimulation {
    /// Create a simulation over an existing grid
    ///
    /// The grid's own dimensions are used; `config.width`/`config.height` only
    /// apply when loading from `config.input_path`.
    pub fn new(grid: Grid, config: SimulationConfig) -> Self {
        info!(
            "Fire simulation initialized: {}x{} grid, {} steps, backend={:?}",
            grid.width(),
            grid.height(),
            config.step_count,
            config.backend
        );
        Self {
            grid,
            table: MaterialTable::baseline(),
            environment: config.environment,
            solver: create_step_solver(config.backend),
            config,
            step: 0,
        }
    }

    /// Load the initial grid named by the config and create a simulation
    ///
    /// A missing or malformed input is fatal; no step runs on a blank grid.
    ///
    /// # Errors
    /// Returns error if the config is invalid or the input snapshot cannot be loaded
    pub fn from_config(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let grid = load_grid(&config.input_path, config.width, config.height)?;
        Ok(Self::new(grid, config))
    }

    /// Replace the material constants
    pub fn with_material_table(mut self, table: MaterialTable) -> Self {
        self.table = table;
        self
    }

    /// Advance one step: energy diffusion, then ignition
    pub fn step(&mut self) {
        self.solver.step_energy_diffusion(&mut self.grid, &self.table);
        self.solver.step_ignition(&mut self.grid, &self.table);
        self.step += 1;
    }

    /// Run `config.step_count` steps, checkpointing after each one
    ///
    /// Checkpoints are numbered by the absolute step count, starting at 1 for a
    /// fresh simulation.
    ///
    /// # Errors
    /// Returns the checkpoint error when the policy is `Abort`. The grid keeps
    /// the state of the step that failed to save.
    pub fn run(&mut self, sink: &mut dyn SnapshotSink) -> Result<RunReport, SimulationError> {
        let mut written = Vec::new();
        let mut missing = Vec::new();

        for _ in 0..self.config.step_count {
            self.step();
            let step = self.step;

            match sink.save_step(step, &self.grid) {
                Ok(()) => written.push(step),
                Err(e) => match self.config.on_output_error {
                    OutputFailurePolicy::Continue => {
                        warn!("Checkpoint for step {} not saved: {}", step, e);
                        missing.push(step);
                    }
                    OutputFailurePolicy::Abort => return Err(e.into()),
                },
            }

            debug!("{}", self.stats());
            info!("Step {} completed.", step);
        }

        Ok(RunReport {
            steps_completed: self.config.step_count,
            checkpoints_written: written,
            missing_checkpoints: missing,
            final_stats: self.stats(),
        })
    }

    /// Current grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Consume the simulation and take the grid
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Material constants in use
    pub fn material_table(&self) -> &MaterialTable {
        &self.table
    }

    /// Ambient conditions of this run
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Run configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Steps completed so far
    pub fn current_step(&self) -> u32 {
        self.step
    }

    /// Summary of the current grid
    pub fn stats(&self) -> SimulationStats {
        SimulationStats::from_grid(self.step, &self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Cell, CombustionState, Material};
    use crate::io::{MemorySnapshotSink, NullSnapshotSink};

    fn config(steps: u32) -> SimulationConfig {
        SimulationConfig {
            step_count: steps,
            ..SimulationConfig::default()
        }
    }

    fn three_by_three() -> Grid {
        let mut grid = Grid::filled(3, 3, Cell::new(Material::Wood)).unwrap();
        grid.set(1, 1, Cell::burning(Material::Wood));
        grid
    }

    /// Fails every save from a given step on
    struct FailingSink {
        from: u32,
    }

    impl SnapshotSink for FailingSink {
        fn save_step(&mut self, step: u32, _grid: &Grid) -> Result<(), SnapshotError> {
            if step >= self.from {
                Err(SnapshotError::UnwritableOutput {
                    path: format!("step_{step}.bin").into(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                })
            } else {
                Ok(())
            }
        }
    }

    /// Writes every checkpoint to a device that is always full
    #[cfg(target_os = "linux")]
    struct FullDeviceSink;

    #[cfg(target_os = "linux")]
    impl SnapshotSink for FullDeviceSink {
        fn save_step(&mut self, _step: u32, grid: &Grid) -> Result<(), SnapshotError> {
            crate::io::save_grid("/dev/full", grid)
        }
    }

    #[test]
    fn test_step_counts_up() {
        let mut sim = FireSimulation::new(three_by_three(), config(0));
        sim.step();
        sim.step();
        assert_eq!(sim.current_step(), 2);
        assert_eq!(sim.grid().cell(0, 0).energy, 4000.0);
    }

    #[test]
    fn test_checkpoint_holds_post_ignition_grid() {
        let mut sim = FireSimulation::new(three_by_three(), config(3));
        let mut sink = MemorySnapshotSink::new();
        let report = sim.run(&mut sink).unwrap();

        assert_eq!(report.steps_completed, 3);
        assert_eq!(report.checkpoints_written, vec![1, 2, 3]);
        assert!(report.missing_checkpoints.is_empty());

        let step1 = sink.get(1).unwrap();
        assert_eq!(step1.cell(0, 0).energy, 2000.0);
        assert_eq!(step1.cell(1, 1).burn_elapsed, 1.0);

        // Step 3's checkpoint already shows the ring ignited in step 3.
        let step3 = sink.get(3).unwrap();
        assert_eq!(step3.cell(0, 0).state, CombustionState::Burning);
        assert_eq!(step3, sim.grid());
    }

    #[test]
    fn test_continue_policy_records_missing_steps() {
        let mut sim = FireSimulation::new(three_by_three(), config(4));
        let report = sim.run(&mut FailingSink { from: 3 }).unwrap();
        assert_eq!(report.checkpoints_written, vec![1, 2]);
        assert_eq!(report.missing_checkpoints, vec![3, 4]);
        assert_eq!(sim.current_step(), 4);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failed_writes_are_recorded_as_missing() {
        assert!(matches!(
            FullDeviceSink.save_step(1, &three_by_three()),
            Err(SnapshotError::ShortWrite { .. })
        ));

        let mut sim = FireSimulation::new(three_by_three(), config(3));
        let report = sim.run(&mut FullDeviceSink).unwrap();
        assert!(report.checkpoints_written.is_empty());
        assert_eq!(report.missing_checkpoints, vec![1, 2, 3]);

        let mut reference = FireSimulation::new(three_by_three(), config(3));
        reference.run(&mut NullSnapshotSink).unwrap();
        assert_eq!(sim.grid(), reference.grid());
    }

    #[test]
    fn test_abort_policy_stops_run() {
        let cfg = SimulationConfig {
            on_output_error: OutputFailurePolicy::Abort,
            ..config(5)
        };
        let mut sim = FireSimulation::new(three_by_three(), cfg);
        let err = sim.run(&mut FailingSink { from: 2 }).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Snapshot(SnapshotError::UnwritableOutput { .. })
        ));
        assert_eq!(sim.current_step(), 2);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let cfg = SimulationConfig {
            input_path: "/nonexistent/cells_state.bin".into(),
            ..config(1)
        };
        assert!(matches!(
            FireSimulation::from_config(cfg),
            Err(SimulationError::Snapshot(
                SnapshotError::MissingOrUnreadableInput { .. }
            ))
        ));
    }

    #[test]
    fn test_environment_does_not_affect_spread() {
        let calm = FireSimulation::new(three_by_three(), config(6));
        let windy_cfg = SimulationConfig {
            environment: Environment::new(320.0, 15.0),
            ..config(6)
        };
        let windy = FireSimulation::new(three_by_three(), windy_cfg);

        let mut results = Vec::new();
        for mut sim in [calm, windy] {
            sim.run(&mut NullSnapshotSink).unwrap();
            results.push(sim.into_grid());
        }
        assert_eq!(results[0], results[1]);
    }
}
