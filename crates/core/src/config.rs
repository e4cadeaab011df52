//! Run configuration
//!
//! Every process parameter of a run lives in [`SimulationConfig`]. Configs
//! deserialize from JSON with every field optional; missing fields take the
//! defaults below.
//!
//! ```json
//! {
//!   "width": 150,
//!   "height": 100,
//!   "step_count": 100,
//!   "input_path": "cells_state.bin",
//!   "output": { "directory": ".", "prefix": "cells_state_step_", "suffix": ".bin" },
//!   "environment": { "temperature": 298.0, "wind_speed": 0.0 },
//!   "backend": "sequential",
//!   "on_output_error": "continue"
//! }
//! ```

use crate::core_types::Environment;
use crate::io::{snapshot_len, SnapshotNaming};
use crate::solver::StepBackend;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What to do when a checkpoint cannot be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFailurePolicy {
    /// Log the failure, record the missing step and keep simulating
    #[default]
    Continue,
    /// Stop the run and return the error
    Abort,
}

/// Process parameters of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Number of steps to run
    pub step_count: u32,
    /// Initial snapshot
    pub input_path: PathBuf,
    /// Per-step snapshot naming
    pub output: SnapshotNaming,
    /// Ambient conditions
    pub environment: Environment,
    /// Solver backend
    pub backend: StepBackend,
    /// Checkpoint failure handling
    pub on_output_error: OutputFailurePolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 100,
            step_count: 100,
            input_path: PathBuf::from("cells_state.bin"),
            output: SnapshotNaming::default(),
            environment: Environment::default(),
            backend: StepBackend::default(),
            on_output_error: OutputFailurePolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Load a config from a JSON file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or describes an empty grid
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|source| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config as pretty-printed JSON
    ///
    /// # Errors
    /// Returns error if the config cannot be serialized or written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;
        fs::write(path, contents).map_err(|source| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the grid dimensions are usable
    ///
    /// # Errors
    /// Returns error if either dimension is zero or the grid is too large to address
    pub fn validate(&self) -> Result<(), ConfigError> {
        snapshot_len(self.width, self.height).map_err(|_| ConfigError::InvalidDimensions {
            width: self.width,
            height: self.height,
        })?;
        Ok(())
    }
}

/// Errors that can occur with configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read file
    #[error("failed to load config {}: {source}", .path.display())]
    LoadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse file contents
    #[error("failed to parse config {}: {source}", .path.display())]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[source] serde_json::Error),
    /// Failed to write file
    #[error("failed to save config {}: {source}", .path.display())]
    SaveFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Grid dimensions are zero or too large
    #[error("grid dimensions {width}x{height} are zero or too large")]
    InvalidDimensions { width: usize, height: usize },
}
