//! Error types for the spectator binary.
//!
//! [`EngineError`] wraps every failure mode between reading the config
//! and writing the save file, so `main` can propagate with `?`.

use singularity_core::{CatalogError, ConfigError, SimulationError};

/// Top-level error for the spectator binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Scenario content failed to load or validate.
    #[error("content error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },

    /// The simulation could not be created or saved.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: SimulationError,
    },

    /// Writing the save file failed.
    #[error("failed to write save file {path}: {source}")]
    SaveWrite {
        /// Destination path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
