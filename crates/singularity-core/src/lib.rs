//! Orchestration for the Singularity simulation.
//!
//! This crate drives a playthrough on top of the world and rules crates:
//!
//! - [`config`] -- Typed YAML engine configuration
//! - [`catalog`] -- Content catalog loading and validation
//! - [`policy`] -- Automated faction and event-option policies
//! - [`events`] -- Eligible-event filtering and weighted selection
//! - [`victory`] -- Victory and containment rules
//! - [`simulation`] -- The turn state machine
//! - [`runner`] -- Spectator-mode turn iterator
//! - [`news`] -- Rolling log of recent turns
//! - [`save`] -- Save blobs and replay

pub mod catalog;
pub mod config;
pub mod events;
pub mod news;
pub mod policy;
pub mod runner;
pub mod save;
pub mod simulation;
pub mod victory;

pub use catalog::{CatalogError, load_catalog, parse_catalog, validate_catalog};
pub use config::{ConfigError, EngineConfig};
pub use news::NewsLog;
pub use policy::{
    FactionPolicy, FirstOptionPolicy, OptionPolicy, PassPolicy, ProgressPolicy, RandomPolicy,
    SimRng, UniformOptionPolicy,
};
pub use runner::{SimulationResult, Turns, log_simulation_end, run_to_completion};
pub use save::{SAVE_VERSION, SaveGame};
pub use simulation::{Simulation, SimulationError};
pub use victory::{ContainmentRule, UnreachableThreshold, Verdict, VictoryRules};
