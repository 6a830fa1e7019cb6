//! World state for the Singularity simulation.
//!
//! This crate models the single mutable aggregate of a playthrough: the
//! turn counter, both factions, the fixed region map, the four global
//! progress indices, global market indices, and the world flag set. Every
//! scalar obeys one rule: it is never driven below zero, and mutations that
//! would do so are rejected rather than clamped.
//!
//! # Modules
//!
//! - [`error`] -- Error types for world construction and mutation.
//! - [`faction`] -- [`FactionState`]: resources, meters, faction flags.
//! - [`flags`] -- [`FlagSet`] of opaque world flags.
//! - [`progress`] -- [`ProgressState`]: FCI, ARI, automation, governance.
//! - [`region`] -- [`RegionState`]: stats and facilities.
//! - [`scalar`] -- Floor-checked arithmetic shared by every scalar.
//! - [`world`] -- [`WorldState`], the aggregate root.

pub mod error;
pub mod faction;
pub mod flags;
pub mod progress;
pub mod region;
pub mod scalar;
pub mod world;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use faction::FactionState;
pub use flags::FlagSet;
pub use progress::ProgressState;
pub use region::RegionState;
pub use world::WorldState;
