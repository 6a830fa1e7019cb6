//! Shared type definitions for the Singularity simulation.
//!
//! This crate is the single source of truth for the types exchanged between
//! the engine and its collaborators: the authored content catalog, the turn
//! records the orchestrator emits, and the read-only snapshots a presentation
//! layer renders. Types flow to `TypeScript` via `ts-rs` for front-end clients.
//!
//! # Modules
//!
//! - [`ids`] -- String-keyed identifiers for authored content
//! - [`enums`] -- Factions, resources, meters, metrics, phases, outcomes
//! - [`content`] -- Actions, events, effects, regions, and the catalog
//! - [`summary`] -- Immutable per-turn records
//! - [`snapshot`] -- Read-only views of world state

pub mod content;
pub mod enums;
pub mod ids;
pub mod snapshot;
pub mod summary;

// Re-export all public types at crate root for convenience.
pub use content::{
    ActionDefinition, ContentCatalog, Effect, EventDefinition, EventOption, FacilityState,
    FactionSetup, ProgressLimits, RegionDefinition, ScenarioParameters,
};
pub use enums::{
    FacilityType, FactionId, Meter, Outcome, Phase, ProgressMetric, RegionStat, RejectionReason,
    ResourceType,
};
pub use ids::{ActionId, EventId, FlagId, MarketId, RegionId};
pub use snapshot::{FactionSnapshot, ProgressSnapshot, RegionSnapshot, WorldSnapshot};
pub use summary::{ActionRecord, EffectWarning, EventRecord, TurnSummary};
