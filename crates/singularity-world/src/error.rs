//! Error types for the `singularity-world` crate.
//!
//! All fallible mutations of world state return [`WorldError`]. A failed
//! mutation never leaves the target partially changed.

use singularity_types::{FactionId, MarketId, RegionId, ResourceType};

/// Errors that can occur while constructing or mutating world state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// The mutation would drive a value below zero.
    #[error("{target} would go negative: current {current}, delta {delta}")]
    WouldGoNegative {
        /// Human-readable name of the mutated value.
        target: String,
        /// Value before the mutation.
        current: f64,
        /// The rejected delta.
        delta: f64,
    },

    /// The delta is NaN or infinite.
    #[error("non-finite delta {delta} for {target}")]
    NonFiniteDelta {
        /// Human-readable name of the mutated value.
        target: String,
        /// The rejected delta.
        delta: f64,
    },

    /// A faction cannot pay a cost.
    #[error("{faction} needs {required} {resource:?} but holds {available}")]
    InsufficientResource {
        /// The paying faction.
        faction: FactionId,
        /// The first resource found short.
        resource: ResourceType,
        /// Amount demanded.
        required: f64,
        /// Amount held.
        available: f64,
    },

    /// No region with this key exists.
    #[error("region not found: {0}")]
    RegionNotFound(RegionId),

    /// No global market with this key exists.
    #[error("market not found: {0}")]
    MarketNotFound(MarketId),

    /// The catalog has no setup for a faction.
    #[error("no faction setup for {0}")]
    MissingFaction(FactionId),

    /// Two region definitions share a key.
    #[error("duplicate region id: {0}")]
    DuplicateRegion(RegionId),
}
