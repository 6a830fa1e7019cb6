//! Error types for the `singularity-rules` crate.

use singularity_world::WorldError;

/// Why a single effect could not be applied.
///
/// The resolver never aborts a batch on these: the offending effect is
/// skipped, recorded as a warning, and the rest of the list continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EffectError {
    /// The effect names a region or market that does not exist.
    #[error("unknown target: {source}")]
    UnknownTarget {
        /// The underlying world error.
        source: WorldError,
    },

    /// The effect would drive a value below zero, or its amount is not finite.
    #[error("out of range: {source}")]
    OutOfRange {
        /// The underlying world error.
        source: WorldError,
    },
}

impl From<WorldError> for EffectError {
    fn from(source: WorldError) -> Self {
        match source {
            WorldError::RegionNotFound(_)
            | WorldError::MarketNotFound(_)
            | WorldError::MissingFaction(_) => Self::UnknownTarget { source },
            WorldError::WouldGoNegative { .. }
            | WorldError::NonFiniteDelta { .. }
            | WorldError::InsufficientResource { .. }
            | WorldError::DuplicateRegion(_) => Self::OutOfRange { source },
        }
    }
}

impl EffectError {
    /// Whether the failure comes from a dangling content reference.
    pub const fn is_content_error(&self) -> bool {
        matches!(self, Self::UnknownTarget { .. })
    }
}
