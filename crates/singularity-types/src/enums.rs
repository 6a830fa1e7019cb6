//! Enumeration types for the Singularity simulation.
//!
//! Factions, resources, meters, progress metrics, region statistics,
//! facility kinds, turn phases, outcomes, and gate rejection reasons.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::FlagId;

// ---------------------------------------------------------------------------
// Factions
// ---------------------------------------------------------------------------

/// One of the two playable sides.
///
/// The declaration order is the fixed resolution order within a turn:
/// the Seed AI always resolves its action before the Alignment Coalition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FactionId {
    /// The emergent Seed AI.
    SeedAi,
    /// The human Alignment Coalition.
    AlignmentCoalition,
}

impl FactionId {
    /// Both factions, in turn resolution order.
    pub const ALL: [Self; 2] = [Self::SeedAi, Self::AlignmentCoalition];

    /// The other faction.
    pub const fn opponent(self) -> Self {
        match self {
            Self::SeedAi => Self::AlignmentCoalition,
            Self::AlignmentCoalition => Self::SeedAi,
        }
    }

    /// Whether `resource` belongs to this faction's vocabulary.
    ///
    /// The Seed AI never holds Coordination or Trust; the Coalition never
    /// holds Stealth or `ComputeAccess`. Everything else is shared.
    pub const fn uses_resource(self, resource: ResourceType) -> bool {
        match self {
            Self::SeedAi => !matches!(resource, ResourceType::Coordination | ResourceType::Trust),
            Self::AlignmentCoalition => {
                !matches!(resource, ResourceType::Stealth | ResourceType::ComputeAccess)
            }
        }
    }

    /// Human-readable faction name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::SeedAi => "Seed AI",
            Self::AlignmentCoalition => "Alignment Coalition",
        }
    }
}

impl core::fmt::Display for FactionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Resources and meters
// ---------------------------------------------------------------------------

/// A spendable faction resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ResourceType {
    /// Money available for operations.
    Budget,
    /// Political and social pull.
    Influence,
    /// Ability to act undetected (Seed AI only).
    Stealth,
    /// Access to training and inference hardware (Seed AI only).
    ComputeAccess,
    /// Electrical power.
    Energy,
    /// Physical, military, or industrial leverage shared by both sides.
    HardPower,
    /// Institutional coordination capacity (Coalition only).
    Coordination,
    /// Public trust in the Coalition (Coalition only).
    Trust,
}

impl ResourceType {
    /// Every resource type in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Budget,
        Self::Influence,
        Self::Stealth,
        Self::ComputeAccess,
        Self::Energy,
        Self::HardPower,
        Self::Coordination,
        Self::Trust,
    ];
}

/// A bounded faction meter.
///
/// Suspicion and Autonomy are meaningful only for the Seed AI; Legitimacy
/// only for the Coalition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Meter {
    /// How much attention the Seed AI has drawn.
    Suspicion,
    /// How free the Seed AI is from human oversight.
    Autonomy,
    /// Public mandate of the Coalition.
    Legitimacy,
}

impl Meter {
    /// Every meter in declaration order.
    pub const ALL: [Self; 3] = [Self::Suspicion, Self::Autonomy, Self::Legitimacy];
}

// ---------------------------------------------------------------------------
// Global progress
// ---------------------------------------------------------------------------

/// One of the four global progress indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ProgressMetric {
    /// Frontier Capability Index (FCI).
    FrontierCapabilityIndex,
    /// Alignment Readiness Index (ARI).
    AlignmentReadinessIndex,
    /// Share of the economy run by automated systems.
    AutomationLevel,
    /// Degree of institutional control over AI development.
    GovernanceControl,
}

impl ProgressMetric {
    /// Every metric in declaration order.
    pub const ALL: [Self; 4] = [
        Self::FrontierCapabilityIndex,
        Self::AlignmentReadinessIndex,
        Self::AutomationLevel,
        Self::GovernanceControl,
    ];

    /// Short label used in logs and summaries.
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::FrontierCapabilityIndex => "FCI",
            Self::AlignmentReadinessIndex => "ARI",
            Self::AutomationLevel => "Automation",
            Self::GovernanceControl => "Governance",
        }
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// A continuous statistic tracked per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RegionStat {
    /// Available generation capacity.
    Energy,
    /// Installed compute.
    Compute,
    /// Physical and cyber security posture.
    Security,
    /// Public appetite for regulating AI.
    SentimentRegulation,
    /// Strength of local institutions.
    Governance,
    /// Capability research output.
    #[serde(rename = "capability_rnd")]
    CapabilityRnD,
    /// Safety research output.
    #[serde(rename = "safety_rnd")]
    SafetyRnD,
}

impl RegionStat {
    /// Every region stat in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Energy,
        Self::Compute,
        Self::Security,
        Self::SentimentRegulation,
        Self::Governance,
        Self::CapabilityRnD,
        Self::SafetyRnD,
    ];
}

/// Kind of facility a region can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FacilityType {
    /// Large-scale compute cluster.
    DataCenter,
    /// Power generation plant.
    PowerPlant,
    /// Semiconductor fabrication plant.
    ChipFab,
    /// Research laboratory.
    ResearchLab,
    /// Security or monitoring installation.
    SecurityHub,
}

// ---------------------------------------------------------------------------
// Turn lifecycle
// ---------------------------------------------------------------------------

/// Phase of the turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Phase {
    /// No turn has been started yet.
    NotStarted,
    /// Waiting for faction actions.
    AwaitingActions,
    /// An event fired and waits for the player's option choice.
    AwaitingEventChoice,
    /// The last turn resolved; the next one may begin.
    Resolved,
    /// The game has ended; no further turns can be resolved.
    GameOver,
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::NotStarted => "not started",
            Self::AwaitingActions => "awaiting actions",
            Self::AwaitingEventChoice => "awaiting event choice",
            Self::Resolved => "resolved",
            Self::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// How the game stands after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Outcome {
    /// No winner (either play continues or the turn limit produced a stalemate).
    None,
    /// The Seed AI won.
    AiVictory,
    /// The Alignment Coalition won.
    HumanVictory,
}

impl Outcome {
    /// Whether this outcome names a winner.
    pub const fn is_decisive(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Why the eligibility gate refused an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "reason", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// The submitted action id is not in the catalog.
    UnknownAction,
    /// The action belongs to the other faction.
    WrongFaction,
    /// The faction cannot pay the action's cost.
    InsufficientResources {
        /// The first resource found short.
        resource: ResourceType,
    },
    /// A required world flag is absent.
    MissingRequiredFlag {
        /// The missing flag.
        flag: FlagId,
    },
    /// A forbidden world flag is present.
    ForbiddenFlagPresent {
        /// The blocking flag.
        flag: FlagId,
    },
    /// The action's one-shot flag has already been granted.
    AlreadyGranted {
        /// The granted flag.
        flag: FlagId,
    },
}

impl core::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownAction => f.write_str("unknown action"),
            Self::WrongFaction => f.write_str("action belongs to the other faction"),
            Self::InsufficientResources { resource } => {
                write!(f, "insufficient {resource:?}")
            }
            Self::MissingRequiredFlag { flag } => write!(f, "requires flag {flag}"),
            Self::ForbiddenFlagPresent { flag } => write!(f, "blocked by flag {flag}"),
            Self::AlreadyGranted { flag } => write!(f, "flag {flag} already granted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ai_resolves_first() {
        assert_eq!(FactionId::ALL.first(), Some(&FactionId::SeedAi));
        assert!(FactionId::SeedAi < FactionId::AlignmentCoalition);
    }

    #[test]
    fn resource_vocabularies() {
        assert!(!FactionId::SeedAi.uses_resource(ResourceType::Trust));
        assert!(!FactionId::SeedAi.uses_resource(ResourceType::Coordination));
        assert!(FactionId::SeedAi.uses_resource(ResourceType::Stealth));
        assert!(!FactionId::AlignmentCoalition.uses_resource(ResourceType::Stealth));
        assert!(!FactionId::AlignmentCoalition.uses_resource(ResourceType::ComputeAccess));
        assert!(FactionId::AlignmentCoalition.uses_resource(ResourceType::HardPower));
    }

    #[test]
    fn opponent_is_symmetric() {
        for faction in FactionId::ALL {
            assert_eq!(faction.opponent().opponent(), faction);
        }
    }

    #[test]
    fn snake_case_wire_names() {
        let json = serde_json::to_string(&ResourceType::ComputeAccess).ok();
        assert_eq!(json.as_deref(), Some("\"compute_access\""));
        let json = serde_json::to_string(&FactionId::AlignmentCoalition).ok();
        assert_eq!(json.as_deref(), Some("\"alignment_coalition\""));
    }

    #[test]
    fn only_none_is_indecisive() {
        assert!(!Outcome::None.is_decisive());
        assert!(Outcome::AiVictory.is_decisive());
        assert!(Outcome::HumanVictory.is_decisive());
    }
}
