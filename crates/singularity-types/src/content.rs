//! Authored content definitions.
//!
//! A [`ContentCatalog`] is the immutable bundle of everything a scenario
//! author writes: faction setups, regions, actions, events, and scenario
//! parameters. It is loaded once before a simulation is constructed and is
//! never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{FacilityType, FactionId, Meter, ProgressMetric, RegionStat, ResourceType};
use crate::ids::{ActionId, EventId, FlagId, MarketId, RegionId};

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// An atomic, typed state delta.
///
/// Effects are pure deltas: the sign of `amount` decides whether the target
/// increases or decreases. The set of variants is closed so every consumer
/// matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Effect {
    /// Add to (or subtract from) one faction resource.
    AddResource {
        /// Faction whose resource changes.
        faction: FactionId,
        /// The resource.
        resource: ResourceType,
        /// Signed delta.
        amount: f64,
    },
    /// Move one of the four global progress indices.
    AdjustProgress {
        /// The metric.
        metric: ProgressMetric,
        /// Signed delta.
        amount: f64,
    },
    /// Move one faction meter.
    AdjustMeter {
        /// Faction whose meter changes.
        faction: FactionId,
        /// The meter.
        meter: Meter,
        /// Signed delta.
        amount: f64,
    },
    /// Change a statistic of a single region.
    ModifyRegionStat {
        /// Target region key.
        region: RegionId,
        /// The statistic.
        stat: RegionStat,
        /// Signed delta.
        amount: f64,
    },
    /// Shift a global market index.
    ChangeGlobalMarket {
        /// Target market key.
        market: MarketId,
        /// Signed delta.
        amount: f64,
    },
    /// Raise a world flag. Idempotent.
    SetFlag {
        /// The flag to set.
        flag: FlagId,
    },
}

impl core::fmt::Display for Effect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AddResource {
                faction,
                resource,
                amount,
            } => write!(f, "{faction} {resource:?} {amount:+}"),
            Self::AdjustProgress { metric, amount } => {
                write!(f, "{} {amount:+}", metric.short_name())
            }
            Self::AdjustMeter {
                faction,
                meter,
                amount,
            } => write!(f, "{faction} {meter:?} {amount:+}"),
            Self::ModifyRegionStat {
                region,
                stat,
                amount,
            } => write!(f, "{region} {stat:?} {amount:+}"),
            Self::ChangeGlobalMarket { market, amount } => write!(f, "market {market} {amount:+}"),
            Self::SetFlag { flag } => write!(f, "set flag {flag}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A named, costed, flag-gated bundle of effects scoped to one faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionDefinition {
    /// Stable key.
    pub id: ActionId,
    /// Display name.
    pub name: String,
    /// Flavour text for the presentation layer.
    #[serde(default)]
    pub description: String,
    /// The only faction allowed to take this action.
    pub faction: FactionId,
    /// Resources consumed when the action is applied.
    #[serde(default)]
    pub cost: BTreeMap<ResourceType, f64>,
    /// Flags that must all be present.
    #[serde(default)]
    pub required_flags: Vec<FlagId>,
    /// Flags that must all be absent.
    #[serde(default)]
    pub forbidden_flags: Vec<FlagId>,
    /// One-shot flag raised when the action is applied; the action is
    /// unavailable once the flag exists.
    #[serde(default)]
    pub grants_flag: Option<FlagId>,
    /// Effects applied in order after the cost is paid.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// One mutually exclusive choice inside an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventOption {
    /// Short label shown on the choice button.
    pub label: String,
    /// Longer explanation.
    #[serde(default)]
    pub description: String,
    /// Effects applied when this option is chosen.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

/// A weighted, turn-windowed, flag-gated random event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventDefinition {
    /// Stable key.
    pub id: EventId,
    /// Headline.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub description: String,
    /// Relative selection weight among eligible events.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// First turn (inclusive) on which the event may fire.
    #[serde(default = "default_min_turn")]
    pub min_turn: u32,
    /// Last turn (inclusive) on which the event may fire; open-ended if absent.
    #[serde(default)]
    pub max_turn: Option<u32>,
    /// Flag that must be present.
    #[serde(default)]
    pub required_flag: Option<FlagId>,
    /// Flag that must be absent. One-shot events name the flag their
    /// options set here.
    #[serde(default)]
    pub forbidden_flag: Option<FlagId>,
    /// Mutually exclusive choices.
    pub options: Vec<EventOption>,
}

impl EventDefinition {
    /// Whether `turn` lies inside `[min_turn, max_turn]`.
    pub fn contains_turn(&self, turn: u32) -> bool {
        turn >= self.min_turn && self.max_turn.is_none_or(|max| turn <= max)
    }
}

const fn default_weight() -> f64 {
    1.0
}

const fn default_min_turn() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// Regions and factions
// ---------------------------------------------------------------------------

/// A facility in a region: authored at scenario start, then carried in world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FacilityState {
    /// Facility kind.
    pub facility_type: FacilityType,
    /// Built level.
    #[serde(default)]
    pub level: u32,
    /// Progress towards the next level, in `[0, 1]`.
    #[serde(default)]
    pub build_progress: f64,
    /// Upkeep cost per turn, informational for the presentation layer.
    #[serde(default)]
    pub upkeep: f64,
}

/// Starting definition of one world region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegionDefinition {
    /// Stable key.
    pub id: RegionId,
    /// Display name.
    pub name: String,
    /// Starting statistics; unlisted stats start at zero.
    #[serde(default)]
    pub stats: BTreeMap<RegionStat, f64>,
    /// Facilities present at scenario start.
    #[serde(default)]
    pub facilities: Vec<FacilityState>,
}

/// Starting setup of one faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FactionSetup {
    /// Which faction this setup describes.
    pub faction: FactionId,
    /// Display name.
    pub name: String,
    /// Starting resources; unlisted resources start at zero.
    #[serde(default)]
    pub resources: BTreeMap<ResourceType, f64>,
    /// Starting meters; unlisted meters start at zero.
    #[serde(default)]
    pub meters: BTreeMap<Meter, f64>,
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// Authored upper bounds for progress indices and faction meters.
///
/// Values are clamped to these maxima but never clamped below zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProgressLimits {
    /// Maximum FCI.
    #[serde(default = "default_index_max")]
    pub frontier_capability_max: f64,
    /// Maximum ARI.
    #[serde(default = "default_index_max")]
    pub alignment_readiness_max: f64,
    /// Maximum automation level.
    #[serde(default = "default_scalar_max")]
    pub automation_max: f64,
    /// Maximum governance control.
    #[serde(default = "default_scalar_max")]
    pub governance_max: f64,
    /// Maximum for every faction meter.
    #[serde(default = "default_scalar_max")]
    pub meter_max: f64,
}

impl ProgressLimits {
    /// Upper bound for a progress metric.
    pub const fn cap(&self, metric: ProgressMetric) -> f64 {
        match metric {
            ProgressMetric::FrontierCapabilityIndex => self.frontier_capability_max,
            ProgressMetric::AlignmentReadinessIndex => self.alignment_readiness_max,
            ProgressMetric::AutomationLevel => self.automation_max,
            ProgressMetric::GovernanceControl => self.governance_max,
        }
    }
}

impl Default for ProgressLimits {
    fn default() -> Self {
        Self {
            frontier_capability_max: default_index_max(),
            alignment_readiness_max: default_index_max(),
            automation_max: default_scalar_max(),
            governance_max: default_scalar_max(),
            meter_max: default_scalar_max(),
        }
    }
}

const fn default_index_max() -> f64 {
    10.0
}

const fn default_scalar_max() -> f64 {
    2.5
}

/// Scenario-wide parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScenarioParameters {
    /// Scenario title.
    pub name: String,
    /// Briefing text.
    #[serde(default)]
    pub description: String,
    /// Number of turns after which an undecided game ends in stalemate.
    pub max_turns: u32,
    /// Upper bounds for progress and meters.
    #[serde(default)]
    pub limits: ProgressLimits,
    /// Starting progress values; unlisted metrics start at zero.
    #[serde(default)]
    pub starting_progress: BTreeMap<ProgressMetric, f64>,
    /// Global market indices and their starting values.
    #[serde(default)]
    pub markets: BTreeMap<MarketId, f64>,
    /// World flags present at scenario start.
    #[serde(default)]
    pub starting_flags: Vec<FlagId>,
}

/// The immutable content handed to the engine at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ContentCatalog {
    /// Scenario parameters.
    pub scenario: ScenarioParameters,
    /// One setup per faction.
    pub factions: Vec<FactionSetup>,
    /// Fixed world regions.
    #[serde(default)]
    pub regions: Vec<RegionDefinition>,
    /// Every action of both factions.
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    /// Every random event.
    #[serde(default)]
    pub events: Vec<EventDefinition>,
}

impl ContentCatalog {
    /// Look up an action by id.
    pub fn action(&self, id: &ActionId) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| &a.id == id)
    }

    /// Look up an event by id.
    pub fn event(&self, id: &EventId) -> Option<&EventDefinition> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// The setup for `faction`, if authored.
    pub fn faction_setup(&self, faction: FactionId) -> Option<&FactionSetup> {
        self.factions.iter().find(|f| f.faction == faction)
    }

    /// Every action belonging to `faction`, in authoring order.
    pub fn actions_for(&self, faction: FactionId) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.iter().filter(move |a| a.faction == faction)
    }
}
