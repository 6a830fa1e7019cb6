//! Read-only snapshots of world state for the presentation layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::content::FacilityState;
use crate::enums::{FactionId, Meter, ProgressMetric, RegionStat, ResourceType};
use crate::ids::{FlagId, MarketId, RegionId};

/// Values of the four global progress indices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProgressSnapshot {
    /// Frontier Capability Index.
    pub frontier_capability: f64,
    /// Alignment Readiness Index.
    pub alignment_readiness: f64,
    /// Automation level.
    pub automation: f64,
    /// Governance control.
    pub governance: f64,
}

impl ProgressSnapshot {
    /// Value of one metric.
    pub const fn get(&self, metric: ProgressMetric) -> f64 {
        match metric {
            ProgressMetric::FrontierCapabilityIndex => self.frontier_capability,
            ProgressMetric::AlignmentReadinessIndex => self.alignment_readiness,
            ProgressMetric::AutomationLevel => self.automation,
            ProgressMetric::GovernanceControl => self.governance,
        }
    }
}

/// One faction's resources, meters, and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FactionSnapshot {
    /// Faction.
    pub faction: FactionId,
    /// Display name.
    pub name: String,
    /// Held resources.
    pub resources: BTreeMap<ResourceType, f64>,
    /// Meter values.
    pub meters: BTreeMap<Meter, f64>,
    /// Faction-scoped flags.
    pub flags: Vec<FlagId>,
}

/// One region's statistics and facilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegionSnapshot {
    /// Region key.
    pub id: RegionId,
    /// Display name.
    pub name: String,
    /// Statistic values.
    pub stats: BTreeMap<RegionStat, f64>,
    /// Facilities in build order.
    pub facilities: Vec<FacilityState>,
}

/// Complete read-only view of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// The turn about to be played (first turn is 1).
    pub turn: u32,
    /// Both factions in resolution order.
    pub factions: Vec<FactionSnapshot>,
    /// Regions ordered by key.
    pub regions: Vec<RegionSnapshot>,
    /// Global progress.
    pub progress: ProgressSnapshot,
    /// Global market indices.
    pub markets: BTreeMap<MarketId, f64>,
    /// World flags ordered by key.
    pub flags: Vec<FlagId>,
}
