//! The single mutable world aggregate.
//!
//! [`WorldState`] owns the turn counter, both faction states, the region
//! map, global progress, market indices, and the world flag set. It is
//! built from a [`ContentCatalog`] and then mutated only through the
//! methods below, which the effect resolver calls.

use std::collections::BTreeMap;

use singularity_types::{
    ContentCatalog, FactionId, FlagId, MarketId, Meter, ProgressLimits, ProgressMetric,
    ProgressSnapshot, RegionId, RegionSnapshot, RegionStat, ResourceType, WorldSnapshot,
};
use tracing::debug;

use crate::error::WorldError;
use crate::faction::FactionState;
use crate::flags::FlagSet;
use crate::progress::ProgressState;
use crate::region::RegionState;
use crate::scalar;

/// The complete mutable state of one playthrough.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    turn: u32,
    seed_ai: FactionState,
    coalition: FactionState,
    regions: BTreeMap<RegionId, RegionState>,
    progress: ProgressState,
    markets: BTreeMap<MarketId, f64>,
    flags: FlagSet,
    limits: ProgressLimits,
}

impl WorldState {
    /// Build the starting world from a content catalog. The first turn is 1.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MissingFaction`] if either faction has no
    /// setup, or [`WorldError::DuplicateRegion`] if two regions share a key.
    pub fn from_catalog(catalog: &ContentCatalog) -> Result<Self, WorldError> {
        let scenario = &catalog.scenario;
        let limits = scenario.limits;
        let faction = |id: FactionId| {
            catalog
                .faction_setup(id)
                .map(|setup| FactionState::from_setup(setup, limits.meter_max))
                .ok_or(WorldError::MissingFaction(id))
        };
        let seed_ai = faction(FactionId::SeedAi)?;
        let coalition = faction(FactionId::AlignmentCoalition)?;

        let mut regions = BTreeMap::new();
        for def in &catalog.regions {
            let state = RegionState::from_definition(def);
            if regions.insert(def.id.clone(), state).is_some() {
                return Err(WorldError::DuplicateRegion(def.id.clone()));
            }
        }

        let start = |metric: ProgressMetric| {
            scenario
                .starting_progress
                .get(&metric)
                .copied()
                .unwrap_or(0.0)
                .min(limits.cap(metric))
                .max(0.0)
        };
        let progress = ProgressState::new(ProgressSnapshot {
            frontier_capability: start(ProgressMetric::FrontierCapabilityIndex),
            alignment_readiness: start(ProgressMetric::AlignmentReadinessIndex),
            automation: start(ProgressMetric::AutomationLevel),
            governance: start(ProgressMetric::GovernanceControl),
        });

        debug!(
            regions = regions.len(),
            markets = scenario.markets.len(),
            flags = scenario.starting_flags.len(),
            "World state constructed"
        );

        Ok(Self {
            turn: 1,
            seed_ai,
            coalition,
            regions,
            progress,
            markets: scenario.markets.clone(),
            flags: scenario.starting_flags.iter().cloned().collect(),
            limits,
        })
    }

    // -----------------------------------------------------------------------
    // Turn counter
    // -----------------------------------------------------------------------

    /// The turn currently being played (first turn is 1).
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Number of turns fully resolved so far.
    pub const fn turns_completed(&self) -> u32 {
        self.turn.saturating_sub(1)
    }

    /// Move to the next turn.
    pub const fn advance_turn(&mut self) {
        self.turn = self.turn.saturating_add(1);
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    /// State of `faction`.
    pub const fn faction(&self, faction: FactionId) -> &FactionState {
        match faction {
            FactionId::SeedAi => &self.seed_ai,
            FactionId::AlignmentCoalition => &self.coalition,
        }
    }

    /// Mutable state of `faction`.
    pub const fn faction_mut(&mut self, faction: FactionId) -> &mut FactionState {
        match faction {
            FactionId::SeedAi => &mut self.seed_ai,
            FactionId::AlignmentCoalition => &mut self.coalition,
        }
    }

    /// State of the region with key `id`, if it exists.
    pub fn region(&self, id: &RegionId) -> Option<&RegionState> {
        self.regions.get(id)
    }

    /// All regions ordered by key.
    pub fn regions(&self) -> impl Iterator<Item = &RegionState> {
        self.regions.values()
    }

    /// Global progress.
    pub const fn progress(&self) -> &ProgressState {
        &self.progress
    }

    /// Authored upper bounds.
    pub const fn limits(&self) -> &ProgressLimits {
        &self.limits
    }

    /// Value of a global market index, if the market exists.
    pub fn market(&self, market: &MarketId) -> Option<f64> {
        self.markets.get(market).copied()
    }

    /// World flags.
    pub const fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Whether `flag` is raised.
    pub fn has_flag(&self, flag: &FlagId) -> bool {
        self.flags.contains(flag)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Add a signed delta to one faction resource.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WouldGoNegative`] if the result would be negative.
    pub fn add_resource(
        &mut self,
        faction: FactionId,
        resource: ResourceType,
        delta: f64,
    ) -> Result<f64, WorldError> {
        self.faction_mut(faction).adjust_resource(resource, delta)
    }

    /// Add a signed delta to one faction meter, clamped at the meter cap.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WouldGoNegative`] if the result would be negative.
    pub fn adjust_meter(
        &mut self,
        faction: FactionId,
        meter: Meter,
        delta: f64,
    ) -> Result<f64, WorldError> {
        let max = self.limits.meter_max;
        self.faction_mut(faction).adjust_meter(meter, delta, max)
    }

    /// Add a signed delta to a progress index, clamped at its cap.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WouldGoNegative`] if the result would be negative.
    pub fn adjust_progress(&mut self, metric: ProgressMetric, delta: f64) -> Result<f64, WorldError> {
        let limits = self.limits;
        self.progress.adjust(metric, delta, &limits)
    }

    /// Add a signed delta to one region statistic.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] for an unknown region, or
    /// [`WorldError::WouldGoNegative`] if the result would be negative.
    pub fn modify_region_stat(
        &mut self,
        region: &RegionId,
        stat: RegionStat,
        delta: f64,
    ) -> Result<f64, WorldError> {
        self.regions
            .get_mut(region)
            .ok_or_else(|| WorldError::RegionNotFound(region.clone()))?
            .adjust_stat(stat, delta)
    }

    /// Add a signed delta to a global market index.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MarketNotFound`] for an unknown market, or
    /// [`WorldError::WouldGoNegative`] if the result would be negative.
    pub fn change_market(&mut self, market: &MarketId, delta: f64) -> Result<f64, WorldError> {
        let current = self
            .market(market)
            .ok_or_else(|| WorldError::MarketNotFound(market.clone()))?;
        let value = scalar::apply_delta(|| format!("market {market}"), current, delta, None)?;
        self.markets.insert(market.clone(), value);
        Ok(value)
    }

    /// Raise a world flag. Returns `true` if it was newly raised.
    pub fn set_flag(&mut self, flag: FlagId) -> bool {
        self.flags.insert(flag)
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Snapshot of one region, if it exists.
    pub fn region_snapshot(&self, id: &RegionId) -> Option<RegionSnapshot> {
        self.region(id).map(RegionState::snapshot)
    }

    /// Complete read-only snapshot.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            turn: self.turn,
            factions: FactionId::ALL
                .iter()
                .map(|&f| self.faction(f).snapshot())
                .collect(),
            regions: self.regions.values().map(RegionState::snapshot).collect(),
            progress: self.progress.snapshot(),
            markets: self.markets.clone(),
            flags: self.flags.iter().cloned().collect(),
        }
    }
}
