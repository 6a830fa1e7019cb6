//! Mutable per-region state.
//!
//! Regions are created once from the catalog and never added or removed
//! during play; only their statistics and facility list change.

use std::collections::BTreeMap;

use singularity_types::{FacilityState, FacilityType, RegionDefinition, RegionId, RegionSnapshot, RegionStat};

use crate::error::WorldError;
use crate::scalar;

/// Runtime state of one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionState {
    id: RegionId,
    name: String,
    stats: BTreeMap<RegionStat, f64>,
    facilities: Vec<FacilityState>,
}

impl RegionState {
    /// Build the starting state from an authored definition.
    pub fn from_definition(def: &RegionDefinition) -> Self {
        let facilities = def
            .facilities
            .iter()
            .cloned()
            .map(|mut f| {
                f.build_progress = f.build_progress.clamp(0.0, 1.0);
                f
            })
            .collect();

        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            stats: def.stats.clone(),
            facilities,
        }
    }

    /// Region key.
    pub const fn id(&self) -> &RegionId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of `stat` (zero when unlisted).
    pub fn stat(&self, stat: RegionStat) -> f64 {
        self.stats.get(&stat).copied().unwrap_or(0.0)
    }

    /// Facilities in build order.
    pub fn facilities(&self) -> &[FacilityState] {
        &self.facilities
    }

    /// Combined level of every facility of `facility_type`.
    pub fn facility_level(&self, facility_type: FacilityType) -> u32 {
        self.facilities
            .iter()
            .filter(|f| f.facility_type == facility_type)
            .fold(0_u32, |acc, f| acc.saturating_add(f.level))
    }

    /// Add a signed delta to one statistic. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WouldGoNegative`] if the stat would drop below
    /// zero; the stat is left untouched.
    pub fn adjust_stat(&mut self, stat: RegionStat, delta: f64) -> Result<f64, WorldError> {
        let id = &self.id;
        let value = scalar::apply_delta(|| format!("{id} {stat:?}"), self.stat(stat), delta, None)?;
        self.stats.insert(stat, value);
        Ok(value)
    }

    /// Read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> RegionSnapshot {
        RegionSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            stats: self.stats.clone(),
            facilities: self.facilities.clone(),
        }
    }
}
