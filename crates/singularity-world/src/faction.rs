//! Mutable per-faction state: resources, meters, and faction-scoped flags.

use std::collections::BTreeMap;

use singularity_types::{FactionId, FactionSetup, FactionSnapshot, FlagId, Meter, ResourceType};

use crate::error::WorldError;
use crate::flags::FlagSet;
use crate::scalar;

/// Runtime state of one faction.
///
/// Unlisted resources and meters read as zero. No resource or meter ever
/// goes negative: mutations that would cross zero are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct FactionState {
    faction: FactionId,
    name: String,
    resources: BTreeMap<ResourceType, f64>,
    meters: BTreeMap<Meter, f64>,
    flags: FlagSet,
}

impl FactionState {
    /// Build the starting state from an authored setup. Starting meters are
    /// clamped into `[0, meter_max]`.
    pub fn from_setup(setup: &FactionSetup, meter_max: f64) -> Self {
        Self {
            faction: setup.faction,
            name: setup.name.clone(),
            resources: setup.resources.clone(),
            meters: setup
                .meters
                .iter()
                .map(|(&meter, &value)| (meter, value.min(meter_max).max(0.0)))
                .collect(),
            flags: FlagSet::new(),
        }
    }

    /// Which faction this is.
    pub const fn faction(&self) -> FactionId {
        self.faction
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Amount held of `resource` (zero when unlisted).
    pub fn resource(&self, resource: ResourceType) -> f64 {
        self.resources.get(&resource).copied().unwrap_or(0.0)
    }

    /// Value of `meter` (zero when unlisted).
    pub fn meter(&self, meter: Meter) -> f64 {
        self.meters.get(&meter).copied().unwrap_or(0.0)
    }

    /// The shared hard-power scalar.
    pub fn hard_power(&self) -> f64 {
        self.resource(ResourceType::HardPower)
    }

    /// Faction-scoped flags (flags granted by this faction's actions).
    pub const fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Check whether every entry of `cost` is covered.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InsufficientResource`] naming the first
    /// resource (in key order) that falls short.
    pub fn check_cost(&self, cost: &BTreeMap<ResourceType, f64>) -> Result<(), WorldError> {
        for (&resource, &required) in cost {
            let available = self.resource(resource);
            if !scalar::covers(available, required) {
                return Err(WorldError::InsufficientResource {
                    faction: self.faction,
                    resource,
                    required,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Deduct `cost` atomically: either every resource is paid or none is.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InsufficientResource`] if any resource falls
    /// short; the faction is left untouched.
    pub fn pay(&mut self, cost: &BTreeMap<ResourceType, f64>) -> Result<(), WorldError> {
        self.check_cost(cost)?;

        let mut next = self.resources.clone();
        for (&resource, &required) in cost {
            let current = next.get(&resource).copied().unwrap_or(0.0);
            let faction = self.faction;
            let value = scalar::apply_delta(
                || format!("{faction} {resource:?}"),
                current,
                -required,
                None,
            )?;
            next.insert(resource, value);
        }
        self.resources = next;
        Ok(())
    }

    /// Add a signed delta to one resource. Returns the new amount.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WouldGoNegative`] if the result would be
    /// below zero; the resource is left untouched.
    pub fn adjust_resource(&mut self, resource: ResourceType, delta: f64) -> Result<f64, WorldError> {
        let faction = self.faction;
        let value = scalar::apply_delta(
            || format!("{faction} {resource:?}"),
            self.resource(resource),
            delta,
            None,
        )?;
        self.resources.insert(resource, value);
        Ok(value)
    }

    /// Add a signed delta to one meter, clamping at `max`. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WouldGoNegative`] if the result would be
    /// below zero; the meter is left untouched.
    pub fn adjust_meter(&mut self, meter: Meter, delta: f64, max: f64) -> Result<f64, WorldError> {
        let faction = self.faction;
        let value = scalar::apply_delta(
            || format!("{faction} {meter:?}"),
            self.meter(meter),
            delta,
            Some(max),
        )?;
        self.meters.insert(meter, value);
        Ok(value)
    }

    /// Record a flag granted by one of this faction's actions.
    pub fn grant_flag(&mut self, flag: FlagId) -> bool {
        self.flags.insert(flag)
    }

    /// Read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> FactionSnapshot {
        FactionSnapshot {
            faction: self.faction,
            name: self.name.clone(),
            resources: self.resources.clone(),
            meters: self.meters.clone(),
            flags: self.flags.iter().cloned().collect(),
        }
    }
}
