//! Effect resolver.
//!
//! Translates each [`Effect`] variant into a mutation on [`WorldState`].
//! Effects in a list are applied strictly in order. An effect that cannot be
//! applied is skipped, logged, and reported; it never aborts the rest of the
//! list.

use singularity_types::{Effect, EffectWarning};
use singularity_world::WorldState;
use tracing::{debug, warn};

use crate::error::EffectError;

/// Result of applying a list of effects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectReport {
    /// Number of effects that changed (or idempotently confirmed) world state.
    pub applied: u32,
    /// Effects that were skipped, in list order.
    pub skipped: Vec<EffectWarning>,
}

impl EffectReport {
    /// Whether every effect in the list applied cleanly.
    pub const fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.applied = self.applied.saturating_add(other.applied);
        self.skipped.extend(other.skipped);
    }
}

/// Apply a single effect to the world.
///
/// # Errors
///
/// Returns [`EffectError::UnknownTarget`] when the effect names a region or
/// market that does not exist, and [`EffectError::OutOfRange`] when it would
/// drive a value below zero. The world is unchanged on error.
pub fn apply_effect(effect: &Effect, world: &mut WorldState) -> Result<(), EffectError> {
    match effect {
        Effect::AddResource {
            faction,
            resource,
            amount,
        } => {
            world.add_resource(*faction, *resource, *amount)?;
        }
        Effect::AdjustProgress { metric, amount } => {
            world.adjust_progress(*metric, *amount)?;
        }
        Effect::AdjustMeter {
            faction,
            meter,
            amount,
        } => {
            world.adjust_meter(*faction, *meter, *amount)?;
        }
        Effect::ModifyRegionStat {
            region,
            stat,
            amount,
        } => {
            world.modify_region_stat(region, *stat, *amount)?;
        }
        Effect::ChangeGlobalMarket { market, amount } => {
            world.change_market(market, *amount)?;
        }
        Effect::SetFlag { flag } => {
            world.set_flag(flag.clone());
        }
    }
    Ok(())
}

/// Apply `effects` in order, skipping any that fail.
///
/// `source` names what produced the list (an action id or an event option)
/// and is carried into every [`EffectWarning`].
pub fn apply_effects(effects: &[Effect], world: &mut WorldState, source: &str) -> EffectReport {
    let mut report = EffectReport::default();
    for effect in effects {
        match apply_effect(effect, world) {
            Ok(()) => {
                report.applied = report.applied.saturating_add(1);
            }
            Err(e) => {
                warn!(
                    source,
                    effect = %effect,
                    content_error = e.is_content_error(),
                    error = %e,
                    "Effect skipped"
                );
                report.skipped.push(EffectWarning {
                    source: source.to_owned(),
                    effect: effect.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }
    debug!(
        source,
        applied = report.applied,
        skipped = report.skipped.len(),
        "Effects resolved"
    );
    report
}
