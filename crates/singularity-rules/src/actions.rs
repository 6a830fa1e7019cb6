//! Action execution.
//!
//! [`execute_action`] is the only path by which an action mutates the world:
//! it re-runs the gate, pays the cost, applies the effects in order, and
//! raises the granted flag. A rejected action leaves the world untouched.

use singularity_types::{ActionDefinition, ActionRecord, FactionId, RejectionReason};
use singularity_world::WorldState;
use tracing::{debug, info};

use crate::gate;
use crate::resolver::{self, EffectReport};

/// What happened when a faction attempted an action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// The record that goes into the turn summary.
    pub record: ActionRecord,
    /// Effects applied and skipped. Empty when the action was rejected.
    pub report: EffectReport,
}

/// Attempt `action` on behalf of `faction`.
///
/// The action is validated against the world as it is *now*, so an action
/// that was legal when chosen may still be rejected if an earlier action in
/// the same turn changed the state it depends on.
pub fn execute_action(
    action: &ActionDefinition,
    faction: FactionId,
    world: &mut WorldState,
) -> ActionOutcome {
    if let Err(reason) = gate::check_action(action, world.faction(faction), world.flags()) {
        return rejected(action, faction, reason);
    }

    if let Err(e) = world.faction_mut(faction).pay(&action.cost) {
        return rejected(action, faction, gate::cost_rejection(action, &e));
    }

    let report = resolver::apply_effects(&action.effects, world, action.id.as_str());

    if let Some(flag) = &action.grants_flag {
        world.set_flag(flag.clone());
        world.faction_mut(faction).grant_flag(flag.clone());
    }

    info!(
        faction = %faction,
        action = %action.id,
        applied = report.applied,
        skipped = report.skipped.len(),
        "Action applied"
    );

    ActionOutcome {
        record: ActionRecord {
            faction,
            action_id: Some(action.id.clone()),
            action_name: action.name.clone(),
            applied: true,
            rejection: None,
        },
        report,
    }
}

fn rejected(action: &ActionDefinition, faction: FactionId, reason: RejectionReason) -> ActionOutcome {
    debug!(
        faction = %faction,
        action = %action.id,
        reason = %reason,
        "Action rejected"
    );
    ActionOutcome {
        record: ActionRecord {
            faction,
            action_id: Some(action.id.clone()),
            action_name: action.name.clone(),
            applied: false,
            rejection: Some(reason),
        },
        report: EffectReport::default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use singularity_types::{
        ContentCatalog, Effect, FactionSetup, FlagId, ProgressLimits, ProgressMetric,
        ResourceType, ScenarioParameters,
    };

    use super::*;

    fn world(budget: f64) -> WorldState {
        let catalog = ContentCatalog {
            scenario: ScenarioParameters {
                name: String::from("Actions"),
                description: String::new(),
                max_turns: 10,
                limits: ProgressLimits::default(),
                starting_progress: BTreeMap::new(),
                markets: BTreeMap::new(),
                starting_flags: Vec::new(),
            },
            factions: vec![
                FactionSetup {
                    faction: FactionId::SeedAi,
                    name: String::from("Seed"),
                    resources: BTreeMap::from([(ResourceType::Budget, budget)]),
                    meters: BTreeMap::new(),
                },
                FactionSetup {
                    faction: FactionId::AlignmentCoalition,
                    name: String::from("Coalition"),
                    resources: BTreeMap::new(),
                    meters: BTreeMap::new(),
                },
            ],
            regions: Vec::new(),
            actions: Vec::new(),
            events: Vec::new(),
        };
        WorldState::from_catalog(&catalog).unwrap()
    }

    fn scale_up() -> ActionDefinition {
        ActionDefinition {
            id: "scale_up".into(),
            name: String::from("Scale Up"),
            description: String::new(),
            faction: FactionId::SeedAi,
            cost: BTreeMap::from([(ResourceType::Budget, 20.0)]),
            required_flags: Vec::new(),
            forbidden_flags: Vec::new(),
            grants_flag: None,
            effects: vec![Effect::AdjustProgress {
                metric: ProgressMetric::FrontierCapabilityIndex,
                amount: 0.5,
            }],
        }
    }

    #[test]
    fn applied_action_pays_and_applies() {
        let mut w = world(50.0);
        let outcome = execute_action(&scale_up(), FactionId::SeedAi, &mut w);
        assert!(outcome.record.applied);
        assert!(outcome.report.is_clean());
        let budget = w.faction(FactionId::SeedAi).resource(ResourceType::Budget);
        assert!((budget - 30.0).abs() < 1e-9);
        assert!((w.progress().get(ProgressMetric::FrontierCapabilityIndex) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rejected_action_changes_nothing() {
        let mut w = world(10.0);
        let before = w.clone();
        let outcome = execute_action(&scale_up(), FactionId::SeedAi, &mut w);
        assert!(!outcome.record.applied);
        assert_eq!(
            outcome.record.rejection,
            Some(RejectionReason::InsufficientResources {
                resource: ResourceType::Budget
            })
        );
        assert_eq!(w, before);
    }

    #[test]
    fn wrong_faction_is_rejected() {
        let mut w = world(50.0);
        let before = w.clone();
        let outcome = execute_action(&scale_up(), FactionId::AlignmentCoalition, &mut w);
        assert_eq!(outcome.record.rejection, Some(RejectionReason::WrongFaction));
        assert_eq!(w, before);
    }

    #[test]
    fn granted_flag_is_raised_once() {
        let mut w = world(100.0);
        let mut action = scale_up();
        action.grants_flag = Some(FlagId::from("scaled"));

        let first = execute_action(&action, FactionId::SeedAi, &mut w);
        assert!(first.record.applied);
        assert!(w.has_flag(&FlagId::from("scaled")));
        assert!(w.faction(FactionId::SeedAi).flags().contains(&FlagId::from("scaled")));

        let second = execute_action(&action, FactionId::SeedAi, &mut w);
        assert!(!second.record.applied);
        assert!(matches!(
            second.record.rejection,
            Some(RejectionReason::AlreadyGranted { .. })
        ));
    }
}
