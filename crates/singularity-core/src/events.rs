//! Event selector.
//!
//! Builds the eligible subset of the catalog's events for the current turn
//! and picks at most one by weight. Events are never removed from the
//! catalog; one-shot events forbid a flag that one of their options sets.

use rand::Rng;
use singularity_rules::event_is_eligible;
use singularity_types::{ContentCatalog, EventDefinition, EventOption};
use singularity_world::WorldState;
use tracing::debug;

use crate::policy::SimRng;

/// Every event that may fire this turn, in authoring order.
pub fn eligible_events<'a>(
    catalog: &'a ContentCatalog,
    world: &WorldState,
) -> Vec<&'a EventDefinition> {
    catalog
        .events
        .iter()
        .filter(|e| e.weight > 0.0 && event_is_eligible(e, world.turn(), world.flags()))
        .collect()
}

/// Pick at most one eligible event.
///
/// When at least one event is eligible, a base gate first decides whether
/// any event fires at all (`base_chance` in `[0, 1]`; a chance of 1 skips
/// the roll). The winner is then drawn with probability proportional to
/// its weight. No random numbers are drawn when nothing is eligible.
pub fn select_event<'a>(
    catalog: &'a ContentCatalog,
    world: &WorldState,
    rng: &mut SimRng,
    base_chance: f64,
) -> Option<&'a EventDefinition> {
    let eligible = eligible_events(catalog, world);
    if eligible.is_empty() {
        return None;
    }
    if base_chance < 1.0 && rng.random::<f64>() >= base_chance {
        debug!(turn = world.turn(), eligible = eligible.len(), "Event gate closed");
        return None;
    }
    weighted_pick(&eligible, rng)
}

/// Weighted random choice over `events` by cumulative roll.
pub fn weighted_pick<'a>(
    events: &[&'a EventDefinition],
    rng: &mut SimRng,
) -> Option<&'a EventDefinition> {
    let total: f64 = events.iter().map(|e| e.weight).sum();
    if events.is_empty() || total <= 0.0 {
        return None;
    }
    let roll = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for &event in events {
        cumulative += event.weight;
        if roll < cumulative {
            return Some(event);
        }
    }
    // Rounding can leave the roll at the very top of the range.
    events.last().copied()
}

/// The option at `index`, if the event has one there.
pub fn resolve_option(event: &EventDefinition, index: usize) -> Option<&EventOption> {
    event.options.get(index)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng;
    use singularity_types::{
        FactionId, FactionSetup, FlagId, ProgressLimits, ScenarioParameters,
    };

    use super::*;

    fn event(id: &str, weight: f64) -> EventDefinition {
        EventDefinition {
            id: id.into(),
            title: id.to_owned(),
            description: String::new(),
            weight,
            min_turn: 1,
            max_turn: None,
            required_flag: None,
            forbidden_flag: None,
            options: vec![EventOption {
                label: String::from("Ok"),
                description: String::new(),
                effects: Vec::new(),
            }],
        }
    }

    fn catalog(events: Vec<EventDefinition>) -> ContentCatalog {
        ContentCatalog {
            scenario: ScenarioParameters {
                name: String::from("Events"),
                description: String::new(),
                max_turns: 10,
                limits: ProgressLimits::default(),
                starting_progress: BTreeMap::new(),
                markets: BTreeMap::new(),
                starting_flags: vec![FlagId::from("lab_open")],
            },
            factions: FactionId::ALL
                .iter()
                .map(|&faction| FactionSetup {
                    faction,
                    name: faction.display_name().to_owned(),
                    resources: BTreeMap::new(),
                    meters: BTreeMap::new(),
                })
                .collect(),
            regions: Vec::new(),
            actions: Vec::new(),
            events,
        }
    }

    #[test]
    fn nothing_eligible_fires_nothing() {
        let mut late = event("late", 1.0);
        late.min_turn = 3;
        let c = catalog(vec![late]);
        let w = WorldState::from_catalog(&c).unwrap();
        let mut rng = SimRng::seed_from_u64(9);
        assert!(select_event(&c, &w, &mut rng, 1.0).is_none());
    }

    #[test]
    fn flags_filter_eligibility() {
        let mut needs = event("needs", 1.0);
        needs.required_flag = Some(FlagId::from("lab_open"));
        let mut blocked = event("blocked", 1.0);
        blocked.forbidden_flag = Some(FlagId::from("lab_open"));
        let c = catalog(vec![needs, blocked]);
        let w = WorldState::from_catalog(&c).unwrap();
        let ids: Vec<&str> = eligible_events(&c, &w).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["needs"]);
    }

    #[test]
    fn zero_base_chance_never_fires() {
        let c = catalog(vec![event("a", 1.0)]);
        let w = WorldState::from_catalog(&c).unwrap();
        let mut rng = SimRng::seed_from_u64(10);
        for _ in 0..100 {
            assert!(select_event(&c, &w, &mut rng, 0.0).is_none());
        }
    }

    #[test]
    fn single_event_always_wins() {
        let c = catalog(vec![event("only", 0.25)]);
        let w = WorldState::from_catalog(&c).unwrap();
        let mut rng = SimRng::seed_from_u64(11);
        for _ in 0..100 {
            assert_eq!(select_event(&c, &w, &mut rng, 1.0).unwrap().id.as_str(), "only");
        }
    }

    #[test]
    fn resolve_option_bounds() {
        let e = event("e", 1.0);
        assert_eq!(resolve_option(&e, 0).unwrap().label, "Ok");
        assert!(resolve_option(&e, 1).is_none());
    }
}
