//! Shared fixtures for the orchestrator integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::path::Path;

use singularity_core::policy::SimRng;
use singularity_core::{FactionPolicy, load_catalog};
use singularity_types::{
    ActionDefinition, ActionId, ContentCatalog, Effect, EventDefinition, EventOption, FactionId,
    FactionSetup, FlagId, Meter, ProgressLimits, ProgressMetric, ResourceType, ScenarioParameters,
};
use singularity_world::WorldState;

/// Scenario with both factions and no content.
pub fn catalog(max_turns: u32) -> ContentCatalog {
    ContentCatalog {
        scenario: ScenarioParameters {
            name: String::from("Fixture"),
            description: String::new(),
            max_turns,
            limits: ProgressLimits::default(),
            starting_progress: BTreeMap::new(),
            markets: BTreeMap::new(),
            starting_flags: Vec::new(),
        },
        factions: vec![
            FactionSetup {
                faction: FactionId::SeedAi,
                name: String::from("Seed AI"),
                resources: BTreeMap::from([(ResourceType::Budget, 50.0)]),
                meters: BTreeMap::new(),
            },
            FactionSetup {
                faction: FactionId::AlignmentCoalition,
                name: String::from("Alignment Coalition"),
                resources: BTreeMap::from([(ResourceType::Trust, 10.0)]),
                meters: BTreeMap::new(),
            },
        ],
        regions: Vec::new(),
        actions: Vec::new(),
        events: Vec::new(),
    }
}

pub fn setup_mut(catalog: &mut ContentCatalog, faction: FactionId) -> &mut FactionSetup {
    catalog
        .factions
        .iter_mut()
        .find(|f| f.faction == faction)
        .unwrap()
}

pub fn set_resource(catalog: &mut ContentCatalog, faction: FactionId, resource: ResourceType, amount: f64) {
    setup_mut(catalog, faction).resources.insert(resource, amount);
}

pub fn set_meter(catalog: &mut ContentCatalog, faction: FactionId, meter: Meter, amount: f64) {
    setup_mut(catalog, faction).meters.insert(meter, amount);
}

pub fn action(
    id: &str,
    faction: FactionId,
    cost: &[(ResourceType, f64)],
    effects: Vec<Effect>,
) -> ActionDefinition {
    ActionDefinition {
        id: id.into(),
        name: id.replace('_', " "),
        description: String::new(),
        faction,
        cost: cost.iter().copied().collect(),
        required_flags: Vec::new(),
        forbidden_flags: Vec::new(),
        grants_flag: None,
        effects,
    }
}

pub fn event(id: &str, weight: f64, effects: Vec<Effect>) -> EventDefinition {
    EventDefinition {
        id: id.into(),
        title: id.replace('_', " "),
        description: String::new(),
        weight,
        min_turn: 1,
        max_turn: None,
        required_flag: None,
        forbidden_flag: None,
        options: vec![EventOption {
            label: String::from("Accept"),
            description: String::new(),
            effects,
        }],
    }
}

pub const fn fci(amount: f64) -> Effect {
    Effect::AdjustProgress {
        metric: ProgressMetric::FrontierCapabilityIndex,
        amount,
    }
}

pub fn set_flag(flag: &str) -> Effect {
    Effect::SetFlag {
        flag: FlagId::from(flag),
    }
}

/// The scenario shipped in `content/`.
pub fn shipped_catalog() -> ContentCatalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../content/default-scenario.yaml");
    load_catalog(&path).unwrap()
}

/// Always picks the same action when it is legal.
#[derive(Debug)]
pub struct Always(pub ActionId);

impl FactionPolicy for Always {
    fn name(&self) -> &'static str {
        "always"
    }

    fn choose_action(
        &mut self,
        _faction: FactionId,
        _world: &WorldState,
        legal: &[&ActionDefinition],
        _rng: &mut SimRng,
    ) -> Option<ActionId> {
        legal.iter().find(|a| a.id == self.0).map(|a| a.id.clone())
    }
}

/// Every resource, meter, progress index, region stat, and market is >= 0.
pub fn assert_non_negative(world: &WorldState) {
    for faction in FactionId::ALL {
        let state = world.faction(faction);
        for resource in ResourceType::ALL {
            assert!(state.resource(resource) >= 0.0, "{faction} {resource:?} negative");
        }
        for meter in Meter::ALL {
            assert!(state.meter(meter) >= 0.0, "{faction} {meter:?} negative");
        }
    }
    for metric in ProgressMetric::ALL {
        assert!(world.progress().get(metric) >= 0.0, "{metric:?} negative");
    }
    let snapshot = world.snapshot();
    for region in &snapshot.regions {
        for (stat, value) in &region.stats {
            assert!(*value >= 0.0, "{} {stat:?} negative", region.id);
        }
    }
    for (market, value) in &snapshot.markets {
        assert!(*value >= 0.0, "market {market} negative");
    }
}
