//! Integration tests for whole-simulation properties.
//!
//! Non-negativity across full playthroughs, gate purity, event eligibility
//! windows, weighted selection proportions, and seeded reproducibility.

#![allow(
    clippy::unwrap_used,
    clippy::cast_precision_loss,
    clippy::arithmetic_side_effects
)]

mod common;

use common::{assert_non_negative, catalog, event, set_flag, shipped_catalog};
use rand::SeedableRng;
use singularity_core::config::PolicyKind;
use singularity_core::events::select_event;
use singularity_core::policy::SimRng;
use singularity_core::{EngineConfig, RandomPolicy, Simulation};
use singularity_rules::can_apply;
use singularity_types::{ActionId, FactionId, FlagId, TurnSummary};
use singularity_world::WorldState;

fn config(seed: u64, policy: PolicyKind) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.simulation.seed = seed;
    config.simulation.seed_ai_policy = policy;
    config.simulation.coalition_policy = policy;
    config
}

#[test]
fn values_never_go_negative_over_full_games() {
    for seed in 0..8 {
        for policy in [PolicyKind::Random, PolicyKind::Progress] {
            let mut sim = Simulation::new(shipped_catalog(), None, &config(seed, policy)).unwrap();
            while !sim.is_game_over() {
                sim.play_automated_turn().unwrap();
                assert_non_negative(sim.world());
            }
        }
    }
}

#[test]
fn can_apply_is_pure_on_live_world() {
    let mut sim = Simulation::new(
        shipped_catalog(),
        None,
        &config(7, PolicyKind::Random),
    )
    .unwrap();
    for _ in 0..10 {
        let world = sim.world().clone();
        for action in &sim.catalog().actions {
            let state = world.faction(action.faction);
            let first = can_apply(action, state, world.flags());
            let second = can_apply(action, state, world.flags());
            assert_eq!(first, second, "{}", action.id);
        }
        assert_eq!(&world, sim.world());
        if sim.play_automated_turn().is_err() {
            break;
        }
    }
}

#[test]
fn events_fire_only_inside_window_and_flags() {
    let mut c = catalog(10);
    c.scenario.starting_flags = vec![FlagId::from("lab_open")];
    let mut windowed = event("windowed", 1.0, Vec::new());
    windowed.min_turn = 3;
    windowed.max_turn = Some(5);
    windowed.required_flag = Some(FlagId::from("lab_open"));
    let mut needs_missing = event("needs_missing", 50.0, Vec::new());
    needs_missing.required_flag = Some(FlagId::from("never_set"));
    let mut forbidden = event("forbidden", 50.0, Vec::new());
    forbidden.forbidden_flag = Some(FlagId::from("lab_open"));
    c.events = vec![windowed, needs_missing, forbidden];

    let mut sim = Simulation::new(c, None, &config(3, PolicyKind::Pass)).unwrap();
    let summaries: Vec<TurnSummary> = sim.run(10).collect();
    assert_eq!(summaries.len(), 10);
    for summary in &summaries {
        let fired = summary.event.as_ref().map(|e| e.event_id.as_str());
        if (3..=5).contains(&summary.turn) {
            assert_eq!(fired, Some("windowed"), "turn {}", summary.turn);
        } else {
            assert_eq!(fired, None, "turn {}", summary.turn);
        }
    }
}

#[test]
fn one_shot_event_fires_once() {
    let mut c = catalog(6);
    let mut once = event("once", 1.0, vec![set_flag("once_fired")]);
    once.forbidden_flag = Some(FlagId::from("once_fired"));
    c.events = vec![once];

    let mut sim = Simulation::new(c, None, &config(5, PolicyKind::Pass)).unwrap();
    let fired = sim.run(6).filter(|s| s.event.is_some()).count();
    assert_eq!(fired, 1);
    assert!(sim.world().has_flag(&FlagId::from("once_fired")));
}

#[test]
fn weighted_selection_is_proportional() {
    let mut c = catalog(10);
    c.events = vec![event("a", 3.0, Vec::new()), event("b", 1.0, Vec::new())];
    let world = WorldState::from_catalog(&c).unwrap();
    let mut rng = SimRng::seed_from_u64(2024);

    let trials: u32 = 10_000;
    let a_count = (0..trials)
        .filter(|_| select_event(&c, &world, &mut rng, 1.0).unwrap().id.as_str() == "a")
        .count();
    let share = a_count as f64 / f64::from(trials);
    assert!((0.72..=0.78).contains(&share), "share of A was {share}");
}

#[test]
fn base_chance_gates_firing_rate() {
    let mut c = catalog(10);
    c.events = vec![event("a", 1.0, Vec::new())];
    let world = WorldState::from_catalog(&c).unwrap();
    let mut rng = SimRng::seed_from_u64(77);

    let trials: u32 = 10_000;
    let fired = (0..trials)
        .filter(|_| select_event(&c, &world, &mut rng, 0.25).is_some())
        .count();
    let share = fired as f64 / f64::from(trials);
    assert!((0.22..=0.28).contains(&share), "fire rate was {share}");
}

#[test]
fn same_seed_same_spectator_game() {
    let play = |seed: u64| {
        let mut sim =
            Simulation::new(shipped_catalog(), None, &config(seed, PolicyKind::Progress)).unwrap();
        let summaries: Vec<TurnSummary> = sim.run(u32::MAX).collect();
        (summaries, sim.snapshot())
    };
    let (first, first_world) = play(11);
    let (second, second_world) = play(11);
    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_eq!(first_world, second_world);
}

#[test]
fn same_seed_same_choices_same_interactive_game() {
    let play = || {
        let mut sim = Simulation::new(
            shipped_catalog(),
            Some(FactionId::AlignmentCoalition),
            &config(19, PolicyKind::Random),
        )
        .unwrap()
        .with_policy(FactionId::SeedAi, Box::new(RandomPolicy));
        let script = [
            Some("interpretability_sprint"),
            None,
            Some("public_awareness"),
            Some("licensing_regime"),
            Some("fund_safety_labs"),
            Some("red_team_exercise"),
        ];
        for choice in script {
            sim.begin_interactive_turn().unwrap();
            let id = choice.map(ActionId::from);
            let phase = sim.submit_player_action(id.as_ref()).unwrap();
            if phase == singularity_types::Phase::AwaitingEventChoice {
                sim.submit_event_choice(0).unwrap();
            }
        }
        sim.news().iter().cloned().collect::<Vec<_>>()
    };
    let first = play();
    assert_eq!(first.len(), 6);
    assert_eq!(first, play());
}
