//! Integration tests for the shipped scenario, spectator runs, and save
//! blobs replayed from their seed.

#![allow(clippy::unwrap_used)]

mod common;

use common::{catalog, shipped_catalog};
use singularity_core::{
    EngineConfig, SAVE_VERSION, SaveGame, Simulation, SimulationError, run_to_completion,
};
use singularity_types::{FactionId, Outcome};

#[test]
fn shipped_scenario_plays_to_an_end() {
    let config = EngineConfig::default();
    let mut sim = Simulation::new(shipped_catalog(), None, &config).unwrap();
    let result = run_to_completion(&mut sim, u32::MAX);

    assert!(result.game_over);
    assert!(result.turns_played >= 1);
    assert!(result.turns_played <= sim.max_turns());
    let last = result.final_summary.unwrap();
    assert!(last.game_over);
    assert_eq!(last.outcome, result.outcome);
    if result.outcome == Outcome::None {
        assert_eq!(result.turns_played, sim.max_turns());
    }
    assert!(sim.news().len() <= config.news.capacity);
}

#[test]
fn restore_replays_to_the_same_world() {
    let config = EngineConfig::default();
    let mut original = Simulation::new(shipped_catalog(), None, &config).unwrap();
    let played = original.run(6).count();
    assert_eq!(played, 6);

    let save = original.save();
    assert_eq!(save.version, SAVE_VERSION);
    assert_eq!(save.turn_count, 6);

    let blob = SaveGame::from_json(&save.to_json().unwrap()).unwrap();
    let restored = Simulation::restore(shipped_catalog(), &config, &blob).unwrap();
    assert_eq!(restored.world(), original.world());
    assert_eq!(restored.turn(), original.turn());
    assert_eq!(restored.seed(), original.seed());
}

#[test]
fn restore_uses_the_saved_seed() {
    let mut config = EngineConfig::default();
    config.simulation.seed = 5;
    let mut original = Simulation::new(shipped_catalog(), None, &config).unwrap();
    original.run(4).for_each(drop);
    let save = original.save();

    config.simulation.seed = 6;
    let restored = Simulation::restore(shipped_catalog(), &config, &save).unwrap();
    assert_eq!(restored.seed(), 5);
    assert_eq!(restored.world(), original.world());
}

#[test]
fn restore_rejects_unknown_version() {
    let mut save = Simulation::new(shipped_catalog(), None, &EngineConfig::default())
        .unwrap()
        .save();
    save.version = 99;
    assert!(matches!(
        Simulation::restore(shipped_catalog(), &EngineConfig::default(), &save),
        Err(SimulationError::SaveVersion { found: 99, .. })
    ));
}

#[test]
fn restore_fails_when_game_ends_early() {
    let mut save = Simulation::new(catalog(3), None, &EngineConfig::default())
        .unwrap()
        .save();
    save.turn_count = 10;
    assert!(matches!(
        Simulation::restore(catalog(3), &EngineConfig::default(), &save),
        Err(SimulationError::ReplayEnded {
            requested: 10,
            played: 3
        })
    ));
}

#[test]
fn restore_keeps_interactive_faction() {
    let config = EngineConfig::default();
    let sim = Simulation::new(shipped_catalog(), Some(FactionId::SeedAi), &config).unwrap();
    let save = sim.save();
    let mut restored = Simulation::restore(shipped_catalog(), &config, &save).unwrap();
    assert_eq!(restored.interactive_faction(), Some(FactionId::SeedAi));
    restored.begin_interactive_turn().unwrap();
}
