//! Spectator-mode turn iterator and end-of-run reporting.
//!
//! [`Simulation::run`] returns [`Turns`], a lazy iterator that plays one
//! automated turn per `next()` call. It stops after the requested number of
//! turns, when the game ends, or on the first orchestrator error. Like any
//! iterator it cannot be rewound: the simulation it borrows has moved on.

use std::iter::FusedIterator;

use singularity_types::{Outcome, TurnSummary};
use tracing::{info, warn};

use crate::simulation::Simulation;

/// Lazy, finite sequence of automated turn summaries.
#[derive(Debug)]
pub struct Turns<'a> {
    simulation: &'a mut Simulation,
    remaining: u32,
}

impl Iterator for Turns<'_> {
    type Item = TurnSummary;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.simulation.is_game_over() {
            self.remaining = 0;
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        match self.simulation.play_automated_turn() {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, "Turn iterator stopped");
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, usize::try_from(self.remaining).ok())
    }
}

impl FusedIterator for Turns<'_> {}

impl Simulation {
    /// Play up to `max_turns` automated turns lazily.
    pub const fn run(&mut self, max_turns: u32) -> Turns<'_> {
        Turns {
            simulation: self,
            remaining: max_turns,
        }
    }
}

/// Result of a spectator run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Final outcome.
    pub outcome: Outcome,
    /// Turns played during this run.
    pub turns_played: u32,
    /// Whether the game has ended.
    pub game_over: bool,
    /// The last turn summary, if any turn completed.
    pub final_summary: Option<TurnSummary>,
}

/// Play automated turns until the game ends or `max_turns` have run.
pub fn run_to_completion(simulation: &mut Simulation, max_turns: u32) -> SimulationResult {
    let mut turns_played: u32 = 0;
    let mut final_summary = None;
    for summary in simulation.run(max_turns) {
        turns_played = turns_played.saturating_add(1);
        info!(headline = %summary.headline(), "Turn summary");
        final_summary = Some(summary);
    }
    SimulationResult {
        outcome: simulation.outcome(),
        turns_played,
        game_over: simulation.is_game_over(),
        final_summary,
    }
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        outcome = ?result.outcome,
        turns_played = result.turns_played,
        game_over = result.game_over,
        final_turn = result.final_summary.as_ref().map(|s| s.turn),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            turn = summary.turn,
            fci = summary.progress.frontier_capability,
            ari = summary.progress.alignment_readiness,
            automation = summary.progress.automation,
            governance = summary.progress.governance,
            reason = %summary.reason,
            "Final turn summary"
        );
    } else {
        warn!("Simulation ended with no turns played");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use singularity_types::{
        ContentCatalog, FactionId, FactionSetup, ProgressLimits, ScenarioParameters,
    };

    use super::*;
    use crate::config::EngineConfig;

    fn simulation(max_turns: u32) -> Simulation {
        let catalog = ContentCatalog {
            scenario: ScenarioParameters {
                name: String::from("Runner"),
                description: String::new(),
                max_turns,
                limits: ProgressLimits::default(),
                starting_progress: BTreeMap::new(),
                markets: BTreeMap::new(),
                starting_flags: Vec::new(),
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
            events: Vec::new(),
        };
        Simulation::new(catalog, None, &EngineConfig::default()).unwrap()
    }

    #[test]
    fn run_stops_at_requested_turns() {
        let mut sim = simulation(10);
        let turns: Vec<u32> = sim.run(4).map(|s| s.turn).collect();
        assert_eq!(turns, vec![1, 2, 3, 4]);
        assert!(!sim.is_game_over());
    }

    #[test]
    fn run_stops_at_game_over() {
        let mut sim = simulation(2);
        let summaries: Vec<TurnSummary> = sim.run(10).collect();
        assert_eq!(summaries.len(), 2);
        assert!(summaries.last().unwrap().game_over);
        assert_eq!(sim.run(10).count(), 0);
    }

    #[test]
    fn run_to_completion_reports() {
        let mut sim = simulation(3);
        let result = run_to_completion(&mut sim, 100);
        assert_eq!(result.turns_played, 3);
        assert!(result.game_over);
        assert_eq!(result.outcome, Outcome::None);
        log_simulation_end(&result);
    }
}
