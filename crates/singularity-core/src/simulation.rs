//! Turn orchestrator.
//!
//! [`Simulation`] owns the world, the catalog, the seeded RNG, and the
//! policies, and drives one turn at a time through a small state machine:
//!
//! ```text
//! NotStarted / Resolved
//!     -> AwaitingActions        (automated factions pick, held pending)
//!     -> AwaitingEventChoice    (only if an event fired in interactive mode)
//!     -> Resolved | GameOver
//! ```
//!
//! Within a turn, factions always resolve in [`FactionId::ALL`] order (Seed
//! AI first), so the Coalition's action is re-validated against a world the
//! AI has already changed. Calling a phase-specific method in the wrong
//! phase is a [`SimulationError`], never a silent no-op.
//!
//! Random draws happen in a fixed order each turn: automated action picks
//! (in faction order), the event gate roll, the weighted event roll, then
//! the automated option roll.

use std::collections::BTreeMap;

use rand::SeedableRng;
use singularity_rules::{apply_effects, available_actions, execute_action};
use singularity_types::{
    ActionDefinition, ActionId, ActionRecord, ContentCatalog, EffectWarning, EventDefinition,
    EventId, EventRecord, FactionId, FactionSnapshot, Outcome, Phase, RegionId, RegionSnapshot,
    RejectionReason, TurnSummary, WorldSnapshot,
};
use singularity_world::{WorldError, WorldState};
use tracing::{debug, info, warn};

use crate::catalog::{self, CatalogError};
use crate::config::EngineConfig;
use crate::events;
use crate::news::NewsLog;
use crate::policy::{self, FactionPolicy, OptionPolicy, SimRng};
use crate::victory::VictoryRules;

/// Errors returned by the orchestrator.
///
/// Everything except the construction and save variants is a protocol
/// violation: the caller invoked an operation the current state does not
/// allow.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The operation is not valid in the current phase.
    #[error("{operation} is not allowed in phase {phase}")]
    WrongPhase {
        /// The operation that was attempted.
        operation: &'static str,
        /// The phase the simulation was in.
        phase: Phase,
    },

    /// The game has ended; no further turns can be resolved.
    #[error("the game is over")]
    GameOver,

    /// An interactive operation was called on a spectator simulation.
    #[error("no faction is under interactive control")]
    NoInteractiveFaction,

    /// The submitted event option index does not exist.
    #[error("event `{event}` has {options} options, index {index} is out of range")]
    OptionOutOfRange {
        /// The pending event.
        event: EventId,
        /// The submitted index.
        index: usize,
        /// How many options the event has.
        options: usize,
    },

    /// The submitted action id is not in the catalog.
    #[error("unknown action `{0}`")]
    UnknownAction(ActionId),

    /// A pending event id is missing from the catalog.
    #[error("unknown event `{0}`")]
    UnknownEvent(EventId),

    /// The content catalog failed validation.
    #[error("invalid content: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },

    /// The world could not be built from the catalog.
    #[error("world construction failed: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A victory threshold lies above the scenario cap of the value it
    /// tests, so the rule could never fire.
    #[error("{rule} threshold {threshold} is above its cap {cap}")]
    UnreachableThreshold {
        /// Which rule the threshold belongs to.
        rule: &'static str,
        /// The configured threshold.
        threshold: f64,
        /// The scenario cap.
        cap: f64,
    },

    /// A save blob was written by an unsupported version.
    #[error("save version {found} is not supported (expected {supported})")]
    SaveVersion {
        /// Version found in the blob.
        found: u32,
        /// Version this build reads.
        supported: u32,
    },

    /// A save blob could not be encoded or decoded.
    #[error("save format error: {source}")]
    SaveFormat {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Replaying a save ended before reaching the saved turn count.
    #[error("replay ended after {played} of {requested} turns")]
    ReplayEnded {
        /// Turns the save asked for.
        requested: u32,
        /// Turns actually replayed.
        played: u32,
    },
}

/// Working state of the turn in flight.
#[derive(Debug, Default)]
struct PendingTurn {
    choices: BTreeMap<FactionId, Option<ActionId>>,
    actions: Vec<ActionRecord>,
    event: Option<EventId>,
    skipped: Vec<EffectWarning>,
}

/// One playthrough.
#[derive(Debug)]
pub struct Simulation {
    catalog: ContentCatalog,
    world: WorldState,
    rng: SimRng,
    seed: u64,
    interactive: Option<FactionId>,
    phase: Phase,
    max_turns: u32,
    base_fire_chance: f64,
    victory: VictoryRules,
    seed_ai_policy: Box<dyn FactionPolicy>,
    coalition_policy: Box<dyn FactionPolicy>,
    option_policy: Box<dyn OptionPolicy>,
    pending: PendingTurn,
    last_summary: Option<TurnSummary>,
    outcome: Outcome,
    news: NewsLog,
}

impl Simulation {
    /// Create a simulation.
    ///
    /// `interactive` names the human-controlled faction; `None` automates
    /// both factions (spectator mode). The seed, turn limit, policies, and
    /// victory rules come from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Catalog`] if the catalog fails validation,
    /// [`SimulationError::UnreachableThreshold`] if a configured victory
    /// threshold exceeds the scenario's caps, or [`SimulationError::World`]
    /// if the world cannot be built.
    pub fn new(
        catalog: ContentCatalog,
        interactive: Option<FactionId>,
        config: &EngineConfig,
    ) -> Result<Self, SimulationError> {
        catalog::validate_catalog(&catalog)?;
        let victory = VictoryRules::from_config(&config.victory);
        if let Some(found) = victory.unreachable_threshold(&catalog.scenario.limits) {
            return Err(SimulationError::UnreachableThreshold {
                rule: found.rule,
                threshold: found.threshold,
                cap: found.cap,
            });
        }
        let world = WorldState::from_catalog(&catalog)?;
        let settings = &config.simulation;
        let max_turns = if settings.max_turns > 0 {
            settings.max_turns
        } else {
            catalog.scenario.max_turns
        };

        info!(
            scenario = %catalog.scenario.name,
            seed = settings.seed,
            interactive = ?interactive,
            max_turns,
            "Simulation created"
        );

        Ok(Self {
            world,
            rng: SimRng::seed_from_u64(settings.seed),
            seed: settings.seed,
            interactive,
            phase: Phase::NotStarted,
            max_turns,
            base_fire_chance: config.events.base_fire_chance,
            victory,
            seed_ai_policy: policy::build_policy(settings.policy_for(FactionId::SeedAi)),
            coalition_policy: policy::build_policy(
                settings.policy_for(FactionId::AlignmentCoalition),
            ),
            option_policy: policy::build_option_policy(config.events.option_policy),
            pending: PendingTurn::default(),
            last_summary: None,
            outcome: Outcome::None,
            news: NewsLog::new(config.news.capacity),
            catalog,
        })
    }

    /// Create a simulation whose interactive faction comes from `config`.
    ///
    /// # Errors
    ///
    /// See [`Simulation::new`].
    pub fn from_config(catalog: ContentCatalog, config: &EngineConfig) -> Result<Self, SimulationError> {
        Self::new(catalog, config.simulation.interactive_faction, config)
    }

    /// Replace the automated policy of `faction`.
    #[must_use]
    pub fn with_policy(mut self, faction: FactionId, policy: Box<dyn FactionPolicy>) -> Self {
        match faction {
            FactionId::SeedAi => self.seed_ai_policy = policy,
            FactionId::AlignmentCoalition => self.coalition_policy = policy,
        }
        self
    }

    /// Replace the automated event-option policy.
    #[must_use]
    pub fn with_option_policy(mut self, policy: Box<dyn OptionPolicy>) -> Self {
        self.option_policy = policy;
        self
    }

    /// Replace the victory rules. A threshold above the scenario's caps is
    /// logged, since that rule can never fire.
    #[must_use]
    pub fn with_victory_rules(mut self, rules: VictoryRules) -> Self {
        if let Some(found) = rules.unreachable_threshold(&self.catalog.scenario.limits) {
            warn!(
                rule = found.rule,
                threshold = found.threshold,
                cap = found.cap,
                "Victory threshold can never be reached"
            );
        }
        self.victory = rules;
        self
    }

    // -----------------------------------------------------------------------
    // Interactive surface
    // -----------------------------------------------------------------------

    /// Start a turn for the interactive faction.
    ///
    /// Automated factions choose immediately; their choices are held until
    /// the player submits.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NoInteractiveFaction`] in spectator mode,
    /// [`SimulationError::GameOver`] after the game has ended, or
    /// [`SimulationError::WrongPhase`] if a turn is already in flight.
    pub fn begin_interactive_turn(&mut self) -> Result<Phase, SimulationError> {
        let player = self.interactive.ok_or(SimulationError::NoInteractiveFaction)?;
        self.ensure_can_begin("begin_interactive_turn")?;
        self.pending = PendingTurn::default();
        for faction in FactionId::ALL {
            if faction != player {
                let choice = self.pick_automated(faction);
                self.pending.choices.insert(faction, choice);
            }
        }
        self.phase = Phase::AwaitingActions;
        info!(turn = self.world.turn(), player = %player, "Turn begun");
        Ok(self.phase)
    }

    /// Actions the interactive faction could apply right now.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NoInteractiveFaction`] in spectator mode.
    pub fn player_available_actions(&self) -> Result<Vec<&ActionDefinition>, SimulationError> {
        let player = self.interactive.ok_or(SimulationError::NoInteractiveFaction)?;
        Ok(available_actions(&self.catalog, &self.world, player))
    }

    /// Submit the interactive faction's action (`None` to pass) and resolve
    /// both factions' actions.
    ///
    /// An action that fails the gate is recorded as not applied; it is not
    /// an error. Returns the new phase: [`Phase::AwaitingEventChoice`] if an
    /// event fired, otherwise [`Phase::Resolved`] or [`Phase::GameOver`].
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::WrongPhase`] outside
    /// [`Phase::AwaitingActions`], or [`SimulationError::UnknownAction`] for
    /// an id not in the catalog. The state is unchanged on error.
    pub fn submit_player_action(&mut self, action: Option<&ActionId>) -> Result<Phase, SimulationError> {
        let player = self.interactive.ok_or(SimulationError::NoInteractiveFaction)?;
        self.ensure_phase(Phase::AwaitingActions, "submit_player_action")?;
        if let Some(id) = action.filter(|id| self.catalog.action(id).is_none()) {
            return Err(SimulationError::UnknownAction(id.clone()));
        }

        self.pending.choices.insert(player, action.cloned());
        self.resolve_actions();

        if let Some(event) = self.roll_event() {
            self.pending.event = Some(event);
            self.phase = Phase::AwaitingEventChoice;
            return Ok(self.phase);
        }
        self.finish_turn(None);
        Ok(self.phase)
    }

    /// The event awaiting a choice, if any.
    pub fn pending_event(&self) -> Option<&EventDefinition> {
        if self.phase != Phase::AwaitingEventChoice {
            return None;
        }
        self.pending
            .event
            .as_ref()
            .and_then(|id| self.catalog.event(id))
    }

    /// Choose an option for the pending event and finish the turn.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::WrongPhase`] outside
    /// [`Phase::AwaitingEventChoice`], or
    /// [`SimulationError::OptionOutOfRange`] for a bad index. The state is
    /// unchanged on error.
    pub fn submit_event_choice(&mut self, index: usize) -> Result<Phase, SimulationError> {
        self.ensure_phase(Phase::AwaitingEventChoice, "submit_event_choice")?;
        let event_id = self.pending.event.clone().ok_or(SimulationError::WrongPhase {
            operation: "submit_event_choice",
            phase: self.phase,
        })?;
        let record = self.apply_option(&event_id, index)?;
        self.finish_turn(Some(record));
        Ok(self.phase)
    }

    /// Summary of the most recently resolved turn.
    pub const fn current_turn_summary(&self) -> Option<&TurnSummary> {
        self.last_summary.as_ref()
    }

    // -----------------------------------------------------------------------
    // Automated play
    // -----------------------------------------------------------------------

    /// Resolve one whole turn with every faction driven by its policy.
    ///
    /// Works in spectator and interactive mode alike; in interactive mode
    /// the player's faction falls back to its configured policy.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::GameOver`] after the game has ended, or
    /// [`SimulationError::WrongPhase`] if an interactive turn is in flight.
    pub fn play_automated_turn(&mut self) -> Result<TurnSummary, SimulationError> {
        self.ensure_can_begin("play_automated_turn")?;
        self.pending = PendingTurn::default();
        for faction in FactionId::ALL {
            let choice = self.pick_automated(faction);
            self.pending.choices.insert(faction, choice);
        }
        self.phase = Phase::AwaitingActions;
        self.resolve_actions();

        let event = match self.roll_event() {
            Some(event_id) => {
                let index = self.automated_option(&event_id)?;
                Some(self.apply_option(&event_id, index)?)
            }
            None => None,
        };
        Ok(self.finish_turn(event))
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The turn currently being (or about to be) played.
    pub const fn turn(&self) -> u32 {
        self.world.turn()
    }

    /// Turns fully resolved so far.
    pub const fn turns_completed(&self) -> u32 {
        self.world.turns_completed()
    }

    /// Effective turn limit.
    pub const fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// RNG seed this simulation was created with.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The interactive faction, if any.
    pub const fn interactive_faction(&self) -> Option<FactionId> {
        self.interactive
    }

    /// Outcome so far. [`Outcome::None`] until a faction wins.
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether no further turns can be resolved.
    pub const fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    /// Read-only world state.
    pub const fn world(&self) -> &WorldState {
        &self.world
    }

    /// The content catalog.
    pub const fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// Recent turn summaries.
    pub const fn news(&self) -> &NewsLog {
        &self.news
    }

    /// Snapshot of one faction.
    pub fn faction_snapshot(&self, faction: FactionId) -> FactionSnapshot {
        self.world.faction(faction).snapshot()
    }

    /// Snapshot of one region, if it exists.
    pub fn region_snapshot(&self, region: &RegionId) -> Option<RegionSnapshot> {
        self.world.region_snapshot(region)
    }

    /// Snapshot of the whole world.
    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    // -----------------------------------------------------------------------
    // Turn internals
    // -----------------------------------------------------------------------

    const fn ensure_can_begin(&self, operation: &'static str) -> Result<(), SimulationError> {
        match self.phase {
            Phase::NotStarted | Phase::Resolved => Ok(()),
            Phase::GameOver => Err(SimulationError::GameOver),
            phase @ (Phase::AwaitingActions | Phase::AwaitingEventChoice) => {
                Err(SimulationError::WrongPhase { operation, phase })
            }
        }
    }

    fn ensure_phase(&self, expected: Phase, operation: &'static str) -> Result<(), SimulationError> {
        if self.phase == expected {
            Ok(())
        } else if self.phase == Phase::GameOver {
            Err(SimulationError::GameOver)
        } else {
            Err(SimulationError::WrongPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn pick_automated(&mut self, faction: FactionId) -> Option<ActionId> {
        let legal = available_actions(&self.catalog, &self.world, faction);
        let policy = match faction {
            FactionId::SeedAi => &mut self.seed_ai_policy,
            FactionId::AlignmentCoalition => &mut self.coalition_policy,
        };
        let choice = policy.choose_action(faction, &self.world, &legal, &mut self.rng);
        debug!(
            faction = %faction,
            policy = policy.name(),
            legal = legal.len(),
            choice = ?choice,
            "Automated choice"
        );
        choice
    }

    /// Resolve every faction's pending choice in fixed order.
    fn resolve_actions(&mut self) {
        for faction in FactionId::ALL {
            let choice = self.pending.choices.remove(&faction).flatten();
            let record = match choice {
                None => ActionRecord::pass(faction),
                Some(id) => match self.catalog.action(&id) {
                    Some(action) => {
                        let outcome = execute_action(action, faction, &mut self.world);
                        self.pending.skipped.extend(outcome.report.skipped);
                        outcome.record
                    }
                    None => {
                        warn!(faction = %faction, action = %id, "Policy chose an unknown action");
                        ActionRecord {
                            faction,
                            action_name: id.to_string(),
                            action_id: Some(id),
                            applied: false,
                            rejection: Some(RejectionReason::UnknownAction),
                        }
                    }
                },
            };
            self.pending.actions.push(record);
        }
    }

    fn roll_event(&mut self) -> Option<EventId> {
        let event = events::select_event(
            &self.catalog,
            &self.world,
            &mut self.rng,
            self.base_fire_chance,
        )?;
        info!(turn = self.world.turn(), event = %event.id, "Event fired");
        Some(event.id.clone())
    }

    fn automated_option(&mut self, event_id: &EventId) -> Result<usize, SimulationError> {
        let event = self
            .catalog
            .event(event_id)
            .ok_or_else(|| SimulationError::UnknownEvent(event_id.clone()))?;
        let index = self
            .option_policy
            .choose_option(event, &self.world, &mut self.rng);
        let options = event.options.len();
        if index < options {
            return Ok(index);
        }
        warn!(event = %event_id, index, options, "Option policy returned an out-of-range index, using 0");
        self.pending.skipped.push(EffectWarning {
            source: format!("event {event_id}"),
            effect: format!("option {index}"),
            message: format!("option policy chose index {index} of {options} options, used option 0"),
        });
        Ok(0)
    }

    fn apply_option(&mut self, event_id: &EventId, index: usize) -> Result<EventRecord, SimulationError> {
        let event = self
            .catalog
            .event(event_id)
            .ok_or_else(|| SimulationError::UnknownEvent(event_id.clone()))?;
        let option = events::resolve_option(event, index).ok_or_else(|| {
            SimulationError::OptionOutOfRange {
                event: event_id.clone(),
                index,
                options: event.options.len(),
            }
        })?;

        let source = format!("event {} option {}", event.id, option.label);
        let report = apply_effects(&option.effects, &mut self.world, &source);
        self.pending.skipped.extend(report.skipped);
        info!(event = %event.id, option = %option.label, "Event option resolved");

        Ok(EventRecord {
            event_id: event.id.clone(),
            title: event.title.clone(),
            option_index: u32::try_from(index).unwrap_or(u32::MAX),
            option_label: option.label.clone(),
        })
    }

    /// Evaluate victory, close the turn, and emit its summary.
    fn finish_turn(&mut self, event: Option<EventRecord>) -> TurnSummary {
        let verdict = self.victory.evaluate(&self.world);
        let turn = self.world.turn();
        self.world.advance_turn();

        let decisive = verdict.outcome.is_decisive();
        let stalemate = !decisive && self.world.turns_completed() >= self.max_turns;
        let reason = if stalemate {
            format!(
                "Turn limit of {} reached without a decisive outcome",
                self.max_turns
            )
        } else {
            verdict.reason
        };
        let game_over = decisive || stalemate;

        let pending = std::mem::take(&mut self.pending);
        let summary = TurnSummary {
            turn,
            actions: pending.actions,
            event,
            progress: self.world.progress().snapshot(),
            outcome: verdict.outcome,
            reason,
            skipped_effects: pending.skipped,
            game_over,
        };

        self.outcome = verdict.outcome;
        self.phase = if game_over {
            Phase::GameOver
        } else {
            Phase::Resolved
        };

        info!(
            turn,
            fci = summary.progress.frontier_capability,
            ari = summary.progress.alignment_readiness,
            skipped = summary.skipped_effects.len(),
            outcome = ?summary.outcome,
            "Turn resolved"
        );
        if game_over {
            info!(turn, outcome = ?summary.outcome, reason = %summary.reason, "Game over");
        }

        self.news.push(summary.clone());
        self.last_summary = Some(summary.clone());
        summary
    }
}
