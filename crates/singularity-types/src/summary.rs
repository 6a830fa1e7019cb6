//! Turn records emitted by the orchestrator.
//!
//! A [`TurnSummary`] is built once per resolved turn and never mutated. It is
//! the only artifact the engine hands outward after a turn; the presentation
//! layer reads it and may discard it afterwards.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{FactionId, Outcome, RejectionReason};
use crate::ids::{ActionId, EventId};
use crate::snapshot::ProgressSnapshot;

/// One faction's action attempt during a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionRecord {
    /// The acting faction.
    pub faction: FactionId,
    /// The submitted action, or `None` for a pass.
    pub action_id: Option<ActionId>,
    /// Display name of the action (`"Pass"` for a pass).
    pub action_name: String,
    /// Whether the cost and effects were applied.
    pub applied: bool,
    /// Why the gate refused the action, when it did.
    pub rejection: Option<RejectionReason>,
}

impl ActionRecord {
    /// Record a faction passing its turn.
    pub fn pass(faction: FactionId) -> Self {
        Self {
            faction,
            action_id: None,
            action_name: String::from("Pass"),
            applied: false,
            rejection: None,
        }
    }

    /// Whether the faction passed.
    pub const fn is_pass(&self) -> bool {
        self.action_id.is_none()
    }
}

/// The event that fired during a turn and the option taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventRecord {
    /// Event key.
    pub event_id: EventId,
    /// Event headline.
    pub title: String,
    /// Index of the chosen option.
    pub option_index: u32,
    /// Label of the chosen option.
    pub option_label: String,
}

/// An effect the resolver skipped instead of applying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EffectWarning {
    /// What produced the effect (action or event option).
    pub source: String,
    /// The effect, rendered for humans.
    pub effect: String,
    /// Why it was skipped.
    pub message: String,
}

/// Immutable record of one resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TurnSummary {
    /// The turn number that was resolved (first turn is 1).
    pub turn: u32,
    /// Action attempts in resolution order.
    pub actions: Vec<ActionRecord>,
    /// The fired event, if any.
    pub event: Option<EventRecord>,
    /// Progress indices after the turn.
    pub progress: ProgressSnapshot,
    /// Game outcome after the turn.
    pub outcome: Outcome,
    /// Human-readable explanation of the outcome.
    pub reason: String,
    /// Effects skipped while resolving this turn.
    pub skipped_effects: Vec<EffectWarning>,
    /// Whether this turn ended the game (victory or stalemate).
    pub game_over: bool,
}

impl TurnSummary {
    /// The action record of `faction`, if it acted this turn.
    pub fn action_of(&self, faction: FactionId) -> Option<&ActionRecord> {
        self.actions.iter().find(|r| r.faction == faction)
    }

    /// One-line headline for a news feed.
    pub fn headline(&self) -> String {
        let event = self
            .event
            .as_ref()
            .map_or_else(String::new, |e| format!(" | {}: {}", e.title, e.option_label));
        format!(
            "Turn {} | FCI {:.2} ARI {:.2}{event}",
            self.turn, self.progress.frontier_capability, self.progress.alignment_readiness
        )
    }
}
