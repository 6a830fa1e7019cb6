//! Rules for the Singularity simulation.
//!
//! This crate decides what is legal and applies what is chosen:
//!
//! - [`gate`] -- pure eligibility checks for actions and events
//! - [`resolver`] -- translation of [`Effect`](singularity_types::Effect)s
//!   into world mutations
//! - [`actions`] -- validate, pay, apply, and grant for one action attempt
//! - [`error`] -- per-effect failure taxonomy

pub mod actions;
pub mod error;
pub mod gate;
pub mod resolver;

pub use actions::{ActionOutcome, execute_action};
pub use error::EffectError;
pub use gate::{available_actions, can_apply, check_action, event_is_eligible};
pub use resolver::{EffectReport, apply_effect, apply_effects};
