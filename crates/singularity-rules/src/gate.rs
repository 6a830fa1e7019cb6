//! Eligibility and cost gate.
//!
//! Decides whether an action or event is currently legal without touching
//! world state. Action validation runs four stages in order:
//!
//! 1. Faction -- does the action belong to the acting faction?
//! 2. Cost -- can the faction pay every resource in the cost?
//! 3. Flags -- are all required flags present and all forbidden flags absent?
//! 4. One-shot -- has the action's granted flag already been raised?
//!
//! Every function here takes shared references only, so calling it any
//! number of times with unchanged inputs yields the same answer.

use singularity_types::{
    ActionDefinition, ContentCatalog, EventDefinition, FactionId, RejectionReason, ResourceType,
};
use singularity_world::{FactionState, FlagSet, WorldError, WorldState};

/// Validate `action` for `faction` against the current world flags.
///
/// Returns `Ok(())` if the action may be applied, or the first
/// [`RejectionReason`] encountered.
pub fn check_action(
    action: &ActionDefinition,
    faction: &FactionState,
    flags: &FlagSet,
) -> Result<(), RejectionReason> {
    // Stage 1: Faction
    if action.faction != faction.faction() {
        return Err(RejectionReason::WrongFaction);
    }

    // Stage 2: Cost
    validate_cost(action, faction)?;

    // Stage 3: Flags
    validate_flags(action, flags)?;

    // Stage 4: One-shot
    if let Some(flag) = action.grants_flag.as_ref().filter(|f| flags.contains(f)) {
        return Err(RejectionReason::AlreadyGranted { flag: flag.clone() });
    }

    Ok(())
}

/// Whether `action` may currently be applied by `faction`.
pub fn can_apply(action: &ActionDefinition, faction: &FactionState, flags: &FlagSet) -> bool {
    check_action(action, faction, flags).is_ok()
}

/// Stage 2: every cost entry must be covered by the faction's holdings.
fn validate_cost(action: &ActionDefinition, faction: &FactionState) -> Result<(), RejectionReason> {
    faction
        .check_cost(&action.cost)
        .map_err(|e| cost_rejection(action, &e))
}

/// Map a failed cost check or payment onto a rejection reason.
pub(crate) fn cost_rejection(action: &ActionDefinition, err: &WorldError) -> RejectionReason {
    let resource = match err {
        WorldError::InsufficientResource { resource, .. } => *resource,
        // Only shortfalls are expected here; blame the first cost entry.
        _ => action
            .cost
            .keys()
            .next()
            .copied()
            .unwrap_or(ResourceType::Budget),
    };
    RejectionReason::InsufficientResources { resource }
}

/// Stage 3: required flags present, forbidden flags absent.
fn validate_flags(action: &ActionDefinition, flags: &FlagSet) -> Result<(), RejectionReason> {
    if let Some(flag) = action.required_flags.iter().find(|f| !flags.contains(f)) {
        return Err(RejectionReason::MissingRequiredFlag { flag: flag.clone() });
    }
    if let Some(flag) = action.forbidden_flags.iter().find(|f| flags.contains(f)) {
        return Err(RejectionReason::ForbiddenFlagPresent { flag: flag.clone() });
    }
    Ok(())
}

/// Every action `faction` could apply right now, in authoring order.
pub fn available_actions<'a>(
    catalog: &'a ContentCatalog,
    world: &WorldState,
    faction: FactionId,
) -> Vec<&'a ActionDefinition> {
    let state = world.faction(faction);
    catalog
        .actions_for(faction)
        .filter(|a| can_apply(a, state, world.flags()))
        .collect()
}

/// Whether `event` may fire on `turn` given the world flags.
///
/// One-shot events are modelled through flags: an option sets a flag that
/// the event lists as forbidden, so the event stays in the catalog but is
/// never eligible again.
pub fn event_is_eligible(event: &EventDefinition, turn: u32, flags: &FlagSet) -> bool {
    event.contains_turn(turn)
        && event.required_flag.as_ref().is_none_or(|f| flags.contains(f))
        && event.forbidden_flag.as_ref().is_none_or(|f| !flags.contains(f))
}
