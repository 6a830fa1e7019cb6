//! Faction and event-option policies.
//!
//! When a faction is automated, the orchestrator asks its [`FactionPolicy`]
//! for one action (or a pass) per turn, passing only the actions the gate
//! currently allows. When an event fires during an automated turn, an
//! [`OptionPolicy`] picks the option. Both are swappable strategies; none
//! of the built-ins is canonical.
//!
//! All randomness comes from the simulation's single seeded [`SimRng`], so
//! a playthrough is reproducible from its seed.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use singularity_types::{
    ActionDefinition, ActionId, Effect, EventDefinition, FactionId, Meter, ProgressMetric,
};
use singularity_world::WorldState;

use crate::config::{OptionPolicyKind, PolicyKind};

/// The simulation's random number generator.
pub type SimRng = ChaCha8Rng;

/// Default amplitude of the jitter [`ProgressPolicy`] adds to each score.
pub const DEFAULT_JITTER: f64 = 0.1;

/// A source of action decisions for an automated faction.
pub trait FactionPolicy: std::fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Pick one of `legal` for `faction`, or `None` to pass.
    ///
    /// `legal` is already filtered by the gate and ordered as authored.
    fn choose_action(
        &mut self,
        faction: FactionId,
        world: &WorldState,
        legal: &[&ActionDefinition],
        rng: &mut SimRng,
    ) -> Option<ActionId>;
}

/// Always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassPolicy;

impl FactionPolicy for PassPolicy {
    fn name(&self) -> &'static str {
        "pass"
    }

    fn choose_action(
        &mut self,
        _faction: FactionId,
        _world: &WorldState,
        _legal: &[&ActionDefinition],
        _rng: &mut SimRng,
    ) -> Option<ActionId> {
        None
    }
}

/// Uniform choice over the legal actions. Passes only when nothing is legal.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl FactionPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_action(
        &mut self,
        _faction: FactionId,
        _world: &WorldState,
        legal: &[&ActionDefinition],
        rng: &mut SimRng,
    ) -> Option<ActionId> {
        if legal.is_empty() {
            return None;
        }
        let index = rng.random_range(0..legal.len());
        legal.get(index).map(|a| a.id.clone())
    }
}

/// Greedy policy that scores each legal action by how far its effects move
/// the world toward the faction's own victory condition.
///
/// A small uniform jitter is added to every score so that equally good
/// actions are not always resolved the same way. The policy passes when
/// every legal action scores below zero.
#[derive(Debug, Clone, Copy)]
pub struct ProgressPolicy {
    jitter: f64,
}

impl ProgressPolicy {
    /// Create a policy with the given jitter amplitude.
    pub const fn new(jitter: f64) -> Self {
        Self { jitter }
    }

    /// Score an action's effects from `faction`'s point of view.
    pub fn score(faction: FactionId, action: &ActionDefinition) -> f64 {
        action
            .effects
            .iter()
            .map(|effect| effect_value(faction, effect))
            .sum()
    }
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_JITTER)
    }
}

impl FactionPolicy for ProgressPolicy {
    fn name(&self) -> &'static str {
        "progress"
    }

    fn choose_action(
        &mut self,
        faction: FactionId,
        _world: &WorldState,
        legal: &[&ActionDefinition],
        rng: &mut SimRng,
    ) -> Option<ActionId> {
        let mut best: Option<(f64, &ActionDefinition)> = None;
        for &action in legal {
            let noise = rng.random::<f64>() * self.jitter;
            let score = Self::score(faction, action) + noise;
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, action));
            }
        }
        best.filter(|(score, _)| *score >= 0.0)
            .map(|(_, action)| action.id.clone())
    }
}

/// Value of one effect toward `faction`'s victory condition.
///
/// The Seed AI wants capability and autonomy and fears suspicion; the
/// Coalition wants alignment readiness and governance and gains from
/// whatever the AI loses.
fn effect_value(faction: FactionId, effect: &Effect) -> f64 {
    let sign = match faction {
        FactionId::SeedAi => 1.0,
        FactionId::AlignmentCoalition => -1.0,
    };
    match effect {
        Effect::AdjustProgress { metric, amount } => {
            let weight = match metric {
                ProgressMetric::FrontierCapabilityIndex => 1.0,
                ProgressMetric::AutomationLevel => 0.5,
                ProgressMetric::AlignmentReadinessIndex => -1.0,
                ProgressMetric::GovernanceControl => -2.0,
            };
            sign * weight * amount
        }
        Effect::AdjustMeter {
            faction: target,
            meter,
            amount,
        } => match (target, meter) {
            (FactionId::SeedAi, Meter::Autonomy) => sign * 2.0 * amount,
            (FactionId::SeedAi, Meter::Suspicion) => -sign * amount,
            (FactionId::AlignmentCoalition, Meter::Legitimacy) => -sign * 0.5 * amount,
            _ => 0.0,
        },
        Effect::AddResource {
            faction: target,
            amount,
            ..
        } if *target == faction => 0.05 * amount,
        Effect::AddResource { .. }
        | Effect::ModifyRegionStat { .. }
        | Effect::ChangeGlobalMarket { .. }
        | Effect::SetFlag { .. } => 0.0,
    }
}

/// Build the configured built-in policy.
pub fn build_policy(kind: PolicyKind) -> Box<dyn FactionPolicy> {
    match kind {
        PolicyKind::Pass => Box::new(PassPolicy),
        PolicyKind::Random => Box::new(RandomPolicy),
        PolicyKind::Progress => Box::new(ProgressPolicy::default()),
    }
}

// ---------------------------------------------------------------------------
// Event options
// ---------------------------------------------------------------------------

/// Picks an event option during automated turns.
pub trait OptionPolicy: std::fmt::Debug {
    /// Index into `event.options`. Must be in range when the event has options.
    fn choose_option(
        &mut self,
        event: &EventDefinition,
        world: &WorldState,
        rng: &mut SimRng,
    ) -> usize;
}

/// Uniform random over the options.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformOptionPolicy;

impl OptionPolicy for UniformOptionPolicy {
    fn choose_option(
        &mut self,
        event: &EventDefinition,
        _world: &WorldState,
        rng: &mut SimRng,
    ) -> usize {
        if event.options.is_empty() {
            0
        } else {
            rng.random_range(0..event.options.len())
        }
    }
}

/// Always the first option.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstOptionPolicy;

impl OptionPolicy for FirstOptionPolicy {
    fn choose_option(
        &mut self,
        _event: &EventDefinition,
        _world: &WorldState,
        _rng: &mut SimRng,
    ) -> usize {
        0
    }
}

/// Build the configured option policy.
pub fn build_option_policy(kind: OptionPolicyKind) -> Box<dyn OptionPolicy> {
    match kind {
        OptionPolicyKind::Uniform => Box::new(UniformOptionPolicy),
        OptionPolicyKind::First => Box::new(FirstOptionPolicy),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng;
    use singularity_types::{
        ContentCatalog, EventOption, FactionSetup, ProgressLimits, ScenarioParameters,
    };

    use super::*;

    fn world() -> WorldState {
        let catalog = ContentCatalog {
            scenario: ScenarioParameters {
                name: String::from("Policy"),
                description: String::new(),
                max_turns: 3,
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
        WorldState::from_catalog(&catalog).unwrap()
    }

    fn action(id: &str, faction: FactionId, effects: Vec<Effect>) -> ActionDefinition {
        ActionDefinition {
            id: id.into(),
            name: id.to_owned(),
            description: String::new(),
            faction,
            cost: BTreeMap::new(),
            required_flags: Vec::new(),
            forbidden_flags: Vec::new(),
            grants_flag: None,
            effects,
        }
    }

    fn fci(amount: f64) -> Effect {
        Effect::AdjustProgress {
            metric: ProgressMetric::FrontierCapabilityIndex,
            amount,
        }
    }

    fn ari(amount: f64) -> Effect {
        Effect::AdjustProgress {
            metric: ProgressMetric::AlignmentReadinessIndex,
            amount,
        }
    }

    #[test]
    fn pass_policy_always_passes() {
        let w = world();
        let a = action("a", FactionId::SeedAi, vec![fci(1.0)]);
        let mut rng = SimRng::seed_from_u64(1);
        assert!(PassPolicy.choose_action(FactionId::SeedAi, &w, &[&a], &mut rng).is_none());
    }

    #[test]
    fn random_policy_picks_from_legal() {
        let w = world();
        let a = action("a", FactionId::SeedAi, Vec::new());
        let b = action("b", FactionId::SeedAi, Vec::new());
        let mut rng = SimRng::seed_from_u64(2);
        for _ in 0..20 {
            let pick = RandomPolicy
                .choose_action(FactionId::SeedAi, &w, &[&a, &b], &mut rng)
                .unwrap();
            assert!(pick == a.id || pick == b.id);
        }
        assert!(RandomPolicy.choose_action(FactionId::SeedAi, &w, &[], &mut rng).is_none());
    }

    #[test]
    fn progress_policy_prefers_own_victory() {
        let w = world();
        let capability = action("capability", FactionId::SeedAi, vec![fci(1.0)]);
        let alignment = action("alignment", FactionId::AlignmentCoalition, vec![ari(1.0)]);
        let mut rng = SimRng::seed_from_u64(3);
        let mut policy = ProgressPolicy::default();

        let ai_pick = policy
            .choose_action(FactionId::SeedAi, &w, &[&alignment, &capability], &mut rng)
            .unwrap();
        assert_eq!(ai_pick, capability.id);

        let human_pick = policy
            .choose_action(
                FactionId::AlignmentCoalition,
                &w,
                &[&capability, &alignment],
                &mut rng,
            )
            .unwrap();
        assert_eq!(human_pick, alignment.id);
    }

    #[test]
    fn progress_policy_passes_on_harmful_menu() {
        let w = world();
        let harmful = action("harmful", FactionId::SeedAi, vec![ari(2.0)]);
        let mut rng = SimRng::seed_from_u64(4);
        let mut policy = ProgressPolicy::new(0.0);
        assert!(policy
            .choose_action(FactionId::SeedAi, &w, &[&harmful], &mut rng)
            .is_none());
    }

    #[test]
    fn score_counts_suspicion_against_ai() {
        let noisy = action(
            "noisy",
            FactionId::SeedAi,
            vec![Effect::AdjustMeter {
                faction: FactionId::SeedAi,
                meter: Meter::Suspicion,
                amount: 1.0,
            }],
        );
        assert!(ProgressPolicy::score(FactionId::SeedAi, &noisy) < 0.0);
        assert!(ProgressPolicy::score(FactionId::AlignmentCoalition, &noisy) > 0.0);
    }

    #[test]
    fn option_policies_stay_in_range() {
        let w = world();
        let event = EventDefinition {
            id: "e".into(),
            title: String::from("E"),
            description: String::new(),
            weight: 1.0,
            min_turn: 1,
            max_turn: None,
            required_flag: None,
            forbidden_flag: None,
            options: (0..3)
                .map(|i| EventOption {
                    label: format!("option {i}"),
                    description: String::new(),
                    effects: Vec::new(),
                })
                .collect(),
        };
        let mut rng = SimRng::seed_from_u64(5);
        for _ in 0..50 {
            assert!(UniformOptionPolicy.choose_option(&event, &w, &mut rng) < 3);
        }
        assert_eq!(FirstOptionPolicy.choose_option(&event, &w, &mut rng), 0);
    }
}
