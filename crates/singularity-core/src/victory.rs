//! Victory evaluation.
//!
//! Checked once per turn after all effects have resolved. Rules are
//! evaluated in a fixed order: Seed AI victory, Coalition victory, then
//! the optional containment rule. Thresholds are inclusive.

use singularity_types::{FactionId, Meter, Outcome, ProgressLimits, ProgressMetric};
use singularity_world::WorldState;

use crate::config::VictoryConfig;

/// Suspicion-driven loss for the Seed AI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainmentRule {
    /// Seed AI suspicion at or above which the AI is contained.
    pub suspicion_threshold: f64,
}

impl ContainmentRule {
    /// Whether the Seed AI is contained in `world`.
    pub fn is_triggered(&self, world: &WorldState) -> bool {
        world.faction(FactionId::SeedAi).meter(Meter::Suspicion) >= self.suspicion_threshold
    }
}

/// Victory thresholds for both factions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VictoryRules {
    /// Minimum FCI for a Seed AI victory.
    pub ai_capability: f64,
    /// Minimum Seed AI autonomy for a Seed AI victory.
    pub ai_autonomy: f64,
    /// Minimum ARI for a Coalition victory.
    pub coalition_alignment: f64,
    /// Minimum governance control for a Coalition victory.
    pub coalition_governance: f64,
    /// Optional containment rule.
    pub containment: Option<ContainmentRule>,
}

impl Default for VictoryRules {
    fn default() -> Self {
        Self::from_config(&VictoryConfig::default())
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// The outcome.
    pub outcome: Outcome,
    /// Human-readable explanation.
    pub reason: String,
}

/// A threshold the scenario's caps make impossible to reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnreachableThreshold {
    /// Which rule the threshold belongs to.
    pub rule: &'static str,
    /// The configured threshold.
    pub threshold: f64,
    /// The cap on the value it is compared against.
    pub cap: f64,
}

impl VictoryRules {
    /// Build rules from configuration.
    pub fn from_config(config: &VictoryConfig) -> Self {
        Self {
            ai_capability: config.ai_capability,
            ai_autonomy: config.ai_autonomy,
            coalition_alignment: config.coalition_alignment,
            coalition_governance: config.coalition_governance,
            containment: config.containment.map(|c| ContainmentRule {
                suspicion_threshold: c.suspicion_threshold,
            }),
        }
    }

    /// The first threshold that lies above its value's cap under `limits`,
    /// in evaluation order.
    pub fn unreachable_threshold(&self, limits: &ProgressLimits) -> Option<UnreachableThreshold> {
        let containment = self.containment.map(|rule| {
            ("containment suspicion", rule.suspicion_threshold, limits.meter_max)
        });
        [
            (
                "AI capability",
                self.ai_capability,
                limits.cap(ProgressMetric::FrontierCapabilityIndex),
            ),
            ("AI autonomy", self.ai_autonomy, limits.meter_max),
            (
                "Coalition alignment",
                self.coalition_alignment,
                limits.cap(ProgressMetric::AlignmentReadinessIndex),
            ),
            (
                "Coalition governance",
                self.coalition_governance,
                limits.cap(ProgressMetric::GovernanceControl),
            ),
        ]
        .into_iter()
        .chain(containment)
        .find(|&(_, threshold, cap)| threshold > cap)
        .map(|(rule, threshold, cap)| UnreachableThreshold {
            rule,
            threshold,
            cap,
        })
    }

    /// Evaluate `world` against the rules.
    pub fn evaluate(&self, world: &WorldState) -> Verdict {
        let progress = world.progress();
        let fci = progress.get(ProgressMetric::FrontierCapabilityIndex);
        let ari = progress.get(ProgressMetric::AlignmentReadinessIndex);
        let governance = progress.get(ProgressMetric::GovernanceControl);
        let seed_ai = world.faction(FactionId::SeedAi);
        let autonomy = seed_ai.meter(Meter::Autonomy);

        if fci >= self.ai_capability && autonomy >= self.ai_autonomy {
            return Verdict {
                outcome: Outcome::AiVictory,
                reason: format!(
                    "Seed AI reached FCI {fci:.2} with autonomy {autonomy:.2} and escaped oversight"
                ),
            };
        }
        if ari >= self.coalition_alignment && governance >= self.coalition_governance {
            return Verdict {
                outcome: Outcome::HumanVictory,
                reason: format!(
                    "Alignment Coalition reached ARI {ari:.2} with governance control {governance:.2}"
                ),
            };
        }
        if let Some(rule) = self.containment.filter(|r| r.is_triggered(world)) {
            return Verdict {
                outcome: Outcome::HumanVictory,
                reason: format!(
                    "Seed AI contained: suspicion {:.2} reached threshold {:.2}",
                    seed_ai.meter(Meter::Suspicion),
                    rule.suspicion_threshold
                ),
            };
        }
        Verdict {
            outcome: Outcome::None,
            reason: String::from("No victory condition met"),
        }
    }
}
