//! The four global progress indices.

use singularity_types::{ProgressLimits, ProgressMetric, ProgressSnapshot};

use crate::error::WorldError;
use crate::scalar;

/// Global progress: FCI, ARI, automation level, and governance control.
///
/// Each index moves only through explicit effects, is clamped at its
/// authored maximum, and never drops below zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressState {
    values: ProgressSnapshot,
}

impl ProgressState {
    /// Create progress with the given starting values.
    pub const fn new(values: ProgressSnapshot) -> Self {
        Self { values }
    }

    /// Current value of `metric`.
    pub const fn get(&self, metric: ProgressMetric) -> f64 {
        self.values.get(metric)
    }

    /// Add a signed delta to `metric`, clamped at the metric's cap in `limits`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WouldGoNegative`] if the metric would drop
    /// below zero; the metric is left untouched.
    pub fn adjust(
        &mut self,
        metric: ProgressMetric,
        delta: f64,
        limits: &ProgressLimits,
    ) -> Result<f64, WorldError> {
        let value = scalar::apply_delta(
            || String::from(metric.short_name()),
            self.get(metric),
            delta,
            Some(limits.cap(metric)),
        )?;
        *self.slot(metric) = value;
        Ok(value)
    }

    /// Copy of the current values.
    pub const fn snapshot(&self) -> ProgressSnapshot {
        self.values
    }

    const fn slot(&mut self, metric: ProgressMetric) -> &mut f64 {
        match metric {
            ProgressMetric::FrontierCapabilityIndex => &mut self.values.frontier_capability,
            ProgressMetric::AlignmentReadinessIndex => &mut self.values.alignment_readiness,
            ProgressMetric::AutomationLevel => &mut self.values.automation,
            ProgressMetric::GovernanceControl => &mut self.values.governance,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fci_clamps_at_ten() {
        let mut p = ProgressState::default();
        let limits = ProgressLimits::default();
        let v = p
            .adjust(ProgressMetric::FrontierCapabilityIndex, 12.0, &limits)
            .unwrap();
        assert!((v - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn automation_clamps_at_two_and_a_half() {
        let mut p = ProgressState::default();
        let limits = ProgressLimits::default();
        let v = p.adjust(ProgressMetric::AutomationLevel, 3.0, &limits).unwrap();
        assert!((v - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn never_below_zero() {
        let mut p = ProgressState::default();
        let limits = ProgressLimits::default();
        assert!(p.adjust(ProgressMetric::GovernanceControl, -0.1, &limits).is_err());
        assert!(p.get(ProgressMetric::GovernanceControl).abs() < f64::EPSILON);
    }

    #[test]
    fn metrics_are_independent() {
        let mut p = ProgressState::default();
        let limits = ProgressLimits::default();
        p.adjust(ProgressMetric::AlignmentReadinessIndex, 1.0, &limits).unwrap();
        assert!(p.get(ProgressMetric::FrontierCapabilityIndex).abs() < f64::EPSILON);
        assert!((p.snapshot().alignment_readiness - 1.0).abs() < f64::EPSILON);
    }
}
