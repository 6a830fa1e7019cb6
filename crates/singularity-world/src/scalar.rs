//! Floor-checked arithmetic shared by every mutable scalar in the world.
//!
//! Resources, meters, progress indices, region stats, and market indices all
//! follow the same rule: a delta that would take the value below zero is
//! rejected, never clamped. Values may be clamped at an upper cap.

use crate::error::WorldError;

/// Tolerance under which a tiny negative result is treated as zero.
///
/// Repeated float subtraction (`0.3 - 0.1 - 0.2`) can land a hair below
/// zero; such results snap to exactly `0.0`.
pub const AMOUNT_EPSILON: f64 = 1e-9;

/// Apply `delta` to `current`, rejecting results below zero and clamping at
/// `cap` when one is given.
///
/// # Errors
///
/// Returns [`WorldError::NonFiniteDelta`] for NaN or infinite deltas and
/// [`WorldError::WouldGoNegative`] when the result would be negative.
pub fn apply_delta(
    target: impl FnOnce() -> String,
    current: f64,
    delta: f64,
    cap: Option<f64>,
) -> Result<f64, WorldError> {
    if !delta.is_finite() {
        return Err(WorldError::NonFiniteDelta {
            target: target(),
            delta,
        });
    }

    let next = current + delta;
    if next < -AMOUNT_EPSILON {
        return Err(WorldError::WouldGoNegative {
            target: target(),
            current,
            delta,
        });
    }

    let floored = next.max(0.0);
    Ok(cap.map_or(floored, |c| floored.min(c)))
}

/// Whether `held` covers `required`, within [`AMOUNT_EPSILON`].
pub const fn covers(held: f64, required: f64) -> bool {
    held + AMOUNT_EPSILON >= required
}
