//! # Die Geometry Formulas
//!
//! Per-stage quantities derived from adjacent diameters: area reduction,
//! temperature rise, capstan delta, and the automatic bearing-angle choice.
//!
//! ## Notation
//!
//! - `d₀` = diameter entering the die (previous stage)
//! - `d₁` = diameter leaving the die (current stage)
//! - `R`  = area reduction in percent
//! - `F`  = tensile force at the stage
//! - `α`  = bearing (approach) angle in degrees
//! - `δ`  = capstan delta
//!
//! Series are indexed by stage: entry 0 is the incoming wire and carries no
//! reduction, temperature, angle or delta.

use super::numeric::{round_all, round_int};
use super::STANDARD_GRAVITY;

/// Stage pairs with a raw reduction below this percentage are collapsed.
pub const STAGE_COLLAPSE_THRESHOLD_PCT: f64 = 1.0;

/// Angle every die starts from in automatic mode (degrees)
pub const AUTO_SEED_ANGLE: u32 = 12;

/// Angle assigned when the delta is below the material's low threshold
pub const STEEP_ANGLE: u32 = 16;

/// Angle assigned when the delta is above the material's high threshold
pub const SHALLOW_ANGLE: u32 = 9;

/// Percentage decrease in cross-sectional area from `initial` to `final_d`.
///
/// # Formula
/// R = 100 − 100·(d₁/d₀)²
///
/// Returns 0 when either diameter is zero or the pair has opposite signs.
///
/// # Example
/// ```rust
/// use draw_core::equations::geometry::area_reduction;
///
/// assert!((area_reduction(10.0, 5.0) - 75.0).abs() < 1e-12);
/// assert_eq!(area_reduction(0.0, 5.0), 0.0);
/// ```
#[inline]
pub fn area_reduction(initial: f64, final_d: f64) -> f64 {
    if initial * final_d <= 0.0 {
        return 0.0;
    }
    100.0 - 100.0 * final_d.powi(2) / initial.powi(2)
}

/// Reduction series with the near-duplicate stage collapse applied.
///
/// Walks the schedule once. When the raw reduction from stage `i-1` to stage
/// `i` is below [`STAGE_COLLAPSE_THRESHOLD_PCT`], the two stages are merged by
/// overwriting `diameters[i-1]` with `diameters[i]`; that step then reports a
/// zero reduction. The edit is intentional and happens in place, so callers
/// see the collapsed diameters.
///
/// Reductions are returned rounded to 1 decimal; entry 0 is always 0.
///
/// # Example
/// ```rust
/// use draw_core::equations::geometry::reductions_collapsing_near_duplicates;
///
/// let mut diameters = vec![10.0, 8.0, 7.99, 6.0];
/// let reductions = reductions_collapsing_near_duplicates(&mut diameters);
/// assert_eq!(diameters, vec![10.0, 7.99, 7.99, 6.0]);
/// assert_eq!(reductions[2], 0.0);
/// ```
pub fn reductions_collapsing_near_duplicates(diameters: &mut [f64]) -> Vec<f64> {
    let mut reductions = vec![0.0; diameters.len()];
    for i in 1..diameters.len() {
        let mut reduction = area_reduction(diameters[i - 1], diameters[i]);
        if reduction < STAGE_COLLAPSE_THRESHOLD_PCT {
            diameters[i - 1] = diameters[i];
            reduction = area_reduction(diameters[i - 1], diameters[i]);
        }
        reductions[i] = reduction;
    }
    round_all(&reductions, 1)
}

/// Temperature rise per stage in Celsius degrees, rounded to an integer.
///
/// # Formula
/// ΔT = R·F / (k·g), with k = 25 for stage 1 and k = 30 for stages ≥ 2
///
/// Stage 0 is always 0.
///
/// # Example
/// ```rust
/// use draw_core::equations::geometry::temperature_rises;
///
/// let temps = temperature_rises(&[0.0, 29.3, 29.3], &[1000, 1200, 1400]);
/// assert_eq!(temps[0], 0);
/// assert_eq!(temps[1], 143); // 29.3·1200 / 25 / 9.81
/// assert_eq!(temps[2], 139); // 29.3·1400 / 30 / 9.81
/// ```
pub fn temperature_rises(reductions: &[f64], tensiles: &[i64]) -> Vec<i64> {
    let n = reductions.len().min(tensiles.len());
    let mut temps = vec![0; n];
    for i in 2..n {
        temps[i] = round_int(reductions[i] * tensiles[i] as f64 / 30.0 / STANDARD_GRAVITY);
    }
    if n > 1 {
        temps[1] = round_int(reductions[1] * tensiles[1] as f64 / 25.0 / STANDARD_GRAVITY);
    }
    temps
}

/// Capstan delta for a single die.
///
/// # Formula
/// δ = ((d₀ + d₁)/(d₀ − d₁))·sin(α/2)
///
/// Zero when the wire does not get thinner or the angle is 0; negative
/// results clamp to 0.
///
/// # Example
/// ```rust
/// use draw_core::equations::geometry::capstan_delta;
///
/// let delta = capstan_delta(10.0, 8.41, 12);
/// assert!((delta - 1.2103).abs() < 1e-3);
/// assert_eq!(capstan_delta(5.0, 5.0, 12), 0.0);
/// ```
pub fn capstan_delta(d_prev: f64, d_cur: f64, angle_deg: u32) -> f64 {
    if d_prev <= d_cur || angle_deg == 0 {
        return 0.0;
    }
    let half_angle = (f64::from(angle_deg) / 2.0).to_radians();
    let delta = ((d_prev + d_cur) / (d_prev - d_cur)) * half_angle.sin();
    if delta > 0.0 {
        delta
    } else {
        0.0
    }
}

/// Deltas for every die, one entry per step (stage `i+1` uses `angles[i]`).
///
/// The result has `diameters.len() - 1` entries; a missing angle counts as 0.
pub fn capstan_deltas(diameters: &[f64], angles: &[u32]) -> Vec<f64> {
    diameters
        .windows(2)
        .enumerate()
        .map(|(i, pair)| capstan_delta(pair[0], pair[1], angles.get(i).copied().unwrap_or(0)))
        .collect()
}

/// One pass of the automatic angle heuristic.
///
/// For every step whose `round(δ·100)` is below `delta_low` the die gets
/// [`STEEP_ANGLE`]; above `delta_high` it gets [`SHALLOW_ANGLE`]. Other dies
/// keep their current angle.
pub fn adjust_angles_for_deltas(deltas: &[f64], angles: &mut [u32], delta_low: u32, delta_high: u32) {
    for (angle, &delta) in angles.iter_mut().zip(deltas) {
        let scaled = round_int(delta * 100.0);
        if scaled < i64::from(delta_low) {
            *angle = STEEP_ANGLE;
        }
        if scaled > i64::from(delta_high) {
            *angle = SHALLOW_ANGLE;
        }
    }
}

/// Automatic angle assignment: seed every die at [`AUTO_SEED_ANGLE`], apply
/// one heuristic pass, and return the adjusted angles with their deltas.
pub fn auto_angles(diameters: &[f64], delta_low: u32, delta_high: u32) -> (Vec<u32>, Vec<f64>) {
    let dies = diameters.len().saturating_sub(1);
    let mut angles = vec![AUTO_SEED_ANGLE; dies];
    let deltas = reapply_auto_angles(diameters, &mut angles, delta_low, delta_high);
    (angles, deltas)
}

/// Re-run the heuristic from the current angles, then recompute deltas once.
///
/// A single correction pass; the result is not iterated to convergence.
pub fn reapply_auto_angles(diameters: &[f64], angles: &mut [u32], delta_low: u32, delta_high: u32) -> Vec<f64> {
    let deltas = capstan_deltas(diameters, angles);
    adjust_angles_for_deltas(&deltas, angles, delta_low, delta_high);
    capstan_deltas(diameters, angles)
}
