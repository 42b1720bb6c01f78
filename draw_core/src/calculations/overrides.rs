//! Manual diameter overrides.
//!
//! Operators edit individual diameters of a computed schedule. Each edited
//! stage gets its two adjacent reductions recomputed; tensiles and
//! temperatures are then recomputed for the whole schedule because the
//! tensile models depend on the span ends.

use super::schedule::ScheduleSeries;
use crate::equations::{area_reduction, reapply_auto_angles, round_to, temperature_rises};
use crate::errors::DrawResult;
use crate::materials::{DeltaThresholds, TensileModel};
use crate::units::UnitSystem;
use crate::value::NumberLike;

/// Settings the override pass needs from the request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideContext {
    pub unit_system: UnitSystem,
    pub decimals: u32,
    pub tensile: TensileModel,
    pub thresholds: DeltaThresholds,
    /// Re-run the automatic angle heuristic afterwards
    pub auto_angles: bool,
}

/// Apply caller-edited diameters, one entry per stage, in the caller's units.
///
/// Returns the stages that changed. Entries that are not positive numbers
/// are logged and skipped.
pub fn apply(series: &mut ScheduleSeries, overrides: &[NumberLike], ctx: &OverrideContext) -> DrawResult<Vec<usize>> {
    let mut changed = Vec::new();
    let last = series.diameters.len().saturating_sub(1);

    for (i, entry) in overrides.iter().enumerate().take(series.diameters.len()) {
        let Some(value) = entry.as_f64().filter(|v| *v > 0.0) else {
            tracing::warn!(stage = i, value = %entry, "skipping unusable manual diameter");
            continue;
        };
        let current = ctx.unit_system.from_metric_mm(series.diameters[i]);
        if round_to(value, ctx.decimals) == round_to(current, ctx.decimals) {
            continue;
        }

        series.diameters[i] = ctx.unit_system.to_metric_mm(value);
        if i > 0 {
            series.reductions[i] = round_to(area_reduction(series.diameters[i - 1], series.diameters[i]), 1);
        }
        if i < last {
            series.reductions[i + 1] = round_to(area_reduction(series.diameters[i], series.diameters[i + 1]), 1);
        }
        tracing::debug!(stage = i, diameter = value, "manual diameter applied");
        changed.push(i);
    }

    series.tensiles = ctx.tensile.series(&series.diameters)?;
    series.temperatures = temperature_rises(&series.reductions, &series.tensiles);
    if ctx.auto_angles {
        series.deltas = reapply_auto_angles(
            &series.diameters,
            &mut series.angles,
            ctx.thresholds.low,
            ctx.thresholds.high,
        );
    }
    Ok(changed)
}
