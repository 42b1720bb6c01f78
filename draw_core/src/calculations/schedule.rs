//! # Die Schedule
//!
//! Runs one request end to end:
//!
//! 1. Select the drafting strategy and produce the diameters
//! 2. Derive reductions, tensiles, temperatures, angles and deltas
//! 3. Optionally snap to stock dies and derive again
//! 4. Optionally apply manual diameter overrides
//! 5. Compute stage speeds and output weight
//!
//! Everything here is metric; the caller's units are restored by
//! [`crate::report::ScheduleReport`].
//!
//! ## Example
//!
//! ```rust
//! use draw_core::calculations::schedule::calculate;
//! use draw_core::materials::StockDieTable;
//! use draw_core::request::DrawingRequest;
//!
//! let input = DrawingRequest::new(10.0, 5.0, 4).normalize().unwrap();
//! let schedule = calculate(&input, &StockDieTable::default()).unwrap();
//! assert_eq!(schedule.stages.len(), 5);
//! assert_eq!(schedule.total_reduction, 75.0);
//! ```

use serde::{Deserialize, Serialize};

use super::overrides::{self, OverrideContext};
use super::progression::{DraftingStrategy, ProgressionInput};
use super::speed;
use crate::equations::{
    area_reduction, auto_angles, capstan_deltas, reductions_collapsing_near_duplicates, round_to, temperature_rises,
};
use crate::errors::DrawResult;
use crate::materials::{DeltaThresholds, StockDieTable};
use crate::request::{AngleAssignment, AngleMode, DrawingInput};
use crate::units::UnitSystem;

/// One die of the schedule (stage 0 is the incoming wire)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieStage {
    pub stage: usize,
    /// Diameter leaving this stage (mm)
    pub diameter_mm: f64,
    /// Area reduction from the previous stage (%)
    pub reduction_pct: f64,
    pub tensile: i64,
    /// Temperature rise (°C)
    pub temperature_rise: i64,
    /// Bearing angle (degrees), 0 at stage 0
    pub angle_deg: u32,
    pub delta: f64,
    /// Present only when stock dies were used
    pub in_stock: Option<bool>,
    /// Drawing speed in the request's speed unit
    pub speed: f64,
}

/// Computed schedule, metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSchedule {
    pub strategy: String,
    pub stages: Vec<DieStage>,
    /// Area reduction from initial to finish (%)
    pub total_reduction: f64,
    pub delta_thresholds: DeltaThresholds,
    /// Output mass flow in the request's mass-flow unit
    pub total_weight: f64,
    pub unit_system: UnitSystem,
    pub decimals: u32,
}

/// Column series of a schedule while it is being computed.
///
/// Per-stage columns have `dies + 1` entries; `angles` and `deltas` have one
/// entry per die.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSeries {
    pub diameters: Vec<f64>,
    pub reductions: Vec<f64>,
    pub tensiles: Vec<i64>,
    pub temperatures: Vec<i64>,
    pub angles: Vec<u32>,
    pub deltas: Vec<f64>,
    pub in_stock: Option<Vec<bool>>,
}

impl ScheduleSeries {
    /// Stage-oriented view, with stage 0 carrying no angle or delta.
    pub fn stages(&self, speeds: &[f64]) -> Vec<DieStage> {
        (0..self.diameters.len())
            .map(|i| DieStage {
                stage: i,
                diameter_mm: self.diameters[i],
                reduction_pct: self.reductions.get(i).copied().unwrap_or(0.0),
                tensile: self.tensiles.get(i).copied().unwrap_or(0),
                temperature_rise: self.temperatures.get(i).copied().unwrap_or(0),
                angle_deg: i.checked_sub(1).and_then(|die| self.angles.get(die)).copied().unwrap_or(0),
                delta: i.checked_sub(1).and_then(|die| self.deltas.get(die)).copied().unwrap_or(0.0),
                in_stock: self.in_stock.as_ref().and_then(|flags| flags.get(i)).copied(),
                speed: speeds.get(i).copied().unwrap_or(0.0),
            })
            .collect()
    }
}

/// Compute the die schedule for a validated request.
pub fn calculate(input: &DrawingInput, table: &StockDieTable) -> DrawResult<DrawingSchedule> {
    let strategy = DraftingStrategy::select(
        input.drafting,
        input.skin_pass_reduction_pct,
        input.last_reduction_pct,
        input.dies,
    )?;
    tracing::debug!(strategy = strategy.name(), dies = input.dies, "drafting strategy selected");

    let progression = strategy.diameters(&ProgressionInput {
        initial: input.initial_mm,
        finish: input.finish_mm,
        dies: input.dies,
        decimals: input.decimals,
        tensile: input.tensile,
    })?;

    let thresholds = input.material.delta_thresholds();
    let mut diameters = progression.diameters;
    let (reductions, tensiles) = match progression.solved {
        Some(solved) => (solved.reductions, solved.tensiles),
        None => {
            let reductions = reductions_collapsing_near_duplicates(&mut diameters);
            let tensiles = input.tensile.series(&diameters)?;
            (reductions, tensiles)
        }
    };
    let mut total_reduction = overall_reduction(&diameters);
    let (angles, deltas) = assign_angles(&input.angles, &diameters, thresholds);

    let mut series = ScheduleSeries {
        temperatures: temperature_rises(&reductions, &tensiles),
        diameters,
        reductions,
        tensiles,
        angles,
        deltas,
        in_stock: None,
    };

    if input.use_stock_dies {
        snap_to_stock(&mut series, table, input.initial_mm, thresholds);
        total_reduction = overall_reduction(&series.diameters);
    }

    if let Some(manual) = &input.manual_diameters {
        let ctx = OverrideContext {
            unit_system: input.unit_system,
            decimals: input.decimals,
            tensile: input.tensile,
            thresholds,
            auto_angles: input.angle_mode == AngleMode::Auto,
        };
        let changed = overrides::apply(&mut series, manual, &ctx)?;
        tracing::debug!(?changed, "manual overrides applied");
    }

    let throughput = speed::calculate(
        &series.diameters,
        input.finish_mm,
        input.exit_speed,
        input.speed_unit,
        input.output_unit,
    );

    Ok(DrawingSchedule {
        strategy: strategy.name().to_string(),
        stages: series.stages(&throughput.speeds),
        total_reduction,
        delta_thresholds: thresholds,
        total_weight: throughput.total_weight,
        unit_system: input.unit_system,
        decimals: input.decimals,
    })
}

fn overall_reduction(diameters: &[f64]) -> f64 {
    match (diameters.first(), diameters.last()) {
        (Some(&first), Some(&last)) => round_to(area_reduction(first, last), 1),
        _ => 0.0,
    }
}

fn assign_angles(assignment: &AngleAssignment, diameters: &[f64], thresholds: DeltaThresholds) -> (Vec<u32>, Vec<f64>) {
    let dies = diameters.len().saturating_sub(1);
    let angles = match assignment {
        AngleAssignment::Auto => return auto_angles(diameters, thresholds.low, thresholds.high),
        AngleAssignment::Same(angle) => vec![*angle; dies],
        AngleAssignment::PerDie(angles) => angles.clone(),
        AngleAssignment::None => vec![0; dies],
    };
    let deltas = capstan_deltas(diameters, &angles);
    (angles, deltas)
}

/// Snap to the stock die table and derive the geometry again.
///
/// Snapping uses the angles assigned so far; afterwards the angles are
/// always reassigned automatically for the snapped diameters. Tensiles are
/// kept from before the snap so a solved force series survives.
fn snap_to_stock(series: &mut ScheduleSeries, table: &StockDieTable, initial: f64, thresholds: DeltaThresholds) {
    let outcome = table.snap(&series.diameters, &series.angles);
    let mut diameters = outcome.diameters;
    if let Some(first) = diameters.first_mut() {
        *first = initial;
    }
    let in_stock = outcome.in_stock.iter().filter(|&&flag| flag).count();
    tracing::debug!(in_stock, dies = series.angles.len(), "snapped to stock dies");

    series.reductions = reductions_collapsing_near_duplicates(&mut diameters);
    series.temperatures = temperature_rises(&series.reductions, &series.tensiles);
    let (angles, deltas) = auto_angles(&diameters, thresholds.low, thresholds.high);
    series.angles = angles;
    series.deltas = deltas;
    series.diameters = diameters;
    series.in_stock = Some(outcome.in_stock);
}
