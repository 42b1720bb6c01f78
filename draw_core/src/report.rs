//! # Schedule Report
//!
//! The column-oriented output record front ends consume, in the caller's
//! unit system.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "dies": [0, 1, 2],
//!   "diameters": [5.5, 3.32, 2.0],
//!   "reductions": [0.0, 63.6, 63.7],
//!   "angles": [0, 16, 16],
//!   "tensiles": [1078, 1293, 1600],
//!   "deltas": [0.0, 0.694, 0.694],
//!   "delta_low": 120,
//!   "delta_high": 189,
//!   "temperatures": [0, 334, 262],
//!   "total_reduction": 86.8,
//!   "stock": [],
//!   "speeds": [1.32, 3.63, 10.0],
//!   "totalweight": [887.81]
//! }
//! ```
//!
//! Imperial output divides diameters and deltas by 25.4 (diameters rounded
//! to the request precision, deltas to 3 decimals) and scales temperature
//! rises by 1.8 (an increment, so no +32).

use serde::{Deserialize, Serialize};

use crate::calculations::DrawingSchedule;
use crate::equations::{round_int, round_to};
use crate::units::UnitSystem;

/// Decimals kept for imperial deltas
pub const IMPERIAL_DELTA_DECIMALS: u32 = 3;

/// Output record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub dies: Vec<usize>,
    pub diameters: Vec<f64>,
    pub reductions: Vec<f64>,
    pub angles: Vec<u32>,
    pub tensiles: Vec<i64>,
    pub deltas: Vec<f64>,
    pub delta_low: u32,
    pub delta_high: u32,
    pub temperatures: Vec<i64>,
    pub total_reduction: f64,
    /// Stock flags per stage; empty when stock dies were not used
    pub stock: Vec<bool>,
    pub speeds: Vec<f64>,
    /// Output mass flow, as a single element
    pub totalweight: Vec<f64>,
}

impl ScheduleReport {
    pub fn from_schedule(schedule: &DrawingSchedule) -> Self {
        let stages = &schedule.stages;
        let system = schedule.unit_system;

        let (diameters, deltas) = match system {
            UnitSystem::Metric => (
                stages.iter().map(|s| s.diameter_mm).collect(),
                stages.iter().map(|s| s.delta).collect(),
            ),
            UnitSystem::Imperial => (
                stages
                    .iter()
                    .map(|s| round_to(system.from_metric_mm(s.diameter_mm), schedule.decimals))
                    .collect(),
                stages
                    .iter()
                    .map(|s| round_to(system.from_metric_mm(s.delta), IMPERIAL_DELTA_DECIMALS))
                    .collect(),
            ),
        };
        let temperatures = stages
            .iter()
            .map(|s| round_int(system.from_celsius_delta(s.temperature_rise as f64)))
            .collect();

        ScheduleReport {
            dies: stages.iter().map(|s| s.stage).collect(),
            diameters,
            reductions: stages.iter().map(|s| s.reduction_pct).collect(),
            angles: stages.iter().map(|s| s.angle_deg).collect(),
            tensiles: stages.iter().map(|s| s.tensile).collect(),
            deltas,
            delta_low: schedule.delta_thresholds.low,
            delta_high: schedule.delta_thresholds.high,
            temperatures,
            total_reduction: schedule.total_reduction,
            stock: stages.iter().filter_map(|s| s.in_stock).collect(),
            speeds: stages.iter().map(|s| s.speed).collect(),
            totalweight: vec![schedule.total_weight],
        }
    }
}

impl From<&DrawingSchedule> for ScheduleReport {
    fn from(schedule: &DrawingSchedule) -> Self {
        ScheduleReport::from_schedule(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{calculate, DieStage};
    use crate::materials::{DeltaThresholds, StockDieTable};
    use crate::request::DrawingRequest;

    fn stage(stage: usize, diameter_mm: f64, delta: f64, temperature_rise: i64) -> DieStage {
        DieStage {
            stage,
            diameter_mm,
            reduction_pct: 0.0,
            tensile: 1000,
            temperature_rise,
            angle_deg: 12,
            delta,
            in_stock: None,
            speed: 0.0,
        }
    }

    fn schedule(system: UnitSystem) -> DrawingSchedule {
        DrawingSchedule {
            strategy: "Linear".into(),
            stages: vec![stage(0, 12.7, 0.0, 0), stage(1, 10.16, 1.5, 100)],
            total_reduction: 36.0,
            delta_thresholds: DeltaThresholds { low: 120, high: 189 },
            total_weight: 42.0,
            unit_system: system,
            decimals: 3,
        }
    }

    #[test]
    fn test_metric_passes_values_through() {
        let report = ScheduleReport::from_schedule(&schedule(UnitSystem::Metric));
        assert_eq!(report.dies, vec![0, 1]);
        assert_eq!(report.diameters, vec![12.7, 10.16]);
        assert_eq!(report.deltas, vec![0.0, 1.5]);
        assert_eq!(report.temperatures, vec![0, 100]);
        assert_eq!(report.totalweight, vec![42.0]);
        assert!(report.stock.is_empty());
    }

    #[test]
    fn test_imperial_conversion() {
        let report = ScheduleReport::from_schedule(&schedule(UnitSystem::Imperial));
        assert_eq!(report.diameters, vec![0.5, 0.4]);
        assert_eq!(report.deltas, vec![0.0, 0.059]);
        assert_eq!(report.temperatures, vec![0, 180]);
        // Tensiles and reductions carry no length unit
        assert_eq!(report.tensiles, vec![1000, 1000]);
    }

    #[test]
    fn test_wire_field_names() {
        let report = ScheduleReport::from_schedule(&schedule(UnitSystem::Metric));
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "dies",
            "diameters",
            "reductions",
            "angles",
            "tensiles",
            "deltas",
            "delta_low",
            "delta_high",
            "temperatures",
            "total_reduction",
            "stock",
            "speeds",
            "totalweight",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_imperial_request_reports_inches() {
        let request = DrawingRequest::new(0.5, 0.25, 4)
            .with_unit_system(UnitSystem::Imperial)
            .with_decimals(3);
        let schedule = calculate(&request.normalize().unwrap(), &StockDieTable::default()).unwrap();
        let report = ScheduleReport::from(&schedule);
        assert_eq!(report.diameters.first(), Some(&0.5));
        assert_eq!(report.diameters.last(), Some(&0.25));
    }
}
