//! # Speed & Throughput
//!
//! Wire volume is conserved through the line, so a stage runs slower than
//! the exit by the area ratio:
//!
//! ```text
//! v_i = (d_last / d_i)² · v_exit
//! ```
//!
//! Output mass flow of steel wire at the exit:
//!
//! ```text
//! W = 22.195352 · d² · v     [kg/h, d in mm, v in m/s]
//! ```
//!
//! 22.195352 is 7850 kg/m³ · π/4 · 3600 s/h scaled for mm².

use serde::{Deserialize, Serialize};

use crate::units::{MassFlowUnit, SpeedUnit};

/// kg/h per (mm² · m/s) of steel wire
pub const STEEL_MASS_FLOW_FACTOR: f64 = 22.195352;

/// Stage speeds and exit mass flow in the caller's units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Throughput {
    pub speeds: Vec<f64>,
    pub total_weight: f64,
}

/// Speed at every stage in m/s.
///
/// Zero everywhere when the exit speed is zero; a zero diameter runs at 0.
pub fn stage_speeds_mps(diameters: &[f64], exit_speed_mps: f64) -> Vec<f64> {
    let Some(&last) = diameters.last() else {
        return Vec::new();
    };
    diameters
        .iter()
        .map(|&d| {
            if exit_speed_mps == 0.0 || d == 0.0 {
                0.0
            } else {
                (last / d).powi(2) * exit_speed_mps
            }
        })
        .collect()
}

/// Exit mass flow in kg/h.
pub fn mass_flow_kg_per_hour(finish_mm: f64, exit_speed_mps: f64) -> f64 {
    if exit_speed_mps == 0.0 {
        return 0.0;
    }
    STEEL_MASS_FLOW_FACTOR * finish_mm.powi(2) * exit_speed_mps
}

/// Speeds and weight for a schedule.
///
/// `exit_speed` is in `speed_unit`; `finish_mm` is the requested finish
/// diameter, which may differ from the last stage after manual edits.
pub fn calculate(
    diameters: &[f64],
    finish_mm: f64,
    exit_speed: f64,
    speed_unit: SpeedUnit,
    output_unit: MassFlowUnit,
) -> Throughput {
    let v = speed_unit.to_mps(exit_speed);
    let speeds = stage_speeds_mps(diameters, v)
        .into_iter()
        .map(|s| speed_unit.from_mps(s))
        .collect();
    let total_weight = output_unit.from_kg_per_hour(mass_flow_kg_per_hour(finish_mm, v));
    Throughput { speeds, total_weight }
}
