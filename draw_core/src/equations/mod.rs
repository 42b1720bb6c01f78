//! # Wire-Drawing Equations
//!
//! Fundamental formulas used by the schedule calculation. Keeping them in one
//! place makes it easy to check each one against the shop's drafting
//! practice and keeps the evaluation order identical across strategies.
//!
//! ## Modules
//!
//! - [`numeric`] - Power/root helpers and rounding
//! - [`geometry`] - Area reduction, temperature rise, capstan delta, bearing angles
//!
//! ## Conventions
//!
//! - **Diameters**: millimetres
//! - **Reductions**: percent of cross-sectional area, relative to the previous stage
//! - **Tensile**: kgf/mm² scaled by standard gravity (N/mm²)
//! - **Angles**: whole degrees (full included angle of the die cone)

pub mod geometry;
pub mod numeric;

/// Standard gravity used to scale kgf-based formulas (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.81;

pub use geometry::{
    adjust_angles_for_deltas,
    area_reduction,
    auto_angles,
    capstan_delta,
    capstan_deltas,
    reapply_auto_angles,
    reductions_collapsing_near_duplicates,
    temperature_rises,
    AUTO_SEED_ANGLE,
    SHALLOW_ANGLE,
    STEEP_ANGLE,
};

pub use numeric::{power_n, root_n, round_all, round_int, round_to};
