//! Tensile Strength Models
//!
//! Tensile force along the schedule as a function of the incoming diameter
//! `a` and the current diameter `d`.
//!
//! ## Empirical families
//!
//! ```text
//! high carbon  HC = 5.83·√C + 100·(C − 0.7) + 120·√(a/d)
//! low carbon   LC = 88 + 77·C − 50·(d/a)² − 12
//! stainless    SS = 75 + 1667·C·(1 − (d/a)²)
//! ```
//!
//! Each catalog grade offsets its family base and scales the kgf/mm² result
//! by standard gravity. `C` is the carbon-equivalent coefficient.
//!
//! ## Custom
//!
//! Linear in the area reduction: the minimum bound at the incoming wire and
//! the maximum at the span's total reduction.

use serde::{Deserialize, Serialize};

use super::{Material, MaterialFamily};
use crate::equations::{area_reduction, round_int, STANDARD_GRAVITY};
use crate::errors::{DrawError, DrawResult};

/// Caller bounds for the Custom material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomBounds {
    pub min: f64,
    pub max: f64,
}

/// Tensile model selected once per request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TensileModel {
    /// Closed-form family formula
    Empirical { material: Material, carbon: f64 },
    /// Interpolation between caller bounds
    Interpolated(CustomBounds),
}

impl TensileModel {
    /// Build the model for a material, requiring bounds for Custom.
    pub fn new(material: Material, carbon: f64, bounds: Option<CustomBounds>) -> DrawResult<Self> {
        if material.is_custom() {
            let bounds = bounds.ok_or_else(|| DrawError::missing_field("tensileMin/tensileMax"))?;
            return Ok(TensileModel::Interpolated(bounds));
        }
        if carbon < 0.0 {
            return Err(DrawError::invalid_input(
                "carbon",
                carbon.to_string(),
                "Carbon coefficient cannot be negative",
            ));
        }
        Ok(TensileModel::Empirical { material, carbon })
    }

    /// Tensile at `current` for a span running `initial` → `finish`.
    ///
    /// `finish` only matters for the Custom model, where a zero total
    /// reduction over the span has no defined interpolation.
    pub fn tensile_at(&self, initial: f64, current: f64, finish: f64) -> DrawResult<f64> {
        match *self {
            TensileModel::Empirical { material, carbon } => Ok(empirical(material, carbon, initial, current)),
            TensileModel::Interpolated(bounds) => {
                let span = area_reduction(initial, finish);
                if span == 0.0 {
                    return Err(DrawError::calculation_failed(
                        "Custom tensile",
                        format!("no area reduction between {} and {}", initial, finish),
                    ));
                }
                let reduction = area_reduction(initial, current);
                Ok(bounds.min + reduction * ((bounds.max - bounds.min) / span))
            }
        }
    }

    /// Rounded tensile for every stage of a schedule (span = first → last).
    pub fn series(&self, diameters: &[f64]) -> DrawResult<Vec<i64>> {
        let (Some(&initial), Some(&finish)) = (diameters.first(), diameters.last()) else {
            return Ok(Vec::new());
        };
        diameters
            .iter()
            .map(|&d| self.tensile_at(initial, d, finish).map(round_int))
            .collect()
    }
}

fn empirical(material: Material, carbon: f64, initial: f64, current: f64) -> f64 {
    let base = match material.family() {
        MaterialFamily::HighCarbon => high_carbon(carbon, initial, current),
        MaterialFamily::LowCarbon => low_carbon(carbon, initial, current),
        MaterialFamily::Stainless => stainless(carbon, initial, current),
        MaterialFamily::Custom => return 0.0,
    };
    let graded = match material {
        Material::HighCarbonLow => base - 15.0,
        Material::HighCarbonHigh => base - 7.5,
        Material::LowCarbonHigh => base + 12.0,
        _ => base,
    };
    graded * STANDARD_GRAVITY
}

fn high_carbon(carbon: f64, initial: f64, current: f64) -> f64 {
    if current == 0.0 {
        return 0.0;
    }
    5.83 * carbon.sqrt() + 100.0 * (carbon - 0.7) + 120.0 * (initial / current).sqrt()
}

fn low_carbon(carbon: f64, initial: f64, current: f64) -> f64 {
    88.0 + 77.0 * carbon - 50.0 * (current / initial).powi(2) - 12.0
}

fn stainless(carbon: f64, initial: f64, current: f64) -> f64 {
    75.0 + 1667.0 * carbon * (1.0 - (current / initial).powi(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empirical_model(material: Material, carbon: f64) -> TensileModel {
        TensileModel::new(material, carbon, None).unwrap()
    }

    #[test]
    fn test_custom_hits_bounds_at_span_ends() {
        let model = TensileModel::new(Material::Custom, 0.0, Some(CustomBounds { min: 300.0, max: 700.0 })).unwrap();
        assert_eq!(model.tensile_at(10.0, 10.0, 5.0).unwrap(), 300.0);
        assert!((model.tensile_at(10.0, 5.0, 5.0).unwrap() - 700.0).abs() < 1e-9);
        assert_eq!(model.series(&[10.0, 7.07, 5.0]).unwrap(), vec![300, 567, 700]);
    }

    #[test]
    fn test_custom_requires_bounds() {
        let err = TensileModel::new(Material::Custom, 0.5, None).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_custom_zero_span_fails() {
        let model = TensileModel::Interpolated(CustomBounds { min: 1.0, max: 2.0 });
        assert!(model.tensile_at(5.0, 5.0, 5.0).is_err());
    }

    #[test]
    fn test_high_carbon_grades_are_offsets_of_one_base() {
        let mid = empirical_model(Material::HighCarbonMid, 0.7).tensile_at(5.0, 2.5, 2.5).unwrap();
        let low = empirical_model(Material::HighCarbonLow, 0.7).tensile_at(5.0, 2.5, 2.5).unwrap();
        let high = empirical_model(Material::HighCarbonHigh, 0.7).tensile_at(5.0, 2.5, 2.5).unwrap();
        assert!((mid - low - 15.0 * STANDARD_GRAVITY).abs() < 1e-9);
        assert!((mid - high - 7.5 * STANDARD_GRAVITY).abs() < 1e-9);
        // C = 0.7: 5.83·√0.7 + 120·√2
        let expected = (5.83 * 0.7_f64.sqrt() + 120.0 * 2.0_f64.sqrt()) * STANDARD_GRAVITY;
        assert!((mid - expected).abs() < 1e-9);
    }

    #[test]
    fn test_low_carbon_at_incoming_wire() {
        // 88 + 77·0.1 − 50 − 12 = 33.7, +12 for the High grade
        let low = empirical_model(Material::LowCarbonLow, 0.1).tensile_at(6.0, 6.0, 3.0).unwrap();
        let high = empirical_model(Material::LowCarbonHigh, 0.1).tensile_at(6.0, 6.0, 3.0).unwrap();
        assert!((low - 33.7 * STANDARD_GRAVITY).abs() < 1e-9);
        assert!((high - 45.7 * STANDARD_GRAVITY).abs() < 1e-9);
    }

    #[test]
    fn test_stainless_grades_share_formula() {
        let a = empirical_model(Material::Stainless300, 0.08).series(&[4.0, 3.0, 2.0]).unwrap();
        let b = empirical_model(Material::Stainless400, 0.08).series(&[4.0, 3.0, 2.0]).unwrap();
        assert_eq!(a, b);
        // 75·9.81 at the incoming wire
        assert_eq!(a[0], 736);
    }

    #[test]
    fn test_negative_carbon_rejected() {
        assert!(TensileModel::new(Material::HighCarbonMid, -0.1, None).is_err());
    }

    #[test]
    fn test_empty_series() {
        assert!(empirical_model(Material::LowCarbonLow, 0.1).series(&[]).unwrap().is_empty());
    }
}
