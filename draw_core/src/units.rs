//! # Unit Types
//!
//! Type-safe wrappers and unit selectors for the drawing schedule. The engine
//! works in metric internally: diameters in millimetres, speeds in m/s, mass
//! flow in kg/h and temperature rise in Celsius degrees. Callers may work in
//! imperial units; conversion happens only at the request and report edges.
//!
//! ## Example
//!
//! ```rust
//! use draw_core::units::{Inches, Millimeters, UnitSystem};
//!
//! let wire = Inches(0.25);
//! let mm: Millimeters = wire.into();
//! assert!((mm.0 - 6.35).abs() < 1e-12);
//!
//! assert_eq!(UnitSystem::Imperial.to_metric_mm(1.0), 25.4);
//! ```

use serde::{Deserialize, Serialize};

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Metres per foot
pub const M_PER_FT: f64 = 0.3048;

/// Pounds per kilogram
pub const LB_PER_KG: f64 = 2.20462;

/// Fahrenheit degrees per Celsius degree (increment, no offset)
pub const F_PER_C_DELTA: f64 = 1.8;

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 * MM_PER_INCH)
    }
}

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 / MM_PER_INCH)
    }
}

// ============================================================================
// Temperature Rise
// ============================================================================

/// Temperature increment in Celsius degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CelsiusDelta(pub f64);

/// Temperature increment in Fahrenheit degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FahrenheitDelta(pub f64);

impl From<CelsiusDelta> for FahrenheitDelta {
    fn from(c: CelsiusDelta) -> Self {
        FahrenheitDelta(c.0 * F_PER_C_DELTA)
    }
}

// ============================================================================
// Unit Selectors
// ============================================================================

/// Caller's unit system for diameters, deltas and temperature rise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Convert a caller length to millimetres
    pub fn to_metric_mm(self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => Millimeters::from(Inches(value)).0,
        }
    }

    /// Convert millimetres to a caller length
    pub fn from_metric_mm(self, mm: f64) -> f64 {
        match self {
            UnitSystem::Metric => mm,
            UnitSystem::Imperial => Inches::from(Millimeters(mm)).0,
        }
    }

    /// Convert a Celsius temperature increment to the caller's scale
    pub fn from_celsius_delta(self, delta: f64) -> f64 {
        match self {
            UnitSystem::Metric => delta,
            UnitSystem::Imperial => FahrenheitDelta::from(CelsiusDelta(delta)).0,
        }
    }
}

/// Drawing speed unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[default]
    #[serde(rename = "m/s")]
    MetersPerSecond,
    #[serde(rename = "ft/s")]
    FeetPerSecond,
    #[serde(rename = "ft/min")]
    FeetPerMinute,
    #[serde(rename = "m/min")]
    MetersPerMinute,
}

impl SpeedUnit {
    /// Convert a speed in this unit to m/s
    pub fn to_mps(self, value: f64) -> f64 {
        match self {
            SpeedUnit::MetersPerSecond => value,
            SpeedUnit::FeetPerSecond => value * M_PER_FT,
            SpeedUnit::FeetPerMinute => value * M_PER_FT / 60.0,
            SpeedUnit::MetersPerMinute => value / 60.0,
        }
    }

    /// Convert m/s to this unit
    pub fn from_mps(self, mps: f64) -> f64 {
        match self {
            SpeedUnit::MetersPerSecond => mps,
            SpeedUnit::FeetPerSecond => mps / M_PER_FT,
            SpeedUnit::FeetPerMinute => mps / M_PER_FT * 60.0,
            SpeedUnit::MetersPerMinute => mps * 60.0,
        }
    }
}

/// Output mass-flow unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MassFlowUnit {
    #[default]
    #[serde(rename = "kg/h")]
    KgPerHour,
    #[serde(rename = "ton/h")]
    TonPerHour,
    #[serde(rename = "lb/h")]
    LbPerHour,
    #[serde(rename = "lb/min")]
    LbPerMinute,
}

impl MassFlowUnit {
    /// Convert kg/h to this unit
    pub fn from_kg_per_hour(self, kg_h: f64) -> f64 {
        match self {
            MassFlowUnit::KgPerHour => kg_h,
            MassFlowUnit::TonPerHour => kg_h / 1000.0,
            MassFlowUnit::LbPerHour => kg_h * LB_PER_KG,
            MassFlowUnit::LbPerMinute => (kg_h * LB_PER_KG) / 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_mm() {
        let mm: Millimeters = Inches(2.0).into();
        assert_eq!(mm.0, 50.8);
    }

    #[test]
    fn test_temperature_increment_has_no_offset() {
        let f: FahrenheitDelta = CelsiusDelta(10.0).into();
        assert_eq!(f.0, 18.0);
        assert_eq!(UnitSystem::Imperial.from_celsius_delta(0.0), 0.0);
    }

    #[test]
    fn test_unit_system_lengths() {
        assert_eq!(UnitSystem::Metric.to_metric_mm(3.2), 3.2);
        assert!((UnitSystem::Imperial.from_metric_mm(6.35) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_speed_units_roundtrip() {
        for unit in [
            SpeedUnit::MetersPerSecond,
            SpeedUnit::FeetPerSecond,
            SpeedUnit::FeetPerMinute,
            SpeedUnit::MetersPerMinute,
        ] {
            let back = unit.from_mps(unit.to_mps(12.5));
            assert!((back - 12.5).abs() < 1e-9, "{:?}", unit);
        }
        assert!((SpeedUnit::MetersPerMinute.to_mps(600.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_mass_flow_units() {
        assert_eq!(MassFlowUnit::TonPerHour.from_kg_per_hour(2500.0), 2.5);
        assert!((MassFlowUnit::LbPerMinute.from_kg_per_hour(60.0) - 2.20462).abs() < 1e-12);
    }

    #[test]
    fn test_selector_serialization() {
        assert_eq!(serde_json::to_string(&SpeedUnit::FeetPerMinute).unwrap(), "\"ft/min\"");
        let unit: MassFlowUnit = serde_json::from_str("\"lb/h\"").unwrap();
        assert_eq!(unit, MassFlowUnit::LbPerHour);
        let system: UnitSystem = serde_json::from_str("\"imperial\"").unwrap();
        assert_eq!(system, UnitSystem::Imperial);
    }
}
