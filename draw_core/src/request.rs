//! # Drawing Requests
//!
//! [`DrawingRequest`] is the wire record a front end sends: camelCase JSON,
//! numbers as numbers or strings, lengths in the caller's unit system.
//! [`DrawingRequest::normalize`] validates it and produces a
//! [`DrawingInput`] in metric units, which is all the calculation sees.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "initialDiameter": 5.5,
//!   "finishDiameter": 2.0,
//!   "dies": 8,
//!   "carbon": 0.7,
//!   "materialIndex": "High Carbon - Mid",
//!   "draftingType": "Full Taper",
//!   "finalReductionPercentage": 15,
//!   "isSkinPass": false,
//!   "usingStockDies": true,
//!   "angleMode": "auto",
//!   "selectedSystem": "metric",
//!   "selectedSpeed": "m/s",
//!   "selectedOutput": "kg/h",
//!   "finalspeed": 12,
//!   "decimals": 3
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use draw_core::request::DrawingRequest;
//! use draw_core::units::UnitSystem;
//!
//! let request = DrawingRequest::new(0.25, 0.1, 6)
//!     .with_unit_system(UnitSystem::Imperial)
//!     .with_decimals(3);
//! let input = request.normalize().unwrap();
//! assert!((input.initial_mm - 6.35).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::DraftingType;
use crate::errors::{DrawError, DrawResult};
use crate::materials::{CustomBounds, Material, TensileModel};
use crate::units::{MassFlowUnit, SpeedUnit, UnitSystem};
use crate::value::{required, NumberLike};

/// Skin-pass final reduction used when the request leaves it out (%)
pub const DEFAULT_SKIN_PASS_REDUCTION: f64 = 10.0;

/// Precision used when the request leaves it out
pub const DEFAULT_DECIMALS: u32 = 2;

/// Precision forced when diameters are snapped to stock dies
pub const STOCK_DIE_DECIMALS: u32 = 2;

/// Largest precision accepted
pub const MAX_DECIMALS: u32 = 10;

/// Largest die count accepted
pub const MAX_DIES: usize = 500;

/// Material given as a catalog index or a catalog name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaterialSelector {
    Index(f64),
    Name(String),
}

impl MaterialSelector {
    /// Numbers and numeric text are catalog indices; other text is a name.
    pub fn resolve(&self) -> DrawResult<Material> {
        let index = match self {
            MaterialSelector::Index(n) => NumberLike::Number(*n),
            MaterialSelector::Name(name) => NumberLike::Text(name.clone()),
        };
        match index.as_f64() {
            Some(value) if value.fract() != 0.0 => Err(DrawError::invalid_input(
                "materialIndex",
                value.to_string(),
                "Expected a whole number",
            )),
            Some(value) => Material::from_index(value as i64),
            None => match self {
                MaterialSelector::Name(name) => Material::from_str_flexible(name),
                MaterialSelector::Index(n) => Err(DrawError::material_not_found(format!("index {}", n))),
            },
        }
    }
}

impl From<Material> for MaterialSelector {
    fn from(material: Material) -> Self {
        MaterialSelector::Index(material.index() as f64)
    }
}

/// How bearing angles are assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    /// Heuristic from the capstan delta
    #[default]
    Auto,
    /// One angle for every die
    Same,
    /// Caller list, one angle per die
    Single,
    /// No angles (all zero)
    None,
}

/// Resolved angle assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AngleAssignment {
    Auto,
    Same(u32),
    PerDie(Vec<u32>),
    None,
}

/// Wire-format drawing request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRequest {
    pub initial_diameter: Option<NumberLike>,
    pub finish_diameter: Option<NumberLike>,
    pub dies: Option<NumberLike>,
    pub carbon: Option<NumberLike>,
    pub material_index: Option<MaterialSelector>,
    pub tensile_min: Option<NumberLike>,
    pub tensile_max: Option<NumberLike>,
    #[serde(default)]
    pub drafting_type: DraftingType,
    /// Target last-step reduction for Full Taper (%)
    pub final_reduction_percentage: Option<NumberLike>,
    #[serde(default)]
    pub is_skin_pass: bool,
    pub final_reduction_percentage_skin_pass: Option<NumberLike>,
    #[serde(default)]
    pub using_stock_dies: bool,
    #[serde(default)]
    pub angle_mode: AngleMode,
    #[serde(default)]
    pub angles_per_die: Vec<NumberLike>,
    pub angle: Option<NumberLike>,
    #[serde(default)]
    pub selected_system: UnitSystem,
    #[serde(default)]
    pub selected_speed: SpeedUnit,
    #[serde(default)]
    pub selected_output: MassFlowUnit,
    #[serde(rename = "finalspeed")]
    pub final_speed: Option<NumberLike>,
    pub decimals: Option<NumberLike>,
    #[serde(default)]
    pub is_manual: bool,
    #[serde(default)]
    pub manual_diameters: Vec<NumberLike>,
}

/// Validated request in metric units
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingInput {
    pub initial_mm: f64,
    pub finish_mm: f64,
    pub dies: usize,
    pub material: Material,
    pub tensile: TensileModel,
    pub drafting: DraftingType,
    /// Full Taper last-step reduction (%), when given
    pub last_reduction_pct: Option<f64>,
    /// Skin-pass final reduction (%), when a skin pass is requested
    pub skin_pass_reduction_pct: Option<f64>,
    pub decimals: u32,
    pub use_stock_dies: bool,
    /// Angle mode as requested, before any fallback to auto
    pub angle_mode: AngleMode,
    pub angles: AngleAssignment,
    pub unit_system: UnitSystem,
    pub speed_unit: SpeedUnit,
    pub output_unit: MassFlowUnit,
    /// Exit speed in the request's speed unit
    pub exit_speed: f64,
    /// Manual diameters in the caller's units, exactly `dies + 1` entries
    pub manual_diameters: Option<Vec<NumberLike>>,
}

impl DrawingRequest {
    /// Metric Linear request for a High Carbon - Low wire with carbon 0.7
    pub fn new(initial: f64, finish: f64, dies: u32) -> Self {
        DrawingRequest {
            initial_diameter: Some(initial.into()),
            finish_diameter: Some(finish.into()),
            dies: Some(f64::from(dies).into()),
            carbon: Some(0.7.into()),
            material_index: Some(Material::HighCarbonLow.into()),
            ..Default::default()
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material_index = Some(material.into());
        self
    }

    pub fn with_carbon(mut self, carbon: f64) -> Self {
        self.carbon = Some(carbon.into());
        self
    }

    pub fn with_custom_bounds(mut self, min: f64, max: f64) -> Self {
        self.material_index = Some(Material::Custom.into());
        self.tensile_min = Some(min.into());
        self.tensile_max = Some(max.into());
        self
    }

    pub fn with_drafting(mut self, drafting: DraftingType) -> Self {
        self.drafting_type = drafting;
        self
    }

    pub fn with_last_reduction(mut self, pct: f64) -> Self {
        self.final_reduction_percentage = Some(pct.into());
        self
    }

    pub fn with_skin_pass(mut self, final_reduction_pct: f64) -> Self {
        self.is_skin_pass = true;
        self.final_reduction_percentage_skin_pass = Some(final_reduction_pct.into());
        self
    }

    pub fn with_stock_dies(mut self) -> Self {
        self.using_stock_dies = true;
        self
    }

    pub fn with_same_angle(mut self, angle: u32) -> Self {
        self.angle_mode = AngleMode::Same;
        self.angle = Some(f64::from(angle).into());
        self
    }

    pub fn with_angles_per_die(mut self, angles: &[u32]) -> Self {
        self.angle_mode = AngleMode::Single;
        self.angles_per_die = angles.iter().map(|&a| f64::from(a).into()).collect();
        self
    }

    pub fn with_angle_mode(mut self, mode: AngleMode) -> Self {
        self.angle_mode = mode;
        self
    }

    pub fn with_unit_system(mut self, system: UnitSystem) -> Self {
        self.selected_system = system;
        self
    }

    pub fn with_speed(mut self, speed: f64, unit: SpeedUnit) -> Self {
        self.final_speed = Some(speed.into());
        self.selected_speed = unit;
        self
    }

    pub fn with_output_unit(mut self, unit: MassFlowUnit) -> Self {
        self.selected_output = unit;
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(f64::from(decimals).into());
        self
    }

    pub fn with_manual_diameters(mut self, diameters: &[f64]) -> Self {
        self.is_manual = true;
        self.manual_diameters = diameters.iter().map(|&d| d.into()).collect();
        self
    }

    /// Validate and convert to metric.
    pub fn normalize(&self) -> DrawResult<DrawingInput> {
        let system = self.selected_system;

        let initial_mm = system.to_metric_mm(required(self.initial_diameter.as_ref(), "initialDiameter")?);
        let finish_mm = system.to_metric_mm(required(self.finish_diameter.as_ref(), "finishDiameter")?);
        for (field, value) in [("initialDiameter", initial_mm), ("finishDiameter", finish_mm)] {
            if value <= 0.0 {
                return Err(DrawError::invalid_input(
                    field,
                    value.to_string(),
                    "Missing initial or finish diameter",
                ));
            }
        }

        let dies = whole_number(required(self.dies.as_ref(), "dies")?, "dies")?;
        if dies == 0 {
            return Err(DrawError::invalid_input("dies", "0", "At least one die is required"));
        }
        if dies > MAX_DIES {
            return Err(DrawError::invalid_input(
                "dies",
                dies.to_string(),
                format!("At most {} dies are supported", MAX_DIES),
            ));
        }

        let material = self
            .material_index
            .as_ref()
            .ok_or_else(|| DrawError::missing_field("materialIndex"))?
            .resolve()?;
        let tensile = self.tensile_model(material, initial_mm, finish_mm)?;

        let decimals = if self.using_stock_dies {
            STOCK_DIE_DECIMALS
        } else {
            self.precision()?
        };

        let last_reduction_pct = self
            .final_reduction_percentage
            .as_ref()
            .map(|v| v.require("finalReductionPercentage"))
            .transpose()?;
        if let Some(pct) = last_reduction_pct {
            if !(0.0..100.0).contains(&pct) {
                return Err(DrawError::invalid_input(
                    "finalReductionPercentage",
                    pct.to_string(),
                    "Last reduction must be at least 0 and below 100",
                ));
            }
        }

        let skin_pass_reduction_pct = if self.is_skin_pass {
            let pct = self
                .final_reduction_percentage_skin_pass
                .as_ref()
                .map(|v| v.require("finalReductionPercentageSkinPass"))
                .transpose()?
                .unwrap_or(DEFAULT_SKIN_PASS_REDUCTION);
            if pct <= 0.0 || pct >= 100.0 {
                return Err(DrawError::invalid_input(
                    "finalReductionPercentageSkinPass",
                    pct.to_string(),
                    "Final reduction must be between 0 and 100",
                ));
            }
            Some(pct)
        } else {
            None
        };

        let exit_speed = match &self.final_speed {
            Some(value) => value.as_f64().unwrap_or_else(|| {
                tracing::warn!(value = %value, "unreadable final speed, using 0");
                0.0
            }),
            None => 0.0,
        };

        Ok(DrawingInput {
            initial_mm,
            finish_mm,
            dies,
            material,
            tensile,
            drafting: self.drafting_type,
            last_reduction_pct,
            skin_pass_reduction_pct,
            decimals,
            use_stock_dies: self.using_stock_dies,
            angle_mode: self.angle_mode,
            angles: self.angle_assignment(dies)?,
            unit_system: system,
            speed_unit: self.selected_speed,
            output_unit: self.selected_output,
            exit_speed,
            manual_diameters: self.manual_diameters(dies),
        })
    }

    fn tensile_model(&self, material: Material, initial_mm: f64, finish_mm: f64) -> DrawResult<TensileModel> {
        if !material.is_custom() {
            let carbon = required(self.carbon.as_ref(), "carbon")?;
            return TensileModel::new(material, carbon, None);
        }
        // Custom bounds are already in the engine's tensile unit; the unit
        // system only affects lengths.
        let bounds = CustomBounds {
            min: required(self.tensile_min.as_ref(), "tensileMin")?,
            max: required(self.tensile_max.as_ref(), "tensileMax")?,
        };
        if initial_mm == finish_mm {
            return Err(DrawError::invalid_input(
                "finishDiameter",
                finish_mm.to_string(),
                "Custom tensile needs a non-zero total reduction",
            ));
        }
        let carbon = self.carbon.as_ref().and_then(NumberLike::as_f64).unwrap_or(0.0);
        TensileModel::new(material, carbon, Some(bounds))
    }

    fn precision(&self) -> DrawResult<u32> {
        let Some(value) = &self.decimals else {
            return Ok(DEFAULT_DECIMALS);
        };
        let decimals = whole_number(value.require("decimals")?, "decimals")?;
        u32::try_from(decimals)
            .ok()
            .filter(|&d| d <= MAX_DECIMALS)
            .ok_or_else(|| {
                DrawError::invalid_input("decimals", decimals.to_string(), "Precision must be between 0 and 10")
            })
    }

    fn angle_assignment(&self, dies: usize) -> DrawResult<AngleAssignment> {
        match self.angle_mode {
            AngleMode::Auto => Ok(AngleAssignment::Auto),
            AngleMode::None => Ok(AngleAssignment::None),
            AngleMode::Same => match &self.angle {
                Some(value) => Ok(AngleAssignment::Same(angle_degrees(value, "angle")?)),
                None => {
                    tracing::warn!("angle mode 'same' without an angle, using auto");
                    Ok(AngleAssignment::Auto)
                }
            },
            AngleMode::Single if self.angles_per_die.len() == dies => self
                .angles_per_die
                .iter()
                .map(|value| angle_degrees(value, "anglesPerDie"))
                .collect::<DrawResult<Vec<_>>>()
                .map(AngleAssignment::PerDie),
            AngleMode::Single => {
                tracing::warn!(
                    given = self.angles_per_die.len(),
                    dies,
                    "per-die angle list does not match die count, using auto"
                );
                Ok(AngleAssignment::Auto)
            }
        }
    }

    fn manual_diameters(&self, dies: usize) -> Option<Vec<NumberLike>> {
        if !self.is_manual || self.manual_diameters.is_empty() {
            return None;
        }
        if self.manual_diameters.len() != dies + 1 {
            tracing::debug!(
                given = self.manual_diameters.len(),
                expected = dies + 1,
                "ignoring manual diameters of the wrong length"
            );
            return None;
        }
        Some(self.manual_diameters.clone())
    }
}

/// Non-negative whole number; values past `usize::MAX` saturate.
fn whole_number(value: f64, field: &str) -> DrawResult<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(DrawError::invalid_input(field, value.to_string(), "Expected a whole number"));
    }
    Ok(value as usize)
}

/// Angle in whole degrees; fractional input is truncated.
fn angle_degrees(value: &NumberLike, field: &str) -> DrawResult<u32> {
    let degrees = value.require(field)?;
    if !(0.0..180.0).contains(&degrees) {
        return Err(DrawError::invalid_input(field, degrees.to_string(), "Angle must be between 0 and 180 degrees"));
    }
    Ok(degrees.trunc() as u32)
}
