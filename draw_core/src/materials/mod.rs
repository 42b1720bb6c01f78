//! # Materials Catalog
//!
//! Wire materials the engine can draft, their tensile models, and the stock
//! die table.
//!
//! ## Material Families
//!
//! - **High Carbon** (indices 0–2): tensile grows with the square root of the
//!   diameter ratio
//! - **Low Carbon** (indices 3–4): tensile falls with the remaining area
//! - **Stainless** (indices 5–6): tensile grows linearly with the reduction
//! - **Custom** (index 7): linear interpolation between caller bounds
//!
//! ## Example
//!
//! ```rust
//! use draw_core::materials::{Material, MaterialFamily};
//!
//! let mat = Material::from_str_flexible("stainless - 300").unwrap();
//! assert_eq!(mat, Material::Stainless300);
//! assert_eq!(mat.family(), MaterialFamily::Stainless);
//! assert_eq!(mat.delta_thresholds().low, 135);
//! ```

pub mod stock_dies;
pub mod tensile;

pub use stock_dies::{SnapOutcome, StockDieRow, StockDieTable, STOCK_DIE_INSERT};
pub use tensile::{CustomBounds, TensileModel};

use serde::{Deserialize, Serialize};

use crate::errors::{DrawError, DrawResult};

/// Wire material, in catalog order (the index is part of the wire format)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    #[serde(rename = "High Carbon - Low")]
    HighCarbonLow,
    #[serde(rename = "High Carbon - Mid")]
    HighCarbonMid,
    #[serde(rename = "High Carbon - High")]
    HighCarbonHigh,
    #[serde(rename = "Low Carbon - High")]
    LowCarbonHigh,
    #[serde(rename = "Low Carbon - Low")]
    LowCarbonLow,
    #[serde(rename = "Stainless - 300")]
    Stainless300,
    #[serde(rename = "Stainless - 400")]
    Stainless400,
    /// Caller supplies min/max tensile bounds
    Custom,
}

/// Formula family a material belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialFamily {
    HighCarbon,
    LowCarbon,
    Stainless,
    Custom,
}

/// Delta band used by the automatic angle heuristic, as `round(δ·100)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaThresholds {
    pub low: u32,
    pub high: u32,
}

impl Material {
    /// All materials in index order
    pub const ALL: [Material; 8] = [
        Material::HighCarbonLow,
        Material::HighCarbonMid,
        Material::HighCarbonHigh,
        Material::LowCarbonHigh,
        Material::LowCarbonLow,
        Material::Stainless300,
        Material::Stainless400,
        Material::Custom,
    ];

    /// Catalog index (0–7)
    pub fn index(self) -> usize {
        match self {
            Material::HighCarbonLow => 0,
            Material::HighCarbonMid => 1,
            Material::HighCarbonHigh => 2,
            Material::LowCarbonHigh => 3,
            Material::LowCarbonLow => 4,
            Material::Stainless300 => 5,
            Material::Stainless400 => 6,
            Material::Custom => 7,
        }
    }

    /// Look up by catalog index
    pub fn from_index(index: i64) -> DrawResult<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Material::ALL.get(i).copied())
            .ok_or_else(|| DrawError::material_not_found(format!("index {}", index)))
    }

    /// Parse a catalog name, ignoring case and spacing around the dash
    pub fn from_str_flexible(s: &str) -> DrawResult<Self> {
        let wanted = normalize_name(s);
        Material::ALL
            .iter()
            .copied()
            .find(|m| normalize_name(m.display_name()) == wanted)
            .ok_or_else(|| DrawError::material_not_found(s))
    }

    /// Catalog name
    pub fn display_name(self) -> &'static str {
        match self {
            Material::HighCarbonLow => "High Carbon - Low",
            Material::HighCarbonMid => "High Carbon - Mid",
            Material::HighCarbonHigh => "High Carbon - High",
            Material::LowCarbonHigh => "Low Carbon - High",
            Material::LowCarbonLow => "Low Carbon - Low",
            Material::Stainless300 => "Stainless - 300",
            Material::Stainless400 => "Stainless - 400",
            Material::Custom => "Custom",
        }
    }

    pub fn family(self) -> MaterialFamily {
        match self {
            Material::HighCarbonLow | Material::HighCarbonMid | Material::HighCarbonHigh => {
                MaterialFamily::HighCarbon
            }
            Material::LowCarbonHigh | Material::LowCarbonLow => MaterialFamily::LowCarbon,
            Material::Stainless300 | Material::Stainless400 => MaterialFamily::Stainless,
            Material::Custom => MaterialFamily::Custom,
        }
    }

    /// True when the tensile model needs caller bounds
    pub fn is_custom(self) -> bool {
        self == Material::Custom
    }

    /// Delta band for the automatic angle heuristic
    pub fn delta_thresholds(self) -> DeltaThresholds {
        let (low, high) = match self.family() {
            MaterialFamily::HighCarbon => (120, 189),
            MaterialFamily::LowCarbon => (130, 225),
            MaterialFamily::Stainless => (135, 225),
            MaterialFamily::Custom => (100, 200),
        };
        DeltaThresholds { low, high }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn normalize_name(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ").replace(" - ", "-")
}
