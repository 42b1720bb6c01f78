//! Standard Stock Die Table
//!
//! The shop's catalog of physically available dies. Each row covers a
//! diameter band for one bearing angle and is cut on a fixed step, so a
//! computed diameter inside the band snaps to the nearest step multiple.
//!
//! ## Persisted Format
//!
//! ```json
//! [
//!   { "insert": "D", "angle": 12, "step": 0.05, "lower": 1.0, "upper": 3.0, "inStock": true }
//! ]
//! ```
//!
//! Only rows whose `insert` kind is `"D"` take part in snapping. Numbers may
//! be JSON numbers or numeric strings.
//!
//! The table is an ordinary value: load it once, then share it by reference
//! with every calculation.

use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};

use crate::errors::{DrawError, DrawResult};
use crate::value::NumberLike;

/// Row kind that participates in snapping
pub const STOCK_DIE_INSERT: &str = "D";

/// File name of the table shipped with the crate
pub const EMBEDDED_TABLE_FILE: &str = "stock_dies.json";

#[derive(RustEmbed)]
#[folder = "data/"]
struct StockDieAssets;

/// One stock die band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStockDieRow", rename_all = "camelCase")]
pub struct StockDieRow {
    /// Row kind discriminator
    pub insert: String,
    /// Bearing angle in degrees
    pub angle: f64,
    /// Quantization step in millimetres
    pub step: f64,
    /// Lower edge of the band (mm)
    pub lower: f64,
    /// Upper edge of the band (mm)
    pub upper: f64,
    /// Whether the die is on the shelf
    pub in_stock: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStockDieRow {
    #[serde(default)]
    insert: String,
    angle: NumberLike,
    step: NumberLike,
    lower: NumberLike,
    upper: NumberLike,
    #[serde(default)]
    in_stock: bool,
}

impl TryFrom<RawStockDieRow> for StockDieRow {
    type Error = DrawError;

    fn try_from(raw: RawStockDieRow) -> DrawResult<Self> {
        let row = StockDieRow {
            angle: raw.angle.require("angle")?,
            step: raw.step.require("step")?,
            lower: raw.lower.require("lower")?,
            upper: raw.upper.require("upper")?,
            in_stock: raw.in_stock,
            insert: raw.insert,
        };
        if row.is_snapping_row() && row.step <= 0.0 {
            return Err(DrawError::invalid_input("step", row.step.to_string(), "Die step must be positive"));
        }
        Ok(row)
    }
}

impl StockDieRow {
    pub fn is_snapping_row(&self) -> bool {
        self.insert == STOCK_DIE_INSERT
    }

    /// Band widened by half a step on each side
    pub fn accepts(&self, diameter: f64) -> bool {
        let half = self.step / 2.0;
        self.lower - half <= diameter && diameter <= self.upper + half
    }

    /// Nearest multiple of the step (ties to even)
    pub fn snap(&self, diameter: f64) -> f64 {
        (diameter / self.step).round_ties_even() * self.step
    }

    fn matches_angle(&self, angle: u32) -> bool {
        self.angle == f64::from(angle)
    }
}

/// Snapped diameters with the stock flag of the row that set each one
#[derive(Debug, Clone, PartialEq)]
pub struct SnapOutcome {
    pub diameters: Vec<f64>,
    pub in_stock: Vec<bool>,
}

/// Ordered stock die catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockDieTable {
    rows: Vec<StockDieRow>,
}

impl StockDieTable {
    pub fn new(rows: Vec<StockDieRow>) -> Self {
        StockDieTable { rows }
    }

    /// Parse the persisted JSON array
    pub fn from_json_str(json: &str) -> DrawResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Table shipped inside the crate
    pub fn embedded() -> DrawResult<Self> {
        let file = StockDieAssets::get(EMBEDDED_TABLE_FILE)
            .ok_or_else(|| DrawError::file_error("open embedded", EMBEDDED_TABLE_FILE, "asset missing"))?;
        let table: StockDieTable = serde_json::from_slice(&file.data)?;
        tracing::debug!(rows = table.len(), "loaded embedded stock die table");
        Ok(table)
    }

    pub fn rows(&self) -> &[StockDieRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows tagged for snapping, in table order
    pub fn snapping_rows(&self) -> impl Iterator<Item = &StockDieRow> {
        self.rows.iter().filter(|row| row.is_snapping_row())
    }

    /// All snapping rows for `angle` whose band contains `diameter`
    pub fn matching_rows(&self, angle: u32, diameter: f64) -> impl Iterator<Item = &StockDieRow> {
        self.snapping_rows()
            .filter(move |row| row.matches_angle(angle) && row.accepts(diameter))
    }

    /// Snap every die of a schedule to the catalog.
    ///
    /// `diameters` includes stage 0, which is never snapped; `angles` has one
    /// entry per die. Rows are scanned in table order and each one sees the
    /// diameters already snapped by earlier rows, so the last matching row
    /// decides both the value and the stock flag.
    pub fn snap(&self, diameters: &[f64], angles: &[u32]) -> SnapOutcome {
        let mut snapped = diameters.to_vec();
        let mut in_stock = vec![false; diameters.len()];
        for row in self.snapping_rows() {
            for (die, &angle) in angles.iter().enumerate() {
                let stage = die + 1;
                let Some(&current) = snapped.get(stage) else {
                    continue;
                };
                if row.matches_angle(angle) && row.accepts(current) {
                    snapped[stage] = row.snap(current);
                    in_stock[stage] = row.in_stock;
                    tracing::trace!(stage, from = current, to = snapped[stage], "snapped to stock die");
                }
            }
        }
        SnapOutcome {
            diameters: snapped,
            in_stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(angle: f64, step: f64, lower: f64, upper: f64, in_stock: bool) -> StockDieRow {
        StockDieRow {
            insert: STOCK_DIE_INSERT.to_string(),
            angle,
            step,
            lower,
            upper,
            in_stock,
        }
    }

    #[test]
    fn test_parse_with_string_numbers() {
        let json = r#"[
            {"insert": "D", "angle": 12, "step": "0.05", "lower": 1, "upper": "3.0", "inStock": true},
            {"insert": "B", "angle": 16, "step": 0.1, "lower": 3, "upper": 6}
        ]"#;
        let table = StockDieTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].step, 0.05);
        assert!(!table.rows()[1].in_stock);
        assert_eq!(table.snapping_rows().count(), 1);
    }

    #[test]
    fn test_parse_rejects_zero_step_for_snapping_rows() {
        let json = r#"[{"insert": "D", "angle": 12, "step": 0, "lower": 1, "upper": 3}]"#;
        assert!(StockDieTable::from_json_str(json).is_err());
    }

    #[test]
    fn test_snap_inside_band() {
        let table = StockDieTable::new(vec![row(12.0, 0.05, 1.0, 3.0, true)]);
        let out = table.snap(&[4.0, 2.93, 2.41], &[12, 12]);
        assert_eq!(out.in_stock, vec![false, true, true]);
        assert!((out.diameters[1] - 2.95).abs() < 1e-9);
        assert!((out.diameters[2] - 2.40).abs() < 1e-9);
        assert_eq!(out.diameters[0], 4.0);
    }

    #[test]
    fn test_snap_ignores_other_angles_and_kinds() {
        let mut other_kind = row(12.0, 0.5, 0.0, 10.0, true);
        other_kind.insert = "B".to_string();
        let table = StockDieTable::new(vec![row(16.0, 0.05, 1.0, 3.0, true), other_kind]);
        let out = table.snap(&[4.0, 2.93], &[12]);
        assert_eq!(out.diameters, vec![4.0, 2.93]);
        assert_eq!(out.in_stock, vec![false, false]);
    }

    #[test]
    fn test_half_step_tolerance_at_band_edges() {
        let r = row(12.0, 0.1, 1.0, 2.0, true);
        assert!(r.accepts(0.95));
        assert!(r.accepts(2.05));
        assert!(!r.accepts(2.06));
    }

    #[test]
    fn test_last_matching_row_wins() {
        let table = StockDieTable::new(vec![
            row(12.0, 0.1, 1.0, 3.0, true),
            row(12.0, 0.25, 2.0, 4.0, false),
        ]);
        let out = table.snap(&[5.0, 2.93], &[12]);
        // First row: 2.9, second row re-snaps 2.9 to 3.0
        assert!((out.diameters[1] - 3.0).abs() < 1e-9);
        assert!(!out.in_stock[1]);
    }

    #[test]
    fn test_matching_rows_lookup_is_one_to_many() {
        let table = StockDieTable::new(vec![
            row(12.0, 0.1, 1.0, 3.0, true),
            row(12.0, 0.05, 2.5, 5.0, true),
            row(9.0, 0.05, 2.5, 5.0, true),
        ]);
        assert_eq!(table.matching_rows(12, 2.7).count(), 2);
        assert_eq!(table.matching_rows(12, 4.0).count(), 1);
    }

    #[test]
    fn test_embedded_table_loads() {
        let table = StockDieTable::embedded().unwrap();
        assert!(table.snapping_rows().count() > 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn step() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.01), Just(0.02), Just(0.05), Just(0.1), Just(0.25)]
    }

    proptest! {
        #[test]
        fn snapped_diameters_stay_in_band_on_step(
            step in step(),
            lower_steps in 1u32..200,
            width_steps in 1u32..200,
            position in 0.0f64..=1.0,
        ) {
            let lower = f64::from(lower_steps) * step;
            let upper = f64::from(lower_steps + width_steps) * step;
            let diameter = lower + position * (upper - lower);
            let table = StockDieTable::new(vec![StockDieRow {
                insert: STOCK_DIE_INSERT.to_string(),
                angle: 12.0,
                step,
                lower,
                upper,
                in_stock: true,
            }]);

            let out = table.snap(&[upper * 2.0, diameter], &[12]);
            let snapped = out.diameters[1];
            prop_assert!(out.in_stock[1]);
            prop_assert!(snapped >= lower - step / 2.0 && snapped <= upper + step / 2.0);
            let multiple = snapped / step;
            prop_assert!((multiple - multiple.round()).abs() < 1e-6);
        }
    }
}
