//! # Diameter Progression
//!
//! Produces the base diameter sequence of a schedule, stage 0 (incoming wire)
//! through stage `dies` (finished wire), under one of six strategies.
//!
//! ## Strategies
//!
//! | drafting | skin pass | dies > 1 | strategy |
//! |---|---|---|---|
//! | Full Taper | yes | yes | [`DraftingStrategy::SkinPassFullTaper`] |
//! | Optimized | yes | yes | [`DraftingStrategy::SkinPassOptimized`] |
//! | Linear | yes | yes | [`DraftingStrategy::SkinPassLinear`] |
//! | Full Taper | no | yes | [`DraftingStrategy::FullTaper`] |
//! | Optimized | no | yes | [`DraftingStrategy::Optimized`] |
//! | any | any | no | [`DraftingStrategy::Linear`] |
//!
//! The skin-pass variants draft to a pen diameter `pen = b / √(1 − final/100)`
//! and add one light finishing die from `pen` to the finish diameter.
//!
//! ## Example
//!
//! ```rust
//! use draw_core::calculations::progression::{DraftingStrategy, ProgressionInput};
//! use draw_core::materials::{Material, TensileModel};
//!
//! let input = ProgressionInput {
//!     initial: 10.0,
//!     finish: 5.0,
//!     dies: 4,
//!     decimals: 2,
//!     tensile: TensileModel::new(Material::HighCarbonMid, 0.7, None).unwrap(),
//! };
//! let progression = DraftingStrategy::Linear.diameters(&input).unwrap();
//! assert_eq!(progression.diameters, vec![10.0, 8.41, 7.07, 5.95, 5.0]);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::{
    power_n, reductions_collapsing_near_duplicates, root_n, round_all, round_int, round_to, temperature_rises,
    STANDARD_GRAVITY,
};
use crate::errors::{DrawError, DrawResult};
use crate::materials::TensileModel;

/// Drafting requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DraftingType {
    /// Same area reduction at every die
    #[default]
    Linear,
    /// Reduction tapering off towards the last die
    #[serde(rename = "Full Taper", alias = "FullTaper")]
    FullTaper,
    /// Reductions balanced for an even temperature rise
    Optimized,
}

impl DraftingType {
    pub fn display_name(self) -> &'static str {
        match self {
            DraftingType::Linear => "Linear",
            DraftingType::FullTaper => "Full Taper",
            DraftingType::Optimized => "Optimized",
        }
    }
}

impl std::fmt::Display for DraftingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Drafting strategy, selected once per request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DraftingStrategy {
    Linear,
    FullTaper { last_reduction_pct: f64 },
    Optimized,
    SkinPassLinear { final_reduction_pct: f64 },
    SkinPassFullTaper { final_reduction_pct: f64, last_reduction_pct: f64 },
    SkinPassOptimized { final_reduction_pct: f64 },
}

/// What every strategy needs, in metric units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionInput {
    pub initial: f64,
    pub finish: f64,
    pub dies: usize,
    pub decimals: u32,
    pub tensile: TensileModel,
}

/// Reductions and tensiles solved together with the diameters
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedSeries {
    pub reductions: Vec<f64>,
    pub tensiles: Vec<i64>,
}

/// Output of a strategy
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    /// `dies + 1` diameters (mm)
    pub diameters: Vec<f64>,
    /// Present for the optimized strategies, which size each die from its force
    pub solved: Option<SolvedSeries>,
}

impl Progression {
    fn plain(diameters: Vec<f64>) -> Self {
        Progression { diameters, solved: None }
    }
}

impl DraftingStrategy {
    /// Pick the strategy for a request.
    ///
    /// `last_reduction_pct` is only required when a Full Taper strategy is
    /// chosen.
    pub fn select(
        drafting: DraftingType,
        skin_pass_reduction_pct: Option<f64>,
        last_reduction_pct: Option<f64>,
        dies: usize,
    ) -> DrawResult<Self> {
        if dies <= 1 {
            return Ok(DraftingStrategy::Linear);
        }
        let last = || last_reduction_pct.ok_or_else(|| DrawError::missing_field("finalReductionPercentage"));
        let strategy = match (drafting, skin_pass_reduction_pct) {
            (DraftingType::Linear, None) => DraftingStrategy::Linear,
            (DraftingType::FullTaper, None) => DraftingStrategy::FullTaper {
                last_reduction_pct: last()?,
            },
            (DraftingType::Optimized, None) => DraftingStrategy::Optimized,
            (DraftingType::Linear, Some(final_reduction_pct)) => {
                DraftingStrategy::SkinPassLinear { final_reduction_pct }
            }
            (DraftingType::FullTaper, Some(final_reduction_pct)) => DraftingStrategy::SkinPassFullTaper {
                final_reduction_pct,
                last_reduction_pct: last()?,
            },
            (DraftingType::Optimized, Some(final_reduction_pct)) => {
                DraftingStrategy::SkinPassOptimized { final_reduction_pct }
            }
        };
        Ok(strategy)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DraftingStrategy::Linear => "Linear",
            DraftingStrategy::FullTaper { .. } => "Full Taper",
            DraftingStrategy::Optimized => "Optimized",
            DraftingStrategy::SkinPassLinear { .. } => "Skin Pass Linear",
            DraftingStrategy::SkinPassFullTaper { .. } => "Skin Pass Full Taper",
            DraftingStrategy::SkinPassOptimized { .. } => "Skin Pass Optimized",
        }
    }

    /// Produce the diameter sequence.
    pub fn diameters(&self, input: &ProgressionInput) -> DrawResult<Progression> {
        let ProgressionInput {
            initial,
            finish,
            dies,
            decimals,
            tensile,
        } = *input;

        if dies == 0 {
            return Err(DrawError::invalid_input("dies", "0", "At least one die is required"));
        }
        if dies == 1 && *self != DraftingStrategy::Linear {
            return Err(DrawError::calculation_failed(self.name(), "needs at least two dies"));
        }

        match *self {
            DraftingStrategy::Linear => linear(initial, finish, dies, decimals).map(Progression::plain),
            DraftingStrategy::FullTaper { last_reduction_pct } => {
                let mut diameters = full_taper(initial, finish, last_reduction_pct, dies, decimals);
                diameters.push(finish);
                Ok(Progression::plain(diameters))
            }
            DraftingStrategy::Optimized => {
                let seed = LinearSeed::new(input)?;
                let solved = backward_solve(&seed.temperatures, dies, initial, finish, seed.tensiles[dies], &tensile)?;
                Ok(solved.rounded(decimals))
            }
            DraftingStrategy::SkinPassLinear { final_reduction_pct } => {
                let pen = pen_diameter(finish, final_reduction_pct, decimals);
                let mut diameters = linear(initial, pen, dies - 1, decimals)?;
                diameters.push(finish);
                Ok(Progression::plain(diameters))
            }
            DraftingStrategy::SkinPassFullTaper {
                final_reduction_pct,
                last_reduction_pct,
            } => {
                let pen = pen_diameter(finish, final_reduction_pct, decimals);
                let mut diameters = full_taper(initial, pen, last_reduction_pct, dies - 1, decimals);
                diameters.push(pen);
                diameters.push(finish);
                Ok(Progression::plain(diameters))
            }
            DraftingStrategy::SkinPassOptimized { final_reduction_pct } => {
                let pen = pen_diameter(finish, final_reduction_pct, decimals);
                let steps = dies - 1;
                let mut seed = LinearSeed::new(input)?;
                seed.temperatures.pop();
                let mut solved =
                    backward_solve(&seed.temperatures, steps, initial, pen, seed.tensiles[steps], &tensile)?;
                solved.diameters.push(finish);
                solved.reductions.push(final_reduction_pct);
                solved.tensiles.push(tensile.tensile_at(initial, finish, finish)?);
                Ok(solved.rounded(decimals))
            }
        }
    }
}

/// Diameter entering the skin-pass die
pub fn pen_diameter(finish: f64, final_reduction_pct: f64, decimals: u32) -> f64 {
    round_to(finish / (1.0 - final_reduction_pct / 100.0).sqrt(), decimals)
}

/// Equal area reduction per die.
///
/// ```text
/// ratio = (a/b)^(1/n),  d[i] = d[i-1] / ratio
/// ```
pub fn linear(initial: f64, finish: f64, steps: usize, decimals: u32) -> DrawResult<Vec<f64>> {
    if initial * finish == 0.0 {
        return Err(DrawError::invalid_input(
            "initialDiameter/finishDiameter",
            format!("{} / {}", initial, finish),
            "Missing initial or finish diameter",
        ));
    }
    let mut diameters = vec![0.0; steps + 1];
    diameters[0] = initial;
    diameters[steps] = finish;
    let ratio = root_n(initial / finish, steps as f64);
    for i in 1..steps {
        diameters[i] = diameters[i - 1] / ratio;
    }
    Ok(round_all(&diameters, decimals))
}

/// Tapered reductions: `steps` rounded diameters starting at `initial`.
///
/// The finish diameter is not included. A provisional pass runs the
/// recurrence, the ratio is corrected so the next die would land on
/// `finish`, and the recurrence is run a second time.
pub fn full_taper(initial: f64, finish: f64, last_reduction_pct: f64, steps: usize, decimals: u32) -> Vec<f64> {
    let n = steps as f64;
    let ratio = root_n(finish / initial, n);
    let avg_reduction = 100.0 * (1.0 - ratio.powi(2));
    let dr_avg = root_n(1.0 - avg_reduction / 100.0, 2.0);
    let dr_min = root_n(1.0 - last_reduction_pct / 100.0, 2.0);
    let mut dr_max = dr_avg.powi(2) / dr_min;
    let dd_ratio = root_n(dr_min / dr_max, n - 1.0);

    let mut diameters = vec![0.0; steps];
    diameters[0] = initial;
    taper_pass(&mut diameters, dr_max, dd_ratio);

    let ultimo = diameters[steps - 1] * dr_max * power_n(dd_ratio, n - 1.0);
    dr_max *= root_n(finish / ultimo, n);
    taper_pass(&mut diameters, dr_max, dd_ratio);

    round_all(&diameters, decimals)
}

fn taper_pass(diameters: &mut [f64], dr_max: f64, dd_ratio: f64) {
    for x in 1..diameters.len() {
        diameters[x] = diameters[x - 1] * dr_max * power_n(dd_ratio, (x - 1) as f64);
    }
}

/// Linear schedule over all dies with its derived tensile and temperature
/// series, the starting point of the optimized strategies.
struct LinearSeed {
    tensiles: Vec<i64>,
    temperatures: Vec<i64>,
}

impl LinearSeed {
    fn new(input: &ProgressionInput) -> DrawResult<Self> {
        let mut diameters = linear(input.initial, input.finish, input.dies, input.decimals)?;
        let tensiles = input.tensile.series(&diameters)?;
        let reductions = reductions_collapsing_near_duplicates(&mut diameters);
        let temperatures = temperature_rises(&reductions, &tensiles);
        tracing::trace!(?diameters, ?tensiles, ?temperatures, "linear seed");
        Ok(LinearSeed { tensiles, temperatures })
    }
}

/// Unrounded output of the backward solve
struct Solved {
    diameters: Vec<f64>,
    reductions: Vec<f64>,
    tensiles: Vec<f64>,
}

impl Solved {
    fn rounded(self, decimals: u32) -> Progression {
        Progression {
            diameters: round_all(&self.diameters, decimals),
            solved: Some(SolvedSeries {
                reductions: round_all(&self.reductions, 1),
                tensiles: self.tensiles.into_iter().map(round_int).collect(),
            }),
        }
    }
}

/// Size each die from the finish backwards so that every die sees the seed's
/// average temperature rise.
///
/// ```text
/// R[x] = avgT · c / F[x]              c = 25g at x = 1, 30g otherwise
/// D[x-1] = √(D[x]² · 100 / (100 − R[x]))
/// ```
fn backward_solve(
    temperatures: &[i64],
    steps: usize,
    initial: f64,
    end: f64,
    end_tensile: i64,
    tensile: &TensileModel,
) -> DrawResult<Solved> {
    let avg_temperature = temperatures.iter().sum::<i64>() as f64 / steps as f64;

    let mut diameters = vec![0.0; steps + 1];
    let mut reductions = vec![0.0; steps + 1];
    let mut tensiles = vec![0.0; steps + 1];
    diameters[0] = initial;
    diameters[steps] = end;
    tensiles[steps] = end_tensile as f64;

    for x in (1..=steps).rev() {
        let force = tensiles[x];
        if force <= 0.0 {
            return Err(DrawError::calculation_failed(
                "Optimized drafting",
                format!("non-positive tensile {} at die {}", force, x),
            ));
        }
        let position = if x == 1 { 25.0 } else { 30.0 };
        reductions[x] = avg_temperature * (position * STANDARD_GRAVITY) / force;
        if x == 1 {
            continue;
        }
        if reductions[x] >= 100.0 {
            return Err(DrawError::calculation_failed(
                "Optimized drafting",
                format!("reduction {:.1}% at die {} leaves no wire", reductions[x], x),
            ));
        }
        diameters[x - 1] = root_n((diameters[x].powi(2) * 100.0) / (100.0 - reductions[x]), 2.0);
        tensiles[x - 1] = tensile.tensile_at(diameters[0], diameters[x - 1], diameters[steps])?;
    }

    Ok(Solved {
        diameters,
        reductions,
        tensiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{CustomBounds, Material};

    fn input(initial: f64, finish: f64, dies: usize, decimals: u32) -> ProgressionInput {
        ProgressionInput {
            initial,
            finish,
            dies,
            decimals,
            tensile: TensileModel::new(Material::HighCarbonLow, 0.7, None).unwrap(),
        }
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn test_selection_table() {
        use DraftingType::*;
        let s = |d, skin, dies| DraftingStrategy::select(d, skin, Some(15.0), dies).unwrap();
        assert_eq!(s(Linear, None, 4), DraftingStrategy::Linear);
        assert_eq!(s(Optimized, None, 4), DraftingStrategy::Optimized);
        assert_eq!(s(FullTaper, None, 4), DraftingStrategy::FullTaper { last_reduction_pct: 15.0 });
        assert_eq!(s(Linear, Some(10.0), 4), DraftingStrategy::SkinPassLinear { final_reduction_pct: 10.0 });
        assert_eq!(s(Optimized, Some(10.0), 4), DraftingStrategy::SkinPassOptimized { final_reduction_pct: 10.0 });
        assert_eq!(
            s(FullTaper, Some(10.0), 4),
            DraftingStrategy::SkinPassFullTaper {
                final_reduction_pct: 10.0,
                last_reduction_pct: 15.0
            }
        );
        // One die is always Linear
        assert_eq!(s(Optimized, Some(10.0), 1), DraftingStrategy::Linear);
        assert_eq!(s(FullTaper, None, 1), DraftingStrategy::Linear);
    }

    #[test]
    fn test_full_taper_needs_last_reduction() {
        let err = DraftingStrategy::select(DraftingType::FullTaper, None, None, 4).unwrap_err();
        assert_eq!(err, DrawError::missing_field("finalReductionPercentage"));
    }

    #[test]
    fn test_linear_reference_schedule() {
        let p = DraftingStrategy::Linear.diameters(&input(10.0, 5.0, 4, 2)).unwrap();
        assert_close(&p.diameters, &[10.0, 8.41, 7.07, 5.95, 5.0]);
        assert!(p.solved.is_none());
    }

    #[test]
    fn test_linear_eight_dies() {
        let d = linear(5.5, 2.0, 8, 3).unwrap();
        assert_close(&d, &[5.5, 4.847, 4.271, 3.764, 3.317, 2.923, 2.576, 2.27, 2.0]);
    }

    #[test]
    fn test_linear_rejects_zero_diameter() {
        assert!(linear(0.0, 2.0, 4, 2).is_err());
    }

    #[test]
    fn test_single_die_is_initial_then_finish() {
        let p = DraftingStrategy::Linear.diameters(&input(3.0, 2.5, 1, 2)).unwrap();
        assert_close(&p.diameters, &[3.0, 2.5]);
    }

    #[test]
    fn test_full_taper() {
        let strategy = DraftingStrategy::FullTaper { last_reduction_pct: 15.0 };
        let p = strategy.diameters(&input(5.5, 2.0, 8, 3)).unwrap();
        assert_close(&p.diameters, &[5.5, 4.633, 3.953, 3.416, 2.991, 2.653, 2.384, 2.169, 2.0]);
    }

    #[test]
    fn test_full_taper_last_step_close_to_target() {
        let strategy = DraftingStrategy::FullTaper { last_reduction_pct: 10.0 };
        let p = strategy.diameters(&input(10.0, 5.0, 4, 2)).unwrap();
        assert_close(&p.diameters, &[10.0, 7.45, 6.02, 5.27, 5.0]);
    }

    #[test]
    fn test_optimized() {
        let p = DraftingStrategy::Optimized.diameters(&input(5.5, 2.0, 6, 2)).unwrap();
        assert_close(&p.diameters, &[5.5, 4.56, 3.73, 3.12, 2.65, 2.29, 2.0]);
        let solved = p.solved.unwrap();
        assert_close(&solved.reductions, &[0.0, 30.7, 33.1, 30.1, 27.6, 25.5, 23.7]);
        assert_eq!(solved.tensiles, vec![0, 1194, 1331, 1464, 1595, 1725, 1853]);
    }

    #[test]
    fn test_pen_diameter() {
        assert!((pen_diameter(2.0, 10.0, 2) - 2.11).abs() < 1e-12);
    }

    #[test]
    fn test_skin_pass_linear() {
        let strategy = DraftingStrategy::SkinPassLinear { final_reduction_pct: 10.0 };
        let p = strategy.diameters(&input(5.5, 2.0, 6, 2)).unwrap();
        assert_close(&p.diameters, &[5.5, 4.54, 3.75, 3.1, 2.56, 2.11, 2.0]);
    }

    #[test]
    fn test_skin_pass_full_taper() {
        let strategy = DraftingStrategy::SkinPassFullTaper {
            final_reduction_pct: 10.0,
            last_reduction_pct: 15.0,
        };
        let p = strategy.diameters(&input(5.5, 2.0, 6, 2)).unwrap();
        assert_close(&p.diameters, &[5.5, 4.07, 3.18, 2.62, 2.29, 2.11, 2.0]);
    }

    #[test]
    fn test_skin_pass_optimized() {
        let strategy = DraftingStrategy::SkinPassOptimized { final_reduction_pct: 10.0 };
        let p = strategy.diameters(&input(5.5, 2.0, 6, 2)).unwrap();
        assert_close(&p.diameters, &[5.5, 3.94, 3.3, 2.82, 2.43, 2.11, 2.0]);
        let solved = p.solved.unwrap();
        assert_close(&solved.reductions, &[0.0, 27.2, 29.7, 27.3, 25.2, 24.9, 10.0]);
        assert_eq!(solved.tensiles, vec![0, 1292, 1420, 1546, 1670, 1694, 1853]);
    }

    #[test]
    fn test_optimized_rejects_non_positive_force() {
        // Inverted custom bounds drive the finish force below zero
        let inverted = ProgressionInput {
            tensile: TensileModel::new(Material::Custom, 0.0, Some(CustomBounds { min: 300.0, max: -100.0 })).unwrap(),
            ..input(5.5, 2.0, 4, 2)
        };
        let err = DraftingStrategy::Optimized.diameters(&inverted).unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_FAILED");
    }

    #[test]
    fn test_optimized_custom_ends_at_max_bound() {
        let custom = ProgressionInput {
            tensile: TensileModel::new(Material::Custom, 0.0, Some(CustomBounds { min: 800.0, max: 1600.0 })).unwrap(),
            ..input(5.5, 2.0, 5, 2)
        };
        let p = DraftingStrategy::Optimized.diameters(&custom).unwrap();
        assert_eq!(p.diameters[0], 5.5);
        assert_eq!(p.diameters[5], 2.0);
        assert_eq!(p.solved.unwrap().tensiles[5], 1600);
    }

    #[test]
    fn test_drafting_type_wire_names() {
        let t: DraftingType = serde_json::from_str("\"Full Taper\"").unwrap();
        assert_eq!(t, DraftingType::FullTaper);
        assert_eq!(serde_json::to_string(&DraftingType::Optimized).unwrap(), "\"Optimized\"");
    }
}
