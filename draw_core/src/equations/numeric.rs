//! # Numeric Helpers
//!
//! Power, root and rounding primitives shared by every drafting strategy.
//!
//! The progression formulas are sensitive to the last bits of these
//! operations: Full Taper feeds each ratio into the next step, and the stock
//! die snapper compares rounded diameters against band edges. The helpers
//! here fix one evaluation order so that a schedule is reproducible
//! bit-for-bit across strategies and runs.

/// Raise `base` to `exponent` as `exp(exponent · ln base)`.
///
/// # Formula
/// bᵉ = e^(e·ln b), with the convention b = 0 → 1.0
///
/// # Example
/// ```rust
/// use draw_core::equations::numeric::power_n;
///
/// assert!((power_n(2.0, 3.0) - 8.0).abs() < 1e-12);
/// assert_eq!(power_n(0.0, 5.0), 1.0);
/// ```
#[inline]
pub fn power_n(base: f64, exponent: f64) -> f64 {
    if base != 0.0 {
        (exponent * base.ln()).exp()
    } else {
        1.0
    }
}

/// `root`-th root of `value`, via [`power_n`].
///
/// A zero root is treated as 1 (the value itself).
///
/// # Example
/// ```rust
/// use draw_core::equations::numeric::root_n;
///
/// assert!((root_n(16.0, 4.0) - 2.0).abs() < 1e-12);
/// assert!((root_n(7.0, 0.0) - 7.0).abs() < 1e-12);
/// ```
#[inline]
pub fn root_n(value: f64, root: f64) -> f64 {
    let root = if root == 0.0 { 1.0 } else { root };
    power_n(value, 1.0 / root)
}

/// Round to `decimals` places, correctly rounded from the binary value.
///
/// Goes through the shortest decimal rendering at that precision, so
/// `2.675` (stored as 2.67499…) rounds to `2.67`, not `2.68`.
///
/// # Example
/// ```rust
/// use draw_core::equations::numeric::round_to;
///
/// assert_eq!(round_to(8.408964, 2), 8.41);
/// assert_eq!(round_to(2.675, 2), 2.67);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Round to the nearest integer, ties to even.
///
/// # Example
/// ```rust
/// use draw_core::equations::numeric::round_int;
///
/// assert_eq!(round_int(2.5), 2);
/// assert_eq!(round_int(3.5), 4);
/// assert_eq!(round_int(-1.6), -2);
/// ```
#[inline]
pub fn round_int(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Round every element of a series to `decimals` places.
pub fn round_all(values: &[f64], decimals: u32) -> Vec<f64> {
    values.iter().map(|&v| round_to(v, decimals)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_matches_powf_closely() {
        for (b, e) in [(1.5, 2.0), (0.8, 0.25), (10.0, -1.0)] {
            assert!((power_n(b, e) - f64::powf(b, e)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_root_of_ratio() {
        // (10/5)^(1/4) ≈ 1.189207
        let r = root_n(10.0 / 5.0, 4.0);
        assert!((r - 1.189_207).abs() < 1e-6);
    }

    #[test]
    fn test_round_to_handles_precision_zero() {
        assert_eq!(round_to(7.071, 0), 7.0);
        assert_eq!(round_to(-3.14159, 3), -3.142);
    }

    #[test]
    fn test_round_to_passes_non_finite_through() {
        assert!(round_to(f64::NAN, 2).is_nan());
        assert_eq!(round_to(f64::INFINITY, 2), f64::INFINITY);
    }

    #[test]
    fn test_round_int_ties_even() {
        assert_eq!(round_int(0.5), 0);
        assert_eq!(round_int(1.5), 2);
        assert_eq!(round_int(1234.4), 1234);
    }
}
