//! Moment engine: mean, variance, skewness and kurtosis of a real sequence.
//!
//! # Algorithm
//!
//! Two passes over the data around the NaN-skipping mean:
//!
//! 1. Deviations `d = x - mean` feed a [`DeviationAccumulator`]; the variance
//!    `(Σd² - (Σd)²/n) / (n - 1)` is Bessel-corrected and stays correct even
//!    if the mean carries rounding error.
//! 2. Standardised values `z = d / σ` accumulate `Σz³` and `Σz⁴`, giving
//!    skewness `Σz³ / n` and excess kurtosis `Σz⁴ / n - 3`.
//!
//! Centred differences avoid the cancellation of raw-power formulas at the
//! sample counts used here (1024 to 16384).
//!
//! NaN entries are skipped in both passes and `n` counts only valid values.

use serde::{Deserialize, Serialize};

use crate::error::StatsError;
use crate::summation::DeviationAccumulator;

/// Moment summary `(mean, variance, skewness, kurtosis)` of a sequence.
///
/// `variance` is Bessel-corrected, `kurtosis` is excess kurtosis (zero for a
/// Gaussian).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// Arithmetic mean
    pub mean: f64,
    /// Sample variance (denominator `n - 1`)
    pub variance: f64,
    /// Third standardised moment
    pub skewness: f64,
    /// Fourth standardised moment minus 3
    pub kurtosis: f64,
}

impl Moments {
    /// Standard deviation, `sqrt(variance)`.
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Returns `[mean, variance, skewness, kurtosis]`.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.mean, self.variance, self.skewness, self.kurtosis]
    }
}

/// Mean of the non-NaN entries, or 0.0 when there are none.
///
/// # Examples
/// ```
/// use sampler_core::nan_mean;
///
/// assert_eq!(nan_mean(&[1.0, f64::NAN, 3.0]), 2.0);
/// assert_eq!(nan_mean(&[f64::NAN]), 0.0);
/// ```
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(sum, count), &x| (sum + x, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Computes the moment summary of `values`.
///
/// # Errors
///
/// - [`StatsError::InsufficientSamples`] with fewer than two non-NaN values
/// - [`StatsError::ZeroVariance`] when all valid values are equal
/// - [`StatsError::NonFinite`] when the variance is not finite
///
/// # Examples
/// ```
/// use sampler_core::moments;
///
/// let m = moments(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(m.mean, 3.0);
/// assert!((m.variance - 2.5).abs() < 1e-12);
/// assert!(m.skewness.abs() < 1e-12);
/// ```
pub fn moments(values: &[f64]) -> Result<Moments, StatsError> {
    let mean = nan_mean(values);

    let mut acc = DeviationAccumulator::new(mean);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &x in values.iter().filter(|x| !x.is_nan()) {
        acc.push(x);
        min = min.min(x);
        max = max.max(x);
    }

    let count = acc.count();
    let skipped = values.len() - count;
    if skipped > 0 {
        tracing::warn!(
            skipped,
            total = values.len(),
            "NaN values excluded from moment computation"
        );
    }

    let variance = acc.variance().ok_or(StatsError::InsufficientSamples {
        count,
        required: 2,
    })?;
    if !variance.is_finite() {
        return Err(StatsError::NonFinite {
            name: "variance",
            value: variance,
        });
    }

    // Equality of the extremes, not the computed variance: a constant that
    // is not representable as a mean still leaves a few ulps of spread.
    if min == max {
        return Err(StatsError::ZeroVariance { mean });
    }
    // Distinct subnormals can still underflow the variance to zero.
    let std_dev = variance.max(0.0).sqrt();
    if std_dev == 0.0 {
        return Err(StatsError::ZeroVariance { mean });
    }

    let mut sum_z3 = 0.0;
    let mut sum_z4 = 0.0;
    for &x in values.iter().filter(|x| !x.is_nan()) {
        let z = (x - mean) / std_dev;
        let z2 = z * z;
        sum_z3 += z2 * z;
        sum_z4 += z2 * z2;
    }

    let n = count as f64;
    Ok(Moments {
        mean,
        variance,
        skewness: sum_z3 / n,
        kurtosis: sum_z4 / n - 3.0,
    })
}
