//! Compensated summation primitives.
//!
//! - [`naive_sum`] / [`kahan_sum`]: plain versus Kahan-compensated sums
//! - [`KahanAccumulator`]: value-type running Kahan sum
//! - [`DeviationAccumulator`]: sums of deviations from a fixed reference,
//!   giving a Bessel-corrected variance that stays correct even when the
//!   reference is not the true mean

/// Sums the slice left to right with no compensation.
#[inline]
pub fn naive_sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, &x| acc + x)
}

/// Sums the slice with Kahan compensated summation.
///
/// # Examples
/// ```
/// use sampler_core::summation::{kahan_sum, naive_sum};
///
/// let mut values = vec![1e-8; 100_000];
/// values[0] = 1.0;
/// let exact = 1.0 + 99_999.0 * 1e-8;
/// assert!((kahan_sum(&values) - exact).abs() <= (naive_sum(&values) - exact).abs());
/// ```
pub fn kahan_sum(values: &[f64]) -> f64 {
    let mut acc = KahanAccumulator::new();
    for &x in values {
        acc.add(x);
    }
    acc.sum()
}

/// Running Kahan sum: the total plus the low-order bits lost so far.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KahanAccumulator {
    sum: f64,
    error: f64,
}

impl KahanAccumulator {
    /// Creates an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, carrying the rounding error into the next step.
    #[inline]
    pub fn add(&mut self, value: f64) {
        let y = value - self.error;
        let t = self.sum + y;
        self.error = (t - self.sum) - y;
        self.sum = t;
    }

    /// Returns the compensated sum.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }
}

/// Accumulates `Σx`, `Σ(x - ref)` and `Σ(x - ref)²` around a fixed reference.
///
/// The variance `(Σd² - (Σd)²/n) / (n - 1)` explicitly corrects for a
/// nonzero `Σd`, so it holds for any reference; a reference close to the
/// true mean keeps the squared deviations small.
///
/// # Examples
/// ```
/// use sampler_core::summation::DeviationAccumulator;
///
/// let mut acc = DeviationAccumulator::new(10.0);
/// for x in [1.0, 2.0, 3.0, 4.0] {
///     acc.push(x);
/// }
/// assert_eq!(acc.mean(), Some(2.5));
/// assert!((acc.variance().unwrap() - 5.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviationAccumulator {
    reference: f64,
    count: usize,
    sum: f64,
    sum_diff: f64,
    sum_diff2: f64,
}

impl DeviationAccumulator {
    /// Creates an empty accumulator around `reference`.
    #[inline]
    pub fn new(reference: f64) -> Self {
        Self {
            reference,
            count: 0,
            sum: 0.0,
            sum_diff: 0.0,
            sum_diff2: 0.0,
        }
    }

    /// Feeds one value.
    #[inline]
    pub fn push(&mut self, value: f64) {
        let diff = value - self.reference;
        self.count += 1;
        self.sum += value;
        self.sum_diff += diff;
        self.sum_diff2 += diff * diff;
    }

    /// Returns the reference the deviations are taken from.
    #[inline]
    pub fn reference(&self) -> f64 {
        self.reference
    }

    /// Number of values pushed.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// `Σx`.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// `Σ(x - ref)`.
    #[inline]
    pub fn sum_diff(&self) -> f64 {
        self.sum_diff
    }

    /// `Σ(x - ref)²`.
    #[inline]
    pub fn sum_diff2(&self) -> f64 {
        self.sum_diff2
    }

    /// Mean of the pushed values, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }

    /// Bessel-corrected variance, `None` with fewer than two values.
    pub fn variance(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        let n = self.count as f64;
        Some((self.sum_diff2 - (self.sum_diff * self.sum_diff) / n) / (n - 1.0))
    }
}
