//! Monte Carlo error propagation on noisy complex visibilities.
//!
//! A visibility of amplitude `v` observed at signal-to-noise ratio `s`
//! carries a circular complex error `e = v / s`. Feeding a validated
//! [`ComplexDistribution`] through `V = v/√2 (1 + i) + e (re + i im)` gives
//! the sampled distribution of `|V|` or `|V|²`, whose mean and standard
//! deviation are compared with first-order expectations:
//!
//! | Observable | expected value | expected error |
//! |------------|----------------|----------------|
//! | `Amplitude` | `v` | `e` |
//! | `SquaredAmplitude` | `v²` | `2 v e` |
//!
//! The ratios drift away from 1 as the SNR drops, which is what
//! [`SnrSweep`] explores.

use std::fmt;

use serde::Serialize;

use crate::constants::{N_SAMPLES, SAMPLING_FACTOR_MEAN, SAMPLING_FACTOR_VARIANCE};
use crate::distribution::{draw_pair, ComplexDistribution};
use crate::error::SamplerError;
use crate::rng::NormalSource;
use crate::summation::DeviationAccumulator;

/// Quantity derived from each sampled visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Observable {
    /// `|V|`
    Amplitude,
    /// `|V|²`
    SquaredAmplitude,
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observable::Amplitude => write!(f, "VISAMP"),
            Observable::SquaredAmplitude => write!(f, "VIS2"),
        }
    }
}

/// Sampled versus expected mean and error of an [`Observable`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PropagationEstimate {
    /// Observable that was sampled.
    pub observable: Observable,
    /// Reference visibility amplitude.
    pub amplitude: f64,
    /// Signal-to-noise ratio.
    pub snr: f64,
    /// Sampled mean.
    pub mean: f64,
    /// Expected value.
    pub expected: f64,
    /// Sampled standard deviation.
    pub std_dev: f64,
    /// Expected (first-order propagated) error.
    pub expected_error: f64,
}

impl PropagationEstimate {
    /// `mean / expected`.
    #[inline]
    pub fn mean_ratio(&self) -> f64 {
        self.mean / self.expected
    }

    /// `std_dev / expected_error`.
    #[inline]
    pub fn error_ratio(&self) -> f64 {
        self.std_dev / self.expected_error
    }
}

/// Propagates the circular error of `amplitude` at `snr` through a cached
/// distribution.
///
/// # Errors
///
/// [`SamplerError::InvalidParameter`] if `amplitude` or `snr` is not a
/// finite positive number.
pub fn propagate(
    distribution: &ComplexDistribution,
    amplitude: f64,
    snr: f64,
    observable: Observable,
) -> Result<PropagationEstimate, SamplerError> {
    estimate(distribution.real(), distribution.imag(), amplitude, snr, observable)
}

/// Same as [`propagate`] on a freshly drawn, unvalidated pair.
///
/// Serves as the baseline that validated distributions are compared with.
pub fn propagate_fresh<R: NormalSource>(
    rng: &mut R,
    amplitude: f64,
    snr: f64,
    observable: Observable,
) -> Result<PropagationEstimate, SamplerError> {
    let mut real = vec![0.0; N_SAMPLES];
    let mut imag = vec![0.0; N_SAMPLES];
    draw_pair(rng, &mut real, &mut imag);
    estimate(&real, &imag, amplitude, snr, observable)
}

fn estimate(
    real: &[f64],
    imag: &[f64],
    amplitude: f64,
    snr: f64,
    observable: Observable,
) -> Result<PropagationEstimate, SamplerError> {
    check_positive("amplitude", amplitude)?;
    check_positive("snr", snr)?;

    let err = amplitude / snr;
    let vis_re = amplitude / std::f64::consts::SQRT_2;
    let vis_im = vis_re;

    let (expected, expected_error) = match observable {
        Observable::Amplitude => (amplitude, err),
        // d(v²) = 2v dv
        Observable::SquaredAmplitude => (amplitude * amplitude, 2.0 * amplitude * err),
    };

    let mut acc = DeviationAccumulator::new(expected);
    for (&x, &y) in real.iter().zip(imag) {
        let re = vis_re + err * x;
        let im = vis_im + err * y;
        let squared = re * re + im * im;
        acc.push(match observable {
            Observable::Amplitude => squared.sqrt(),
            Observable::SquaredAmplitude => squared,
        });
    }

    let mean = SAMPLING_FACTOR_MEAN * acc.sum();
    let variance = SAMPLING_FACTOR_VARIANCE
        * (acc.sum_diff2() - SAMPLING_FACTOR_MEAN * (acc.sum_diff() * acc.sum_diff()));

    Ok(PropagationEstimate {
        observable,
        amplitude,
        snr,
        mean,
        expected,
        std_dev: variance.max(0.0).sqrt(),
        expected_error,
    })
}

fn check_positive(name: &'static str, value: f64) -> Result<(), SamplerError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SamplerError::InvalidParameter { name, value })
    }
}

/// Decreasing SNR grid: 10 down to 3 in steps of 1, then steps of 0.1
/// while above 0.01.
///
/// # Examples
/// ```
/// use sampler_core::SnrSweep;
///
/// let snrs: Vec<f64> = SnrSweep::new().collect();
/// assert_eq!(snrs[0], 10.0);
/// assert!(snrs.iter().all(|&s| s > 1e-2));
/// ```
#[derive(Clone, Debug)]
pub struct SnrSweep {
    next: f64,
}

impl SnrSweep {
    /// First SNR of the sweep.
    pub const START: f64 = 10.0;
    /// SNR values are produced while strictly above this floor.
    pub const FLOOR: f64 = 1e-2;
    /// Below this SNR the coarse step switches to the fine step.
    pub const COARSE_LIMIT: f64 = 2.5;

    /// Creates the default sweep.
    pub fn new() -> Self {
        Self { next: Self::START }
    }
}

impl Default for SnrSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for SnrSweep {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let snr = self.next;
        if snr <= Self::FLOOR {
            return None;
        }
        self.next = if snr > Self::COARSE_LIMIT {
            snr - 1.0
        } else {
            snr - 0.1
        };
        Some(snr)
    }
}
