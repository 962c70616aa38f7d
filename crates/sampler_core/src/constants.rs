//! Fixed numeric constants shared by the generator, the moment engine and
//! downstream consumers.
//!
//! The sampling factors must match exactly for any dependent computation
//! (such as an SNR sweep) to reproduce the expected ratios.

/// Number of samples per component of a [`ComplexDistribution`](crate::distribution::ComplexDistribution).
pub const N_SAMPLES: usize = 1024;

/// Mean normalisation factor: `1 / N_SAMPLES`.
pub const SAMPLING_FACTOR_MEAN: f64 = 1.0 / N_SAMPLES as f64;

/// Variance normalisation factor: `1 / (N_SAMPLES - 1)` (Bessel correction).
pub const SAMPLING_FACTOR_VARIANCE: f64 = 1.0 / (N_SAMPLES - 1) as f64;

/// Reference amplitude used by the acceptance test.
pub const REFERENCE_AMPLITUDE: f64 = 1.0;

/// Reference signal-to-noise ratio used by the acceptance test.
pub const REFERENCE_SNR: f64 = 100.0;

/// Maximum accepted deviation of `mean / norm` from 1.
pub const EPSILON_MEAN: f64 = 5e-4;

/// Maximum accepted deviation of `variance / err_norm^2` from 1.
pub const EPSILON_VARIANCE: f64 = 5e-5;

/// Initial cache size: number of baselines for 6 telescopes.
pub const INITIAL_CAPACITY: usize = 15;

/// Default cap on rejection-sampling draws per distribution.
///
/// Acceptance rate is roughly 1 in 2000, so the cap is never hit by a
/// working random source.
pub const DEFAULT_MAX_ITERATIONS: u64 = 1_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_factors() {
        assert_eq!(SAMPLING_FACTOR_MEAN * N_SAMPLES as f64, 1.0);
        assert!((SAMPLING_FACTOR_VARIANCE * (N_SAMPLES - 1) as f64 - 1.0).abs() < 1e-15);
        assert!(SAMPLING_FACTOR_VARIANCE > SAMPLING_FACTOR_MEAN);
    }
}
