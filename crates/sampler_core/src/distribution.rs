//! Validated complex normal distributions.
//!
//! [`DistributionGenerator`] draws `N_SAMPLES` independent standard normal
//! pairs and accepts the candidate only if the squared norm of a probe
//! visibility `v = A/√2 (1 + i) + (A/S) (re + i im)` has empirical mean and
//! variance within [`EPSILON_MEAN`] and [`EPSILON_VARIANCE`] of theory
//! (`A²` and `(2A²/S)²`). Rejected candidates are discarded whole.
//!
//! A complex normal distribution's moments are invariant under the affine
//! transform applied downstream, so the probe values validate the sample
//! set itself, not any one use of it.

use std::time::Instant;

use crate::constants::{
    DEFAULT_MAX_ITERATIONS, EPSILON_MEAN, EPSILON_VARIANCE, N_SAMPLES, REFERENCE_AMPLITUDE,
    REFERENCE_SNR,
};
use crate::error::SamplerError;
use crate::moments::{moments, Moments};
use crate::rng::NormalSource;
use crate::summation::DeviationAccumulator;

/// One accepted draw of a bivariate standard normal pair.
///
/// Immutable once created: the samples passed the acceptance test and the
/// moment summaries are filled in.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexDistribution {
    /// `[real, imag]`, each of length `N_SAMPLES`.
    samples: [Vec<f64>; 2],
    /// Moment summaries of `[real, imag]`.
    moments: [Moments; 2],
    /// Draws needed until acceptance.
    iterations: u64,
    /// Seed of the random stream, when known.
    seed: Option<u64>,
}

impl ComplexDistribution {
    /// Generates a validated distribution with the default iteration cap.
    ///
    /// # Errors
    ///
    /// [`SamplerError::NotConverged`] if no draw is accepted within
    /// [`DEFAULT_MAX_ITERATIONS`] draws.
    pub fn create<R: NormalSource>(rng: &mut R) -> Result<Self, SamplerError> {
        DistributionGenerator::default().create(rng)
    }

    /// Real component samples.
    #[inline]
    pub fn real(&self) -> &[f64] {
        &self.samples[0]
    }

    /// Imaginary component samples.
    #[inline]
    pub fn imag(&self) -> &[f64] {
        &self.samples[1]
    }

    /// `[real, imag]` samples.
    #[inline]
    pub fn samples(&self) -> [&[f64]; 2] {
        [&self.samples[0], &self.samples[1]]
    }

    /// Moment summary of the real component.
    #[inline]
    pub fn moments_real(&self) -> &Moments {
        &self.moments[0]
    }

    /// Moment summary of the imaginary component.
    #[inline]
    pub fn moments_imag(&self) -> &Moments {
        &self.moments[1]
    }

    /// `[real, imag]` moment summaries.
    #[inline]
    pub fn moments(&self) -> &[Moments; 2] {
        &self.moments
    }

    /// Number of candidate draws it took to pass validation.
    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Seed reproducing this distribution, when the source reported one.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Re-runs the acceptance test on the stored samples.
    pub fn acceptance(&self) -> AcceptanceReport {
        acceptance_test(self.real(), self.imag())
    }
}

/// Outcome of the acceptance test on one candidate pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcceptanceReport {
    /// Empirical mean of the squared norm.
    pub mean: f64,
    /// Expected squared norm `A²`.
    pub norm: f64,
    /// `mean / norm`.
    pub ratio_mean: f64,
    /// Empirical (Bessel-corrected) variance of the squared norm.
    pub variance: f64,
    /// Expected standard deviation `2 A err`.
    pub err_norm: f64,
    /// `variance / err_norm²`.
    pub ratio_variance: f64,
}

impl AcceptanceReport {
    /// Whether both ratios lie strictly within tolerance of 1.
    #[inline]
    pub fn is_accepted(&self) -> bool {
        (self.ratio_mean - 1.0).abs() < EPSILON_MEAN
            && (self.ratio_variance - 1.0).abs() < EPSILON_VARIANCE
    }
}

/// Evaluates the acceptance test for a candidate `(real, imag)` pair.
///
/// Probes amplitude [`REFERENCE_AMPLITUDE`] at SNR [`REFERENCE_SNR`].
/// Sequences shorter than two samples yield NaN ratios, which never pass.
pub fn acceptance_test(real: &[f64], imag: &[f64]) -> AcceptanceReport {
    debug_assert_eq!(real.len(), imag.len());

    let amplitude = REFERENCE_AMPLITUDE;
    let err = amplitude / REFERENCE_SNR;
    let ref_re = amplitude / std::f64::consts::SQRT_2;
    let norm = amplitude * amplitude;

    let mut acc = DeviationAccumulator::new(norm);
    for (&x, &y) in real.iter().zip(imag) {
        let re = ref_re + err * x;
        let im = ref_re + err * y;
        acc.push(re * re + im * im);
    }

    let mean = acc.mean().unwrap_or(f64::NAN);
    let variance = acc.variance().unwrap_or(f64::NAN);

    // d(v²) = 2v dv
    let err_norm = 2.0 * amplitude * err;

    AcceptanceReport {
        mean,
        norm,
        ratio_mean: mean / norm,
        variance,
        err_norm,
        ratio_variance: variance / (err_norm * err_norm),
    }
}

/// Rejection-sampling generator of [`ComplexDistribution`]s.
///
/// # Examples
///
/// ```rust,no_run
/// use sampler_core::distribution::DistributionGenerator;
/// use sampler_core::rng::SamplerRng;
///
/// let generator = DistributionGenerator::new(100_000);
/// let mut rng = SamplerRng::from_seed(42);
/// let distribution = generator.create(&mut rng).unwrap();
///
/// assert!(distribution.acceptance().is_accepted());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DistributionGenerator {
    max_iterations: u64,
}

impl Default for DistributionGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

impl DistributionGenerator {
    /// Creates a generator giving up after `max_iterations` rejected draws.
    ///
    /// A cap of zero is raised to one draw.
    pub fn new(max_iterations: u64) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
        }
    }

    /// Returns the iteration cap.
    #[inline]
    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    /// Draws candidates from `rng` until one passes the acceptance test.
    ///
    /// Deterministic for a given source state: the same seed yields the
    /// same distribution after the same number of draws.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::NotConverged`] after `max_iterations` rejections
    /// - [`SamplerError::Stats`] if the accepted samples are degenerate
    pub fn create<R: NormalSource>(&self, rng: &mut R) -> Result<ComplexDistribution, SamplerError> {
        let start = Instant::now();
        let seed = rng.stream_seed();

        let mut real = vec![0.0; N_SAMPLES];
        let mut imag = vec![0.0; N_SAMPLES];
        let mut iterations = 0u64;

        let report = loop {
            if iterations >= self.max_iterations {
                tracing::warn!(iterations, ?seed, "distribution validation did not converge");
                return Err(SamplerError::NotConverged { iterations });
            }
            draw_pair(rng, &mut real, &mut imag);
            iterations += 1;

            let report = acceptance_test(&real, &imag);
            if report.is_accepted() {
                break report;
            }
        };

        tracing::debug!(
            n_samples = N_SAMPLES,
            snr = REFERENCE_SNR,
            mean = report.mean,
            norm = report.norm,
            ratio_mean = report.ratio_mean,
            std_dev = report.variance.sqrt(),
            err_norm = report.err_norm,
            ratio_variance = report.ratio_variance,
            "sampling accepted"
        );

        let moments = [moments(&real)?, moments(&imag)?];

        tracing::info!(
            elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
            iterations,
            "distribution created"
        );

        Ok(ComplexDistribution {
            samples: [real, imag],
            moments,
            iterations,
            seed,
        })
    }
}

/// Fills both components, two independent draws per index.
pub(crate) fn draw_pair<R: NormalSource>(rng: &mut R, real: &mut [f64], imag: &mut [f64]) {
    for (re, im) in real.iter_mut().zip(imag.iter_mut()) {
        *re = rng.next_normal();
        *im = rng.next_normal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SamplerRng;
    use approx::assert_relative_eq;

    /// Source that always returns the same value.
    struct ConstantSource(f64);

    impl NormalSource for ConstantSource {
        fn next_normal(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_constant_source_never_converges() {
        let generator = DistributionGenerator::new(25);
        let result = generator.create(&mut ConstantSource(0.0));
        assert!(matches!(
            result,
            Err(SamplerError::NotConverged { iterations: 25 })
        ));
    }

    #[test]
    fn test_zero_cap_is_one_draw() {
        let generator = DistributionGenerator::new(0);
        assert_eq!(generator.max_iterations(), 1);
        assert!(matches!(
            generator.create(&mut ConstantSource(1.0)),
            Err(SamplerError::NotConverged { iterations: 1 })
        ));
    }

    #[test]
    fn test_acceptance_constant_samples() {
        let zeros = vec![0.0; N_SAMPLES];
        let report = acceptance_test(&zeros, &zeros);

        assert_relative_eq!(report.mean, 1.0, epsilon = 1e-15);
        assert_relative_eq!(report.variance, 0.0, epsilon = 1e-28);
        assert_relative_eq!(report.err_norm, 0.02, epsilon = 1e-17);
        assert!(!report.is_accepted());
    }

    #[test]
    fn test_acceptance_short_input_rejected() {
        let report = acceptance_test(&[0.5], &[0.5]);
        assert!(report.ratio_variance.is_nan());
        assert!(!report.is_accepted());
    }

    #[test]
    fn test_acceptance_tolerance_boundaries() {
        let mut report = AcceptanceReport {
            mean: 1.0,
            norm: 1.0,
            ratio_mean: 1.0 + 4.9e-4,
            variance: 4e-4,
            err_norm: 0.02,
            ratio_variance: 1.0 - 4.9e-5,
        };
        assert!(report.is_accepted());

        report.ratio_mean = 1.0 + 5.1e-4;
        assert!(!report.is_accepted());

        report.ratio_mean = 1.0;
        report.ratio_variance = 1.0 + 5.1e-5;
        assert!(!report.is_accepted());
    }

    #[test]
    fn test_create_accepts_and_summarises() {
        let mut rng = SamplerRng::from_seed(42);
        let distribution = DistributionGenerator::default().create(&mut rng).unwrap();

        assert_eq!(distribution.real().len(), N_SAMPLES);
        assert_eq!(distribution.imag().len(), N_SAMPLES);
        assert!(distribution.iterations() >= 1);
        assert_eq!(distribution.seed(), Some(42));

        let report = distribution.acceptance();
        assert!(report.is_accepted());
        assert!((report.ratio_mean - 1.0).abs() < EPSILON_MEAN);
        assert!((report.ratio_variance - 1.0).abs() < EPSILON_VARIANCE);

        // Moment summaries match a fresh computation.
        assert_eq!(*distribution.moments_real(), moments(distribution.real()).unwrap());
        assert_eq!(*distribution.moments_imag(), moments(distribution.imag()).unwrap());
    }

    #[test]
    fn test_create_is_deterministic() {
        let a = ComplexDistribution::create(&mut SamplerRng::from_seed(7)).unwrap();
        let b = ComplexDistribution::create(&mut SamplerRng::from_seed(7)).unwrap();

        assert_eq!(a.iterations(), b.iterations());
        assert_eq!(a, b);
    }

    #[test]
    fn test_components_are_standard_normal() {
        let distribution = ComplexDistribution::create(&mut SamplerRng::from_seed(11)).unwrap();

        for m in distribution.moments() {
            // Standard error of the mean is 1/32 for 1024 samples.
            assert!(m.mean.abs() < 0.15, "mean {}", m.mean);
            assert!((m.variance - 1.0).abs() < 0.2, "variance {}", m.variance);
        }
    }
}
