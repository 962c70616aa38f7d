//! Error types for the sampling kernel.
//!
//! This module provides:
//! - `StatsError`: degenerate input to the moment engine
//! - `ConfigError`: invalid [`SamplerConfig`](crate::config::SamplerConfig) values
//! - `SamplerError`: generator, cache and propagation failures

use thiserror::Error;

/// Moment engine errors.
///
/// Degenerate input is reported explicitly instead of leaking NaN or
/// infinity into downstream moment summaries.
///
/// # Examples
/// ```
/// use sampler_core::StatsError;
///
/// let err = StatsError::InsufficientSamples { count: 1, required: 2 };
/// assert!(format!("{}", err).contains("1 valid"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StatsError {
    /// Fewer valid (non-NaN) values than the statistic requires.
    #[error("Insufficient samples: {count} valid value(s), at least {required} required")]
    InsufficientSamples {
        /// Number of non-NaN values found
        count: usize,
        /// Minimum number of values required
        required: usize,
    },

    /// All valid values are equal, so the sequence cannot be standardised.
    #[error("Zero variance: every value equals the mean {mean}")]
    ZeroVariance {
        /// The common value of the sequence
        mean: f64,
    },

    /// A moment evaluated to NaN or infinity (infinite inputs).
    #[error("Non-finite {name}: {value}")]
    NonFinite {
        /// Name of the offending statistic
        name: &'static str,
        /// The computed value
        value: f64,
    },
}

/// Configuration error for the sampler.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Iteration cap of zero would reject every draw.
    #[error("Invalid max_iterations {0}: must be at least 1")]
    InvalidMaxIterations(u64),

    /// Initial capacity above the supported limit.
    #[error("Invalid initial capacity {0}: must be at most {max}", max = crate::config::MAX_CAPACITY)]
    InvalidCapacity(usize),

    /// Configuration text could not be parsed.
    #[error("Configuration parse error: {0}")]
    Parse(String),

    /// Configuration file could not be read.
    #[error("Configuration file error: {0}")]
    File(String),
}

/// Sampler errors.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// Rejection sampling hit its iteration cap without an accepted draw.
    #[error("Validation did not converge after {iterations} iterations")]
    NotConverged {
        /// Number of rejected draws
        iterations: u64,
    },

    /// `next()` called on a cache holding no distribution.
    #[error("Distribution cache not initialised: no distribution available")]
    CacheNotInitialized,

    /// Requested capacity above the supported limit.
    #[error("Requested capacity {requested} exceeds limit {max}")]
    CapacityExceeded {
        /// Requested number of distributions
        requested: usize,
        /// Supported maximum
        max: usize,
    },

    /// Invalid propagation parameter.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Moment computation failed.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_error_display() {
        let err = StatsError::InsufficientSamples {
            count: 0,
            required: 2,
        };
        assert_eq!(
            format!("{}", err),
            "Insufficient samples: 0 valid value(s), at least 2 required"
        );

        let err = StatsError::ZeroVariance { mean: 2.5 };
        assert_eq!(format!("{}", err), "Zero variance: every value equals the mean 2.5");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidMaxIterations(0);
        assert!(err.to_string().contains("max_iterations 0"));

        let err = ConfigError::InvalidCapacity(1 << 30);
        assert!(err.to_string().contains("at most"));
    }

    #[test]
    fn test_sampler_error_from_stats() {
        let err: SamplerError = StatsError::ZeroVariance { mean: 1.0 }.into();
        assert!(matches!(err, SamplerError::Stats(_)));
        assert!(err.to_string().contains("Zero variance"));
    }

    #[test]
    fn test_not_converged_display() {
        let err = SamplerError::NotConverged { iterations: 10 };
        assert_eq!(
            err.to_string(),
            "Validation did not converge after 10 iterations"
        );
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = SamplerError::CacheNotInitialized;
        let _: &dyn std::error::Error = &err;
    }
}
