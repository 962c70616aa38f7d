//! Sampler configuration.
//!
//! This module provides the configuration type and builder for the
//! distribution cache and its generator, loadable from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::constants::{DEFAULT_MAX_ITERATIONS, INITIAL_CAPACITY};
use crate::error::ConfigError;

/// Maximum number of distributions a cache may hold (about 16 MiB of samples).
pub const MAX_CAPACITY: usize = 1024;

/// Sampler configuration.
///
/// Immutable configuration for a [`DistributionCache`](crate::cache::DistributionCache).
/// Use [`SamplerConfigBuilder`] to construct instances in code, or
/// [`SamplerConfig::from_toml_str`] to load them.
///
/// # Examples
///
/// ```rust
/// use sampler_core::config::SamplerConfig;
///
/// let config = SamplerConfig::builder()
///     .initial_capacity(6)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.initial_capacity(), 6);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplerConfig {
    /// Number of distributions generated at construction.
    initial_capacity: usize,
    /// Cap on rejection-sampling draws per distribution.
    max_iterations: u64,
    /// Base seed; `None` seeds every distribution from fresh entropy.
    seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: INITIAL_CAPACITY,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

impl SamplerConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SamplerConfigBuilder {
        SamplerConfigBuilder::default()
    }

    /// Returns the number of distributions generated at construction.
    #[inline]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns the cap on rejection-sampling draws per distribution.
    #[inline]
    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    /// Returns the optional base seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `max_iterations` is 0
    /// - `initial_capacity` is greater than [`MAX_CAPACITY`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(self.max_iterations));
        }
        if self.initial_capacity > MAX_CAPACITY {
            return Err(ConfigError::InvalidCapacity(self.initial_capacity));
        }
        Ok(())
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing keys take their default values.
    ///
    /// ```rust
    /// use sampler_core::config::SamplerConfig;
    ///
    /// let config = SamplerConfig::from_toml_str("initial_capacity = 3\nseed = 7").unwrap();
    /// assert_eq!(config.initial_capacity(), 3);
    /// assert_eq!(config.seed(), Some(7));
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::File(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}

/// Builder for [`SamplerConfig`].
///
/// Unset fields fall back to [`SamplerConfig::default`]; validation runs at
/// build time.
#[derive(Clone, Debug, Default)]
pub struct SamplerConfigBuilder {
    initial_capacity: Option<usize>,
    max_iterations: Option<u64>,
    seed: Option<u64>,
}

impl SamplerConfigBuilder {
    /// Starts from an existing configuration, e.g. one loaded from a file.
    pub fn from_config(config: &SamplerConfig) -> Self {
        Self {
            initial_capacity: Some(config.initial_capacity),
            max_iterations: Some(config.max_iterations),
            seed: config.seed,
        }
    }

    /// Sets the number of distributions generated at construction.
    #[inline]
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = Some(initial_capacity);
        self
    }

    /// Sets the cap on rejection-sampling draws per distribution.
    #[inline]
    pub fn max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Sets the base seed for reproducible caches.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configuration, validating all parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any parameter is invalid.
    pub fn build(self) -> Result<SamplerConfig, ConfigError> {
        let defaults = SamplerConfig::default();
        let config = SamplerConfig {
            initial_capacity: self.initial_capacity.unwrap_or(defaults.initial_capacity),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}
