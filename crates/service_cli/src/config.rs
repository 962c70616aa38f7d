//! Sampler configuration for CLI runs.
//!
//! Precedence: command line flags, then the TOML file, then defaults.

use std::path::Path;

use sampler_core::{SamplerConfig, SamplerConfigBuilder};
use tracing::{debug, info};

use crate::Result;

/// Overrides taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Initial cache size.
    pub capacity: Option<usize>,
    /// Base seed.
    pub seed: Option<u64>,
    /// Iteration cap per distribution.
    pub max_iterations: Option<u64>,
}

/// Loads the configuration file when present and applies `overrides`.
///
/// A missing file is not an error: defaults apply.
pub fn load(path: &Path, overrides: &Overrides) -> Result<SamplerConfig> {
    let base = if path.exists() {
        info!("Loading configuration from {}", path.display());
        SamplerConfig::from_file(path)?
    } else {
        debug!("No configuration file at {}, using defaults", path.display());
        SamplerConfig::default()
    };

    let mut builder = SamplerConfigBuilder::from_config(&base);
    if let Some(capacity) = overrides.capacity {
        builder = builder.initial_capacity(capacity);
    }
    if let Some(seed) = overrides.seed {
        builder = builder.seed(seed);
    }
    if let Some(max_iterations) = overrides.max_iterations {
        builder = builder.max_iterations(max_iterations);
    }
    Ok(builder.build()?)
}
