//! Check command implementation
//!
//! Builds the cache from the effective configuration and re-runs the
//! acceptance test on every entry.

use sampler_core::{DistributionCache, SamplerConfig, SamplerError};
use tracing::{error, info};

use crate::{CliError, Result};

/// Run the check command
pub fn run(config: SamplerConfig) -> Result<()> {
    info!("Checking sampler configuration...");
    info!("  Initial capacity: {}", config.initial_capacity());
    info!("  Max iterations: {}", config.max_iterations());
    info!("  Seed: {:?}", config.seed());

    let cache = DistributionCache::new(config)?;
    if cache.is_empty() {
        return Err(SamplerError::CacheNotInitialized.into());
    }

    let mut failures = 0;
    for index in 0..cache.len() {
        let Some(distribution) = cache.get(index) else {
            continue;
        };
        let report = distribution.acceptance();
        let status = if report.is_accepted() { "ok" } else { "FAILED" };
        println!(
            "[{}] {} ratio_mean={:.6} ratio_variance={:.7} iterations={}",
            index,
            status,
            report.ratio_mean,
            report.ratio_variance,
            distribution.iterations()
        );
        if !report.is_accepted() {
            failures += 1;
        }
    }

    if failures > 0 {
        error!("{} distribution(s) failed re-validation", failures);
        return Err(CliError::CheckFailed(failures));
    }
    info!("All {} distributions valid", cache.len());
    Ok(())
}
