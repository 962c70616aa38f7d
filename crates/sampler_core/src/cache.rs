//! Thread-safe cache of validated distributions, served round robin.
//!
//! [`DistributionCache`] is an explicitly constructed service object: build
//! it once, wrap it in an `Arc` (see [`DistributionCache::shared`]) and hand
//! it to every consumer. One mutex guards the collection and its cursor. It
//! is never held while distributions are generated, so the cache can be
//! driven from inside rayon tasks and `next()` never waits on generation.
//!
//! Entries are generated eagerly and never removed, so the cursor is always
//! a valid index.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use rayon::prelude::*;

use crate::config::{SamplerConfig, MAX_CAPACITY};
use crate::distribution::{ComplexDistribution, DistributionGenerator};
use crate::error::SamplerError;
use crate::rng::{derive_seed, SamplerRng};

/// Collection and cursor, only touched under the lock.
#[derive(Debug, Default)]
struct CacheState {
    distributions: Vec<Arc<ComplexDistribution>>,
    cursor: usize,
}

/// Growable, round-robin cache of [`ComplexDistribution`]s.
///
/// # Examples
///
/// ```rust,no_run
/// use sampler_core::{DistributionCache, SamplerConfig};
///
/// let config = SamplerConfig::builder().initial_capacity(3).seed(1).build().unwrap();
/// let cache = DistributionCache::shared(config).unwrap();
///
/// let first = cache.next().unwrap();
/// cache.next().unwrap();
/// cache.next().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &cache.next().unwrap()));
/// ```
#[derive(Debug)]
pub struct DistributionCache {
    config: SamplerConfig,
    generator: DistributionGenerator,
    state: Mutex<CacheState>,
}

impl DistributionCache {
    /// Validates `config` and eagerly generates its initial capacity.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::Config`] for an invalid configuration
    /// - any generation error from [`DistributionCache::ensure_capacity`]
    pub fn new(config: SamplerConfig) -> Result<Self, SamplerError> {
        config.validate()?;
        let initial = config.initial_capacity();
        let cache = Self {
            generator: DistributionGenerator::new(config.max_iterations()),
            config,
            state: Mutex::new(CacheState {
                distributions: Vec::with_capacity(initial),
                cursor: 0,
            }),
        };
        cache.ensure_capacity(initial)?;
        Ok(cache)
    }

    /// Same as [`DistributionCache::new`], returning a shareable handle.
    pub fn shared(config: SamplerConfig) -> Result<Arc<Self>, SamplerError> {
        Self::new(config).map(Arc::new)
    }

    /// Returns the configuration the cache was built with.
    #[inline]
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Generates and appends distributions until at least `count` are cached.
    ///
    /// Missing entries are generated in parallel, each from its own
    /// [`SamplerRng`]: seeded with `derive_seed(base, index)` when the config
    /// carries a base seed, from fresh entropy otherwise. They are appended
    /// in index order, so a seeded cache is reproducible.
    ///
    /// Generation runs outside the lock. Concurrent callers may generate the
    /// same indices; only the first to append keeps its entries.
    ///
    /// Returns the cache size after the call.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::CapacityExceeded`] if `count > MAX_CAPACITY`
    /// - [`SamplerError::NotConverged`] if a distribution fails to validate;
    ///   nothing is appended in that case
    pub fn ensure_capacity(&self, count: usize) -> Result<usize, SamplerError> {
        if count > MAX_CAPACITY {
            return Err(SamplerError::CapacityExceeded {
                requested: count,
                max: MAX_CAPACITY,
            });
        }

        let cached = self.len();
        if count <= cached {
            return Ok(cached);
        }

        tracing::info!(needed = count - cached, "preparing distributions");
        let start = Instant::now();

        let created = (cached..count)
            .into_par_iter()
            .map(|index| {
                let mut rng = self.rng_for(index);
                self.generator.create(&mut rng).map(Arc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = self.lock();
        let len = state.distributions.len();
        if len < count {
            // created[i] holds index cached + i; keep those not appended meanwhile.
            state
                .distributions
                .extend(created.into_iter().skip(len - cached));
        }

        tracing::info!(
            elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
            size = state.distributions.len(),
            "distributions prepared"
        );
        Ok(state.distributions.len())
    }

    /// Returns the distribution at the cursor and advances it cyclically.
    ///
    /// # Errors
    ///
    /// [`SamplerError::CacheNotInitialized`] when the cache is empty.
    pub fn next(&self) -> Result<Arc<ComplexDistribution>, SamplerError> {
        let mut state = self.lock();
        let size = state.distributions.len();
        if size == 0 {
            return Err(SamplerError::CacheNotInitialized);
        }

        let index = state.cursor;
        let distribution = Arc::clone(&state.distributions[index]);
        state.cursor = (index + 1) % size;
        Ok(distribution)
    }

    /// Returns the distribution at `index` without moving the cursor.
    pub fn get(&self, index: usize) -> Option<Arc<ComplexDistribution>> {
        self.lock().distributions.get(index).cloned()
    }

    /// Number of cached distributions.
    pub fn len(&self) -> usize {
        self.lock().distributions.len()
    }

    /// Whether the cache holds no distribution.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index served by the next call to [`DistributionCache::next`].
    pub fn cursor(&self) -> usize {
        self.lock().cursor
    }

    fn rng_for(&self, index: usize) -> SamplerRng {
        match self.config.seed() {
            Some(base) => SamplerRng::from_seed(derive_seed(base, index as u64)),
            None => SamplerRng::from_entropy(),
        }
    }

    // State is only mutated by single push/assign steps, so a panic in
    // another holder cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn seeded(capacity: usize, seed: u64) -> SamplerConfig {
        SamplerConfig::builder()
            .initial_capacity(capacity)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_cache_next_fails() {
        let cache = DistributionCache::new(seeded(0, 1)).unwrap();
        assert!(cache.is_empty());
        assert!(matches!(
            cache.next(),
            Err(SamplerError::CacheNotInitialized)
        ));
        assert!(cache.get(0).is_none());
    }

    #[test]
    fn test_initial_fill_and_round_robin() {
        let cache = DistributionCache::new(seeded(2, 5)).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.cursor(), 0);

        let a = cache.next().unwrap();
        assert_eq!(cache.cursor(), 1);
        let b = cache.next().unwrap();
        assert_eq!(cache.cursor(), 0);
        let c = cache.next().unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_ensure_capacity_grows_and_never_shrinks() {
        let cache = DistributionCache::new(seeded(1, 9)).unwrap();
        let first = cache.get(0).unwrap();

        assert_eq!(cache.ensure_capacity(2).unwrap(), 2);
        assert_eq!(cache.ensure_capacity(1).unwrap(), 2);
        assert_eq!(cache.len(), 2);
        assert!(Arc::ptr_eq(&first, &cache.get(0).unwrap()));
    }

    #[test]
    fn test_capacity_limit() {
        let cache = DistributionCache::new(seeded(0, 1)).unwrap();
        assert!(matches!(
            cache.ensure_capacity(MAX_CAPACITY + 1),
            Err(SamplerError::CapacityExceeded { .. })
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_entries_carry_derived_seeds() {
        let cache = DistributionCache::new(seeded(2, 77)).unwrap();
        assert_eq!(cache.get(0).unwrap().seed(), Some(derive_seed(77, 0)));
        assert_eq!(cache.get(1).unwrap().seed(), Some(derive_seed(77, 1)));
    }

    #[test]
    fn test_growth_and_reads_inside_rayon_pool() {
        let cache = DistributionCache::new(seeded(1, 21)).unwrap();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap();

        let results: Vec<Result<(), SamplerError>> = pool.install(|| {
            (0..8usize)
                .into_par_iter()
                .map(|i| {
                    if i % 2 == 0 {
                        cache.ensure_capacity(2 + i / 2).map(|_| ())
                    } else {
                        cache.next().map(|_| ())
                    }
                })
                .collect()
        });

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(cache.len(), 5);
        for index in 0..5 {
            assert_eq!(
                cache.get(index).unwrap().seed(),
                Some(derive_seed(21, index as u64))
            );
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config: SamplerConfig = toml_config("max_iterations = 0");
        assert!(matches!(
            DistributionCache::new(config),
            Err(SamplerError::Config(ConfigError::InvalidMaxIterations(0)))
        ));
    }

    /// Deserialises without validation, to reach `DistributionCache::new`'s own check.
    fn toml_config(text: &str) -> SamplerConfig {
        toml::from_str(text).unwrap()
    }
}
