//! Integration tests for the distribution cache.
//!
//! These tests verify:
//! 1. **Round robin**: `k × size` calls return each entry exactly `k` times
//! 2. **Acceptance invariant**: every cached entry re-passes validation
//! 3. **Reproducibility**: seeded caches are identical across runs
//! 4. **Concurrency**: shared handles serve consistent entries across threads

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use sampler_core::constants::{EPSILON_MEAN, EPSILON_VARIANCE, N_SAMPLES};
use sampler_core::distribution::acceptance_test;
use sampler_core::{moments, DistributionCache, SamplerConfig, SamplerError};

fn seeded_cache(capacity: usize, seed: u64) -> DistributionCache {
    let config = SamplerConfig::builder()
        .initial_capacity(capacity)
        .seed(seed)
        .build()
        .unwrap();
    DistributionCache::new(config).unwrap()
}

// ============================================================================
// Round robin
// ============================================================================

#[test]
fn test_round_robin_returns_each_entry_k_times_in_order() {
    let cache = seeded_cache(3, 2024);
    let size = cache.len();
    let entries: Vec<_> = (0..size).map(|i| cache.get(i).unwrap()).collect();

    for k in 1..=3 {
        let served: Vec<_> = (0..k * size).map(|_| cache.next().unwrap()).collect();
        for (i, distribution) in served.iter().enumerate() {
            assert!(
                Arc::ptr_eq(distribution, &entries[i % size]),
                "call {} of round {} served the wrong entry",
                i,
                k
            );
        }
        assert_eq!(cache.cursor(), 0);
    }
}

#[test]
fn test_round_robin_after_growth_keeps_insertion_order() {
    let cache = seeded_cache(1, 31);
    let first = cache.next().unwrap();
    assert_eq!(cache.ensure_capacity(2).unwrap(), 2);

    let a = cache.next().unwrap();
    let b = cache.next().unwrap();
    assert!(Arc::ptr_eq(&a, &first));
    assert!(Arc::ptr_eq(&b, &cache.get(1).unwrap()));
}

// ============================================================================
// Acceptance invariant and concrete scenario
// ============================================================================

#[test]
fn test_every_cached_entry_passes_acceptance() {
    let cache = seeded_cache(3, 99);

    for i in 0..cache.len() {
        let distribution = cache.get(i).unwrap();
        let report = acceptance_test(distribution.real(), distribution.imag());

        assert!((report.ratio_mean - 1.0).abs() < EPSILON_MEAN);
        assert!((report.ratio_variance - 1.0).abs() < EPSILON_VARIANCE);
        assert_eq!(report.norm, 1.0);
        assert_relative_eq!(report.err_norm, 0.02, epsilon = 1e-17);
    }
}

#[test]
fn test_stored_moments_are_standard_normal() {
    let cache = seeded_cache(2, 123);

    for i in 0..cache.len() {
        let distribution = cache.get(i).unwrap();
        assert_eq!(distribution.real().len(), N_SAMPLES);

        for (samples, stored) in distribution.samples().iter().zip(distribution.moments()) {
            assert_eq!(moments(samples).unwrap(), *stored);
            assert!(stored.mean.abs() < 0.15, "mean {}", stored.mean);
            assert!((stored.variance - 1.0).abs() < 0.2, "variance {}", stored.variance);
        }
    }
}

// ============================================================================
// Reproducibility
// ============================================================================

#[test]
fn test_seeded_caches_are_identical() {
    let a = seeded_cache(2, 7);
    let b = seeded_cache(2, 7);

    for i in 0..2 {
        let (da, db) = (a.get(i).unwrap(), b.get(i).unwrap());
        assert_eq!(da.iterations(), db.iterations());
        assert_eq!(*da, *db);
    }
}

#[test]
fn test_entries_are_distinct() {
    let cache = seeded_cache(2, 8);
    assert_ne!(cache.get(0).unwrap().real(), cache.get(1).unwrap().real());
}

#[test]
fn test_unseeded_cache_records_entry_seeds() {
    let config = SamplerConfig::builder().initial_capacity(1).build().unwrap();
    let cache = DistributionCache::new(config).unwrap();
    assert!(cache.get(0).unwrap().seed().is_some());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_next_serves_balanced_rotation() {
    let cache = Arc::new(seeded_cache(2, 55));
    let threads = 4;
    let calls_per_thread = 50;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                (0..calls_per_thread)
                    .map(|_| Arc::as_ptr(&cache.next().unwrap()) as usize)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut counts: HashMap<usize, usize> = HashMap::new();
    for handle in handles {
        for ptr in handle.join().unwrap() {
            *counts.entry(ptr).or_default() += 1;
        }
    }

    // 200 serialised calls over 2 entries.
    assert_eq!(counts.len(), 2);
    assert!(counts.values().all(|&c| c == 100));
    assert_eq!(cache.cursor(), 0);
}

#[test]
fn test_concurrent_growth_and_reads() {
    let cache = Arc::new(seeded_cache(1, 66));

    let grower = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || cache.ensure_capacity(3).unwrap())
    };
    let readers: Vec<_> = (0..3)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..20 {
                    let distribution = cache.next().unwrap();
                    assert_eq!(distribution.real().len(), N_SAMPLES);
                    assert!(cache.cursor() < cache.len());
                }
            })
        })
        .collect();

    assert_eq!(grower.join().unwrap(), 3);
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_empty_cache_fails_fast() {
    let cache = seeded_cache(0, 1);
    assert!(matches!(cache.next(), Err(SamplerError::CacheNotInitialized)));
}
