//! # Sampler Core (Sampling Kernel)
//!
//! Reusable, pre-validated bivariate (complex) standard-normal sample sets
//! for Monte Carlo error propagation, plus compensated moment arithmetic.
//!
//! This crate provides:
//! - A rejection-sampling generator that only accepts a candidate pair of
//!   Gaussian sequences whose empirical moments match theory
//! - A two-pass, compensated moment engine (mean, variance, skewness,
//!   kurtosis)
//! - A thread-safe distribution cache served round robin
//! - Monte Carlo error propagation for the (squared) amplitude of a
//!   noisy complex visibility
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use sampler_core::cache::DistributionCache;
//! use sampler_core::config::SamplerConfig;
//! use sampler_core::propagation::{propagate, Observable};
//!
//! let config = SamplerConfig::builder()
//!     .initial_capacity(4)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let cache = DistributionCache::new(config).unwrap();
//! let distribution = cache.next().unwrap();
//!
//! let estimate = propagate(&distribution, 0.5, 10.0, Observable::SquaredAmplitude).unwrap();
//! println!("mean ratio: {:.5}", estimate.mean_ratio());
//! ```
//!
//! ## Concurrency
//!
//! [`cache::DistributionCache`] serialises all of its operations behind one
//! lock. Cached distributions are immutable and handed out as `Arc`s, so
//! readers need no further synchronisation. The moment engine is a pure
//! function.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod config;
pub mod constants;
pub mod distribution;
pub mod error;
pub mod moments;
pub mod propagation;
pub mod rng;
pub mod summation;

// Re-export commonly used items for convenience
pub use cache::DistributionCache;
pub use config::{SamplerConfig, SamplerConfigBuilder};
pub use distribution::{AcceptanceReport, ComplexDistribution, DistributionGenerator};
pub use error::{ConfigError, SamplerError, StatsError};
pub use moments::{moments, nan_mean, Moments};
pub use propagation::{Observable, PropagationEstimate, SnrSweep};
pub use rng::{NormalSource, SamplerRng};
