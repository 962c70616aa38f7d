//! # Random Number Generation Infrastructure
//!
//! Random sources for drawing complex normal sample sets.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: every generator is seeded and remembers its seed
//! - **Independence**: each cached distribution gets its own generator,
//!   seeded through [`derive_seed`], so entries are uncorrelated
//! - **Static dispatch**: the generator is generic over [`NormalSource`];
//!   no `Box<dyn Trait>` in the sampling loop
//!
//! ## Module Structure
//!
//! - [`NormalSource`]: trait for an unbounded stream of standard normal draws
//! - [`SamplerRng`]: seeded `StdRng` wrapper using the Ziggurat sampler
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_core::rng::{derive_seed, NormalSource, SamplerRng};
//!
//! let mut rng = SamplerRng::from_seed(derive_seed(12345, 0));
//!
//! let mut buffer = vec![0.0; 1024];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;

pub use prng::{derive_seed, SamplerRng};

/// Source of independent standard normal (mean 0, variance 1) draws.
///
/// The generator requests as many draws as rejection sampling needs, so
/// implementations must never run dry.
pub trait NormalSource {
    /// Draws one standard normal variate.
    fn next_normal(&mut self) -> f64;

    /// Seed that reproduces this stream, when known.
    #[inline]
    fn stream_seed(&self) -> Option<u64> {
        None
    }

    /// Fills the buffer with standard normal variates.
    #[inline]
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.next_normal();
        }
    }
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        (**self).next_normal()
    }

    #[inline]
    fn stream_seed(&self) -> Option<u64> {
        (**self).stream_seed()
    }

    #[inline]
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        (**self).fill_normal(buffer)
    }
}
