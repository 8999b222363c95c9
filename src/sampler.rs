//! # Unpredictable duration sampling for simulated workloads.
//!
//! [`DurationSampler`] draws a uniformly distributed whole-second duration
//! from `[0, max_secs)`. Samples come from [`rand::rng()`], a ChaCha-based
//! CSPRNG reseeded from OS entropy, so sampled runtimes are not predictable
//! from previous draws. Each call samples independently; the sampler holds
//! no mutable state and is safe to share across concurrent tasks.

use std::time::Duration;

use rand::Rng;

/// Uniform, cryptographically unpredictable duration source.
///
/// ## Example
/// ```
/// use taskrace::DurationSampler;
///
/// let sampler = DurationSampler::new(20);
/// let d = sampler.sample();
/// assert!(d.as_secs() < 20);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DurationSampler {
    max_secs: u64,
}

impl DurationSampler {
    /// Creates a sampler over `[0, max_secs)` whole seconds.
    ///
    /// `max_secs` is clamped to a minimum of 1 so the range is never empty.
    pub fn new(max_secs: u64) -> Self {
        Self {
            max_secs: max_secs.max(1),
        }
    }

    /// Draws one whole-second count, uniform over `[0, max_secs)`.
    pub fn sample_secs(&self) -> u64 {
        rand::rng().random_range(0..self.max_secs)
    }

    /// Draws one duration, uniform over `[0, max_secs)` whole seconds.
    pub fn sample(&self) -> Duration {
        Duration::from_secs(self.sample_secs())
    }
}

impl Default for DurationSampler {
    /// Sampler over `[0, 20)` seconds, the simulated workload's range.
    fn default() -> Self {
        Self::new(20)
    }
}
