//! TTL jitter.
//!
//! Each write draws its own TTL from `[base, base + ratio * base]`, so
//! entries populated in the same burst expire at spread-out times.

use rand::Rng;
use std::time::Duration;

/// Default upper bound of the random extension, as a fraction of the base.
pub const DEFAULT_JITTER_RATIO: f64 = 0.1;

/// Base TTL plus bounded random extension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TtlPolicy {
    base: Duration,
    jitter_ratio: f64,
}

impl TtlPolicy {
    /// Policy with the default 10% jitter.
    #[must_use]
    pub const fn new(base: Duration) -> Self {
        Self {
            base,
            jitter_ratio: DEFAULT_JITTER_RATIO,
        }
    }

    /// Overrides the jitter ratio, clamped to `[0, 1]`. NaN disables jitter.
    #[must_use]
    pub fn with_jitter_ratio(mut self, ratio: f64) -> Self {
        self.jitter_ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        self
    }

    #[must_use]
    pub const fn base(&self) -> Duration {
        self.base
    }

    #[must_use]
    pub const fn jitter_ratio(&self) -> f64 {
        self.jitter_ratio
    }

    /// Largest TTL this policy can produce.
    #[must_use]
    pub fn max_ttl(&self) -> Duration {
        self.base + self.base.mul_f64(self.jitter_ratio)
    }

    /// Draws a TTL using the thread-local RNG.
    #[must_use]
    pub fn effective_ttl(&self) -> Duration {
        self.sample(&mut rand::thread_rng())
    }

    /// Draws a TTL from `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let spread = self.base.mul_f64(self.jitter_ratio);
        let spread_nanos = u64::try_from(spread.as_nanos()).unwrap_or(u64::MAX);
        if spread_nanos == 0 {
            return self.base;
        }
        self.base + Duration::from_nanos(rng.gen_range(0..=spread_nanos))
    }
}

/// `base + uniform(0, 0.1 * base)`.
#[must_use]
pub fn effective_ttl(base: Duration) -> Duration {
    TtlPolicy::new(base).effective_ttl()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_samples_stay_within_bounds_and_vary() {
        let base = Duration::from_secs(1800);
        let samples: Vec<Duration> = (0..1000).map(|_| effective_ttl(base)).collect();

        for ttl in &samples {
            assert!(*ttl >= base, "{ttl:?} below base");
            assert!(*ttl <= base.mul_f64(1.1), "{ttl:?} above 110% of base");
        }

        let distinct: HashSet<_> = samples.iter().collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_zero_ratio_returns_base() {
        let policy = TtlPolicy::new(Duration::from_secs(300)).with_jitter_ratio(0.0);
        assert_eq!(policy.effective_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_zero_base_stays_zero() {
        assert_eq!(effective_ttl(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_ratio_is_clamped() {
        let policy = TtlPolicy::new(Duration::from_secs(10)).with_jitter_ratio(5.0);
        assert!((policy.jitter_ratio() - 1.0).abs() < f64::EPSILON);
        assert_eq!(policy.max_ttl(), Duration::from_secs(20));

        let policy = policy.with_jitter_ratio(-1.0);
        assert_eq!(policy.jitter_ratio(), 0.0);

        let policy = policy.with_jitter_ratio(f64::NAN);
        assert_eq!(policy.jitter_ratio(), 0.0);
    }
}
