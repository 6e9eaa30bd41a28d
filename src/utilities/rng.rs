//! Seedable randomness source for behavioral synthesis.
//!
//! Every stochastic decision in the engine — persona selection, action
//! sampling, timing synthesis — draws from one [`BehaviorRng`], so a
//! seeded source reproduces a full session decision-for-decision while
//! production construction uses OS entropy.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// The engine's single randomness source.
#[derive(Debug, Clone)]
pub struct BehaviorRng {
    inner: StdRng,
}

impl BehaviorRng {
    /// Source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Deterministic source for tests and replay.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Derive an independent child source, e.g. one per batch session.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.inner.random())
    }

    /// Bernoulli draw. `p` is clamped to [0, 1].
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.random_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform draw over `[lo, hi)`; returns `lo` when the range is empty
    /// or inverted.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.inner.random_range(lo..hi)
        } else {
            lo
        }
    }

    /// Uniform inclusive integer draw; returns `lo` when `hi <= lo`.
    pub fn uniform_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi > lo {
            self.inner.random_range(lo..=hi)
        } else {
            lo
        }
    }

    /// Uniform duration over a `(min, max)` range in seconds.
    pub fn duration_between(&mut self, range: (f64, f64)) -> Duration {
        Duration::from_secs_f64(self.uniform(range.0, range.1).max(0.0))
    }

    /// Uniform pick from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            let i = self.inner.random_range(0..items.len());
            items.get(i)
        }
    }

    /// Normalized weighted draw over non-negative weights. Entries with
    /// zero, negative or non-finite weight are never selected; ties are
    /// resolved by draw order. `None` when no weight is positive.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut draw = self.inner.random_range(0.0..total);
        for (i, w) in weights.iter().enumerate() {
            if !w.is_finite() || *w <= 0.0 {
                continue;
            }
            if draw < *w {
                return Some(i);
            }
            draw -= *w;
        }
        // Accumulated floating-point error can step past the last bucket.
        weights.iter().rposition(|w| w.is_finite() && *w > 0.0)
    }

    /// In-place shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_replay() {
        let mut a = BehaviorRng::seeded(7);
        let mut b = BehaviorRng::seeded(7);
        for _ in 0..32 {
            assert_eq!(a.uniform(0.0, 1.0), b.uniform(0.0, 1.0));
        }
    }

    #[test]
    fn uniform_degenerate_range_returns_lo() {
        let mut rng = BehaviorRng::seeded(1);
        assert_eq!(rng.uniform(5.0, 5.0), 5.0);
        assert_eq!(rng.uniform(5.0, 2.0), 5.0);
        assert_eq!(rng.uniform_u32(4, 4), 4);
    }

    #[test]
    fn chance_clamps_probability() {
        let mut rng = BehaviorRng::seeded(2);
        assert!(rng.chance(2.0));
        assert!(!rng.chance(-1.0));
    }

    #[test]
    fn weighted_index_skips_non_positive_weights() {
        let mut rng = BehaviorRng::seeded(3);
        for _ in 0..100 {
            let i = rng.weighted_index(&[0.0, 1.0, -2.0]).unwrap();
            assert_eq!(i, 1);
        }
        assert!(rng.weighted_index(&[0.0, 0.0]).is_none());
        assert!(rng.weighted_index(&[]).is_none());
    }

    #[test]
    fn weighted_index_respects_weights() {
        let mut rng = BehaviorRng::seeded(4);
        let weights = [1.0, 9.0];
        let mut hits = [0usize; 2];
        for _ in 0..2000 {
            hits[rng.weighted_index(&weights).unwrap()] += 1;
        }
        assert!(hits[1] > hits[0] * 5, "{hits:?}");
    }

    #[test]
    fn pick_empty_is_none() {
        let mut rng = BehaviorRng::seeded(5);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert_eq!(rng.pick(&[42]), Some(&42));
    }
}
