//! Random node heights.
//!
//! One `u64` draw per node. Bit 0 is discarded; the run of consecutive one
//! bits starting at bit 1 decides how many levels the node climbs. With the
//! default ratio of 2 this gives `P(height = k) = 2^-k` below the cap, with the
//! tail clamped at `MAX_HEIGHT`.

use rand_core::{RngCore, SeedableRng};

/// Draws geometric node heights in `1..=MAX_HEIGHT`.
///
/// Owns its entropy source. There is no process-wide seed; two lists seeded
/// alike build identical shapes for identical insert sequences.
#[derive(Debug, Clone)]
pub struct HeightGenerator<R, const MAX_HEIGHT: usize> {
    rng: R,
    /// log2(level_ratio). Each extra level costs this many one bits, so
    /// larger values produce sparser upper levels.
    level_divisor: u8,
}

impl<R: RngCore, const MAX_HEIGHT: usize> HeightGenerator<R, MAX_HEIGHT> {
    const VALID: () = assert!(
        MAX_HEIGHT >= 1 && MAX_HEIGHT <= 64,
        "MAX_HEIGHT must be in 1..=64"
    );

    /// Creates a generator with the standard ratio of 2 (p = 0.5).
    pub fn new(rng: R) -> Self {
        Self::with_level_ratio(rng, 2)
    }

    /// Creates a generator where each extra level is `level_ratio` times
    /// rarer than the one below it.
    ///
    /// Common values:
    /// - 2: Standard (p=0.5), ~2 links per node average
    /// - 4: Redis-style (p=0.25), ~1.33 links per node average
    ///
    /// Must be a power of 2 and >= 2. Invalid values are rounded up to the
    /// next valid value.
    pub fn with_level_ratio(rng: R, level_ratio: u32) -> Self {
        let () = Self::VALID;
        let level_ratio = level_ratio.max(2).next_power_of_two();
        Self {
            rng,
            level_divisor: level_ratio.trailing_zeros() as u8,
        }
    }

    /// Returns the effective level ratio.
    #[inline]
    pub fn level_ratio(&self) -> u32 {
        1 << self.level_divisor
    }

    /// Draws the next height.
    #[inline]
    pub fn next_height(&mut self) -> usize {
        let r = self.rng.next_u64();
        let run = (r >> 1).trailing_ones() as usize;
        (1 + run / self.level_divisor as usize).min(MAX_HEIGHT)
    }
}

impl<R: SeedableRng, const MAX_HEIGHT: usize> HeightGenerator<R, MAX_HEIGHT> {
    /// Replaces the entropy source with one seeded from `seed`.
    ///
    /// Only heights drawn afterwards are affected; existing nodes keep theirs.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Replays a fixed sequence of draws.
    struct Scripted(Vec<u64>);

    impl RngCore for Scripted {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0.remove(0)
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for b in dst {
                *b = self.next_u64() as u8;
            }
        }
    }

    #[test]
    fn counts_ones_from_bit_one() {
        let mut heights: HeightGenerator<_, 16> =
            HeightGenerator::new(Scripted(vec![0b0, 0b1, 0b10, 0b110, 0b1110, 0b11010]));

        assert_eq!(heights.next_height(), 1);
        // bit 0 is ignored
        assert_eq!(heights.next_height(), 1);
        assert_eq!(heights.next_height(), 2);
        assert_eq!(heights.next_height(), 3);
        assert_eq!(heights.next_height(), 4);
        // run stops at the first zero
        assert_eq!(heights.next_height(), 2);
    }

    #[test]
    fn clamps_at_max_height() {
        let mut heights: HeightGenerator<_, 4> = HeightGenerator::new(Scripted(vec![u64::MAX]));
        assert_eq!(heights.next_height(), 4);
    }

    #[test]
    fn never_exceeds_max_height() {
        let mut heights: HeightGenerator<_, 5> =
            HeightGenerator::new(SmallRng::seed_from_u64(7));
        for _ in 0..100_000 {
            let h = heights.next_height();
            assert!((1..=5).contains(&h));
        }
    }

    #[test]
    fn distribution_is_geometric() {
        const DRAWS: usize = 200_000;
        let mut heights: HeightGenerator<_, 32> =
            HeightGenerator::new(SmallRng::seed_from_u64(12345));

        let mut at_least = [0usize; 8];
        for _ in 0..DRAWS {
            let h = heights.next_height();
            for (k, count) in at_least.iter_mut().enumerate() {
                if h > k {
                    *count += 1;
                }
            }
        }

        // P(height >= k + 1) = 2^-k
        for (k, &count) in at_least.iter().enumerate() {
            let expected = DRAWS as f64 / (1u64 << k) as f64;
            let observed = count as f64;
            assert!(
                (observed - expected).abs() < expected * 0.1 + 50.0,
                "level {}: expected ~{expected}, observed {observed}",
                k + 1
            );
        }
    }

    #[test]
    fn level_ratio_rounding() {
        let rng = SmallRng::seed_from_u64(1);
        assert_eq!(HeightGenerator::<_, 8>::new(rng.clone()).level_ratio(), 2);
        assert_eq!(HeightGenerator::<_, 8>::with_level_ratio(rng.clone(), 4).level_ratio(), 4);
        assert_eq!(HeightGenerator::<_, 8>::with_level_ratio(rng.clone(), 3).level_ratio(), 4);
        assert_eq!(HeightGenerator::<_, 8>::with_level_ratio(rng, 0).level_ratio(), 2);
    }

    #[test]
    fn redis_ratio_is_sparser() {
        let mut standard: HeightGenerator<_, 16> =
            HeightGenerator::new(SmallRng::seed_from_u64(3));
        let mut redis: HeightGenerator<_, 16> =
            HeightGenerator::with_level_ratio(SmallRng::seed_from_u64(3), 4);

        let total = |g: &mut HeightGenerator<SmallRng, 16>| -> usize {
            (0..10_000).map(|_| g.next_height()).sum()
        };
        assert!(total(&mut redis) < total(&mut standard));
    }

    #[test]
    fn reseed_replays_sequence() {
        let mut heights: HeightGenerator<SmallRng, 16> =
            HeightGenerator::new(SmallRng::seed_from_u64(1));
        heights.reseed(99);
        let first: Vec<_> = (0..64).map(|_| heights.next_height()).collect();
        heights.reseed(99);
        let second: Vec<_> = (0..64).map(|_| heights.next_height()).collect();
        assert_eq!(first, second);
    }
}
