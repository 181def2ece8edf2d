//! Synthetic address-pattern generators. All randomized generators are
//! seeded and reproduce the same sequence for the same seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::Address;

/// `count` addresses starting at `start`, `stride` bytes apart.
pub fn strided(start: Address, stride: Address, count: usize) -> Vec<Address> {
    (0..count as Address).map(|i| start + i * stride).collect()
}

/// `count` uniformly distributed addresses in `[0, span)`.
pub fn uniform(span: Address, count: usize, seed: u64) -> Vec<Address> {
    let mut rng: StdRng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.random_range(0..span)).collect()
}

/// Hot/cold mix: with probability `hot_fraction` an address from
/// `[0, hot_span)`, otherwise one from `[hot_span, hot_span + cold_span)`.
pub fn hotspot(
    hot_span: Address,
    cold_span: Address,
    hot_fraction: f64,
    count: usize,
    seed: u64,
) -> Vec<Address> {
    let mut rng: StdRng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            if rng.random_bool(hot_fraction) {
                rng.random_range(0..hot_span)
            } else {
                hot_span + rng.random_range(0..cold_span)
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strided_steps_through_blocks() {
        assert_eq!(strided(0x1000, 64, 4), vec![0x1000, 0x1040, 0x1080, 0x10c0]);
    }

    #[test]
    fn uniform_is_reproducible_per_seed() {
        let a = uniform(1 << 16, 500, 3);
        let b = uniform(1 << 16, 500, 3);
        assert_eq!(a, b);
        assert_eq!(a.len(), 500);
        assert!(a.iter().all(|&address| address < 1 << 16));

        assert_ne!(a, uniform(1 << 16, 500, 4));
    }

    #[test]
    fn hotspot_respects_the_split() {
        let hot = hotspot(1024, 1 << 20, 1.0, 200, 5);
        assert!(hot.iter().all(|&address| address < 1024));

        let cold = hotspot(1024, 1 << 20, 0.0, 200, 5);
        assert!(
            cold.iter()
                .all(|&address| (1024..1024 + (1 << 20)).contains(&address))
        );
    }
}
