//! Deterministic seeded randomness.
//!
//! The engine itself resolves choices deterministically; the RNG exists so
//! frontends and content tooling can draw reproducible randomness tied to
//! the save. The stream is re-initialized whenever the state's seed
//! changes, so a loaded game continues the same sequence a fresh game with
//! that seed would produce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A seeded random stream tied to a game state.
#[derive(Debug)]
pub struct GameRng {
    seed: u64,
    rng: StdRng,
}

impl GameRng {
    /// Create a stream from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed this stream was last initialized from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Re-initialize the stream if the seed changed; otherwise leave the
    /// stream where it is.
    pub fn reseed(&mut self, seed: u64) {
        if seed != self.seed {
            *self = Self::new(seed);
        }
    }

    /// Uniform value in `[0, 1)`.
    pub fn roll(&mut self) -> f64 {
        self.rng.random()
    }

    /// Uniformly pick one element of a slice. `None` on an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.rng.random_range(0..items.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = GameRng::new(1776);
        let mut b = GameRng::new(1776);
        for _ in 0..8 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn reseed_restarts_only_on_change() {
        let mut a = GameRng::new(42);
        let first = a.roll();
        // Same seed: the stream keeps going, no restart.
        a.reseed(42);
        assert_ne!(a.roll(), first);
        // Changed seed: the stream restarts deterministically.
        a.reseed(7);
        let mut b = GameRng::new(7);
        assert_eq!(a.roll(), b.roll());
    }

    #[test]
    fn pick_handles_empty() {
        let mut rng = GameRng::new(1);
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), None);
        assert!(rng.pick(&[10, 20, 30]).is_some());
    }
}
