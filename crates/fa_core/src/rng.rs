// crates/fa_core/src/rng.rs
//
// Deterministic, integer-only RNG for the two random steps of the draft:
// multi-bidder tie breaks and the leftover-pool shuffle.
//
// • The allocator only sees the `RandomSource` trait, so tests can inject a
//   scripted source and production runs use the seeded `TieRng`.
// • Integer-only: unbiased ranges via rejection sampling, no floating point.
// • Cross-platform determinism: explicit seeding and word-index accounting.

use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// A single logged random decision, including context and the RNG word index.
///
/// `word_index` is **1-based**: the first 64-bit word consumed by a `TieRng`
/// has index 1. Sources without a word counter report 0.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TieCrumb {
    /// Stable, human-readable context (e.g. "rank:1/Atreides").
    pub ctx: String,
    /// Chosen index in the contender set (0-based).
    pub pick: usize,
    /// Index of the deciding RNG word (saturating).
    pub word_index: u64,
}

/// Injectable randomness used by the allocator.
pub trait RandomSource {
    /// Uniform index in `[0, n)`; `None` iff `n == 0`.
    fn next_index(&mut self, n: usize) -> Option<usize>;

    /// Words drawn so far; 0 for sources that do not count.
    fn words_consumed(&self) -> u64 {
        0
    }

    /// Pick an index in `[0, n)` and return it as a crumb bound to `ctx`.
    fn pick(&mut self, ctx: &str, n: usize) -> Option<TieCrumb> {
        let pick = self.next_index(n)?;
        Some(TieCrumb {
            ctx: ctx.into(),
            pick,
            word_index: self.words_consumed(),
        })
    }

    /// In-place Fisher–Yates shuffle:
    /// for i in (1..len).rev() { j ~ U{0..=i}; swap(i, j) }
    fn shuffle<T>(&mut self, xs: &mut [T]) {
        let len = xs.len();
        if len <= 1 {
            return;
        }
        for i in (1..len).rev() {
            // next_index(i + 1) is non-empty here; a misbehaving source that
            // returns None or out-of-range leaves the slot in place.
            let j = match self.next_index(i + 1) {
                Some(j) if j <= i => j,
                _ => i,
            };
            xs.swap(i, j);
        }
    }
}

/// Deterministic RNG for ties, seeded from a single `u64`.
///
/// Internally ChaCha20 with an explicit 32-byte seed: `seed.to_le_bytes()` in
/// the first 8 bytes, the remaining 24 bytes zero.
#[derive(Debug, Clone)]
pub struct TieRng {
    rng: ChaCha20Rng,
    seed: u64,
    words_consumed: u64,
}

impl TieRng {
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(seed32),
            seed,
            words_consumed: 0,
        }
    }

    /// The seed this stream was built from (echoed in the run record).
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw the next u64 and advance the word counter. Only place the
    /// counter moves.
    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Unbiased integer in `[0, n)` using rejection sampling. `None` if `n == 0`.
    ///
    /// `threshold = 2^64 mod n`; accept `x >= threshold`, then `x % n` is uniform.
    #[inline]
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n;
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }
}

impl RandomSource for TieRng {
    #[inline]
    fn next_index(&mut self, n: usize) -> Option<usize> {
        self.gen_range(n as u64).map(|v| v as usize)
    }

    #[inline]
    fn words_consumed(&self) -> u64 {
        self.words_consumed
    }
}

/// Fresh seed from OS entropy, for runs that configure none.
#[cfg(feature = "std")]
pub fn fresh_seed() -> u64 {
    rand_core::OsRng.next_u64()
}
