//! Seeded pseudo-random streams
//!
//! Every stage of the pipeline draws from its own [`SeededRng`], built from a
//! sub-seed that the dungeon derives once per stage from the top-level seed.
//! This keeps each stage's randomness independent of how much randomness the
//! stages before it consumed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// FNV-1a offset basis (64-bit)
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a prime (64-bit)
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Seed for a generation request
///
/// Numeric seeds are used as-is, text seeds are folded to 64 bits with FNV-1a,
/// which is stable across platforms and compiler versions (unlike `std`'s
/// `DefaultHasher`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Seed {
    /// Numeric seed
    Number(u64),
    /// Text seed, e.g. a user-entered phrase
    Text(String),
}

impl Seed {
    /// The 64-bit value the PRNG is initialized from
    pub fn to_u64(&self) -> u64 {
        match self {
            Seed::Number(n) => *n,
            Seed::Text(text) => text.bytes().fold(FNV_OFFSET, |hash, byte| {
                (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
            }),
        }
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Seed::Number(value)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Text(value.to_owned())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Seed::Text(value)
    }
}

/// Deterministic random stream backed by ChaCha8
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    /// Create a stream from a raw 64-bit seed
    pub fn from_u64(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a stream from a [`Seed`]
    pub fn new(seed: &Seed) -> Self {
        Self::from_u64(seed.to_u64())
    }

    /// Next float in `[0, 1)`
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Next float in `[min, max)`
    #[inline]
    pub fn next_in_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// Next integer in `[min, max_exclusive)`
    ///
    /// Returns `min` when the range is empty.
    #[inline]
    pub fn next_int_in_range(&mut self, min: i64, max_exclusive: i64) -> i64 {
        if max_exclusive <= min {
            return min;
        }
        let span = (max_exclusive - min) as f64;
        min + ((self.next() * span).floor() as i64).min(max_exclusive - min - 1)
    }

    /// Sub-seed for a downstream stream, consuming exactly one `next()`
    pub fn derive_seed(&mut self) -> u64 {
        (self.next() * (1u64 << 53) as f64) as u64
    }

    /// Fisher-Yates shuffle driven by this stream
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
