//! Deterministic random number generation for deck shuffling.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Per-combatant streams**: Independent sequences derived from one seed
//! - **Serializable**: O(1) state capture and restore, so a restored
//!   encounter shuffles exactly as the live one would have
//!
//! ## Usage
//!
//! ```
//! use ccg_combat::core::GameRng;
//!
//! let root = GameRng::new(42);
//!
//! // Each combatant gets its own stream
//! let mut goblin = root.for_context("combatant:7");
//! let mut hero = root.for_context("combatant:1");
//!
//! let mut a = vec![1, 2, 3, 4, 5, 6, 7, 8];
//! let mut b = a.clone();
//! goblin.shuffle(&mut a);
//! hero.shuffle(&mut b);
//! assert_ne!(a, b);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic RNG backed by ChaCha8.
///
/// Serializes as its [`GameRngState`], so it can live directly inside
/// persisted combatant state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "GameRngState", from = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place (uniform Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses the ChaCha8 word position, so capture is O(1) regardless of
/// how many random numbers have been generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        GameRng::from_state(&state)
    }
}
