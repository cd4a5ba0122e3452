//! Engine configuration.
//!
//! Hosts configure the engine once at startup, either in code with the
//! `with_*` builder methods or from a TOML document:
//!
//! ```
//! use ccg_combat::core::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str("turn_timeout_secs = 30\nseed = 7").unwrap();
//! assert_eq!(config.turn_timeout_secs, 30);
//! assert_eq!(config.base_stat, 10);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{CombatError, Result};

/// Tunables shared by every encounter a host runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Base maximum of every tracked stat before card contributions.
    pub base_stat: i64,

    /// Hand size of player-controlled combatants.
    pub player_hand_size: usize,

    /// Hand size of autonomous combatants.
    pub autonomous_hand_size: usize,

    /// Rounds a disconnected player may sit out before being made to flee.
    ///
    /// The combatant is removed once its counter exceeds this value.
    pub disconnect_threshold: u32,

    /// Seconds a round waits for submissions before resolving anyway.
    pub turn_timeout_secs: u64,

    /// Root seed for per-combatant deck shuffling streams.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_stat: 10,
            player_hand_size: 4,
            autonomous_hand_size: 3,
            disconnect_threshold: 3,
            turn_timeout_secs: 60,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| CombatError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make the engine misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.base_stat <= 0 {
            return Err(CombatError::config("base_stat must be positive"));
        }
        if self.player_hand_size == 0 || self.autonomous_hand_size == 0 {
            return Err(CombatError::config("hand sizes must be at least 1"));
        }
        if self.turn_timeout_secs == 0 {
            return Err(CombatError::config("turn_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// The turn timeout as a `Duration`.
    #[must_use]
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    /// Set the base stat value.
    #[must_use]
    pub fn with_base_stat(mut self, base: i64) -> Self {
        self.base_stat = base;
        self
    }

    /// Set both hand sizes.
    #[must_use]
    pub fn with_hand_sizes(mut self, player: usize, autonomous: usize) -> Self {
        self.player_hand_size = player;
        self.autonomous_hand_size = autonomous;
        self
    }

    /// Set the disconnect threshold.
    #[must_use]
    pub fn with_disconnect_threshold(mut self, rounds: u32) -> Self {
        self.disconnect_threshold = rounds;
        self
    }

    /// Set the turn timeout.
    #[must_use]
    pub fn with_turn_timeout_secs(mut self, secs: u64) -> Self {
        self.turn_timeout_secs = secs;
        self
    }

    /// Set the RNG root seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
