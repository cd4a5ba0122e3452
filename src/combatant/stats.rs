//! Stat pools.
//!
//! Every combatant tracks the same closed set of stats, each as a
//! current/max pair. Maximums are derived from a base value plus the
//! contributions of owned cards; damage is the distance between the two.

use serde::{Deserialize, Serialize};

use crate::cards::Stat;

/// Current and maximum value of one stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatPool {
    pub current: i64,
    pub max: i64,
}

impl StatPool {
    /// A full pool.
    #[must_use]
    pub const fn full(max: i64) -> Self {
        Self { current: max, max }
    }

    /// How far `current` sits below `max`. Negative when boosted over max.
    #[must_use]
    pub const fn deficit(self) -> i64 {
        self.max - self.current
    }
}

impl std::fmt::Display for StatPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

/// One `StatPool` per tracked stat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pools: [StatPool; Stat::COUNT],
}

impl StatBlock {
    /// All stats full at `base`.
    #[must_use]
    pub fn new(base: i64) -> Self {
        Self {
            pools: [StatPool::full(base); Stat::COUNT],
        }
    }

    #[must_use]
    pub fn get(&self, stat: Stat) -> StatPool {
        self.pools[stat.index()]
    }

    #[must_use]
    pub fn current(&self, stat: Stat) -> i64 {
        self.get(stat).current
    }

    /// Recompute maximums as `base + bonuses[stat]`, keeping each deficit.
    pub fn recalculate(&mut self, base: i64, bonuses: [i64; Stat::COUNT]) {
        for stat in Stat::ALL {
            let pool = &mut self.pools[stat.index()];
            let deficit = pool.deficit();
            pool.max = base + bonuses[stat.index()];
            pool.current = pool.max - deficit;
        }
    }

    /// Add `amount` to a stat's current value.
    ///
    /// The result is clamped to max unless `allow_over_max` is set. There
    /// is no lower clamp; a pool may go negative.
    pub fn modify(&mut self, stat: Stat, amount: i64, allow_over_max: bool) {
        let pool = &mut self.pools[stat.index()];
        pool.current += amount;
        if !allow_over_max {
            pool.current = pool.current.min(pool.max);
        }
    }

    /// Health at or below zero.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.current(Stat::Health) <= 0
    }
}
