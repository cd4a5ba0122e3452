//! Timed stat effects left behind by Buff and Debuff cards.

use serde::{Deserialize, Serialize};

use crate::cards::{CardKey, Stat};
use crate::core::CombatantId;

/// A stat change that is undone when it expires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    /// Stat the effect changed.
    pub stat: Stat,
    /// Signed amount that was added to the stat's current value.
    pub amount: i64,
    /// Rounds left, or `None` to last until the encounter ends.
    pub remaining: Option<u32>,
    /// Who applied it.
    pub source: CombatantId,
    /// Card that produced it.
    pub card: CardKey,
}

impl ActiveEffect {
    #[must_use]
    pub fn new(stat: Stat, amount: i64, duration: Option<u32>, source: CombatantId, card: CardKey) -> Self {
        Self {
            stat,
            amount,
            remaining: duration,
            source,
            card,
        }
    }

    /// Advance one round. Returns true once the effect has run out.
    pub fn tick(&mut self) -> bool {
        match self.remaining.as_mut() {
            None => false,
            Some(rounds) => {
                *rounds = rounds.saturating_sub(1);
                *rounds == 0
            }
        }
    }
}
