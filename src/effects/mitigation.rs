//! Round-scoped damage mitigation staged by Defend cards.

use rustc_hash::FxHashMap;

use crate::cards::Stat;
use crate::core::CombatantId;

/// A Defend effect waiting for the attack pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagedDefense {
    pub amount: i64,
    pub source: CombatantId,
}

/// Defend effects staged during one round, keyed by target and stat.
///
/// Only the first Defend staged for a (target, stat) pair counts; later
/// ones in the same round are ignored. The table is dropped once the
/// round resolves.
#[derive(Clone, Debug, Default)]
pub struct Mitigations {
    staged: FxHashMap<(CombatantId, Stat), StagedDefense>,
}

impl Mitigations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a Defend. Returns false if one was already staged for the pair.
    pub fn stage(&mut self, target: CombatantId, stat: Stat, amount: i64, source: CombatantId) -> bool {
        match self.staged.entry((target, stat)) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(StagedDefense { amount, source });
                true
            }
        }
    }

    /// The staged defense for a pair, if any.
    #[must_use]
    pub fn get(&self, target: CombatantId, stat: Stat) -> Option<StagedDefense> {
        self.staged.get(&(target, stat)).copied()
    }

    /// Amount to subtract from damage to `target` on `stat`.
    #[must_use]
    pub fn amount(&self, target: CombatantId, stat: Stat) -> i64 {
        self.get(target, stat).map_or(0, |d| d.amount)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}
