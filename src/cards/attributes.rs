//! Closed vocabularies used by card data.
//!
//! Card data names elements, types and stats as strings. Each vocabulary
//! is a closed enum so that a typo in the catalog fails at load time
//! instead of silently reading as zero during a fight.

use serde::{Deserialize, Serialize};

/// Elemental affinity of a card. Cosmetic to the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Light,
    Dark,
    Fire,
    Earth,
    Water,
    #[default]
    Neutral,
}

/// Card type, which decides both zone routing and resolution behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Attack,
    Defend,
    Buff,
    Debuff,
    Heal,
    Weapon,
    Armor,
    Item,
    Other,
}

impl CardType {
    /// One-shot cards go straight to the discard pile when played.
    #[must_use]
    pub fn is_consumable(self) -> bool {
        matches!(self, CardType::Attack | CardType::Defend | CardType::Buff | CardType::Debuff)
    }

    /// Persistent cards stay in play, one per type.
    #[must_use]
    pub fn is_persistent(self) -> bool {
        !self.is_consumable()
    }

    /// Cards aimed at foes.
    #[must_use]
    pub fn is_offensive(self) -> bool {
        matches!(self, CardType::Attack | CardType::Debuff)
    }

    /// Cards aimed at friends.
    #[must_use]
    pub fn is_friendly(self) -> bool {
        matches!(self, CardType::Heal | CardType::Buff)
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A tracked combatant stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Reflexes,
    Health,
    Intelligence,
}

impl Stat {
    /// Number of tracked stats.
    pub const COUNT: usize = 4;

    /// Every tracked stat, in storage order.
    pub const ALL: [Stat; Stat::COUNT] =
        [Stat::Strength, Stat::Reflexes, Stat::Health, Stat::Intelligence];

    /// Storage index of this stat.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Stat::Strength => 0,
            Stat::Reflexes => 1,
            Stat::Health => 2,
            Stat::Intelligence => 3,
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// How many combatants a card reaches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetMode {
    #[default]
    Single,
    Group,
}
