//! Card templates and resolved card data.
//!
//! A `CardTemplate` is one entry of the catalog exactly as written: every
//! field optional, possibly naming a parent through `Inherits`. Resolving a
//! template overlays it on its materialized parent and fills the remaining
//! gaps with defaults, producing a `CardData`.
//!
//! ## Key Types
//!
//! - `CardTemplate`: Raw, sparse card definition
//! - `CardData`: Fully resolved card, stamped with its own identity

use serde::{Deserialize, Serialize};

use super::attributes::{CardType, Element, Stat, TargetMode};
use super::key::CardKey;
use crate::core::{CombatError, Result};

/// A card definition as stored in the catalog.
///
/// Field names are PascalCase in data files. Unknown fields are rejected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CardTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits: Option<CardKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<Element>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CardType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_stat: Option<Stat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_stat: Option<Stat>,
    /// Rounds a Buff/Debuff lasts. Absent means until the encounter ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<CardType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<Vec<CardKey>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense_mult: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piercing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflexes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intelligence: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CardTemplate {
    /// Create an empty template of the given type.
    #[must_use]
    pub fn of_type(card_type: CardType) -> Self {
        Self {
            card_type: Some(card_type),
            ..Self::default()
        }
    }

    /// Overlay `self` on a materialized parent. Fields `self` sets win.
    ///
    /// `Inherits` is kept from `self`; it records where the card came
    /// from rather than being an inheritable value.
    #[must_use]
    pub fn overlay(self, parent: CardTemplate) -> CardTemplate {
        CardTemplate {
            inherits: self.inherits,
            element: self.element.or(parent.element),
            card_type: self.card_type.or(parent.card_type),
            damage: self.damage.or(parent.damage),
            defense: self.defense.or(parent.defense),
            amount: self.amount.or(parent.amount),
            use_stat: self.use_stat.or(parent.use_stat),
            target_stat: self.target_stat.or(parent.target_stat),
            duration: self.duration.or(parent.duration),
            requires: self.requires.or(parent.requires),
            create: self.create.or(parent.create),
            target: self.target.or(parent.target),
            attack_multiplier: self.attack_multiplier.or(parent.attack_multiplier),
            defense_mult: self.defense_mult.or(parent.defense_mult),
            piercing: self.piercing.or(parent.piercing),
            strength: self.strength.or(parent.strength),
            reflexes: self.reflexes.or(parent.reflexes),
            health: self.health.or(parent.health),
            intelligence: self.intelligence.or(parent.intelligence),
            effect: self.effect.or(parent.effect),
            detail: self.detail.or(parent.detail),
        }
    }

    /// Fill defaults and stamp identity from `key`.
    pub fn into_data(self, key: &CardKey) -> Result<CardData> {
        let card_type = self
            .card_type
            .ok_or_else(|| CombatError::MissingType(key.to_string()))?;

        Ok(CardData {
            name: key.name().to_string(),
            rarity: key.rarity().to_string(),
            set: key.set().to_string(),
            card_string: key.to_string(),
            key: key.clone(),
            inherits: self.inherits,
            element: self.element.unwrap_or_default(),
            card_type,
            damage: self.damage.unwrap_or(0),
            defense: self.defense.unwrap_or(0),
            amount: self.amount.unwrap_or(1),
            use_stat: self.use_stat,
            target_stat: self.target_stat,
            duration: self.duration,
            requires: self.requires,
            create: self.create.unwrap_or_default(),
            target: self.target.unwrap_or_default(),
            attack_multiplier: self.attack_multiplier.unwrap_or(1.0),
            defense_mult: self.defense_mult,
            piercing: self.piercing.unwrap_or(false),
            stat_bonuses: [
                self.strength.unwrap_or(0),
                self.reflexes.unwrap_or(0),
                self.health.unwrap_or(0),
                self.intelligence.unwrap_or(0),
            ],
            effect: self.effect,
            detail: self.detail,
        })
    }

    /// Set the type.
    #[must_use]
    pub fn with_type(mut self, card_type: CardType) -> Self {
        self.card_type = Some(card_type);
        self
    }

    /// Set the parent template.
    #[must_use]
    pub fn with_inherits(mut self, parent: CardKey) -> Self {
        self.inherits = Some(parent);
        self
    }

    /// Set base damage.
    #[must_use]
    pub fn with_damage(mut self, damage: i64) -> Self {
        self.damage = Some(damage);
        self
    }

    /// Set base defense.
    #[must_use]
    pub fn with_defense(mut self, defense: i64) -> Self {
        self.defense = Some(defense);
        self
    }

    /// Set the Buff/Debuff/Heal amount.
    #[must_use]
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the stat that scales this card.
    #[must_use]
    pub fn with_use_stat(mut self, stat: Stat) -> Self {
        self.use_stat = Some(stat);
        self
    }

    /// Set the stat this card affects.
    #[must_use]
    pub fn with_target_stat(mut self, stat: Stat) -> Self {
        self.target_stat = Some(stat);
        self
    }

    /// Set the effect duration in rounds.
    #[must_use]
    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = Some(rounds);
        self
    }

    /// Require an in-play card of `card_type` to play this card.
    #[must_use]
    pub fn with_requires(mut self, card_type: CardType) -> Self {
        self.requires = Some(card_type);
        self
    }

    /// Set the cards created when this card is played.
    #[must_use]
    pub fn with_create(mut self, cards: Vec<CardKey>) -> Self {
        self.create = Some(cards);
        self
    }

    /// Set the targeting mode.
    #[must_use]
    pub fn with_target(mut self, target: TargetMode) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the multiplier applied to attacks that require this card.
    #[must_use]
    pub fn with_attack_multiplier(mut self, multiplier: f64) -> Self {
        self.attack_multiplier = Some(multiplier);
        self
    }

    /// Set the defense multiplier contributed while in play.
    #[must_use]
    pub fn with_defense_mult(mut self, multiplier: f64) -> Self {
        self.defense_mult = Some(multiplier);
        self
    }

    /// Set the contribution to one stat's maximum.
    #[must_use]
    pub fn with_stat(mut self, stat: Stat, amount: i64) -> Self {
        let slot = match stat {
            Stat::Strength => &mut self.strength,
            Stat::Reflexes => &mut self.reflexes,
            Stat::Health => &mut self.health,
            Stat::Intelligence => &mut self.intelligence,
        };
        *slot = Some(amount);
        self
    }
}

/// A fully resolved card.
///
/// Identity fields always come from the key that was resolved, never from
/// a parent template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    pub key: CardKey,
    pub name: String,
    pub rarity: String,
    pub set: String,
    pub card_string: String,
    pub inherits: Option<CardKey>,
    pub element: Element,
    pub card_type: CardType,
    pub damage: i64,
    pub defense: i64,
    pub amount: i64,
    pub use_stat: Option<Stat>,
    pub target_stat: Option<Stat>,
    pub duration: Option<u32>,
    pub requires: Option<CardType>,
    pub create: Vec<CardKey>,
    pub target: TargetMode,
    pub attack_multiplier: f64,
    pub defense_mult: Option<f64>,
    pub piercing: bool,
    stat_bonuses: [i64; Stat::COUNT],
    pub effect: Option<String>,
    pub detail: Option<String>,
}

impl CardData {
    /// Contribution of this card to `stat`'s maximum while owned.
    #[must_use]
    pub fn stat_bonus(&self, stat: Stat) -> i64 {
        self.stat_bonuses[stat.index()]
    }

    #[must_use]
    pub fn is_consumable(&self) -> bool {
        self.card_type.is_consumable()
    }

    #[must_use]
    pub fn is_offensive(&self) -> bool {
        self.card_type.is_offensive()
    }

    #[must_use]
    pub fn is_friendly(&self) -> bool {
        self.card_type.is_friendly()
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.target == TargetMode::Group
    }

    /// The scaling stat, or `default` when the card names none.
    #[must_use]
    pub fn use_stat_or(&self, default: Stat) -> Stat {
        self.use_stat.unwrap_or(default)
    }

    /// The affected stat, or `default` when the card names none.
    #[must_use]
    pub fn target_stat_or(&self, default: Stat) -> Stat {
        self.target_stat.unwrap_or(default)
    }
}

impl std::fmt::Display for CardData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
