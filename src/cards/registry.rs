//! Card catalog: template storage and inheritance resolution.
//!
//! The `CardCatalog` stores every card template of a game keyed by
//! `CardKey`. It never hands out mutable access to stored templates;
//! `resolve` always builds a fresh `CardData`.
//!
//! Catalog data is TOML nested as set, rarity, then name:
//!
//! ```toml
//! [Base.Shared."Basic Attack"]
//! Type = "Attack"
//! Damage = 2
//!
//! [Base.Common.Punch]
//! Inherits = "Base_Shared_Basic Attack"
//! Damage = 3
//! ```

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::definition::{CardData, CardTemplate};
use super::key::CardKey;
use crate::core::{CombatError, Result};

/// The game's built-in card data.
const BUILTIN_CARDS: &str = include_str!("../../data/cards.toml");

type CatalogFile = BTreeMap<String, BTreeMap<String, BTreeMap<String, CardTemplate>>>;

/// Registry of card templates.
///
/// ## Example
///
/// ```
/// use ccg_combat::cards::{CardCatalog, CardKey, CardTemplate, CardType};
///
/// let mut catalog = CardCatalog::new();
/// let basic: CardKey = "Base_Shared_Basic Attack".parse().unwrap();
/// catalog
///     .register(basic.clone(), CardTemplate::of_type(CardType::Attack).with_damage(2))
///     .unwrap();
/// catalog
///     .register(
///         "Base_Common_Punch".parse().unwrap(),
///         CardTemplate::default().with_inherits(basic).with_damage(3),
///     )
///     .unwrap();
///
/// let punch = catalog.resolve_str("Base_Common_Punch").unwrap();
/// assert_eq!(punch.card_type, CardType::Attack);
/// assert_eq!(punch.damage, 3);
/// assert_eq!(punch.name, "Punch");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    templates: FxHashMap<CardKey, CardTemplate>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CARDS)
    }

    /// Load and validate a catalog from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(source).map_err(|e| CombatError::catalog(e.to_string()))?;

        let mut catalog = Self::new();
        for (set, rarities) in file {
            for (rarity, cards) in rarities {
                for (name, template) in cards {
                    if set.contains('_') || rarity.contains('_') {
                        return Err(CombatError::catalog(format!(
                            "set and rarity may not contain '_': {set}.{rarity}"
                        )));
                    }
                    catalog.register(CardKey::new(set.as_str(), rarity.as_str(), name), template)?;
                }
            }
        }

        catalog.validate()?;
        Ok(catalog)
    }

    /// Register a template. Fails if the key is taken.
    pub fn register(&mut self, key: CardKey, template: CardTemplate) -> Result<()> {
        if self.templates.contains_key(&key) {
            return Err(CombatError::catalog(format!("card {key} registered twice")));
        }
        self.templates.insert(key, template);
        Ok(())
    }

    /// Check every reference in the catalog.
    ///
    /// Every template must resolve (parents exist, no cycles, a `Type`
    /// after inheritance) and every `Create` entry must name a template.
    pub fn validate(&self) -> Result<()> {
        for key in self.templates.keys() {
            let data = self.resolve(key)?;
            for created in &data.create {
                if !self.contains(created) {
                    return Err(CombatError::catalog(format!(
                        "{key} creates unknown card {created}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Get a raw template.
    #[must_use]
    pub fn get(&self, key: &CardKey) -> Option<&CardTemplate> {
        self.templates.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &CardKey) -> bool {
        self.templates.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterate over all keys.
    pub fn keys(&self) -> impl Iterator<Item = &CardKey> {
        self.templates.keys()
    }

    /// Resolve a key to its card data, materializing every ancestor first.
    pub fn resolve(&self, key: &CardKey) -> Result<CardData> {
        let mut chain = Vec::new();
        self.materialize(key, &mut chain)?.into_data(key)
    }

    /// Parse and resolve a card string.
    pub fn resolve_str(&self, card_string: &str) -> Result<CardData> {
        self.resolve(&CardKey::parse(card_string)?)
    }

    fn materialize(&self, key: &CardKey, chain: &mut Vec<CardKey>) -> Result<CardTemplate> {
        if chain.contains(key) {
            let path = chain
                .iter()
                .chain(std::iter::once(key))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(CombatError::InheritanceCycle {
                card: chain[0].to_string(),
                chain: path,
            });
        }

        let template = self
            .templates
            .get(key)
            .ok_or_else(|| CombatError::UnknownCard(key.to_string()))?
            .clone();

        match template.inherits.clone() {
            None => Ok(template),
            Some(parent) => {
                chain.push(key.clone());
                let base = self.materialize(&parent, chain)?;
                chain.pop();
                Ok(template.overlay(base))
            }
        }
    }
}
