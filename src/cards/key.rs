//! Card identity: the `Set_Rarity_Name` card string.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{CombatError, Result};

/// Composite key naming one card template.
///
/// Serialized as the single card string `"Set_Rarity_Name"`. The set and
/// rarity components never contain `_`; the name may contain spaces (and,
/// since it is the last component, underscores).
///
/// ```
/// use ccg_combat::cards::CardKey;
///
/// let key: CardKey = "Base_Common_Rusty Knife".parse().unwrap();
/// assert_eq!(key.set(), "Base");
/// assert_eq!(key.rarity(), "Common");
/// assert_eq!(key.name(), "Rusty Knife");
/// assert_eq!(key.to_string(), "Base_Common_Rusty Knife");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardKey {
    set: String,
    rarity: String,
    name: String,
}

impl CardKey {
    /// Build a key from its components.
    pub fn new(set: impl Into<String>, rarity: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            set: set.into(),
            rarity: rarity.into(),
            name: name.into(),
        }
    }

    /// Parse a card string.
    pub fn parse(card_string: &str) -> Result<Self> {
        let mut parts = card_string.splitn(3, '_');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(set), Some(rarity), Some(name))
                if !set.is_empty() && !rarity.is_empty() && !name.is_empty() =>
            {
                Ok(Self::new(set, rarity, name))
            }
            _ => Err(CombatError::MalformedCardString(card_string.to_string())),
        }
    }

    /// Card set, e.g. `Base`.
    #[must_use]
    pub fn set(&self) -> &str {
        &self.set
    }

    /// Rarity, e.g. `Common`.
    #[must_use]
    pub fn rarity(&self) -> &str {
        &self.rarity
    }

    /// Display name, e.g. `Rusty Knife`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The serialized card string.
    #[must_use]
    pub fn card_string(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for CardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.set, self.rarity, self.name)
    }
}

impl FromStr for CardKey {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CardKey {
    type Error = CombatError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CardKey> for String {
    fn from(key: CardKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        let key = CardKey::parse("Base_Shared_Basic Attack").unwrap();
        assert_eq!(key.set(), "Base");
        assert_eq!(key.rarity(), "Shared");
        assert_eq!(key.name(), "Basic Attack");
        assert_eq!(key.card_string(), "Base_Shared_Basic Attack");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "Base", "Base_Common", "_Common_Punch", "Base__Punch", "Base_Common_"] {
            assert!(
                matches!(CardKey::parse(bad), Err(CombatError::MalformedCardString(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_equality_is_by_components() {
        let a = CardKey::new("Temp", "Common", "Slash");
        let b: CardKey = "Temp_Common_Slash".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, CardKey::new("Temp", "Common", "Jab"));
    }

    #[test]
    fn test_serializes_as_card_string() {
        let key = CardKey::new("Temp", "Common", "Jab");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"Temp_Common_Jab\"");

        let back: CardKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);

        assert!(serde_json::from_str::<CardKey>("\"nonsense\"").is_err());
    }
}
