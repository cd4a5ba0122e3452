//! Error type shared by every engine operation.
//!
//! Fatal conditions (bad card data, out-of-range zone indices) are `Err`
//! values. Conditions the rules treat as ordinary play (a second
//! submission in one turn, a target that fled) are reported through return
//! values and the round summary instead.

use thiserror::Error;

use super::id::CombatantId;
use crate::zones::Zone;

/// Errors raised by the combat engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CombatError {
    /// A card string that is not `Set_Rarity_Name`.
    #[error("malformed card string {0:?}: expected Set_Rarity_Name")]
    MalformedCardString(String),

    /// A well-formed card string with no template in the catalog.
    #[error("unknown card {0}")]
    UnknownCard(String),

    /// Template inheritance loops back on itself.
    #[error("card {card} has an inheritance cycle: {chain}")]
    InheritanceCycle { card: String, chain: String },

    /// A resolved card without a `Type`.
    #[error("card {0} has no Type after inheritance")]
    MissingType(String),

    /// A zone index that does not address a card.
    #[error("index {index} out of range for {zone} ({len} cards)")]
    InvalidIndex { zone: Zone, index: usize, len: usize },

    /// `remove_card` found no copy of the card in any zone.
    #[error("card {0} not found in any zone")]
    CardNotFound(String),

    /// The combatant is not a member of the encounter.
    #[error("combatant {0} is not in this encounter")]
    UnknownCombatant(CombatantId),

    /// The combatant is already fighting elsewhere.
    #[error("combatant {0} is already in an encounter")]
    AlreadyEngaged(CombatantId),

    /// Attacker and defender share a party.
    #[error("{0} and {1} are in the same party")]
    SameParty(CombatantId, CombatantId),

    /// The encounter has already been torn down.
    #[error("encounter has ended")]
    EncounterEnded,

    /// Card catalog data could not be loaded.
    #[error("catalog data: {0}")]
    Catalog(String),

    /// Engine configuration is invalid.
    #[error("config: {0}")]
    Config(String),

    /// A persisted snapshot could not be encoded or decoded.
    #[error("snapshot: {0}")]
    Snapshot(String),

    /// The encounter actor has stopped and can no longer take commands.
    #[error("encounter actor is no longer running")]
    ActorClosed,
}

impl CombatError {
    /// Create a catalog data error.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid index error.
    pub fn invalid_index(zone: Zone, index: usize, len: usize) -> Self {
        Self::InvalidIndex { zone, index, len }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = CombatError> = std::result::Result<T, E>;
