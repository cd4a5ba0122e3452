//! Opaque identities for combatants, parties and encounters.
//!
//! The engine never holds references into host objects. Hosts hand out
//! stable numeric identities and keep their own lookup tables.

use serde::{Deserialize, Serialize};

/// Stable identity of a combatant, assigned by the host.
///
/// Equality is identity: two combatants with the same display name are
/// still distinct if their ids differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub u64);

impl CombatantId {
    /// Create a new combatant ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Party (group) identity reported by the party collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartyId(pub u32);

impl PartyId {
    /// Create a new party ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Party {}", self.0)
    }
}

/// Identity of one encounter within an [`EncounterDirectory`](crate::encounter::EncounterDirectory).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EncounterId(pub u32);

impl EncounterId {
    /// Create a new encounter ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EncounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Encounter {}", self.0)
    }
}
