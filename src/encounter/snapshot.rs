//! Persisted encounter state.
//!
//! A snapshot carries membership, each member's action slot, action count,
//! disconnect counter, and full combatant state (piles, stats, effects,
//! shuffle stream), plus the round counter and round log. The card catalog
//! and the autonomous policy are not part of it; they are supplied again
//! on restore.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::engine::{EncounterState, Seat};
use crate::core::{CombatError, CombatantId, EncounterId, EngineConfig, Result};

/// Serializable state of one `Encounter`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub id: EncounterId,
    pub config: EngineConfig,
    pub(crate) seats: Vec<Seat>,
    pub round: u32,
    pub results: OrdMap<u32, String>,
    pub state: EncounterState,
    pub end_check_requested: bool,
}

impl EncounterSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| CombatError::Snapshot(e.to_string()))
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| CombatError::Snapshot(e.to_string()))
    }

    /// Member ids in membership order.
    pub fn members(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.seats.iter().map(|s| s.combatant.id())
    }

    /// Action counts in membership order.
    pub fn action_counts(&self) -> impl Iterator<Item = (CombatantId, u32)> + '_ {
        self.seats.iter().map(|s| (s.combatant.id(), s.action_count))
    }
}
