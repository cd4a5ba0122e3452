//! Hooks the engine calls on its host.
//!
//! The host owns sessions, rendering, and the world. The engine reports
//! what happened through `CombatHost` and never holds a reference back
//! into host objects.

use crate::combatant::Combatant;
use crate::core::CombatantId;
use crate::effects::PartyLookup;

/// Why a combatant left an encounter without being removed explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Departure {
    /// Health reached zero.
    Defeated,
    /// Stayed disconnected for too many rounds.
    Fled,
    /// The encounter ended with the combatant still in it.
    EncounterEnded,
}

/// Callbacks from an encounter to its host.
///
/// Only `notify` is required; the lifecycle hooks default to doing
/// nothing. The host also supplies party affiliation for grouping.
pub trait CombatHost: PartyLookup {
    /// Deliver a line of text to one combatant.
    fn notify(&mut self, to: CombatantId, text: &str);

    /// An autonomous combatant is about to choose its action.
    fn request_autonomous_turn(&mut self, _combatant: &Combatant) {}

    /// A combatant's health reached zero. Called before `on_departed`.
    fn on_defeated(&mut self, _combatant: &Combatant) {}

    /// Ownership of a combatant returns to the host.
    fn on_departed(&mut self, _combatant: Combatant, _departure: Departure) {}
}
