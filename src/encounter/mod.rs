//! Encounters: the turn engine and everything around it.
//!
//! ## Key Types
//!
//! - `Encounter`: Collects one action per combatant per round and resolves
//!   them together
//! - `Action`: A submitted card and its targets, or a pass
//! - `CombatHost`: Notifications and lifecycle hooks supplied by the host
//! - `AutonomousPolicy`: How autonomous combatants pick their action
//! - `EncounterSnapshot`: Persisted encounter state
//! - `EncounterHandle`: Async access to an encounter running on its own task
//! - `EncounterDirectory`: Owns encounters and knows who is fighting where

pub mod action;
pub mod actor;
pub mod directory;
pub mod engine;
pub mod host;
pub mod policy;
pub mod snapshot;

pub use action::{Action, Targets};
pub use actor::{spawn_encounter, EncounterHandle, EncounterOutcome};
pub use directory::{EncounterDirectory, Opponent};
pub use engine::{Encounter, EncounterState, RoundReport};
pub use host::{CombatHost, Departure};
pub use policy::{AutonomousPolicy, FirstCardPolicy};
pub use snapshot::EncounterSnapshot;
