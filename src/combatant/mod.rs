//! Combatants and their stat model.
//!
//! ## Key Types
//!
//! - `Combatant`: A fighter's piles, stats, and timed effects
//! - `Control`: Player-controlled or autonomous
//! - `StatBlock` / `StatPool`: Current and maximum value per stat

pub mod fighter;
pub mod stats;

pub use fighter::{Combatant, Control, DrawOutcome};
pub use stats::{StatBlock, StatPool};
