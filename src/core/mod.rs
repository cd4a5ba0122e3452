//! Core engine types: identities, RNG, configuration, errors.
//!
//! Everything here is independent of card data and encounter state.

pub mod config;
pub mod error;
pub mod id;
pub mod rng;

pub use config::EngineConfig;
pub use error::{CombatError, Result};
pub use id::{CombatantId, EncounterId, PartyId};
pub use rng::{GameRng, GameRngState};
