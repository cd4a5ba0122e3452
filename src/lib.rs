//! # ccg-combat
//!
//! A turn-based card combat engine for multiplayer text games.
//!
//! Combatants fight with decks of cards. Each round every combatant submits
//! one card (or passes); once all have acted, or the turn timer runs out,
//! the round resolves in two passes so that defensive cards always land
//! before attacks.
//!
//! ## Design Principles
//!
//! 1. **Host-Agnostic**: The engine never owns sessions or world objects.
//!    It talks to its host through the `CombatHost` trait and hands
//!    combatants back when they leave.
//!
//! 2. **Data-Driven Cards**: Cards are catalog templates with single-parent
//!    inheritance, loaded from TOML and validated up front.
//!
//! 3. **Reproducible**: Every combatant shuffles from its own seeded
//!    stream, so a fixed seed replays a fight exactly.
//!
//! ## Architecture
//!
//! - **Serialized Encounters**: One encounter is mutated from one place
//!   only, either a synchronous owner or its tokio task behind an
//!   `EncounterHandle`.
//!
//! - **Explicit Ownership**: Encounters own their combatants; "which
//!   encounter is this combatant in" is answered by `EncounterDirectory`.
//!
//! ## Modules
//!
//! - `core`: Identities, RNG, configuration, errors
//! - `cards`: Card keys, templates, and the catalog
//! - `zones`: Per-combatant card piles
//! - `combatant`: Stats, zone operations, timed effects
//! - `effects`: Mitigations, stat effects, friend/foe grouping
//! - `party`: Party membership
//! - `encounter`: Turn engine, host hooks, actor, directory

pub mod core;
pub mod cards;
pub mod zones;
pub mod combatant;
pub mod effects;
pub mod party;
pub mod encounter;

// Re-export commonly used types
pub use crate::core::{
    CombatantId, EncounterId, PartyId,
    GameRng, GameRngState,
    EngineConfig, CombatError, Result,
};

pub use crate::cards::{CardCatalog, CardData, CardKey, CardTemplate, CardType, Element, Stat, TargetMode};

pub use crate::zones::{CardZones, Zone};

pub use crate::combatant::{Combatant, Control, StatBlock, StatPool};

pub use crate::effects::{groups_for, ActiveEffect, Groups, Mitigations, NoParties, PartyLookup};

pub use crate::party::{Party, PartyRoster};

pub use crate::encounter::{
    Action, AutonomousPolicy, CombatHost, Departure,
    Encounter, EncounterDirectory, EncounterHandle, EncounterOutcome,
    EncounterSnapshot, EncounterState, FirstCardPolicy, Opponent, RoundReport,
    spawn_encounter,
};
