//! Zone system for card locations.
//!
//! Every combatant has a fixed set of ordered piles: deck, hand, discard,
//! in-play, and equipped. Cards are `CardKey`s; moving one pops it from a
//! pile and appends it to another.
//!
//! ## Key Types
//!
//! - `Zone`: Pile identifier
//! - `CardZones`: The piles of one combatant and moves between them

pub mod manager;
pub mod zone;

pub use manager::CardZones;
pub use zone::Zone;
