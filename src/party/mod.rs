//! Party membership.
//!
//! Parties decide who counts as a friend when grouping an encounter. The
//! invitation workflow lives with the host; this module only tracks who is
//! in which party and who leads it.

pub mod roster;

pub use roster::{Party, PartyRoster};
