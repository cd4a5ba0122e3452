//! Effects of played cards beyond plain damage.
//!
//! - `ActiveEffect`: A timed stat change from a Buff or Debuff
//! - `Mitigations`: Defend effects staged for one round's attack pass
//! - `Groups` / `groups_for`: Friend and foe partition used for targeting
//! - `PartyLookup`: Party affiliation supplied by the host

mod effect;
mod mitigation;
mod targeting;

pub use effect::ActiveEffect;
pub use mitigation::{Mitigations, StagedDefense};
pub use targeting::{groups_for, Groups, NoParties, PartyLookup};
