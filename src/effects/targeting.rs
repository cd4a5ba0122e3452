//! Friend/foe grouping for targeting.
//!
//! Grouping depends only on encounter membership and an outside party
//! lookup: a combatant is always its own friend, members of its party are
//! friends, and everyone else is a foe.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CombatantId, PartyId};

/// Party affiliation source consulted when grouping.
pub trait PartyLookup {
    /// The party `combatant` belongs to, if any.
    fn party_of(&self, combatant: CombatantId) -> Option<PartyId>;
}

/// A lookup where nobody has a party.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoParties;

impl PartyLookup for NoParties {
    fn party_of(&self, _combatant: CombatantId) -> Option<PartyId> {
        None
    }
}

/// Encounter members split into friends and foes, in membership order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groups {
    pub friends: SmallVec<[CombatantId; 4]>,
    pub foes: SmallVec<[CombatantId; 4]>,
}

/// Partition `members` from the point of view of `viewer`.
///
/// ```
/// use ccg_combat::core::CombatantId;
/// use ccg_combat::effects::{groups_for, NoParties};
///
/// let ids = [CombatantId::new(1), CombatantId::new(2), CombatantId::new(3)];
/// let groups = groups_for(ids, ids[1], &NoParties);
/// assert_eq!(groups.friends.as_slice(), &[ids[1]]);
/// assert_eq!(groups.foes.as_slice(), &[ids[0], ids[2]]);
/// ```
pub fn groups_for<L>(
    members: impl IntoIterator<Item = CombatantId>,
    viewer: CombatantId,
    parties: &L,
) -> Groups
where
    L: PartyLookup + ?Sized,
{
    let viewer_party = parties.party_of(viewer);
    let mut groups = Groups::default();

    for member in members {
        let same_party = viewer_party.is_some() && parties.party_of(member) == viewer_party;
        if member == viewer || same_party {
            groups.friends.push(member);
        } else {
            groups.foes.push(member);
        }
    }

    groups
}
