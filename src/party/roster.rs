//! Party roster: membership and leadership.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{CombatantId, PartyId};
use crate::effects::PartyLookup;

/// One party.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub leader: CombatantId,
    /// Members in joining order, leader included.
    pub members: Vec<CombatantId>,
}

/// All parties known to a host.
///
/// A combatant belongs to at most one party.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PartyRoster {
    parties: BTreeMap<PartyId, Party>,
    index: FxHashMap<CombatantId, PartyId>,
    next_id: u32,
}

impl PartyRoster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a party led by `leader`. `None` if the leader already has one.
    pub fn create(&mut self, leader: CombatantId) -> Option<PartyId> {
        if self.index.contains_key(&leader) {
            return None;
        }
        self.next_id += 1;
        let id = PartyId::new(self.next_id);
        self.parties.insert(
            id,
            Party {
                id,
                leader,
                members: vec![leader],
            },
        );
        self.index.insert(leader, id);
        info!(party = %id, leader = %leader, "party created");
        Some(id)
    }

    /// Add a member. False if the party does not exist or the combatant
    /// is already in a party.
    pub fn add_member(&mut self, party: PartyId, member: CombatantId) -> bool {
        if self.index.contains_key(&member) {
            return false;
        }
        let Some(entry) = self.parties.get_mut(&party) else {
            return false;
        };
        entry.members.push(member);
        self.index.insert(member, party);
        true
    }

    /// Remove a member from whatever party it is in.
    ///
    /// An emptied party is disbanded. A departing leader hands over to the
    /// longest-standing remaining member.
    pub fn remove_member(&mut self, member: CombatantId) -> Option<PartyId> {
        let party_id = self.index.remove(&member)?;
        let party = self.parties.get_mut(&party_id)?;
        party.members.retain(|&m| m != member);

        match party.members.first().copied() {
            None => {
                self.parties.remove(&party_id);
                info!(party = %party_id, "party disbanded");
            }
            Some(next) if party.leader == member => {
                party.leader = next;
                info!(party = %party_id, leader = %next, "new party leader");
            }
            Some(_) => {}
        }
        Some(party_id)
    }

    /// Hand leadership to an existing member.
    pub fn make_leader(&mut self, member: CombatantId) -> bool {
        let Some(party_id) = self.index.get(&member) else {
            return false;
        };
        match self.parties.get_mut(party_id) {
            Some(party) => {
                party.leader = member;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn party(&self, id: PartyId) -> Option<&Party> {
        self.parties.get(&id)
    }

    #[must_use]
    pub fn members(&self, id: PartyId) -> &[CombatantId] {
        self.parties.get(&id).map_or(&[], |p| p.members.as_slice())
    }

    #[must_use]
    pub fn leader(&self, id: PartyId) -> Option<CombatantId> {
        self.parties.get(&id).map(|p| p.leader)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}

impl PartyLookup for PartyRoster {
    fn party_of(&self, combatant: CombatantId) -> Option<PartyId> {
        self.index.get(&combatant).copied()
    }
}
