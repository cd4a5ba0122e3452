//! Which combatant is fighting where.
//!
//! Combatants never point at their encounter. A host that needs "what
//! encounter is this combatant in" asks the directory, which owns every
//! encounter it started and an index from combatant to encounter.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::info;

use super::engine::Encounter;
use super::host::CombatHost;
use super::policy::{AutonomousPolicy, FirstCardPolicy};
use crate::cards::CardCatalog;
use crate::combatant::Combatant;
use crate::core::{CombatError, CombatantId, EncounterId, EngineConfig, Result};
use crate::effects::PartyLookup;

/// The combatant being attacked.
#[derive(Debug)]
#[allow(clippy::large_enum_variant)]
pub enum Opponent {
    /// Already fighting in an encounter of this directory.
    Engaged(CombatantId),
    /// Not fighting; ownership moves into the new encounter.
    Free(Combatant),
}

impl Opponent {
    #[must_use]
    pub fn id(&self) -> CombatantId {
        match self {
            Self::Engaged(id) => *id,
            Self::Free(combatant) => combatant.id(),
        }
    }
}

/// Owns running encounters and the combatant index.
#[derive(Debug)]
pub struct EncounterDirectory {
    encounters: BTreeMap<EncounterId, Encounter>,
    index: FxHashMap<CombatantId, EncounterId>,
    next_id: u32,
    catalog: Arc<CardCatalog>,
    config: EngineConfig,
    policy: Arc<dyn AutonomousPolicy>,
}

impl EncounterDirectory {
    #[must_use]
    pub fn new(catalog: Arc<CardCatalog>, config: EngineConfig) -> Self {
        Self {
            encounters: BTreeMap::new(),
            index: FxHashMap::default(),
            next_id: 0,
            catalog,
            config,
            policy: Arc::new(FirstCardPolicy),
        }
    }

    /// Policy given to every encounter started from now on.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn AutonomousPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Check whether `attacker` may attack `defender`.
    ///
    /// `engage` runs the same checks before taking ownership of anything,
    /// so hosts can call this first to keep their combatants on refusal.
    pub fn check_engage<L>(&self, attacker: CombatantId, defender: &Opponent, parties: &L) -> Result<()>
    where
        L: PartyLookup + ?Sized,
    {
        let defender_id = defender.id();
        if attacker == defender_id || self.encounter_of(attacker).is_some() {
            return Err(CombatError::AlreadyEngaged(attacker));
        }
        let party = parties.party_of(attacker);
        if party.is_some() && party == parties.party_of(defender_id) {
            return Err(CombatError::SameParty(attacker, defender_id));
        }
        match defender {
            Opponent::Engaged(id) => {
                let encounter = self
                    .encounter_of(*id)
                    .and_then(|e| self.encounters.get(&e))
                    .ok_or(CombatError::UnknownCombatant(*id))?;
                if encounter.is_ended() {
                    return Err(CombatError::EncounterEnded);
                }
            }
            Opponent::Free(_) => {
                if self.encounter_of(defender_id).is_some() {
                    return Err(CombatError::AlreadyEngaged(defender_id));
                }
            }
        }
        Ok(())
    }

    /// `attacker` attacks `defender`.
    ///
    /// Joins the defender's encounter if it is fighting, otherwise starts a
    /// new encounter with both. On refusal both combatants are dropped; use
    /// `check_engage` first to avoid that.
    pub fn engage<H>(&mut self, attacker: Combatant, defender: Opponent, host: &mut H) -> Result<EncounterId>
    where
        H: CombatHost + ?Sized,
    {
        self.check_engage(attacker.id(), &defender, &*host)?;
        let attacker_id = attacker.id();
        let attacker_name = attacker.name().to_string();

        match defender {
            Opponent::Engaged(defender_id) => {
                let encounter_id = self
                    .encounter_of(defender_id)
                    .ok_or(CombatError::UnknownCombatant(defender_id))?;
                let encounter = self
                    .encounters
                    .get_mut(&encounter_id)
                    .ok_or(CombatError::UnknownCombatant(defender_id))?;
                encounter.add_combatant(attacker, host)?;
                encounter.notify_all(host, &format!("{attacker_name} joins combat!"));
                self.index.insert(attacker_id, encounter_id);
                Ok(encounter_id)
            }
            Opponent::Free(defender) => {
                self.next_id += 1;
                let encounter_id = EncounterId::new(self.next_id);
                let defender_id = defender.id();

                host.notify(attacker_id, &format!("You attack {}! You are in combat.", defender.name()));
                host.notify(defender_id, &format!("{attacker_name} attacks you! You are in combat."));

                let mut encounter = Encounter::new(encounter_id, Arc::clone(&self.catalog), self.config.clone())
                    .with_policy(Arc::clone(&self.policy));
                encounter.add_combatant(attacker, host)?;
                encounter.add_combatant(defender, host)?;

                info!(encounter = %encounter_id, attacker = %attacker_id, defender = %defender_id, "encounter started");
                self.index.insert(attacker_id, encounter_id);
                self.index.insert(defender_id, encounter_id);
                self.encounters.insert(encounter_id, encounter);
                Ok(encounter_id)
            }
        }
    }

    /// Leave combat voluntarily.
    pub fn flee<H>(&mut self, id: CombatantId, host: &mut H) -> Option<Combatant>
    where
        H: CombatHost + ?Sized,
    {
        let encounter_id = self.encounter_of(id)?;
        let combatant = self.encounters.get_mut(&encounter_id)?.remove_combatant(id, host)?;
        self.index.remove(&id);
        host.notify(id, "You flee combat.");
        Some(combatant)
    }

    /// The encounter `id` is currently a member of.
    #[must_use]
    pub fn encounter_of(&self, id: CombatantId) -> Option<EncounterId> {
        let encounter_id = *self.index.get(&id)?;
        self.encounters
            .get(&encounter_id)
            .filter(|e| e.contains(id))
            .map(|_| encounter_id)
    }

    #[must_use]
    pub fn get(&self, id: EncounterId) -> Option<&Encounter> {
        self.encounters.get(&id)
    }

    pub fn get_mut(&mut self, id: EncounterId) -> Option<&mut Encounter> {
        self.encounters.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Encounter> {
        self.encounters.values()
    }

    /// Drop ended encounters and forget combatants that have left theirs.
    ///
    /// Returns the ids of the dropped encounters.
    pub fn reap(&mut self) -> Vec<EncounterId> {
        let ended: Vec<EncounterId> = self
            .encounters
            .iter()
            .filter(|(_, e)| e.is_ended())
            .map(|(&id, _)| id)
            .collect();
        for id in &ended {
            self.encounters.remove(id);
            info!(encounter = %id, "encounter reaped");
        }

        let encounters = &self.encounters;
        self.index
            .retain(|&combatant, id| encounters.get(id).is_some_and(|e| e.contains(combatant)));
        ended
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.encounters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }
}
