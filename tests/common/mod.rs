//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use ccg_combat::cards::{CardCatalog, CardKey};
use ccg_combat::combatant::Combatant;
use ccg_combat::core::{CombatantId, EngineConfig, PartyId};
use ccg_combat::effects::PartyLookup;
use ccg_combat::encounter::{CombatHost, Departure};
use ccg_combat::party::PartyRoster;

/// Cards with round numbers so damage is easy to follow.
pub const TEST_CARDS: &str = r#"
[Test.Common.Strike]
Type = "Attack"
Damage = 20

[Test.Common.Tap]
Type = "Attack"
Damage = 2

[Test.Common.Ward]
Type = "Defend"
Defense = 10
UseStat = "Reflexes"

[Test.Common.Slash]
Type = "Attack"
Damage = 20
Requires = "Weapon"

[Test.Common.Blade]
Type = "Weapon"
AttackMultiplier = 1.5

[Test.Common.Vigor]
Type = "Armor"
Health = 10

[Test.Common.Rally]
Type = "Buff"
Amount = 5
TargetStat = "Strength"
Duration = 2

[Test.Common.Hex]
Type = "Debuff"
Amount = 3
TargetStat = "Reflexes"

[Test.Common.Mend]
Type = "Heal"
Amount = 4
"#;

pub fn catalog() -> Arc<CardCatalog> {
    Arc::new(CardCatalog::from_toml_str(TEST_CARDS).unwrap())
}

pub fn card(name: &str) -> CardKey {
    format!("Test_Common_{name}").parse().unwrap()
}

pub fn id(n: u64) -> CombatantId {
    CombatantId::new(n)
}

pub fn player(n: u64, name: &str, deck: &[&str]) -> Combatant {
    Combatant::player(id(n), name, &EngineConfig::default()).with_deck(deck.iter().map(|c| card(c)))
}

pub fn goblin(n: u64, deck: &[&str]) -> Combatant {
    Combatant::autonomous(id(n), "Goblin", &EngineConfig::default()).with_deck(deck.iter().map(|c| card(c)))
}

/// Host that records every callback.
#[derive(Debug, Default)]
pub struct Recorder {
    pub messages: Vec<(CombatantId, String)>,
    pub autonomous_requests: Vec<CombatantId>,
    pub defeated: Vec<CombatantId>,
    pub departed: Vec<(CombatantId, Departure)>,
    pub roster: PartyRoster,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message delivered to `to`, in order.
    pub fn inbox(&self, to: CombatantId) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(who, _)| *who == to)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    pub fn received(&self, to: CombatantId, text: &str) -> bool {
        self.inbox(to).contains(&text)
    }
}

impl PartyLookup for Recorder {
    fn party_of(&self, combatant: CombatantId) -> Option<PartyId> {
        self.roster.party_of(combatant)
    }
}

impl CombatHost for Recorder {
    fn notify(&mut self, to: CombatantId, text: &str) {
        self.messages.push((to, text.to_string()));
    }

    fn request_autonomous_turn(&mut self, combatant: &Combatant) {
        self.autonomous_requests.push(combatant.id());
    }

    fn on_defeated(&mut self, combatant: &Combatant) {
        self.defeated.push(combatant.id());
    }

    fn on_departed(&mut self, combatant: Combatant, departure: Departure) {
        self.departed.push((combatant.id(), departure));
    }
}
