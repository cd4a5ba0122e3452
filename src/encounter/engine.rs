//! The turn engine.
//!
//! An `Encounter` collects one action per combatant per round and resolves
//! them together. Resolution runs in two passes over the combatants in
//! membership order:
//!
//! 1. **Non-attack pass**: every submitted card is played out of its
//!    owner's hand. Defend cards stage a mitigation against their targets,
//!    Buff/Debuff cards apply timed stat effects, Heal cards restore a
//!    stat. Attack cards are set aside.
//! 2. **Attack pass**: attacks resolve in the order they were set aside.
//!    Damage is scaled by the attacker's stat and weapon, then reduced by
//!    the staged Defend on the target and by the target's defense.
//!
//! Combatants brought to zero health are removed after the attack pass, so
//! every action submitted in a round takes effect. The encounter ends as
//! soon as fewer than two combatants remain.
//!
//! ## Turn flow
//!
//! ```text
//! Collecting --(all submitted: check_end_of_turn)--> resolve --> Collecting
//!            --(turn timer: on_timeout)------------> resolve --> Ended
//! ```

use std::sync::Arc;

use im::OrdMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::action::{Action, Targets};
use super::host::{CombatHost, Departure};
use super::policy::{AutonomousPolicy, FirstCardPolicy};
use super::snapshot::EncounterSnapshot;
use crate::cards::{CardCatalog, CardData, CardKey, CardType, Stat};
use crate::combatant::{Combatant, StatPool};
use crate::core::{CombatError, CombatantId, EncounterId, EngineConfig, Result};
use crate::effects::{groups_for, ActiveEffect, Groups, Mitigations, PartyLookup};
use crate::zones::Zone;

/// Lifecycle of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterState {
    /// Accepting actions for the current round.
    Collecting,
    /// Torn down; every combatant has been handed back to the host.
    Ended,
}

/// A combatant's place in an encounter and its per-round bookkeeping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Seat {
    pub(crate) combatant: Combatant,
    pub(crate) action: Action,
    pub(crate) action_count: u32,
    pub(crate) disconnected_turns: u32,
}

impl Seat {
    fn new(combatant: Combatant) -> Self {
        let action = Action::pass(combatant.id());
        Self {
            combatant,
            action,
            action_count: 0,
            disconnected_turns: 0,
        }
    }
}

/// What one resolution did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    /// Number of the round just resolved, starting at 1.
    pub round: u32,
    /// The round summary, also stored in the round log.
    pub summary: String,
    /// Knocked out this round, in membership order.
    pub defeated: Vec<CombatantId>,
    /// Removed for staying disconnected.
    pub fled: Vec<CombatantId>,
    /// Whether the encounter ended as a result.
    pub ended: bool,
}

struct PendingAttack {
    actor: CombatantId,
    card: CardData,
    targets: Targets,
}

/// One combat instance.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use ccg_combat::cards::{CardCatalog, CardKey};
/// use ccg_combat::combatant::Combatant;
/// use ccg_combat::core::{CombatantId, EncounterId, EngineConfig, PartyId};
/// use ccg_combat::effects::PartyLookup;
/// use ccg_combat::encounter::{CombatHost, Encounter};
///
/// #[derive(Default)]
/// struct Log(Vec<String>);
///
/// impl PartyLookup for Log {
///     fn party_of(&self, _: CombatantId) -> Option<PartyId> {
///         None
///     }
/// }
///
/// impl CombatHost for Log {
///     fn notify(&mut self, _to: CombatantId, text: &str) {
///         self.0.push(text.to_string());
///     }
/// }
///
/// let catalog = Arc::new(CardCatalog::builtin().unwrap());
/// let config = EngineConfig::default();
/// let punch: CardKey = "Base_Common_Punch".parse().unwrap();
///
/// let hero = Combatant::player(CombatantId::new(1), "Hero", &config).with_deck([punch]);
/// let goblin = Combatant::autonomous(CombatantId::new(2), "Goblin", &config);
///
/// let mut host = Log::default();
/// let mut encounter = Encounter::new(EncounterId::new(1), catalog, config);
/// encounter.add_combatant(hero, &mut host).unwrap();
/// encounter.add_combatant(goblin, &mut host).unwrap();
///
/// let card = encounter.combatant(CombatantId::new(1)).unwrap().hand()[0].clone();
/// assert!(encounter.submit_action(Some(card), CombatantId::new(1), [CombatantId::new(2)], &mut host).unwrap());
///
/// let report = encounter.check_end_of_turn(&mut host).unwrap().unwrap();
/// assert_eq!(report.round, 1);
/// assert!(report.summary.contains("Hero attacks Goblin with Punch"));
/// ```
#[derive(Debug)]
pub struct Encounter {
    id: EncounterId,
    catalog: Arc<CardCatalog>,
    config: EngineConfig,
    policy: Arc<dyn AutonomousPolicy>,
    seats: Vec<Seat>,
    round: u32,
    results: OrdMap<u32, String>,
    state: EncounterState,
    end_check_requested: bool,
}

impl Encounter {
    /// Create an empty encounter.
    #[must_use]
    pub fn new(id: EncounterId, catalog: Arc<CardCatalog>, config: EngineConfig) -> Self {
        let mut results = OrdMap::new();
        results.insert(0, String::new());
        Self {
            id,
            catalog,
            config,
            policy: Arc::new(FirstCardPolicy),
            seats: Vec::new(),
            round: 0,
            results,
            state: EncounterState::Collecting,
            end_check_requested: false,
        }
    }

    /// Replace the autonomous action policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn AutonomousPolicy>) -> Self {
        self.policy = policy;
        self
    }

    // === Queries ===

    #[must_use]
    pub fn id(&self) -> EncounterId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<CardCatalog> {
        &self.catalog
    }

    #[must_use]
    pub fn state(&self) -> EncounterState {
        self.state
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.state == EncounterState::Ended
    }

    /// Rounds resolved so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Member ids in membership order.
    pub fn members(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.seats.iter().map(|s| s.combatant.id())
    }

    #[must_use]
    pub fn contains(&self, id: CombatantId) -> bool {
        self.seat_index(id).is_some()
    }

    #[must_use]
    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.seat(id).map(|s| &s.combatant)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        let index = self.seat_index(id)?;
        Some(&mut self.seats[index].combatant)
    }

    /// Current and maximum of one stat.
    #[must_use]
    pub fn get_stat(&self, id: CombatantId, stat: Stat) -> Option<StatPool> {
        self.combatant(id).map(|c| c.get_stat(stat))
    }

    /// Actions submitted this round, 0 or 1.
    #[must_use]
    pub fn action_count(&self, id: CombatantId) -> Option<u32> {
        self.seat(id).map(|s| s.action_count)
    }

    /// The action waiting for resolution.
    #[must_use]
    pub fn pending_action(&self, id: CombatantId) -> Option<&Action> {
        self.seat(id).map(|s| &s.action)
    }

    #[must_use]
    pub fn disconnected_turns(&self, id: CombatantId) -> Option<u32> {
        self.seat(id).map(|s| s.disconnected_turns)
    }

    /// Round log: round number to summary. Round 0 is always empty.
    #[must_use]
    pub fn results(&self) -> &OrdMap<u32, String> {
        &self.results
    }

    /// Summary of the most recently resolved round.
    #[must_use]
    pub fn last_round_results(&self) -> &str {
        self.results.get(&self.round).map_or("", String::as_str)
    }

    /// Whether an autonomous turn or a submission asked for an end-of-turn
    /// check that has not run yet.
    #[must_use]
    pub fn end_check_requested(&self) -> bool {
        self.end_check_requested
    }

    /// Friend/foe split of the current members as seen by `id`.
    pub fn groups_for<L>(&self, id: CombatantId, parties: &L) -> Option<Groups>
    where
        L: PartyLookup + ?Sized,
    {
        self.contains(id).then(|| groups_for(self.members(), id, parties))
    }

    /// Send `text` to every member.
    pub fn notify_all<H>(&self, host: &mut H, text: &str)
    where
        H: CombatHost + ?Sized,
    {
        for seat in &self.seats {
            host.notify(seat.combatant.id(), text);
        }
    }

    /// Mark a player as having (or lacking) a live session.
    pub fn set_connected(&mut self, id: CombatantId, connected: bool) -> bool {
        match self.combatant_mut(id) {
            Some(c) => {
                c.set_connected(connected);
                true
            }
            None => false,
        }
    }

    // === Membership ===

    /// Register a combatant.
    ///
    /// Connected players draw up to their hand size. An autonomous
    /// combatant joining someone picks its action right away.
    pub fn add_combatant<H>(&mut self, mut combatant: Combatant, host: &mut H) -> Result<()>
    where
        H: CombatHost + ?Sized,
    {
        if self.is_ended() {
            return Err(CombatError::EncounterEnded);
        }
        let id = combatant.id();
        if self.contains(id) {
            return Err(CombatError::AlreadyEngaged(id));
        }

        let autonomous = combatant.is_autonomous();
        if !autonomous && combatant.is_connected() {
            combatant.draw_up_to_hand_size();
        }
        info!(encounter = %self.id, combatant = %combatant.name(), "joined encounter");
        self.seats.push(Seat::new(combatant));

        if autonomous && self.seats.len() > 1 {
            self.autonomous_turn(id, host)?;
        }
        Ok(())
    }

    /// Deregister a combatant and hand it back.
    ///
    /// Its timed effects are reversed. If fewer than two combatants remain
    /// the encounter ends.
    pub fn remove_combatant<H>(&mut self, id: CombatantId, host: &mut H) -> Option<Combatant>
    where
        H: CombatHost + ?Sized,
    {
        let combatant = self.take_seat(id)?;
        info!(encounter = %self.id, combatant = %combatant.name(), "left encounter");
        if !self.is_ended() && self.seats.len() < 2 {
            self.end(host);
        }
        Some(combatant)
    }

    // === Turn flow ===

    /// Record `actor`'s action for this round.
    ///
    /// Returns `Ok(false)` without changing anything if the actor already
    /// acted this round, is not a member, or the encounter has ended. An
    /// unknown card is an error. On acceptance, every autonomous combatant
    /// that has not acted yet picks its action too.
    pub fn submit_action<H>(
        &mut self,
        card: Option<CardKey>,
        actor: CombatantId,
        targets: impl IntoIterator<Item = CombatantId>,
        host: &mut H,
    ) -> Result<bool>
    where
        H: CombatHost + ?Sized,
    {
        if self.is_ended() {
            return Ok(false);
        }
        let Some(index) = self.seat_index(actor) else {
            debug!(encounter = %self.id, actor = %actor, "submission from non-member");
            return Ok(false);
        };
        if self.seats[index].action_count >= 1 {
            debug!(encounter = %self.id, actor = %actor, "rejected second submission this round");
            return Ok(false);
        }
        if let Some(card) = &card {
            self.catalog.resolve(card)?;
        }

        let action = Action {
            card,
            actor,
            targets: targets.into_iter().collect(),
        };
        debug!(encounter = %self.id, actor = %actor, card = ?action.card, "action accepted");
        self.record(index, action);
        self.end_check_requested = true;

        self.run_autonomous_turns(host)?;
        Ok(true)
    }

    /// Resolve the round if every member has acted.
    pub fn check_end_of_turn<H>(&mut self, host: &mut H) -> Result<Option<RoundReport>>
    where
        H: CombatHost + ?Sized,
    {
        self.end_check_requested = false;
        if self.is_ended() || self.seats.is_empty() {
            return Ok(None);
        }
        if self.seats.iter().all(|s| s.action_count >= 1) {
            self.resolve(host).map(Some)
        } else {
            Ok(None)
        }
    }

    /// The turn timer ran out: resolve with whatever was submitted.
    pub fn on_timeout<H>(&mut self, host: &mut H) -> Result<Option<RoundReport>>
    where
        H: CombatHost + ?Sized,
    {
        if self.is_ended() {
            return Ok(None);
        }
        info!(encounter = %self.id, round = self.round + 1, "turn timer expired");
        self.notify_all(host, "Turn timer timed out. Continuing.");
        self.end_check_requested = false;
        self.resolve(host).map(Some)
    }

    /// Resolve the current round and start the next one.
    pub fn resolve<H>(&mut self, host: &mut H) -> Result<RoundReport>
    where
        H: CombatHost + ?Sized,
    {
        if self.is_ended() {
            return Err(CombatError::EncounterEnded);
        }
        let catalog = Arc::clone(&self.catalog);
        let mut summary = String::new();
        let mut mitigations = Mitigations::new();
        let mut attacks = Vec::new();

        // Non-attack pass
        for index in 0..self.seats.len() {
            let actor = self.seats[index].combatant.id();
            let actor_name = self.seats[index].combatant.name().to_string();
            let action = std::mem::replace(&mut self.seats[index].action, Action::pass(actor));

            let Some(card) = action.card else {
                summary.push_str(&format!("{actor_name} played nothing.\n"));
                continue;
            };

            let targets: Targets = action
                .targets
                .iter()
                .copied()
                .filter(|&t| self.contains(t))
                .collect();
            if targets.is_empty() {
                debug!(encounter = %self.id, actor = %actor_name, card = %card, "no remaining targets");
                continue;
            }

            let Some(hand_index) = self.seats[index].combatant.zones().position(Zone::Hand, &card) else {
                warn!(encounter = %self.id, actor = %actor_name, card = %card, "submitted card no longer in hand");
                continue;
            };
            let data = self.seats[index].combatant.play(hand_index, &catalog)?;

            if data.card_type == CardType::Attack {
                attacks.push(PendingAttack {
                    actor,
                    card: data,
                    targets,
                });
                continue;
            }

            summary.push_str(&format!(
                "{actor_name} played {} targeting {}.\n",
                data.name,
                self.name_list(&targets)
            ));

            let user = &self.seats[index].combatant;
            match data.card_type {
                CardType::Defend => {
                    let stat = data.target_stat_or(Stat::Health);
                    let amount = scale(data.defense, user.get_stat(data.use_stat_or(Stat::Strength)).current);
                    for &target in &targets {
                        mitigations.stage(target, stat, amount, actor);
                    }
                }
                CardType::Buff | CardType::Debuff => {
                    let stat = data.target_stat_or(Stat::Strength);
                    let mut amount = scale(data.amount, user.get_stat(data.use_stat_or(Stat::Intelligence)).current);
                    if data.card_type == CardType::Debuff {
                        amount = -amount;
                    }
                    for &target in &targets {
                        if let Some(target) = self.combatant_mut(target) {
                            target.add_effect(ActiveEffect::new(stat, amount, data.duration, actor, data.key.clone()));
                        }
                    }
                }
                CardType::Heal => {
                    let stat = data.target_stat_or(Stat::Health);
                    let amount = scale(data.amount, user.get_stat(data.use_stat_or(Stat::Strength)).current);
                    for &target in &targets {
                        if let Some(target) = self.combatant_mut(target) {
                            target.modify(stat, amount, false);
                        }
                    }
                }
                _ => {}
            }
        }

        // Attack pass
        for attack in &attacks {
            let Some(attacker) = self.combatant(attack.actor) else {
                continue;
            };
            let attacker_name = attacker.name().to_string();
            let use_stat = attack.card.use_stat_or(Stat::Strength);
            let mut damage = scale(attack.card.damage, attacker.get_stat(use_stat).current);

            if let Some(required) = attack.card.requires {
                match attacker.find_in_play(required, &catalog)? {
                    Some(item) => damage = (damage as f64 * item.attack_multiplier).trunc() as i64,
                    None => {
                        warn!(encounter = %self.id, actor = %attacker_name, card = %attack.card.name, requires = %required, "unplayable card");
                        summary.push_str(&format!("{attacker_name} played an unplayable card.\n"));
                        continue;
                    }
                }
            }

            let stat = attack.card.target_stat_or(Stat::Health);
            for &target_id in &attack.targets {
                let mitigation = mitigations.amount(target_id, stat);
                let Some(target) = self.combatant_mut(target_id) else {
                    continue;
                };
                let dealt = (damage - mitigation - target.defense(&catalog)?).max(0);
                target.modify(stat, -dealt, false);
                summary.push_str(&format!(
                    "{attacker_name} attacks {} with {} for {dealt} damage.\n",
                    target.name(),
                    attack.card.name
                ));
            }
        }

        self.round += 1;
        self.results.insert(self.round, summary.clone());
        info!(encounter = %self.id, round = self.round, "round resolved");

        let mut report = RoundReport {
            round: self.round,
            summary,
            defeated: self.apply_defeats(host),
            fled: Vec::new(),
            ended: false,
        };

        if self.seats.len() < 2 {
            self.end(host);
        } else {
            self.start_next_round(host, &mut report)?;
        }
        report.ended = self.is_ended();
        Ok(report)
    }

    fn start_next_round<H>(&mut self, host: &mut H, report: &mut RoundReport) -> Result<()>
    where
        H: CombatHost + ?Sized,
    {
        for seat in &mut self.seats {
            seat.action_count = 0;
            seat.action = Action::pass(seat.combatant.id());
            seat.combatant.countdown_effects();
        }
        report.defeated.extend(self.apply_defeats(host));
        if self.seats.len() < 2 {
            self.end(host);
            return Ok(());
        }

        if self.seats.iter().any(|s| !s.combatant.is_autonomous()) {
            self.notify_all(host, "Next turn begins ...");
        }

        let threshold = self.config.disconnect_threshold;
        let mut fled = Vec::new();
        for seat in &mut self.seats {
            if seat.combatant.is_autonomous() {
                continue;
            }
            if seat.combatant.is_connected() {
                seat.combatant.draw_up_to_hand_size();
            } else {
                seat.disconnected_turns += 1;
                if seat.disconnected_turns > threshold {
                    fled.push(seat.combatant.id());
                }
            }
        }
        for id in fled {
            if let Some(combatant) = self.take_seat(id) {
                info!(encounter = %self.id, combatant = %combatant.name(), "disconnected too long, fled");
                host.on_departed(combatant, Departure::Fled);
                report.fled.push(id);
            }
        }
        if self.seats.len() < 2 {
            self.end(host);
            return Ok(());
        }

        self.run_autonomous_turns(host)
    }

    /// Let every autonomous member that has not acted this round act.
    fn run_autonomous_turns<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: CombatHost + ?Sized,
    {
        let waiting: Vec<CombatantId> = self
            .seats
            .iter()
            .filter(|s| s.combatant.is_autonomous() && s.action_count == 0)
            .map(|s| s.combatant.id())
            .collect();

        for id in waiting {
            if self.seats.len() < 2 {
                break;
            }
            if let Some(seat) = self.seat(id) {
                if seat.action_count == 0 {
                    let text = format!("{} going.", seat.combatant.name());
                    self.notify_all(host, &text);
                    self.autonomous_turn(id, host)?;
                }
            }
        }
        Ok(())
    }

    fn autonomous_turn<H>(&mut self, id: CombatantId, host: &mut H) -> Result<()>
    where
        H: CombatHost + ?Sized,
    {
        let Some(index) = self.seat_index(id) else {
            return Ok(());
        };
        host.request_autonomous_turn(&self.seats[index].combatant);
        self.seats[index].combatant.draw_up_to_hand_size();

        let groups = groups_for(self.members(), id, &*host);
        let action = self
            .policy
            .choose(&self.seats[index].combatant, &groups, &self.catalog)?;
        debug!(
            encounter = %self.id,
            actor = %self.seats[index].combatant.name(),
            card = ?action.card,
            targets = ?action.targets,
            "autonomous action chosen"
        );

        self.record(index, action);
        self.end_check_requested = true;
        Ok(())
    }

    fn record(&mut self, index: usize, action: Action) {
        let seat = &mut self.seats[index];
        seat.action = action;
        seat.action_count += 1;
    }

    /// Remove every member at or below zero health, in membership order.
    fn apply_defeats<H>(&mut self, host: &mut H) -> Vec<CombatantId>
    where
        H: CombatHost + ?Sized,
    {
        let fallen: Vec<CombatantId> = self
            .seats
            .iter()
            .filter(|s| s.combatant.is_defeated())
            .map(|s| s.combatant.id())
            .collect();

        for &id in &fallen {
            if let Some(name) = self.combatant(id).map(|c| c.name().to_string()) {
                self.notify_all(host, &format!("COMBAT: {name} is knocked out."));
            }
            if let Some(combatant) = self.take_seat(id) {
                info!(encounter = %self.id, combatant = %combatant.name(), "knocked out");
                host.on_defeated(&combatant);
                host.on_departed(combatant, Departure::Defeated);
            }
        }
        fallen
    }

    fn end<H>(&mut self, host: &mut H)
    where
        H: CombatHost + ?Sized,
    {
        self.state = EncounterState::Ended;
        self.end_check_requested = false;
        info!(encounter = %self.id, rounds = self.round, "encounter ended");

        for seat in std::mem::take(&mut self.seats) {
            let mut combatant = seat.combatant;
            combatant.clear_effects();
            host.notify(combatant.id(), "Combat has ended");
            host.on_departed(combatant, Departure::EncounterEnded);
        }
    }

    fn take_seat(&mut self, id: CombatantId) -> Option<Combatant> {
        let index = self.seat_index(id)?;
        let mut combatant = self.seats.remove(index).combatant;
        combatant.clear_effects();
        Some(combatant)
    }

    fn seat_index(&self, id: CombatantId) -> Option<usize> {
        self.seats.iter().position(|s| s.combatant.id() == id)
    }

    fn seat(&self, id: CombatantId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.combatant.id() == id)
    }

    fn name_list(&self, ids: &[CombatantId]) -> String {
        let names: Vec<String> = ids
            .iter()
            .map(|&id| self.combatant(id).map_or_else(|| id.to_string(), |c| c.name().to_string()))
            .collect();
        match names.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            [first, second] => format!("{first} and {second}"),
            [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
        }
    }

    // === Persistence ===

    /// Capture the encounter's state.
    #[must_use]
    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            id: self.id,
            config: self.config.clone(),
            seats: self.seats.clone(),
            round: self.round,
            results: self.results.clone(),
            state: self.state,
            end_check_requested: self.end_check_requested,
        }
    }

    /// Rebuild an encounter from a snapshot. The policy resets to
    /// `FirstCardPolicy`.
    #[must_use]
    pub fn restore(snapshot: EncounterSnapshot, catalog: Arc<CardCatalog>) -> Self {
        Self {
            id: snapshot.id,
            catalog,
            config: snapshot.config,
            policy: Arc::new(FirstCardPolicy),
            seats: snapshot.seats,
            round: snapshot.round,
            results: snapshot.results,
            state: snapshot.state,
            end_check_requested: snapshot.end_check_requested,
        }
    }
}

/// `base * stat / 10`, truncated toward zero.
fn scale(base: i64, stat_current: i64) -> i64 {
    base * stat_current / 10
}
