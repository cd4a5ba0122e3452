//! A participant in combat: card piles, stats, and timed effects.
//!
//! `Combatant` owns everything about one fighter that changes during a
//! fight. Operations that need card data take the `CardCatalog` as an
//! argument; the combatant itself only stores card keys.
//!
//! ## Zone operations
//!
//! - `draw`: deck front to hand, reshuffling the discard pile when empty
//! - `play` / `play_from`: consumables to discard, persistent cards to
//!   in-play (evicting any in-play card of the same type)
//! - `leave_play`: in-play to discard, retracting created cards
//! - `create_cards` / `remove_card`: add or delete card instances

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stats::{StatBlock, StatPool};
use crate::cards::{CardCatalog, CardData, CardKey, CardType, Stat};
use crate::core::{CombatError, CombatantId, EngineConfig, GameRng, Result};
use crate::effects::ActiveEffect;
use crate::zones::{CardZones, Zone};

/// Who decides a combatant's actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    /// A connected player picks cards through the host.
    Player,
    /// The engine picks cards with its autonomous policy.
    Autonomous,
}

/// Result of a draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawOutcome {
    /// Cards actually moved to hand.
    pub drawn: usize,
    /// Whether the discard pile was shuffled back into the deck.
    pub reshuffled: bool,
}

/// One fighter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    control: Control,
    hand_size: usize,
    base_stat: i64,
    zones: CardZones,
    stats: StatBlock,
    effects: Vec<ActiveEffect>,
    connected: bool,
    rng: GameRng,
}

impl Combatant {
    fn with_control(id: CombatantId, name: impl Into<String>, control: Control, config: &EngineConfig) -> Self {
        let hand_size = match control {
            Control::Player => config.player_hand_size,
            Control::Autonomous => config.autonomous_hand_size,
        };
        Self {
            id,
            name: name.into(),
            control,
            hand_size,
            base_stat: config.base_stat,
            zones: CardZones::new(),
            stats: StatBlock::new(config.base_stat),
            effects: Vec::new(),
            connected: control == Control::Player,
            rng: GameRng::new(config.seed).for_context(&format!("combatant:{}", id.raw())),
        }
    }

    /// A player-controlled combatant with empty piles and full stats.
    #[must_use]
    pub fn player(id: CombatantId, name: impl Into<String>, config: &EngineConfig) -> Self {
        Self::with_control(id, name, Control::Player, config)
    }

    /// An engine-controlled combatant with empty piles and full stats.
    #[must_use]
    pub fn autonomous(id: CombatantId, name: impl Into<String>, config: &EngineConfig) -> Self {
        Self::with_control(id, name, Control::Autonomous, config)
    }

    /// Add cards to the deck. Stats are not recalculated.
    #[must_use]
    pub fn with_deck(mut self, cards: impl IntoIterator<Item = CardKey>) -> Self {
        self.zones.extend(Zone::Deck, cards);
        self
    }

    /// Add cards to the equipped pile for `equip_all`.
    #[must_use]
    pub fn with_equipped(mut self, cards: impl IntoIterator<Item = CardKey>) -> Self {
        self.zones.extend(Zone::Equipped, cards);
        self
    }

    /// Override the hand size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> CombatantId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn control(&self) -> Control {
        self.control
    }

    #[must_use]
    pub fn is_autonomous(&self) -> bool {
        self.control == Control::Autonomous
    }

    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand_size
    }

    #[must_use]
    pub fn zones(&self) -> &CardZones {
        &self.zones
    }

    /// Direct pile access for hosts that build decks incrementally.
    pub fn zones_mut(&mut self) -> &mut CardZones {
        &mut self.zones
    }

    #[must_use]
    pub fn hand(&self) -> &[CardKey] {
        self.zones.pile(Zone::Hand)
    }

    #[must_use]
    pub fn deck(&self) -> &[CardKey] {
        self.zones.pile(Zone::Deck)
    }

    #[must_use]
    pub fn in_play(&self) -> &[CardKey] {
        self.zones.pile(Zone::InPlay)
    }

    #[must_use]
    pub fn get_stat(&self, stat: Stat) -> StatPool {
        self.stats.get(stat)
    }

    #[must_use]
    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    #[must_use]
    pub fn effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    /// Whether a live session is attached. Autonomous combatants report false.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.stats.is_defeated()
    }

    // === Zone operations ===

    /// Draw `count` cards from the front of the deck.
    ///
    /// An empty deck is refilled from the discard pile and shuffled. When
    /// both are empty the draw stops early.
    pub fn draw(&mut self, count: usize) -> DrawOutcome {
        let mut outcome = DrawOutcome::default();
        for _ in 0..count {
            if self.zones.len(Zone::Deck) == 0 {
                if self.zones.len(Zone::Discard) == 0 {
                    break;
                }
                debug!(combatant = %self.name, "shuffling discard back into deck");
                self.shuffle(true);
                outcome.reshuffled = true;
            }
            match self.zones.pop_deck_front() {
                Some(card) => {
                    self.zones.push(Zone::Hand, card);
                    outcome.drawn += 1;
                }
                None => break,
            }
        }
        outcome
    }

    /// Draw until the hand is full.
    pub fn draw_up_to_hand_size(&mut self) -> DrawOutcome {
        let missing = self.hand_size.saturating_sub(self.zones.len(Zone::Hand));
        self.draw(missing)
    }

    /// Move a hand card to the discard pile without playing it.
    pub fn discard(&mut self, hand_index: usize) -> Result<()> {
        self.zones.move_card(Zone::Hand, Zone::Discard, hand_index)
    }

    /// Play a card from hand.
    pub fn play(&mut self, hand_index: usize, catalog: &CardCatalog) -> Result<CardData> {
        self.play_from(Zone::Hand, hand_index, catalog)
    }

    /// Play the card at `index` of `zone`.
    ///
    /// Consumable cards go to the discard pile. Persistent cards go to
    /// in-play after any in-play card of the same type leaves play. Cards
    /// listed in `Create` are then added to the deck.
    pub fn play_from(&mut self, zone: Zone, index: usize, catalog: &CardCatalog) -> Result<CardData> {
        let key = self
            .zones
            .get(zone, index)
            .ok_or_else(|| CombatError::invalid_index(zone, index, self.zones.len(zone)))?;
        let data = catalog.resolve(key)?;
        let card = self.zones.take(zone, index)?;

        if data.is_consumable() {
            self.zones.push(Zone::Discard, card);
        } else {
            while let Some(slot) = self.in_play_of_type(data.card_type, catalog)? {
                debug!(combatant = %self.name, card = %self.zones.pile(Zone::InPlay)[slot], "removing from play");
                self.leave_play(slot, catalog)?;
            }
            debug!(combatant = %self.name, card = %data.name, "playing");
            self.zones.push(Zone::InPlay, card);
        }

        if !data.create.is_empty() {
            self.create_cards(&data.create, catalog)?;
        }
        Ok(data)
    }

    /// Move an in-play card to the discard pile.
    ///
    /// One copy of each card it created is removed first, wherever it is;
    /// copies already gone are skipped.
    pub fn leave_play(&mut self, in_play_index: usize, catalog: &CardCatalog) -> Result<()> {
        let key = self.zones.get(Zone::InPlay, in_play_index).ok_or_else(|| {
            CombatError::invalid_index(Zone::InPlay, in_play_index, self.zones.len(Zone::InPlay))
        })?;
        let data = catalog.resolve(key)?;
        let card = self.zones.take(Zone::InPlay, in_play_index)?;

        for created in &data.create {
            if self.zones.remove_first(created).is_none() {
                debug!(combatant = %self.name, card = %created, "created card already gone");
            }
        }
        self.zones.push(Zone::Discard, card);

        if !data.create.is_empty() {
            self.recalculate(catalog)?;
        }
        Ok(())
    }

    /// Add new card instances to the deck, shuffle the deck alone, and
    /// recalculate stats.
    pub fn create_cards(&mut self, cards: &[CardKey], catalog: &CardCatalog) -> Result<()> {
        for card in cards {
            if !catalog.contains(card) {
                return Err(CombatError::UnknownCard(card.to_string()));
            }
        }
        self.zones.extend(Zone::Deck, cards.iter().cloned());
        self.shuffle(false);
        self.recalculate(catalog)
    }

    /// Delete the first copy of `card`, searching deck, hand, discard, then in-play.
    pub fn remove_card(&mut self, card: &CardKey) -> Result<Zone> {
        self.zones
            .remove_first(card)
            .ok_or_else(|| CombatError::CardNotFound(card.to_string()))
    }

    /// Shuffle the deck, first folding in the discard pile if asked.
    pub fn shuffle(&mut self, include_discard: bool) {
        if include_discard {
            self.zones.recycle_discard();
        }
        self.zones.shuffle_deck(&mut self.rng);
    }

    /// Put every equipped card into play, then recalculate and shuffle.
    pub fn equip_all(&mut self, catalog: &CardCatalog) -> Result<()> {
        while self.zones.len(Zone::Equipped) > 0 {
            self.play_from(Zone::Equipped, 0, catalog)?;
        }
        self.recalculate(catalog)?;
        self.shuffle(true);
        Ok(())
    }

    fn in_play_of_type(&self, card_type: CardType, catalog: &CardCatalog) -> Result<Option<usize>> {
        for (slot, key) in self.zones.pile(Zone::InPlay).iter().enumerate() {
            if catalog.resolve(key)?.card_type == card_type {
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }

    /// First in-play card of `card_type`, resolved.
    pub fn find_in_play(&self, card_type: CardType, catalog: &CardCatalog) -> Result<Option<CardData>> {
        match self.in_play_of_type(card_type, catalog)? {
            Some(slot) => catalog.resolve(&self.zones.pile(Zone::InPlay)[slot]).map(Some),
            None => Ok(None),
        }
    }

    // === Stat model ===

    /// Recompute stat maximums from every owned card, keeping deficits.
    pub fn recalculate(&mut self, catalog: &CardCatalog) -> Result<()> {
        let mut bonuses = [0i64; Stat::COUNT];
        for key in self.zones.owned() {
            let data = catalog.resolve(key)?;
            for stat in Stat::ALL {
                bonuses[stat.index()] += data.stat_bonus(stat);
            }
        }
        self.stats.recalculate(self.base_stat, bonuses);
        Ok(())
    }

    /// Change a stat's current value. Returns true if this leaves the
    /// combatant defeated.
    pub fn modify(&mut self, stat: Stat, amount: i64, allow_over_max: bool) -> bool {
        self.stats.modify(stat, amount, allow_over_max);
        self.is_defeated()
    }

    /// Damage mitigation: current Strength times every in-play
    /// `DefenseMult`, divided by ten and truncated.
    pub fn defense(&self, catalog: &CardCatalog) -> Result<i64> {
        let mut defense = self.stats.current(Stat::Strength) as f64;
        for key in self.zones.pile(Zone::InPlay) {
            if let Some(mult) = catalog.resolve(key)?.defense_mult {
                defense *= mult;
            }
        }
        Ok((defense / 10.0).trunc() as i64)
    }

    // === Timed effects ===

    /// Apply a timed effect now and remember it for reversal.
    ///
    /// The amount may push the stat over its maximum. Returns true if this
    /// leaves the combatant defeated.
    pub fn add_effect(&mut self, effect: ActiveEffect) -> bool {
        let defeated = self.modify(effect.stat, effect.amount, true);
        self.effects.push(effect);
        defeated
    }

    /// Advance every timed effect one round and reverse the expired ones.
    pub fn countdown_effects(&mut self) -> Vec<ActiveEffect> {
        let mut expired = Vec::new();
        let mut kept = Vec::with_capacity(self.effects.len());
        for mut effect in std::mem::take(&mut self.effects) {
            if effect.tick() {
                expired.push(effect);
            } else {
                kept.push(effect);
            }
        }
        self.effects = kept;

        for effect in &expired {
            self.stats.modify(effect.stat, -effect.amount, false);
        }
        expired
    }

    /// Reverse and forget every active effect.
    pub fn clear_effects(&mut self) {
        for effect in std::mem::take(&mut self.effects) {
            self.stats.modify(effect.stat, -effect.amount, false);
        }
    }
}

impl std::fmt::Display for Combatant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
