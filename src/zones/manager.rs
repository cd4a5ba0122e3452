//! Per-combatant card piles and movement between them.
//!
//! `CardZones` owns one ordered pile per `Zone`. Every move pops a card
//! from one pile and appends it to another, so a card instance is always in
//! exactly one pile. The only operations that change the total number of
//! cards are `push`/`extend` (new instances) and `remove_first`.

use serde::{Deserialize, Serialize};

use super::zone::Zone;
use crate::cards::CardKey;
use crate::core::{CombatError, GameRng, Result};

/// The card piles of one combatant.
///
/// ## Usage
///
/// ```
/// use ccg_combat::cards::CardKey;
/// use ccg_combat::zones::{CardZones, Zone};
///
/// let punch: CardKey = "Base_Common_Punch".parse().unwrap();
/// let mut zones = CardZones::new();
/// zones.push(Zone::Deck, punch.clone());
///
/// let drawn = zones.pop_deck_front().unwrap();
/// zones.push(Zone::Hand, drawn);
/// zones.move_card(Zone::Hand, Zone::Discard, 0).unwrap();
///
/// assert_eq!(zones.pile(Zone::Discard), &[punch]);
/// assert_eq!(zones.total(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardZones {
    deck: Vec<CardKey>,
    hand: Vec<CardKey>,
    discard: Vec<CardKey>,
    in_play: Vec<CardKey>,
    equipped: Vec<CardKey>,
}

impl CardZones {
    /// Create empty piles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards in a pile, in order. Index 0 of the deck is the next draw.
    #[must_use]
    pub fn pile(&self, zone: Zone) -> &[CardKey] {
        match zone {
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::Discard => &self.discard,
            Zone::InPlay => &self.in_play,
            Zone::Equipped => &self.equipped,
        }
    }

    fn pile_mut(&mut self, zone: Zone) -> &mut Vec<CardKey> {
        match zone {
            Zone::Deck => &mut self.deck,
            Zone::Hand => &mut self.hand,
            Zone::Discard => &mut self.discard,
            Zone::InPlay => &mut self.in_play,
            Zone::Equipped => &mut self.equipped,
        }
    }

    /// Number of cards in a pile.
    #[must_use]
    pub fn len(&self, zone: Zone) -> usize {
        self.pile(zone).len()
    }

    /// Card at `index` of a pile.
    #[must_use]
    pub fn get(&self, zone: Zone, index: usize) -> Option<&CardKey> {
        self.pile(zone).get(index)
    }

    /// Append a new card instance to a pile.
    pub fn push(&mut self, zone: Zone, card: CardKey) {
        self.pile_mut(zone).push(card);
    }

    /// Append several new card instances to a pile.
    pub fn extend(&mut self, zone: Zone, cards: impl IntoIterator<Item = CardKey>) {
        self.pile_mut(zone).extend(cards);
    }

    /// Remove and return the card at `index`.
    pub fn take(&mut self, zone: Zone, index: usize) -> Result<CardKey> {
        let pile = self.pile_mut(zone);
        if index >= pile.len() {
            return Err(CombatError::invalid_index(zone, index, pile.len()));
        }
        Ok(pile.remove(index))
    }

    /// Move the card at `index` of `from` to the end of `to`.
    pub fn move_card(&mut self, from: Zone, to: Zone, index: usize) -> Result<()> {
        let card = self.take(from, index)?;
        self.push(to, card);
        Ok(())
    }

    /// Remove the next card of the deck.
    pub fn pop_deck_front(&mut self) -> Option<CardKey> {
        if self.deck.is_empty() {
            None
        } else {
            Some(self.deck.remove(0))
        }
    }

    /// Move the whole discard pile under the deck.
    pub fn recycle_discard(&mut self) {
        let discard = std::mem::take(&mut self.discard);
        self.deck.extend(discard);
    }

    /// Shuffle the deck in place.
    pub fn shuffle_deck(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.deck);
    }

    /// Index of the first copy of `card` in a pile.
    #[must_use]
    pub fn position(&self, zone: Zone, card: &CardKey) -> Option<usize> {
        self.pile(zone).iter().position(|c| c == card)
    }

    /// Remove the first copy of `card`, searching piles in `Zone::SEARCH_ORDER`.
    ///
    /// Returns the pile it was removed from.
    pub fn remove_first(&mut self, card: &CardKey) -> Option<Zone> {
        for zone in Zone::SEARCH_ORDER {
            if let Some(index) = self.position(zone, card) {
                self.pile_mut(zone).remove(index);
                return Some(zone);
            }
        }
        None
    }

    /// Every card the combatant owns for stat purposes.
    ///
    /// Cards still waiting in the equipped pile do not count.
    pub fn owned(&self) -> impl Iterator<Item = &CardKey> {
        Zone::SEARCH_ORDER.into_iter().flat_map(move |zone| self.pile(zone).iter())
    }

    /// Number of cards across all piles, equipped included.
    #[must_use]
    pub fn total(&self) -> usize {
        Zone::ALL.iter().map(|&zone| self.len(zone)).sum()
    }
}
