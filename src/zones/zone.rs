//! Zone identifiers.

use serde::{Deserialize, Serialize};

/// One of a combatant's card piles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Discard,
    InPlay,
    /// Gear waiting to be put into play when an autonomous combatant spawns.
    Equipped,
}

impl Zone {
    /// Every zone.
    pub const ALL: [Zone; 5] = [Zone::Deck, Zone::Hand, Zone::Discard, Zone::InPlay, Zone::Equipped];

    /// Zones searched when removing a card by name, in order.
    pub const SEARCH_ORDER: [Zone; 4] = [Zone::Deck, Zone::Hand, Zone::Discard, Zone::InPlay];
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Zone::Deck => "deck",
            Zone::Hand => "hand",
            Zone::Discard => "discard",
            Zone::InPlay => "in-play",
            Zone::Equipped => "equipped",
        };
        f.write_str(name)
    }
}
