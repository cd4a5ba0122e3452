//! Submitted intents.
//!
//! An action is a card (or nothing, for a pass), the combatant playing it,
//! and the combatants it targets. Actions live for one round only.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardKey;
use crate::core::CombatantId;

/// Target list; nearly always one or two combatants.
pub type Targets = SmallVec<[CombatantId; 4]>;

/// One combatant's play for the current round.
///
/// ## Example
///
/// ```
/// use ccg_combat::core::CombatantId;
/// use ccg_combat::encounter::Action;
///
/// let hero = CombatantId::new(1);
/// let goblin = CombatantId::new(2);
///
/// let pass = Action::pass(hero);
/// assert!(pass.is_pass());
///
/// let punch = Action::play("Base_Common_Punch".parse().unwrap(), hero, [goblin]);
/// assert_eq!(punch.targets.as_slice(), &[goblin]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Card to play, `None` to pass.
    pub card: Option<CardKey>,
    pub actor: CombatantId,
    pub targets: Targets,
}

impl Action {
    /// An action that plays nothing.
    #[must_use]
    pub fn pass(actor: CombatantId) -> Self {
        Self {
            card: None,
            actor,
            targets: SmallVec::new(),
        }
    }

    /// Play `card` at `targets`.
    #[must_use]
    pub fn play(card: CardKey, actor: CombatantId, targets: impl IntoIterator<Item = CombatantId>) -> Self {
        Self {
            card: Some(card),
            actor,
            targets: targets.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.card.is_none()
    }
}
