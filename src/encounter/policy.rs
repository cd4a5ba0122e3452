//! Action selection for autonomous combatants.

use crate::cards::CardCatalog;
use crate::combatant::Combatant;
use crate::core::Result;
use crate::effects::Groups;

use super::action::{Action, Targets};

/// Chooses an autonomous combatant's action.
///
/// Called after the combatant has drawn up to its hand size.
pub trait AutonomousPolicy: std::fmt::Debug + Send + Sync {
    fn choose(&self, actor: &Combatant, groups: &Groups, catalog: &CardCatalog) -> Result<Action>;
}

/// Plays the first card in hand.
///
/// Offensive cards go at the only foe, at every foe for group cards, and
/// otherwise at the first foe. Friendly cards mirror that over friends.
/// Anything else targets the actor itself. An empty hand passes.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstCardPolicy;

impl AutonomousPolicy for FirstCardPolicy {
    fn choose(&self, actor: &Combatant, groups: &Groups, catalog: &CardCatalog) -> Result<Action> {
        let Some(card) = actor.hand().first() else {
            return Ok(Action::pass(actor.id()));
        };
        let data = catalog.resolve(card)?;

        let pool = if data.is_offensive() {
            Some(&groups.foes)
        } else if data.is_friendly() {
            Some(&groups.friends)
        } else {
            None
        };

        let targets: Targets = match pool {
            None => std::iter::once(actor.id()).collect(),
            Some(pool) if pool.len() == 1 || data.is_group() => pool.clone(),
            Some(pool) => pool.iter().take(1).copied().collect(),
        };

        Ok(Action::play(card.clone(), actor.id(), targets))
    }
}
