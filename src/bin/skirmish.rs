//! Skirmish - a hero against a goblin, played out in the terminal.
//!
//! The hero plays the first attack in hand each round (or the first card
//! if there is none). Pass a seed as the first argument to replay a fight;
//! set `RUST_LOG=debug` to watch the engine's decisions.

use std::sync::Arc;

use ccg_combat::{
    CardCatalog, CardKey, CardType, CombatHost, Combatant, CombatantId, Encounter, EncounterId,
    EngineConfig, PartyId, PartyLookup, Stat,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MAX_ROUNDS: u32 = 50;

/// Prints what the hero would see.
struct Console {
    hero: CombatantId,
}

impl PartyLookup for Console {
    fn party_of(&self, _combatant: CombatantId) -> Option<PartyId> {
        None
    }
}

impl CombatHost for Console {
    fn notify(&mut self, to: CombatantId, text: &str) {
        if to == self.hero {
            println!("  > {text}");
        }
    }

    fn on_defeated(&mut self, combatant: &Combatant) {
        tracing::info!(combatant = %combatant.name(), "defeated");
    }
}

fn keys(cards: &[&str]) -> ccg_combat::Result<Vec<CardKey>> {
    cards.iter().map(|c| c.parse()).collect()
}

fn main() -> ccg_combat::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(7);
    let config = EngineConfig::default().with_seed(seed);
    let catalog = Arc::new(CardCatalog::builtin()?);
    tracing::info!(cards = catalog.len(), seed, "catalog loaded");

    let hero_id = CombatantId::new(1);
    let goblin_id = CombatantId::new(2);

    let mut hero = Combatant::player(hero_id, "Hero", &config).with_deck(keys(&[
        "Base_Common_Punch",
        "Base_Common_Kick",
        "Base_Common_Block",
        "Base_Common_Chop",
        "Base_Common_Punch",
        "Base_Common_Kick",
        "Base_Common_Block",
        "Base_Uncommon_Fire Needle",
    ])?);
    hero.recalculate(&catalog)?;
    hero.shuffle(false);

    let mut goblin = Combatant::autonomous(goblin_id, "Goblin", &config)
        .with_deck(keys(&["Base_Common_Kick", "Base_Common_Block", "Base_Common_Kick"])?)
        .with_equipped(keys(&["Base_Common_Rusty Knife"])?);
    goblin.equip_all(&catalog)?;

    let mut host = Console { hero: hero_id };
    let mut encounter = Encounter::new(EncounterId::new(1), Arc::clone(&catalog), config);
    encounter.add_combatant(hero, &mut host)?;
    encounter.add_combatant(goblin, &mut host)?;

    while !encounter.is_ended() && encounter.round() < MAX_ROUNDS {
        let Some(hero) = encounter.combatant(hero_id) else {
            break;
        };
        println!(
            "Round {}: Hero {} HP, Goblin {} HP",
            encounter.round() + 1,
            hero.get_stat(Stat::Health),
            encounter.get_stat(goblin_id, Stat::Health).map_or_else(String::new, |p| p.to_string()),
        );

        let mut choice = None;
        for card in hero.hand() {
            let data = catalog.resolve(card)?;
            if data.card_type == CardType::Attack {
                choice = Some((card.clone(), goblin_id));
                break;
            }
            if choice.is_none() {
                let target = if data.is_offensive() { goblin_id } else { hero_id };
                choice = Some((card.clone(), target));
            }
        }

        let (card, target) = match choice {
            Some((card, target)) => (Some(card), Some(target)),
            None => (None, None),
        };
        encounter.submit_action(card, hero_id, target, &mut host)?;

        let report = match encounter.check_end_of_turn(&mut host)? {
            Some(report) => report,
            None => match encounter.on_timeout(&mut host)? {
                Some(report) => report,
                None => break,
            },
        };
        print!("{}", report.summary);
    }

    println!("Fight over after {} rounds.", encounter.round());
    Ok(())
}
