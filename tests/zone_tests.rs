//! Card zone tests.
//!
//! These tests check that zone operations never duplicate or lose cards
//! and that drawing through an empty deck reshuffles exactly once.

use std::collections::BTreeMap;

use ccg_combat::cards::{CardCatalog, CardKey};
use ccg_combat::combatant::Combatant;
use ccg_combat::core::{CombatantId, EngineConfig};
use ccg_combat::zones::Zone;
use proptest::prelude::*;

const CARDS: &str = r#"
[Test.Common.Jab]
Type = "Attack"
Damage = 2

[Test.Common.Guard]
Type = "Defend"
Defense = 2

[Test.Common.Shield]
Type = "Armor"
Strength = 1

[Test.Common.Helm]
Type = "Armor"
Health = 2

[Test.Common.Spark]
Type = "Attack"
Damage = 1

[Test.Common.Salve]
Type = "Heal"
Amount = 2

[Test.Common.Poultice]
Type = "Heal"
Amount = 3
"#;

const NAMES: [&str; 5] = [
    "Test_Common_Jab",
    "Test_Common_Guard",
    "Test_Common_Shield",
    "Test_Common_Helm",
    "Test_Common_Spark",
];

fn key(s: &str) -> CardKey {
    s.parse().unwrap()
}

fn fighter(deck: &[usize]) -> Combatant {
    Combatant::player(CombatantId::new(1), "Tester", &EngineConfig::default())
        .with_deck(deck.iter().map(|&i| key(NAMES[i])))
}

fn multiset(combatant: &Combatant) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for zone in Zone::ALL {
        for card in combatant.zones().pile(zone) {
            *counts.entry(card.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

#[derive(Clone, Debug)]
enum Op {
    Draw(usize),
    Play(usize),
    Discard(usize),
    LeavePlay(usize),
    Create(usize),
    Remove(usize),
    Shuffle(bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..6).prop_map(Op::Draw),
        (0usize..6).prop_map(Op::Play),
        (0usize..6).prop_map(Op::Discard),
        (0usize..3).prop_map(Op::LeavePlay),
        (0usize..5).prop_map(Op::Create),
        (0usize..5).prop_map(Op::Remove),
        any::<bool>().prop_map(Op::Shuffle),
    ]
}

/// Drawing past the end of the deck folds the discard pile back in.
#[test]
fn test_draw_reshuffles_discard() {
    let mut combatant = fighter(&[0, 1]);
    combatant
        .zones_mut()
        .extend(Zone::Discard, [key(NAMES[2]), key(NAMES[3]), key(NAMES[4])]);

    let outcome = combatant.draw(4);
    assert_eq!(outcome.drawn, 4);
    assert!(outcome.reshuffled);
    assert_eq!(combatant.hand().len(), 4);
    assert_eq!(combatant.zones().len(Zone::Deck), 1);
    assert_eq!(combatant.zones().len(Zone::Discard), 0);
}

/// With nothing left anywhere the draw stops short.
#[test]
fn test_draw_stops_when_exhausted() {
    let mut combatant = fighter(&[0]);
    let outcome = combatant.draw(3);
    assert_eq!(outcome.drawn, 1);
    assert!(!outcome.reshuffled);
}

/// Heal cards stay in play, and a second one replaces the first.
#[test]
fn test_heal_stays_in_play() {
    let catalog = CardCatalog::from_toml_str(CARDS).unwrap();
    let mut combatant = Combatant::player(CombatantId::new(1), "Tester", &EngineConfig::default())
        .with_deck([key("Test_Common_Salve"), key("Test_Common_Poultice")]);
    combatant.draw(2);

    combatant.play(0, &catalog).unwrap();
    assert_eq!(combatant.in_play(), &[key("Test_Common_Salve")]);
    assert_eq!(combatant.zones().len(Zone::Discard), 0);

    combatant.play(0, &catalog).unwrap();
    assert_eq!(combatant.in_play(), &[key("Test_Common_Poultice")]);
    assert_eq!(combatant.zones().pile(Zone::Discard), &[key("Test_Common_Salve")]);
}

/// Equal seeds give equal shuffles.
#[test]
fn test_shuffle_reproducible() {
    let deck = [0, 1, 2, 3, 4, 0, 1, 2, 3, 4];
    let mut a = fighter(&deck);
    let mut b = fighter(&deck);
    a.shuffle(false);
    b.shuffle(false);
    assert_eq!(a.deck(), b.deck());
}

proptest! {
    /// Cards only appear through `create_cards` and only vanish through
    /// `remove_card`; every other operation moves them between piles.
    #[test]
    fn prop_zone_conservation(
        deck in proptest::collection::vec(0usize..5, 0..12),
        ops in proptest::collection::vec(op(), 0..40),
    ) {
        let catalog = CardCatalog::from_toml_str(CARDS).unwrap();
        let mut combatant = fighter(&deck);
        let mut expected = multiset(&combatant);

        for op in ops {
            match op {
                Op::Draw(n) => {
                    combatant.draw(n);
                }
                Op::Play(i) => {
                    let _ = combatant.play(i, &catalog);
                }
                Op::Discard(i) => {
                    let _ = combatant.discard(i);
                }
                Op::LeavePlay(i) => {
                    let _ = combatant.leave_play(i, &catalog);
                }
                Op::Create(i) => {
                    combatant.create_cards(&[key(NAMES[i])], &catalog).unwrap();
                    *expected.entry(NAMES[i].to_string()).or_insert(0) += 1;
                }
                Op::Remove(i) => {
                    if combatant.remove_card(&key(NAMES[i])).is_ok() {
                        let count = expected.get_mut(NAMES[i]).unwrap();
                        *count -= 1;
                        if *count == 0 {
                            expected.remove(NAMES[i]);
                        }
                    }
                }
                Op::Shuffle(include_discard) => combatant.shuffle(include_discard),
            }
            prop_assert_eq!(&multiset(&combatant), &expected);
        }

        // At most one armor card is ever in play.
        prop_assert!(combatant.in_play().len() <= 1);
    }

    /// Drawing `n` yields min(n, deck + discard) cards and reshuffles only
    /// when the deck runs out with cards waiting in the discard pile.
    #[test]
    fn prop_draw_reshuffle(
        deck_len in 0usize..6,
        discard_len in 0usize..6,
        n in 0usize..12,
    ) {
        let mut combatant = fighter(&vec![0; deck_len]);
        combatant.zones_mut().extend(Zone::Discard, vec![key(NAMES[1]); discard_len]);

        let outcome = combatant.draw(n);
        prop_assert_eq!(outcome.drawn, n.min(deck_len + discard_len));
        prop_assert_eq!(outcome.reshuffled, n > deck_len && discard_len > 0);
        prop_assert_eq!(combatant.hand().len(), outcome.drawn);
    }
}
