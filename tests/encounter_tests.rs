//! Turn engine tests.
//!
//! These tests drive `Encounter` through whole rounds with a recording
//! host and check resolution order, gating, autonomous play, teardown and
//! persistence.

mod common;

use std::sync::Arc;

use ccg_combat::cards::Stat;
use ccg_combat::core::{CombatError, EncounterId, EngineConfig};
use ccg_combat::encounter::{Action, Departure, Encounter, EncounterSnapshot};
use rstest::rstest;

use common::{card, catalog, goblin, id, player, Recorder};

fn encounter() -> Encounter {
    Encounter::new(EncounterId::new(1), catalog(), EngineConfig::default())
}

/// A Defend lands before any attack in the same round, whatever order
/// the two were submitted or joined in.
#[rstest]
fn test_defend_resolves_before_attack(
    #[values(true, false)] attacker_joins_first: bool,
    #[values(true, false)] attacker_submits_first: bool,
) {
    let catalog = catalog();
    let mut host = Recorder::new();

    let attacker = player(1, "Attacker", &["Strike"]);
    let mut target = player(2, "Target", &["Ward", "Vigor"]);
    target.recalculate(&catalog).unwrap();
    target.modify(Stat::Strength, -10, false);
    assert_eq!(target.defense(&catalog).unwrap(), 0);
    assert_eq!(target.get_stat(Stat::Health).current, 20);

    let mut encounter = Encounter::new(EncounterId::new(1), Arc::clone(&catalog), EngineConfig::default());
    if attacker_joins_first {
        encounter.add_combatant(attacker, &mut host).unwrap();
        encounter.add_combatant(target, &mut host).unwrap();
    } else {
        encounter.add_combatant(target, &mut host).unwrap();
        encounter.add_combatant(attacker, &mut host).unwrap();
    }

    let strike = Action::play(card("Strike"), id(1), [id(2)]);
    let ward = Action::play(card("Ward"), id(2), [id(2)]);
    let order = if attacker_submits_first { [strike, ward] } else { [ward, strike] };
    for action in order {
        assert!(encounter
            .submit_action(action.card, action.actor, action.targets, &mut host)
            .unwrap());
    }

    let report = encounter.check_end_of_turn(&mut host).unwrap().unwrap();
    assert_eq!(encounter.get_stat(id(2), Stat::Health).unwrap().current, 10);
    assert!(report.summary.contains("Target played Ward targeting Target.\n"));
    assert!(report.summary.contains("Attacker attacks Target with Strike for 10 damage.\n"));
    assert!(report.defeated.is_empty());
    assert!(!report.ended);
}

/// When two Defends cover the same target and stat, the first one in
/// membership order is the one that counts.
#[test]
fn test_first_defend_wins() {
    let catalog = catalog();
    let mut host = Recorder::new();

    let mut ally = player(1, "Ally", &["Ward"]);
    ally.modify(Stat::Reflexes, -5, false);
    let attacker = player(2, "Attacker", &["Strike"]);
    let mut target = player(3, "Target", &["Ward", "Vigor"]);
    target.recalculate(&catalog).unwrap();
    target.modify(Stat::Strength, -10, false);

    let mut encounter = Encounter::new(EncounterId::new(1), catalog, EngineConfig::default());
    for c in [ally, attacker, target] {
        encounter.add_combatant(c, &mut host).unwrap();
    }

    encounter.submit_action(Some(card("Ward")), id(3), [id(3)], &mut host).unwrap();
    encounter.submit_action(Some(card("Strike")), id(2), [id(3)], &mut host).unwrap();
    encounter.submit_action(Some(card("Ward")), id(1), [id(3)], &mut host).unwrap();
    let report = encounter.check_end_of_turn(&mut host).unwrap().unwrap();

    // Ally's Ward (5) was staged first; Target's own Ward (10) is ignored.
    assert!(report.summary.contains("Attacker attacks Target with Strike for 15 damage.\n"));
    assert_eq!(encounter.get_stat(id(3), Stat::Health).unwrap().current, 5);
}

/// An attack that needs a weapon does nothing without one.
#[test]
fn test_requires_without_weapon() {
    let mut host = Recorder::new();
    let mut encounter = encounter();
    encounter.add_combatant(player(1, "Attacker", &["Slash"]), &mut host).unwrap();
    encounter.add_combatant(player(2, "Target", &["Tap"]), &mut host).unwrap();

    encounter.submit_action(Some(card("Slash")), id(1), [id(2)], &mut host).unwrap();
    encounter.submit_action(None, id(2), [], &mut host).unwrap();
    let report = encounter.check_end_of_turn(&mut host).unwrap().unwrap();

    assert!(report.summary.contains("Attacker played an unplayable card.\n"));
    assert!(report.summary.contains("Target played nothing.\n"));
    assert_eq!(encounter.get_stat(id(2), Stat::Health).unwrap().current, 10);
    assert!(!encounter.is_ended());
}

/// With the weapon in play the attack is multiplied, and a knockout ends
/// a two-member encounter.
#[test]
fn test_requires_with_weapon_and_knockout() {
    let catalog = catalog();
    let mut host = Recorder::new();

    let mut attacker = player(1, "Attacker", &["Slash"]).with_equipped([card("Blade")]);
    attacker.equip_all(&catalog).unwrap();
    assert_eq!(attacker.in_play(), &[card("Blade")]);

    let mut encounter = Encounter::new(EncounterId::new(1), catalog, EngineConfig::default());
    encounter.add_combatant(attacker, &mut host).unwrap();
    encounter.add_combatant(player(2, "Target", &["Tap"]), &mut host).unwrap();

    encounter.submit_action(Some(card("Slash")), id(1), [id(2)], &mut host).unwrap();
    encounter.submit_action(None, id(2), [], &mut host).unwrap();
    let report = encounter.check_end_of_turn(&mut host).unwrap().unwrap();

    // 20 * 1.5 = 30, less the target's defense of 1.
    assert!(report.summary.contains("Attacker attacks Target with Slash for 29 damage.\n"));
    assert_eq!(report.defeated, vec![id(2)]);
    assert!(report.ended);
    assert!(encounter.is_ended());
    assert!(encounter.is_empty());

    assert_eq!(host.defeated, vec![id(2)]);
    assert_eq!(
        host.departed,
        vec![(id(2), Departure::Defeated), (id(1), Departure::EncounterEnded)]
    );
    assert!(host.received(id(1), "COMBAT: Target is knocked out."));
    assert!(host.received(id(1), "Combat has ended"));
}

/// Resolution happens exactly when everyone has acted, and a second
/// submission changes nothing.
#[test]
fn test_turn_gating() {
    let mut host = Recorder::new();
    let mut encounter = encounter();
    for (n, name) in [(1, "A"), (2, "B"), (3, "C")] {
        encounter.add_combatant(player(n, name, &["Tap"]), &mut host).unwrap();
    }

    assert!(encounter.submit_action(Some(card("Tap")), id(1), [id(2)], &mut host).unwrap());
    assert!(encounter.check_end_of_turn(&mut host).unwrap().is_none());
    assert!(encounter.submit_action(Some(card("Tap")), id(2), [id(3)], &mut host).unwrap());
    assert!(encounter.check_end_of_turn(&mut host).unwrap().is_none());

    let before = encounter.pending_action(id(2)).cloned();
    assert!(!encounter.submit_action(None, id(2), [], &mut host).unwrap());
    assert_eq!(encounter.pending_action(id(2)).cloned(), before);
    assert_eq!(encounter.action_count(id(2)), Some(1));
    assert_eq!(encounter.round(), 0);

    assert!(encounter.submit_action(None, id(3), [], &mut host).unwrap());
    let report = encounter.check_end_of_turn(&mut host).unwrap().unwrap();
    assert_eq!(report.round, 1);
    assert_eq!(encounter.round(), 1);
    for n in 1..=3 {
        assert_eq!(encounter.action_count(id(n)), Some(0));
    }
    assert!(host.received(id(1), "Next turn begins ..."));
}

#[test]
fn test_submission_rejections() {
    let mut host = Recorder::new();
    let mut encounter = encounter();
    encounter.add_combatant(player(1, "A", &["Tap"]), &mut host).unwrap();
    encounter.add_combatant(player(2, "B", &["Tap"]), &mut host).unwrap();

    // Not a member.
    assert!(!encounter.submit_action(None, id(9), [], &mut host).unwrap());

    // A card the catalog does not know is a data error.
    let err = encounter
        .submit_action(Some(card("Nope")), id(1), [id(2)], &mut host)
        .unwrap_err();
    assert_eq!(err, CombatError::UnknownCard("Test_Common_Nope".into()));
    assert_eq!(encounter.action_count(id(1)), Some(0));

    // A second submission is turned away before its card is looked up.
    assert!(encounter.submit_action(None, id(1), [], &mut host).unwrap());
    assert!(!encounter
        .submit_action(Some(card("Nope")), id(1), [id(2)], &mut host)
        .unwrap());
    assert_eq!(encounter.action_count(id(1)), Some(1));

    encounter.remove_combatant(id(2), &mut host);
    assert!(encounter.is_ended());
    assert!(!encounter.submit_action(None, id(1), [], &mut host).unwrap());
}

/// An autonomous combatant joining a fight picks its action at once, and
/// only once per round.
#[test]
fn test_autonomous_cascade() {
    let mut host = Recorder::new();
    let mut encounter = encounter();
    encounter.add_combatant(player(1, "A", &["Tap"]), &mut host).unwrap();
    encounter.add_combatant(player(2, "B", &["Tap"]), &mut host).unwrap();
    encounter.add_combatant(goblin(3, &["Tap", "Tap", "Tap", "Tap"]), &mut host).unwrap();

    assert_eq!(host.autonomous_requests, vec![id(3)]);
    assert_eq!(encounter.action_count(id(3)), Some(1));
    let action = encounter.pending_action(id(3)).unwrap();
    assert_eq!(action.card, Some(card("Tap")));
    assert_eq!(action.targets.as_slice(), &[id(1)]);
    assert!(encounter.end_check_requested());
    assert!(!host.received(id(1), "Goblin going."));

    encounter.submit_action(None, id(1), [], &mut host).unwrap();
    assert_eq!(host.autonomous_requests.len(), 1);
    encounter.submit_action(None, id(2), [], &mut host).unwrap();
    encounter.check_end_of_turn(&mut host).unwrap().unwrap();

    // Next round: the goblin acts again on its own.
    assert_eq!(host.autonomous_requests, vec![id(3), id(3)]);
    assert_eq!(encounter.action_count(id(3)), Some(1));
    assert!(host.received(id(1), "Goblin going."));
}

/// A goblin in a party treats its party mates as friends.
#[test]
fn test_groups_follow_parties() {
    let mut host = Recorder::new();
    let party = host.roster.create(id(1)).unwrap();
    assert!(host.roster.add_member(party, id(2)));

    let mut encounter = encounter();
    encounter.add_combatant(player(1, "A", &["Tap"]), &mut host).unwrap();
    encounter.add_combatant(player(2, "B", &["Tap"]), &mut host).unwrap();
    encounter.add_combatant(player(3, "C", &["Tap"]), &mut host).unwrap();

    let groups = encounter.groups_for(id(2), &host).unwrap();
    assert_eq!(groups.friends.as_slice(), &[id(1), id(2)]);
    assert_eq!(groups.foes.as_slice(), &[id(3)]);
    assert!(encounter.groups_for(id(9), &host).is_none());
}

/// Buffs wear off and debuffs without a duration stay. Heals clamp at max
/// and the card stays in play.
#[test]
fn test_stat_effects_and_heal() {
    let mut host = Recorder::new();
    let mut encounter = encounter();
    encounter.add_combatant(player(1, "Alice", &["Rally", "Hex", "Mend"]), &mut host).unwrap();
    encounter.add_combatant(player(2, "Bob", &["Tap"]), &mut host).unwrap();

    // Round 1: +5 Strength for two rounds.
    encounter.submit_action(Some(card("Rally")), id(1), [id(1)], &mut host).unwrap();
    encounter.submit_action(None, id(2), [], &mut host).unwrap();
    encounter.check_end_of_turn(&mut host).unwrap().unwrap();
    assert_eq!(encounter.get_stat(id(1), Stat::Strength).unwrap().current, 15);

    // Round 2: Bob loses 3 Reflexes for good; Bob taps Alice for 2 - 1.
    encounter.submit_action(Some(card("Hex")), id(1), [id(2)], &mut host).unwrap();
    encounter.submit_action(Some(card("Tap")), id(2), [id(1)], &mut host).unwrap();
    let report = encounter.check_end_of_turn(&mut host).unwrap().unwrap();
    assert!(report.summary.contains("Alice played Hex targeting Bob.\n"));
    assert!(report.summary.contains("Bob attacks Alice with Tap for 1 damage.\n"));
    assert_eq!(encounter.get_stat(id(2), Stat::Reflexes).unwrap().current, 7);
    assert_eq!(encounter.get_stat(id(1), Stat::Strength).unwrap().current, 10);
    assert_eq!(encounter.get_stat(id(1), Stat::Health).unwrap().current, 9);

    // Round 3: heal 4, clamped to 10.
    encounter.submit_action(Some(card("Mend")), id(1), [id(1)], &mut host).unwrap();
    encounter.submit_action(None, id(2), [], &mut host).unwrap();
    encounter.check_end_of_turn(&mut host).unwrap().unwrap();
    assert_eq!(encounter.get_stat(id(1), Stat::Health).unwrap().current, 10);
    assert_eq!(encounter.combatant(id(1)).unwrap().in_play(), &[card("Mend")]);

    // Leaving reverses the debuff.
    let bob = encounter.remove_combatant(id(2), &mut host).unwrap();
    assert_eq!(bob.get_stat(Stat::Reflexes).current, 10);
    assert!(bob.effects().is_empty());
}

/// Membership dropping below two ends the encounter, never earlier.
#[rstest]
#[case::two_members(2)]
#[case::three_members(3)]
#[case::four_members(4)]
fn test_teardown(#[case] members: u64) {
    let mut host = Recorder::new();
    let mut encounter = encounter();
    for n in 1..=members {
        encounter.add_combatant(player(n, "P", &["Tap"]), &mut host).unwrap();
    }

    for n in 1..members {
        assert!(!encounter.is_ended());
        let removed = encounter.remove_combatant(id(n), &mut host).unwrap();
        assert_eq!(removed.id(), id(n));
    }

    assert!(encounter.is_ended());
    assert_eq!(host.departed, vec![(id(members), Departure::EncounterEnded)]);
    assert!(host.received(id(members), "Combat has ended"));
    assert!(encounter.remove_combatant(id(members), &mut host).is_none());
}

/// A player who stays disconnected is made to flee once the counter
/// passes the threshold.
#[test]
fn test_disconnected_player_flees() {
    let mut host = Recorder::new();
    let mut encounter = encounter();
    encounter.add_combatant(player(1, "A", &["Tap"]), &mut host).unwrap();
    encounter.add_combatant(player(2, "B", &["Tap"]), &mut host).unwrap();
    assert!(encounter.set_connected(id(2), false));

    for round in 1..=3 {
        encounter.submit_action(None, id(1), [], &mut host).unwrap();
        assert!(encounter.check_end_of_turn(&mut host).unwrap().is_none());
        let report = encounter.on_timeout(&mut host).unwrap().unwrap();
        assert!(report.fled.is_empty());
        assert_eq!(encounter.disconnected_turns(id(2)), Some(round));
    }

    encounter.submit_action(None, id(1), [], &mut host).unwrap();
    let report = encounter.on_timeout(&mut host).unwrap().unwrap();
    assert_eq!(report.fled, vec![id(2)]);
    assert!(report.ended);
    assert_eq!(
        host.departed,
        vec![(id(2), Departure::Fled), (id(1), Departure::EncounterEnded)]
    );
    assert!(host.received(id(1), "Turn timer timed out. Continuing."));
}

/// A restored encounter carries the same state and plays on identically.
#[test]
fn test_snapshot_round_trip() {
    let catalog = catalog();
    let config = EngineConfig::default().with_seed(11);
    let mut host = Recorder::new();

    let hero = ccg_combat::combatant::Combatant::player(id(1), "Hero", &config)
        .with_deck(["Tap", "Ward", "Tap", "Strike", "Ward", "Tap"].map(card));
    let goblin = ccg_combat::combatant::Combatant::autonomous(id(2), "Goblin", &config)
        .with_deck(["Tap", "Tap", "Tap", "Tap", "Tap"].map(card));

    let mut original = Encounter::new(EncounterId::new(5), Arc::clone(&catalog), config);
    original.add_combatant(hero, &mut host).unwrap();
    original.add_combatant(goblin, &mut host).unwrap();
    original.submit_action(Some(card("Tap")), id(1), [id(2)], &mut host).unwrap();

    let bytes = original.snapshot().to_bytes().unwrap();
    let snapshot = EncounterSnapshot::from_bytes(&bytes).unwrap();
    assert_eq!(snapshot.members().collect::<Vec<_>>(), vec![id(1), id(2)]);
    assert_eq!(snapshot.action_counts().collect::<Vec<_>>(), vec![(id(1), 1), (id(2), 1)]);

    let mut restored = Encounter::restore(snapshot, catalog);
    assert_eq!(restored.id(), original.id());
    assert_eq!(restored.round(), original.round());
    assert_eq!(restored.pending_action(id(1)), original.pending_action(id(1)));
    assert_eq!(restored.pending_action(id(2)), original.pending_action(id(2)));
    assert_eq!(restored.end_check_requested(), original.end_check_requested());

    let mut other_host = Recorder::new();
    for _ in 0..3 {
        let a = original.on_timeout(&mut host).unwrap().unwrap();
        let b = restored.on_timeout(&mut other_host).unwrap().unwrap();
        assert_eq!(a, b);
        for n in 1..=2 {
            assert_eq!(
                original.combatant(id(n)).map(|c| c.zones().clone()),
                restored.combatant(id(n)).map(|c| c.zones().clone())
            );
            assert_eq!(original.get_stat(id(n), Stat::Health), restored.get_stat(id(n), Stat::Health));
        }
    }
    assert_eq!(original.results(), restored.results());
}

#[test]
fn test_action_serializes_as_card_string() {
    let action = Action::play(card("Strike"), id(1), [id(2)]);
    let json = serde_json::to_value(&action).unwrap();
    assert_eq!(json["card"], "Test_Common_Strike");
    let back: Action = serde_json::from_value(json).unwrap();
    assert_eq!(back, action);
}
