//! Integration tests for the reference scenario.
//!
//! These tests play short action sequences through the public API and check
//! the resulting state, the invariants after every step, and determinism.
//!
//! Run with: cargo test game_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use civlite::game::{ActionHint, Feature, Outcome, check_invariants, suggest_action};
use civlite::{Action, ActionError, Coord, GameState, Scenario, UnitId};

fn reference() -> GameState {
    Scenario::reference().build().unwrap()
}

/// Apply an action and assert the invariants still hold.
fn apply(state: &mut GameState, action: Action) -> Result<Outcome, ActionError> {
    let result = state.apply(&action);
    let violations = check_invariants(state);
    assert!(violations.is_empty(), "after {action:?}: {violations:?}");
    result
}

fn opening_script() -> Vec<Action> {
    vec![
        Action::Move {
            unit: UnitId(0),
            to: Coord::new(7, 6),
        },
        Action::CaptureVillage {
            unit: UnitId(0),
            at: Coord::new(7, 6),
        },
        Action::BuildFarm {
            at: Coord::new(8, 7),
        },
        Action::Attack {
            attacker: UnitId(2),
            defender: UnitId(1),
        },
        Action::Attack {
            attacker: UnitId(2),
            defender: UnitId(1),
        },
        Action::CaptureCity {
            unit: UnitId(2),
            at: Coord::new(7, 6),
        },
    ]
}

#[test]
fn test_reference_reachable_set() {
    let state = reference();
    let reach = state.compute_reachable(UnitId(0)).unwrap();

    assert_eq!(reach.cost(Coord::new(6, 6)), Some(0.0));
    // Friendly warrior on the mountain blocks
    assert!(!reach.contains(Coord::new(7, 7)));
    // Enemy warrior two steps away is a valid target
    assert_eq!(reach.cost(Coord::new(8, 6)), Some(2.0));
    // The road at (5, 5) does not help a unit that is not standing on a road
    assert_eq!(reach.cost(Coord::new(4, 5)), Some(2.0));
    // Plains then mountain is over budget
    assert!(!reach.contains(Coord::new(6, 4)));
    assert!(reach.tiles().iter().all(|&c| reach.cost(c).unwrap() <= 2.0));
}

#[test]
fn test_road_network_extends_range() {
    let mut state = reference();
    apply(
        &mut state,
        Action::Move {
            unit: UnitId(0),
            to: Coord::new(5, 5),
        },
    )
    .unwrap();

    let reach = state.compute_reachable(UnitId(0)).unwrap();
    // Three road steps at a quarter each
    let cost = reach.cost(Coord::new(2, 2)).unwrap();
    assert!((cost - 1.0).abs() < 1e-9);
    assert_eq!(
        reach.path_to(Coord::new(2, 2)),
        vec![
            Coord::new(4, 5),
            Coord::new(3, 4),
            Coord::new(3, 3),
            Coord::new(2, 2)
        ]
    );
}

#[test]
fn test_opening_playthrough() {
    let mut state = reference();
    let mut messages = Vec::new();
    for action in opening_script() {
        messages.push(apply(&mut state, action).unwrap().message());
    }

    assert_eq!(
        messages,
        vec![
            "You move the Warrior.",
            "You found Rome.",
            "You build a Farm.",
            "Your Warrior attacks the Warrior.",
            "Your Warrior destroys the enemy Warrior.",
            "You capture Rome.",
        ]
    );

    let (id, rome) = state.city_at(Coord::new(7, 6)).unwrap();
    assert_eq!(rome.owner, 1);
    assert_eq!(state.map().tiles_of_city(id).count(), 14);
    assert_eq!(
        state.map().get(Coord::new(8, 7)).unwrap().feature,
        Feature::Farm
    );

    // First exchange leaves both at 1 HP; round(3 * 1/4) = 1 then finishes the defender
    assert!(state.unit(UnitId(1)).is_none());
    let victor = state.unit(UnitId(2)).unwrap();
    assert_eq!(victor.position, Coord::new(7, 7));
    assert_eq!(victor.kills, 1);
    assert_eq!(victor.hp, 1);
    // Advancing onto the mountain widened civ 1's view
    assert!(state.map().get(Coord::new(5, 9)).unwrap().is_discovered_by(1));
}

#[test]
fn test_rejections_do_not_abort_script() {
    let mut state = reference();
    let before = state.clone();

    let err = apply(
        &mut state,
        Action::FoundCity {
            civ: 0,
            at: Coord::new(6, 6),
        },
    )
    .unwrap_err();
    assert_eq!(err, ActionError::NotAVillage(Coord::new(6, 6)));
    assert_eq!(state, before);

    let err = apply(
        &mut state,
        Action::Move {
            unit: UnitId(0),
            to: Coord::new(7, 7),
        },
    )
    .unwrap_err();
    assert_eq!(err, ActionError::NotReachable(Coord::new(7, 7)));
    assert_eq!(state, before);

    apply(
        &mut state,
        Action::Move {
            unit: UnitId(0),
            to: Coord::new(7, 6),
        },
    )
    .unwrap();
    assert_eq!(state.unit(UnitId(0)).unwrap().position, Coord::new(7, 6));
}

#[test]
fn test_second_city_falls_back_to_numbered_name() {
    let mut state = reference();
    state.found_city(0, Coord::new(7, 6)).unwrap();
    let second = state.found_city(0, Coord::new(22, 11)).unwrap();

    assert_eq!(state.city(second).unwrap().name, "TestCiv 2");
    assert!(check_invariants(&state).is_empty());
}

#[test]
fn test_identical_scripts_give_identical_states() {
    let run = || {
        let mut state = reference();
        let outcomes: Vec<_> = opening_script()
            .into_iter()
            .map(|action| state.apply(&action))
            .collect();
        (state, outcomes)
    };

    let (first, first_outcomes) = run();
    let (second, second_outcomes) = run();
    assert_eq!(first, second);
    assert_eq!(first_outcomes, second_outcomes);
}

#[test]
fn test_hints_drive_a_turn() {
    let mut state = reference();
    let village = Coord::new(7, 6);

    let hint = suggest_action(&state, 0, None, Coord::new(6, 6)).unwrap();
    assert_eq!(hint, ActionHint::SelectUnit(UnitId(0)));
    assert_eq!(hint.action(), None);

    let reach = state.compute_reachable(UnitId(0)).unwrap();
    let hint = suggest_action(&state, 0, Some((UnitId(0), &reach)), village).unwrap();
    assert_eq!(hint.label(), "move unit");
    apply(&mut state, hint.action().unwrap()).unwrap();

    let reach = state.compute_reachable(UnitId(0)).unwrap();
    let hint = suggest_action(&state, 0, Some((UnitId(0), &reach)), village).unwrap();
    assert_eq!(
        hint,
        ActionHint::CaptureVillage {
            unit: UnitId(0),
            at: village
        }
    );
    let outcome = apply(&mut state, hint.action().unwrap()).unwrap();
    assert_eq!(outcome.message(), "You found Rome.");

    // The enemy warrior is now adjacent and reachable
    let hint = suggest_action(&state, 0, Some((UnitId(0), &reach)), Coord::new(8, 6)).unwrap();
    assert_eq!(
        hint,
        ActionHint::Attack {
            attacker: UnitId(0),
            defender: UnitId(2)
        }
    );
}
