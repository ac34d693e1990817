#![no_main]

//! Action script fuzzer.
//!
//! Applies arbitrary actions to the reference scenario and checks that:
//! 1. Rejected actions leave the state untouched
//! 2. Invariants hold after every action
//! 3. Replaying the same script gives the same state

use arbitrary::Arbitrary;
use civlite::game::check_invariants;
use civlite::{Action, Coord, GameState, Scenario, UnitId};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated action. Coordinates may fall off the map.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    Move { unit: u8, x: u8, y: u8 },
    Attack { attacker: u8, defender: u8 },
    FoundCity { civ: u8, x: u8, y: u8 },
    CaptureVillage { unit: u8, x: u8, y: u8 },
    CaptureCity { unit: u8, x: u8, y: u8 },
    BuildFarm { x: u8, y: u8 },
}

impl FuzzAction {
    fn action(self) -> Action {
        let at = |x: u8, y: u8| Coord::new(u16::from(x % 40), u16::from(y % 20));
        let unit = |id: u8| UnitId(u32::from(id % 5));
        match self {
            FuzzAction::Move { unit: u, x, y } => Action::Move {
                unit: unit(u),
                to: at(x, y),
            },
            FuzzAction::Attack { attacker, defender } => Action::Attack {
                attacker: unit(attacker),
                defender: unit(defender),
            },
            FuzzAction::FoundCity { civ, x, y } => Action::FoundCity {
                civ: civ % 3,
                at: at(x, y),
            },
            FuzzAction::CaptureVillage { unit: u, x, y } => Action::CaptureVillage {
                unit: unit(u),
                at: at(x, y),
            },
            FuzzAction::CaptureCity { unit: u, x, y } => Action::CaptureCity {
                unit: unit(u),
                at: at(x, y),
            },
            FuzzAction::BuildFarm { x, y } => Action::BuildFarm { at: at(x, y) },
        }
    }
}

fn play(script: &[Action]) -> GameState {
    let mut state = match Scenario::reference().build() {
        Ok(s) => s,
        Err(e) => panic!("reference scenario failed to build: {e}"),
    };

    for (step, action) in script.iter().enumerate() {
        let before = state.clone();
        if state.apply(action).is_err() {
            assert_eq!(state, before, "rejected step {step} {action:?} mutated state");
        }
        let violations = check_invariants(&state);
        assert!(
            violations.is_empty(),
            "Invariants violated after step {step} {action:?}: {violations:?}"
        );
    }
    state
}

fuzz_target!(|input: Vec<FuzzAction>| {
    // Cap length to keep iterations fast
    let script: Vec<Action> = input.into_iter().take(64).map(FuzzAction::action).collect();

    let first = play(&script);
    let second = play(&script);
    assert_eq!(first, second, "same script gave different states");
});
