//! Game invariants - sanity checks that detect bugs.
//!
//! No sequence of accepted actions should ever trigger these. They run after
//! every step in the integration tests and the fuzz target.

use std::collections::BTreeMap;

use crate::game::{CivMask, Coord, Feature, GameState};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let mut registered = CivMask::empty();
    for civ in state.civs() {
        registered.insert(civ.id);
    }

    for (coord, tile) in state.map.iter() {
        match tile.city {
            Some(id) => match state.city(id) {
                None => violations.push(violation(format!(
                    "Tile {coord} references unknown city {id:?}"
                ))),
                Some(city) if tile.feature == Feature::City && city.position != coord => {
                    violations.push(violation(format!(
                        "City tile {coord} belongs to {} centered at {}",
                        city.name, city.position
                    )));
                }
                Some(_) => {}
            },
            None if tile.feature == Feature::City => {
                violations.push(violation(format!("City tile {coord} has no city")));
            }
            None => {}
        }

        for civ in tile.discovered_by.iter() {
            if !registered.contains(civ) {
                violations.push(violation(format!(
                    "Tile {coord} discovered by unregistered civ {civ}"
                )));
            }
        }
    }

    for (id, city) in state.cities() {
        if state.civ(city.owner).is_none() {
            violations.push(violation(format!(
                "City {} owned by unknown civ {}",
                city.name, city.owner
            )));
        }
        let center = state.map.get(city.position);
        if center.is_none_or(|tile| tile.city != Some(id) || tile.feature != Feature::City) {
            violations.push(violation(format!(
                "City {} center {} is not its own city tile",
                city.name, city.position
            )));
        }
    }

    let mut occupied: BTreeMap<Coord, usize> = BTreeMap::new();
    for unit in state.units() {
        if !unit.is_alive() {
            violations.push(violation(format!(
                "Unit {:?} is active with {} HP",
                unit.id, unit.hp
            )));
        }
        if state.civ(unit.owner).is_none() {
            violations.push(violation(format!(
                "Unit {:?} owned by unknown civ {}",
                unit.id, unit.owner
            )));
        }
        if !state.map.in_bounds(unit.position) {
            violations.push(violation(format!(
                "Unit {:?} is outside the map at {}",
                unit.id, unit.position
            )));
        }
        *occupied.entry(unit.position).or_default() += 1;
    }

    for (coord, count) in occupied {
        if count > 1 {
            violations.push(violation(format!("{count} units share tile {coord}")));
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
