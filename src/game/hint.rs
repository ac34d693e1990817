//! Context-sensitive action suggestions.
//!
//! [`suggest_action`] answers "what would confirming here do?" for a viewer
//! with an optional selected unit and a cursor. It never mutates state; the
//! hint can be turned into an [`Action`] and applied.

use crate::game::{CivId, Coord, Feature, GameState, Reachable, UnitId};
use crate::scenario::Action;

/// The action a confirm press would trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionHint {
    /// Select the viewer's unit under the cursor.
    SelectUnit(UnitId),
    /// Turn the village under the selected unit into a city.
    CaptureVillage {
        /// The selected unit.
        unit: UnitId,
        /// The village.
        at: Coord,
    },
    /// Take the enemy city under the selected unit.
    CaptureCity {
        /// The selected unit.
        unit: UnitId,
        /// The city center.
        at: Coord,
    },
    /// Move the selected unit to the cursor.
    Move {
        /// The selected unit.
        unit: UnitId,
        /// Destination.
        to: Coord,
    },
    /// Attack the enemy unit under the cursor.
    Attack {
        /// The selected unit.
        attacker: UnitId,
        /// The unit under the cursor.
        defender: UnitId,
    },
    /// Build a farm on the crop under the cursor.
    BuildFarm(Coord),
    /// Drop the selection.
    Unselect,
}

impl ActionHint {
    /// Short help text for the confirm key.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ActionHint::SelectUnit(_) => "select unit",
            ActionHint::CaptureVillage { .. } => "capture village",
            ActionHint::CaptureCity { .. } => "capture city",
            ActionHint::Move { .. } => "move unit",
            ActionHint::Attack { .. } => "attack",
            ActionHint::BuildFarm(_) => "build farm",
            ActionHint::Unselect => "unselect unit",
        }
    }

    /// The state-changing action behind this hint. Selection changes have none.
    #[must_use]
    pub const fn action(self) -> Option<Action> {
        match self {
            ActionHint::SelectUnit(_) | ActionHint::Unselect => None,
            ActionHint::CaptureVillage { unit, at } => Some(Action::CaptureVillage { unit, at }),
            ActionHint::CaptureCity { unit, at } => Some(Action::CaptureCity { unit, at }),
            ActionHint::Move { unit, to } => Some(Action::Move { unit, to }),
            ActionHint::Attack { attacker, defender } => {
                Some(Action::Attack { attacker, defender })
            }
            ActionHint::BuildFarm(at) => Some(Action::BuildFarm { at }),
        }
    }
}

/// Suggest the action for a cursor position.
///
/// `selection` is the selected unit together with its reachable set. Returns
/// `None` when confirming would do nothing at all.
#[must_use]
pub fn suggest_action(
    state: &GameState,
    viewer: CivId,
    selection: Option<(UnitId, &Reachable)>,
    cursor: Coord,
) -> Option<ActionHint> {
    let tile = state.map.get(cursor)?;

    let Some((selected, reachable)) = selection else {
        if !tile.is_discovered_by(viewer) {
            return None;
        }
        if let Some(unit) = state.unit_at(cursor).filter(|u| u.owner == viewer) {
            return Some(ActionHint::SelectUnit(unit.id));
        }
        let own_city = state
            .city_at(cursor)
            .is_some_and(|(_, city)| city.owner == viewer);
        return (tile.feature == Feature::Crop && own_city).then_some(ActionHint::BuildFarm(cursor));
    };

    let Some(unit) = state.unit(selected) else {
        return Some(ActionHint::Unselect);
    };

    if cursor == unit.position {
        return Some(match tile.feature {
            Feature::Village => ActionHint::CaptureVillage {
                unit: selected,
                at: cursor,
            },
            Feature::City
                if state
                    .city_at(cursor)
                    .is_some_and(|(_, city)| city.owner != unit.owner) =>
            {
                ActionHint::CaptureCity {
                    unit: selected,
                    at: cursor,
                }
            }
            _ => ActionHint::Unselect,
        });
    }

    if !reachable.contains(cursor) {
        return Some(ActionHint::Unselect);
    }
    Some(match state.unit_at(cursor) {
        None => ActionHint::Move {
            unit: selected,
            to: cursor,
        },
        Some(other) if other.owner != unit.owner => ActionHint::Attack {
            attacker: selected,
            defender: other.id,
        },
        Some(_) => ActionHint::Unselect,
    })
}
