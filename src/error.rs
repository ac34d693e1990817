//! Error types for game actions.

use thiserror::Error;

use crate::game::{CivId, Coord, UnitId};

/// Why an action was declined.
///
/// Every variant is a precondition violation. An action that returns one of
/// these has not touched the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No active unit has this id (never existed, or destroyed in combat).
    #[error("unknown unit {0:?}")]
    UnknownUnit(UnitId),
    /// No civilization is registered with this id.
    #[error("unknown civilization {0}")]
    UnknownCiv(CivId),
    /// The coordinate lies outside the map.
    #[error("coordinate {0} is outside the map")]
    OutOfBounds(Coord),
    /// Only villages can be turned into cities.
    #[error("tile {0} is not a village")]
    NotAVillage(Coord),
    /// Only city centers can be captured.
    #[error("tile {0} is not a city")]
    NotACity(Coord),
    /// The tile is not inside any city's territory.
    #[error("tile {0} is not claimed by any city")]
    NoOwningCity(Coord),
    /// A city center cannot be converted into a farm.
    #[error("tile {0} is a city center")]
    CityCenter(Coord),
    /// The capturing civilization already owns the city.
    #[error("civilization {civ} already owns the city at {at}")]
    AlreadyOwner {
        /// City center coordinate.
        at: Coord,
        /// The would-be capturer.
        civ: CivId,
    },
    /// The destination is not in the unit's reachable set.
    #[error("tile {0} is not reachable")]
    NotReachable(Coord),
    /// The reachable set was computed for another unit or another origin.
    #[error("reachable set for {unit:?} was computed from {origin}, not the unit's position")]
    StaleReachable {
        /// Unit the move was requested for.
        unit: UnitId,
        /// Origin the reachable set was computed from.
        origin: Coord,
    },
    /// Another unit already stands on the destination.
    #[error("tile {0} is occupied")]
    Occupied(Coord),
    /// A unit cannot fight itself.
    #[error("unit {0:?} cannot attack itself")]
    SelfAttack(UnitId),
}

/// Result type for game actions.
pub type ActionResult<T> = Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::NotAVillage(Coord::new(3, 4));
        assert_eq!(err.to_string(), "tile (3, 4) is not a village");

        let err = ActionError::AlreadyOwner {
            at: Coord::new(1, 2),
            civ: 0,
        };
        assert!(err.to_string().contains("already owns"));
    }
}
