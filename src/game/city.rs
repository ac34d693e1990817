//! Cities.

use serde::{Deserialize, Serialize};

use crate::game::{CivId, Coord};

/// Unique identifier for a city: its index in the city registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(pub u32);

/// A settled claim on a tile.
///
/// Cities are never destroyed; capture only changes `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    /// Display name.
    pub name: String,
    /// Population. Not simulated beyond founding.
    pub population: u32,
    /// Owning civilization.
    pub owner: CivId,
    /// City center.
    pub position: Coord,
}

impl City {
    /// Found a new city of population 1.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: CivId, position: Coord) -> Self {
        Self {
            name: name.into(),
            population: 1,
            owner,
            position,
        }
    }

    /// Check whether `coord` is this city's center.
    #[must_use]
    pub fn is_center(&self, coord: Coord) -> bool {
        self.position == coord
    }
}
