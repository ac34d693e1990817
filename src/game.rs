//! Game layer for civlite.
//!
//! Implements the turn-based rules on a square tile grid:
//! - Map with terrain, features, roads, territory and per-civ discovery
//! - Civilizations, units and cities held in id-keyed registries
//! - Budget-bounded movement search with path reconstruction
//! - Combat, fog of war and city territory
//! - Read-only descriptions and action hints for a viewing civilization

mod city;
mod civ;
mod combat;
mod describe;
mod hint;
mod invariants;
mod map;
mod movement;
mod state;
mod territory;
mod unit;
mod vision;

pub use city::{City, CityId};
pub use civ::{CivId, CivStyle, Civilization, Rgb};
pub use combat::{CombatOutcome, resolve_combat};
pub use describe::{UNEXPLORED, UNEXPLORED_TILE, cursor_hint, describe_tile, describe_unit};
pub use hint::{ActionHint, suggest_action};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use map::{CivMask, Coord, Feature, Map, Terrain, Tile};
pub use movement::{Reachable, compute_reachable, reconstruct_path};
pub use state::{GameState, Outcome};
pub use territory::{claim_territory, in_city_range};
pub use unit::{Unit, UnitId, UnitKind};
pub use vision::{reveal, reveal_along, sight_radius};
