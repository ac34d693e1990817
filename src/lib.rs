// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! civlite: a deterministic simulation core for a small turn-based strategy game.
//!
//! The crate models a square tile map with terrain, villages, cities and
//! roads, civilizations with per-civilization fog of war, and warriors that
//! move, fight and capture settlements.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / renderer (read-only view)   │
//! ├─────────────────────────────────────┤
//! │   GameState (sole mutation surface) │
//! ├─────────────────────────────────────┤
//! │ movement · combat · vision · claim  │
//! ├─────────────────────────────────────┤
//! │   Map, registries, Rules            │
//! └─────────────────────────────────────┘
//! ```
//!
//! Every action returns an [`ActionResult`]; a rejected action leaves the
//! state untouched. There is no randomness: the same action sequence always
//! produces the same state.

pub mod error;
pub mod game;
pub mod render;
pub mod rules;
pub mod scenario;

pub use error::{ActionError, ActionResult};

// Re-export key game types at crate root for convenience
pub use game::{
    City, CityId, CivId, Civilization, Coord, Feature, GameState, Map, Outcome, Reachable,
    Terrain, Tile, Unit, UnitId,
};
pub use rules::Rules;
pub use scenario::{Action, Scenario, ScenarioError};
