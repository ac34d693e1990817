//! Scenario files and scripted actions.
//!
//! A [`Scenario`] is the static setup of a game: map size, civilizations,
//! tile overrides, starting units and initial reveals. It is plain JSON and
//! builds into a fresh [`GameState`]. [`Action`] is the serialized form of one
//! state-changing action, used by action scripts.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::game::{
    CivId, CivMask, CivStyle, Civilization, Coord, Feature, GameState, Map, Rgb, Terrain, UnitId,
    UnitKind,
};
use crate::rules::Rules;

/// Error loading or building a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The JSON did not parse.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The scenario parsed but describes an impossible setup.
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// One scripted, state-changing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Move a unit within its reachable set.
    Move {
        /// The unit.
        unit: UnitId,
        /// Destination.
        to: Coord,
    },
    /// One unit attacks another.
    Attack {
        /// Attacking unit.
        attacker: UnitId,
        /// Defending unit.
        defender: UnitId,
    },
    /// Turn a village into a city for a civilization.
    FoundCity {
        /// Founding civilization.
        civ: CivId,
        /// The village.
        at: Coord,
    },
    /// Turn a village into a city for a unit's owner.
    CaptureVillage {
        /// Capturing unit.
        unit: UnitId,
        /// The village.
        at: Coord,
    },
    /// Take a city for a unit's owner.
    CaptureCity {
        /// Capturing unit.
        unit: UnitId,
        /// City center.
        at: Coord,
    },
    /// Build a farm inside a city's territory.
    BuildFarm {
        /// The tile.
        at: Coord,
    },
}

/// A civilization entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivSpec {
    /// Unique id, below [`CivMask::CAPACITY`].
    pub id: CivId,
    /// Display name.
    pub name: String,
    /// Display colors.
    #[serde(default)]
    pub style: CivStyle,
    /// Names for founded cities, in order.
    #[serde(default)]
    pub city_names: Vec<String>,
}

/// Override of one tile's base data. Unset fields keep the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    /// Tile coordinate.
    pub at: Coord,
    /// Terrain override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<Terrain>,
    /// Feature override. Cities cannot be placed directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<Feature>,
    /// Road override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<bool>,
}

impl TileSpec {
    const fn at(at: Coord) -> Self {
        Self {
            at,
            terrain: None,
            feature: None,
            road: None,
        }
    }
}

/// A starting unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Owning civilization.
    pub owner: CivId,
    /// Starting position.
    pub at: Coord,
    /// Kind of unit.
    #[serde(default)]
    pub kind: UnitKind,
}

/// An initial reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealSpec {
    /// Civilization that sees.
    pub civ: CivId,
    /// Center of the revealed square.
    pub at: Coord,
    /// Radius of the revealed square.
    pub radius: u16,
}

/// Static game setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Map width in tiles.
    pub width: u16,
    /// Map height in tiles.
    pub height: u16,
    /// Rule constants. Missing fields take the defaults.
    #[serde(default)]
    pub rules: Rules,
    /// Civilizations, in registration order.
    pub civs: Vec<CivSpec>,
    /// Tile overrides, applied in order.
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
    /// Starting units; ids are assigned in list order from 0.
    #[serde(default)]
    pub units: Vec<UnitSpec>,
    /// Reveals applied after units are placed.
    #[serde(default)]
    pub reveals: Vec<RevealSpec>,
}

impl Scenario {
    /// The standard opening: a 30×15 map, two civilizations and three warriors.
    #[must_use]
    pub fn reference() -> Self {
        let mut tiles = Vec::new();
        for (x, y) in [
            (9, 5),
            (7, 7),
            (10, 7),
            (2, 4),
            (4, 3),
            (4, 4),
            (5, 4),
            (6, 3),
            (6, 4),
        ] {
            tiles.push(TileSpec {
                terrain: Some(Terrain::Mountain),
                ..TileSpec::at(Coord::new(x, y))
            });
        }
        for (x, y) in [
            (5, 5),
            (4, 5),
            (3, 4),
            (5, 3),
            (3, 3),
            (4, 2),
            (3, 2),
            (2, 2),
        ] {
            tiles.push(TileSpec {
                road: Some(true),
                ..TileSpec::at(Coord::new(x, y))
            });
        }
        for (x, y, feature) in [
            (7, 6, Feature::Village),
            (8, 8, Feature::Village),
            (9, 8, Feature::Crop),
            (10, 8, Feature::Crop),
            (11, 8, Feature::Crop),
            (12, 8, Feature::Crop),
            (22, 11, Feature::Village),
        ] {
            tiles.push(TileSpec {
                feature: Some(feature),
                ..TileSpec::at(Coord::new(x, y))
            });
        }

        Self {
            width: 30,
            height: 15,
            rules: Rules::default(),
            civs: vec![
                CivSpec {
                    id: 0,
                    name: "TestCiv".to_string(),
                    style: CivStyle::default(),
                    city_names: vec!["Rome".to_string()],
                },
                CivSpec {
                    id: 1,
                    name: "TestCiv2".to_string(),
                    style: CivStyle {
                        foreground: Rgb(0xdf, 0xdf, 0xdf),
                        background: Rgb(0x00, 0x1f, 0x5f),
                    },
                    city_names: vec!["London".to_string()],
                },
            ],
            tiles,
            units: vec![
                UnitSpec {
                    owner: 0,
                    at: Coord::new(6, 6),
                    kind: UnitKind::Warrior,
                },
                UnitSpec {
                    owner: 0,
                    at: Coord::new(7, 7),
                    kind: UnitKind::Warrior,
                },
                UnitSpec {
                    owner: 1,
                    at: Coord::new(8, 6),
                    kind: UnitKind::Warrior,
                },
            ],
            reveals: vec![RevealSpec {
                civ: 0,
                at: Coord::new(6, 6),
                radius: 1,
            }],
        }
    }

    /// Parse a scenario from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or does not match the schema.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = json.len(), "loaded scenario");
        Self::from_json(&json)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the scenario describes a consistent starting position.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Invalid`] naming the first problem found.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let invalid = |msg: String| -> Result<(), ScenarioError> { Err(ScenarioError::Invalid(msg)) };
        let in_bounds = |at: Coord| at.x < self.width && at.y < self.height;
        let max_radius = self.width.max(self.height);

        if self.width == 0 || self.height == 0 {
            return invalid(format!("map size {}x{} is empty", self.width, self.height));
        }

        let mut civs = BTreeSet::new();
        for civ in &self.civs {
            if usize::from(civ.id) >= CivMask::CAPACITY {
                return invalid(format!(
                    "civ id {} exceeds the limit of {}",
                    civ.id,
                    CivMask::CAPACITY - 1
                ));
            }
            if !civs.insert(civ.id) {
                return invalid(format!("duplicate civ id {}", civ.id));
            }
        }

        for tile in &self.tiles {
            if !in_bounds(tile.at) {
                return invalid(format!("tile override at {} is outside the map", tile.at));
            }
            if tile.feature == Some(Feature::City) {
                return invalid(format!(
                    "tile {} cannot start as a city; place a village and found it",
                    tile.at
                ));
            }
        }

        let mut occupied = BTreeSet::new();
        for unit in &self.units {
            if !civs.contains(&unit.owner) {
                return invalid(format!("unit at {} has unknown owner {}", unit.at, unit.owner));
            }
            if !in_bounds(unit.at) {
                return invalid(format!("unit at {} is outside the map", unit.at));
            }
            if !occupied.insert(unit.at) {
                return invalid(format!("more than one unit starts at {}", unit.at));
            }
        }

        for reveal in &self.reveals {
            if !civs.contains(&reveal.civ) {
                return invalid(format!("reveal for unknown civ {}", reveal.civ));
            }
            if !in_bounds(reveal.at) {
                return invalid(format!("reveal center {} is outside the map", reveal.at));
            }
            if reveal.radius > max_radius {
                return invalid(format!(
                    "reveal radius {} at {} exceeds the map size {max_radius}",
                    reveal.radius, reveal.at
                ));
            }
        }

        self.validate_rules(max_radius)
    }

    /// Rule constants must keep the movement search and every scan bounded.
    fn validate_rules(&self, max_radius: u16) -> Result<(), ScenarioError> {
        let rules = &self.rules;
        let invalid = |msg: String| -> Result<(), ScenarioError> { Err(ScenarioError::Invalid(msg)) };

        for (name, cost) in [
            ("road_cost", rules.road_cost),
            ("plains_cost", rules.plains_cost),
            ("mountain_cost", rules.mountain_cost),
            ("impassable_cost", rules.impassable_cost),
        ] {
            if !cost.is_finite() || cost <= 0.0 {
                return invalid(format!("{name} must be positive and finite, got {cost}"));
            }
        }

        let max_budget = self
            .units
            .iter()
            .map(|unit| unit.kind.move_points())
            .max()
            .unwrap_or(0);
        if rules.impassable_cost <= f64::from(max_budget) {
            return invalid(format!(
                "impassable_cost {} does not exceed the largest movement budget {max_budget}",
                rules.impassable_cost
            ));
        }

        for (name, radius) in [
            ("base_sight", rules.base_sight),
            ("mountain_sight", rules.mountain_sight),
            ("city_sight", rules.city_sight),
            ("farm_sight", rules.farm_sight),
            ("claim_radius", rules.claim_radius),
        ] {
            if radius > max_radius {
                return invalid(format!(
                    "{name} {radius} exceeds the map size {max_radius}"
                ));
            }
        }

        Ok(())
    }

    /// Validate and build the starting game state.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Invalid`] if validation fails.
    pub fn build(&self) -> Result<GameState, ScenarioError> {
        self.validate()?;

        let mut map = Map::new(self.width, self.height)
            .ok_or_else(|| ScenarioError::Invalid("empty map".to_string()))?;
        for spec in &self.tiles {
            if let Some(tile) = map.get_mut(spec.at) {
                if let Some(terrain) = spec.terrain {
                    tile.terrain = terrain;
                }
                if let Some(feature) = spec.feature {
                    tile.feature = feature;
                }
                if let Some(road) = spec.road {
                    tile.road = road;
                }
            }
        }

        let mut state = GameState::new(map, self.rules);
        for civ in &self.civs {
            state.add_civ(
                Civilization::new(civ.id, civ.name.clone(), civ.style)
                    .with_city_names(civ.city_names.iter().cloned()),
            );
        }
        for unit in &self.units {
            state
                .spawn_unit(unit.kind, unit.owner, unit.at)
                .map_err(|err| ScenarioError::Invalid(err.to_string()))?;
        }
        for reveal in &self.reveals {
            state.reveal(reveal.at, reveal.radius, reveal.civ);
        }

        debug!(
            width = self.width,
            height = self.height,
            civs = self.civs.len(),
            units = self.units.len(),
            "built scenario"
        );
        Ok(state)
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::reference()
    }
}

/// Parse an action script: a JSON array of [`Action`]s.
///
/// # Errors
///
/// Returns an error if the JSON is malformed.
pub fn actions_from_json(json: &str) -> Result<Vec<Action>, ScenarioError> {
    Ok(serde_json::from_str(json)?)
}

/// Load an action script file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_actions(path: &Path) -> Result<Vec<Action>, ScenarioError> {
    let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    actions_from_json(&json)
}
