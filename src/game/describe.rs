//! Human-readable tile and unit summaries.
//!
//! Everything here is read-only and takes the viewing civilization
//! explicitly: a tile the viewer has never discovered describes as unexplored,
//! whatever is on it.

use crate::game::{CivId, Coord, Feature, GameState, Terrain, Unit, UnitId};
use crate::rules::Rules;

/// Info-panel text for an undiscovered tile.
pub const UNEXPLORED_TILE: &str = "??? - Unexplored Tile";

/// Cursor-hint text for an undiscovered tile.
pub const UNEXPLORED: &str = "Unexplored";

/// Multi-line unit summary: name and health, stats, then kills once it has any.
#[must_use]
pub fn describe_unit(unit: &Unit, selected: bool, rules: &Rules) -> String {
    let mut s = format!("{} {}/{} HP", unit.name, unit.hp, unit.max_hp);
    if selected {
        s.push_str(" (Selected)");
    }
    s.push_str(&format!(
        "\n  {} ATK {} DEF {} MOVE",
        unit.attack, unit.defense, unit.move_points
    ));
    if unit.kills > 0 {
        s.push_str(&format!(
            "\n  {}/{} kills to promotion",
            unit.kills, rules.kills_to_promotion
        ));
    }
    s
}

fn terrain_text(terrain: Terrain, rules: &Rules) -> String {
    let cost = match terrain {
        Terrain::Plains => rules.plains_cost,
        Terrain::Mountain => rules.mountain_cost,
    };
    format!("{}\n  {cost} movement cost", terrain.name())
}

const fn feature_text(feature: Feature) -> Option<&'static str> {
    match feature {
        Feature::None => None,
        Feature::Village => Some("Village\n  Move a unit here to capture"),
        Feature::Crop => Some("Crop\n  Can build a Farm here"),
        Feature::Farm => Some("Farm"),
        Feature::City => Some("City"),
    }
}

/// Info-panel text for a tile as seen by `viewer`.
///
/// `selected` marks the unit currently selected by the viewer, if any.
#[must_use]
pub fn describe_tile(
    state: &GameState,
    coord: Coord,
    viewer: CivId,
    selected: Option<UnitId>,
) -> String {
    let Some(tile) = state.map.get(coord) else {
        return UNEXPLORED_TILE.to_string();
    };
    if !tile.is_discovered_by(viewer) {
        return UNEXPLORED_TILE.to_string();
    }

    let mut lines = Vec::new();
    if let Some(unit) = state.unit_at(coord) {
        lines.push(describe_unit(
            unit,
            selected == Some(unit.id),
            &state.rules,
        ));
    }
    if let Some((_, city)) = state.city_at(coord) {
        lines.push(city.name.clone());
    }
    lines.push(terrain_text(tile.terrain, &state.rules));
    if tile.road {
        lines.push("Road".to_string());
    }
    if let Some(text) = feature_text(tile.feature) {
        lines.push(text.to_string());
    }
    lines.join("\n")
}

/// One-line cursor hint for a tile as seen by `viewer`.
#[must_use]
pub fn cursor_hint(state: &GameState, coord: Coord, viewer: CivId, selected: Option<UnitId>) -> String {
    let Some(tile) = state.map.get(coord) else {
        return UNEXPLORED.to_string();
    };
    if !tile.is_discovered_by(viewer) {
        return UNEXPLORED.to_string();
    }

    let mut s = String::new();
    let city = state.city_at(coord);
    if let Some((_, city)) = city {
        s.push_str(&city.name);
        s.push_str(" - ");
    }
    if let Some(unit) = state.unit_at(coord) {
        s.push_str(&unit.name);
        if selected == Some(unit.id) {
            s.push_str(" (Selected)");
        }
        s.push_str(", ");
    }
    if city.is_some_and(|(_, city)| city.is_center(coord)) {
        s.push_str("City, ");
    }
    s.push_str(tile.terrain.name());
    if tile.road {
        s.push_str(", Road");
    }
    if tile.feature != Feature::City {
        if let Some(name) = tile.feature.name() {
            s.push_str(", ");
            s.push_str(name);
        }
    }
    s
}
