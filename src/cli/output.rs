//! Output formatting utilities for CLI.

use civlite::game::Outcome;
use civlite::render::{View, render_map};
use civlite::{Action, Coord, GameState, Reachable};
use serde::Serialize;

/// JSON-serializable map view.
#[derive(Debug, Serialize)]
pub(super) struct JsonMap {
    /// Map width.
    pub(super) width: u16,
    /// Map height.
    pub(super) height: u16,
    /// Viewing civilization.
    pub(super) viewer: u8,
    /// One plain-glyph string per row.
    pub(super) rows: Vec<String>,
    /// Units visible to the viewer.
    pub(super) units: Vec<JsonUnit>,
    /// Cities visible to the viewer.
    pub(super) cities: Vec<JsonCity>,
}

/// JSON-serializable unit.
#[derive(Debug, Serialize)]
pub(super) struct JsonUnit {
    /// Unit id.
    pub(super) id: u32,
    /// Display name.
    pub(super) name: String,
    /// Owning civilization.
    pub(super) owner: u8,
    /// Position.
    pub(super) at: Coord,
    /// Current hit points.
    pub(super) hp: i32,
    /// Full hit points.
    pub(super) max_hp: i32,
    /// Kill tally.
    pub(super) kills: u32,
}

/// JSON-serializable city.
#[derive(Debug, Serialize)]
pub(super) struct JsonCity {
    /// City id.
    pub(super) id: u32,
    /// Display name.
    pub(super) name: String,
    /// Owning civilization.
    pub(super) owner: u8,
    /// City center.
    pub(super) at: Coord,
    /// Population.
    pub(super) population: u32,
    /// Territory size in tiles.
    pub(super) tiles: usize,
}

impl JsonMap {
    /// Build from a state and a view; fog applies to units and cities too.
    pub(super) fn new(state: &GameState, view: &View<'_>) -> Self {
        let visible = |coord: Coord| {
            view.reveal_all
                || state
                    .map()
                    .get(coord)
                    .is_some_and(|tile| tile.is_discovered_by(view.viewer))
        };

        Self {
            width: state.map().width(),
            height: state.map().height(),
            viewer: view.viewer,
            rows: render_map(state, view).lines().map(str::to_string).collect(),
            units: state
                .units()
                .filter(|u| visible(u.position))
                .map(|u| JsonUnit {
                    id: u.id.0,
                    name: u.name.clone(),
                    owner: u.owner,
                    at: u.position,
                    hp: u.hp,
                    max_hp: u.max_hp,
                    kills: u.kills,
                })
                .collect(),
            cities: state
                .cities()
                .filter(|(_, c)| visible(c.position))
                .map(|(id, c)| JsonCity {
                    id: id.0,
                    name: c.name.clone(),
                    owner: c.owner,
                    at: c.position,
                    population: c.population,
                    tiles: state.map().tiles_of_city(id).count(),
                })
                .collect(),
        }
    }
}

/// JSON-serializable reachable tile.
#[derive(Debug, Serialize)]
pub(super) struct JsonReachTile {
    /// Tile coordinate.
    pub(super) at: Coord,
    /// Total movement cost.
    pub(super) cost: f64,
    /// Predecessor on the recorded path.
    pub(super) came_from: Option<Coord>,
}

/// JSON-serializable reachable set.
#[derive(Debug, Serialize)]
pub(super) struct JsonReach {
    /// Unit id.
    pub(super) unit: u32,
    /// Unit position.
    pub(super) origin: Coord,
    /// Movement budget.
    pub(super) budget: f64,
    /// Reachable tiles in discovery order.
    pub(super) tiles: Vec<JsonReachTile>,
    /// Map with the overlay.
    pub(super) map: JsonMap,
}

impl JsonReach {
    /// Build from a reachable set.
    pub(super) fn new(state: &GameState, reachable: &Reachable, view: &View<'_>) -> Self {
        Self {
            unit: reachable.unit().0,
            origin: reachable.origin(),
            budget: reachable.budget(),
            tiles: reachable
                .tiles()
                .iter()
                .map(|&at| JsonReachTile {
                    at,
                    cost: reachable.cost(at).unwrap_or_default(),
                    came_from: reachable.came_from(at),
                })
                .collect(),
            map: JsonMap::new(state, view),
        }
    }
}

/// JSON-serializable script step.
#[derive(Debug, Serialize)]
pub(super) struct JsonStep {
    /// The action as read from the script.
    pub(super) action: Action,
    /// What it did, when accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) outcome: Option<Outcome>,
    /// Why it was declined, when rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) rejected: Option<String>,
}

/// JSON-serializable script run.
#[derive(Debug, Serialize)]
pub(super) struct JsonRun {
    /// Every step, in order.
    pub(super) steps: Vec<JsonStep>,
    /// Number of accepted actions.
    pub(super) applied: usize,
    /// Number of rejected actions.
    pub(super) rejected: usize,
    /// Final map.
    pub(super) map: JsonMap,
}

/// Format reachable tiles as a cost table.
pub(super) fn format_reach_text(reachable: &Reachable) -> String {
    let mut output = format!(
        "Unit {} at {} (budget {}): {} tiles\n",
        reachable.unit().0,
        reachable.origin(),
        reachable.budget(),
        reachable.len()
    );
    for &at in reachable.tiles() {
        let cost = reachable.cost(at).unwrap_or_default();
        match reachable.came_from(at) {
            Some(from) => output.push_str(&format!("  {at} cost {cost} via {from}\n")),
            None => output.push_str(&format!("  {at} cost {cost}\n")),
        }
    }
    output
}
