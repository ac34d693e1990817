//! Tunable rule constants.

use serde::{Deserialize, Serialize};

/// Numeric rules for movement, vision, territory and promotion.
///
/// The defaults are the standard ruleset. Scenario files may override any
/// field; missing fields fall back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Cost of entering a tile held by a friendly unit. Must exceed any movement budget.
    pub impassable_cost: f64,
    /// Cost of entering a road tile when the mover stands on a road.
    pub road_cost: f64,
    /// Cost of entering plains.
    pub plains_cost: f64,
    /// Cost of entering a mountain.
    pub mountain_cost: f64,
    /// Reveal radius after stepping onto plains.
    pub base_sight: u16,
    /// Reveal radius after stepping onto a mountain.
    pub mountain_sight: u16,
    /// Reveal radius when a city is founded.
    pub city_sight: u16,
    /// Reveal radius when a farm is built.
    pub farm_sight: u16,
    /// Maximum per-axis distance from a city center for a tile to join its territory.
    pub city_claim_range: u16,
    /// Radius of the square a single culture bomb visits.
    pub claim_radius: u16,
    /// Kills needed for promotion. Only reported; promotion is not simulated.
    pub kills_to_promotion: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            impassable_cost: 99.0,
            road_cost: 0.25,
            plains_cost: 1.0,
            mountain_cost: 2.0,
            base_sight: 1,
            mountain_sight: 2,
            city_sight: 2,
            farm_sight: 1,
            city_claim_range: 3,
            claim_radius: 1,
            kills_to_promotion: 2,
        }
    }
}
