//! City territory ("culture bomb").
//!
//! A culture bomb visits the square around a trigger coordinate and hands
//! every unclaimed tile in it to the city, provided the tile also lies within
//! the claim range of the city's center. The two checks are independent: the
//! trigger need not be the center. First claim wins; a claimed tile is never
//! reassigned.

use tracing::trace;

use crate::game::{City, CityId, Coord, Map};
use crate::rules::Rules;

/// Whether `coord` is close enough to the city's center to join its territory.
#[must_use]
pub const fn in_city_range(coord: Coord, city: &City, rules: &Rules) -> bool {
    coord.within(city.position, rules.city_claim_range)
}

/// Claim unowned tiles around `trigger` for a city.
///
/// Returns the coordinates newly claimed, in visiting order.
pub fn claim_territory(
    map: &mut Map,
    city_id: CityId,
    city: &City,
    trigger: Coord,
    rules: &Rules,
) -> Vec<Coord> {
    let candidates: Vec<Coord> = map.square(trigger, rules.claim_radius).collect();
    let mut claimed = Vec::new();

    for coord in candidates {
        if !in_city_range(coord, city, rules) {
            continue;
        }
        if let Some(tile) = map.get_mut(coord) {
            if tile.city.is_none() {
                tile.city = Some(city_id);
                claimed.push(coord);
            }
        }
    }

    trace!(city = %city.name, trigger = %trigger, claimed = claimed.len(), "culture bomb");
    claimed
}
