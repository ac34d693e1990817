//! Fog of war.
//!
//! Discovery is permanent: once a civilization has seen a tile it stays
//! discovered. Membership is a set, so repeated reveals are idempotent.

use tracing::trace;

use crate::game::{CivId, Coord, Map, Terrain};
use crate::rules::Rules;

/// Mark the `(2r+1)²` square around `center` as discovered by `civ`.
///
/// Tiles outside the map are skipped. Returns how many tiles were newly discovered.
pub fn reveal(map: &mut Map, center: Coord, radius: u16, civ: CivId) -> usize {
    let coords: Vec<Coord> = map.square(center, radius).collect();
    let mut newly = 0;

    for coord in coords {
        if let Some(tile) = map.get_mut(coord) {
            if !tile.discovered_by.contains(civ) {
                tile.discovered_by.insert(civ);
                newly += 1;
            }
        }
    }

    trace!(center = %center, radius, civ, newly, "revealed tiles");
    newly
}

/// Sight radius of a unit standing on `terrain`.
#[must_use]
pub const fn sight_radius(terrain: Terrain, rules: &Rules) -> u16 {
    match terrain {
        Terrain::Mountain => rules.mountain_sight,
        Terrain::Plains => rules.base_sight,
    }
}

/// Reveal around each step of a path, widening the radius on mountains.
///
/// Returns how many tiles were newly discovered in total.
pub fn reveal_along(map: &mut Map, path: &[Coord], civ: CivId, rules: &Rules) -> usize {
    let mut newly = 0;
    for &step in path {
        let Some(tile) = map.get(step) else {
            continue;
        };
        let radius = sight_radius(tile.terrain, rules);
        newly += reveal(map, step, radius, civ);
    }
    newly
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Tile;

    #[test]
    fn test_reveal_interior() {
        let mut map = Map::new(30, 15).unwrap();
        let newly = reveal(&mut map, Coord::new(6, 6), 1, 0);

        assert_eq!(newly, 9);
        assert_eq!(map.count_discovered(0), 9);
        assert!(map.get(Coord::new(5, 5)).unwrap().is_discovered_by(0));
        assert!(!map.get(Coord::new(8, 6)).unwrap().is_discovered_by(0));
        assert!(!map.get(Coord::new(6, 6)).unwrap().is_discovered_by(1));
    }

    #[test]
    fn test_reveal_clipped_at_corner() {
        let mut map = Map::new(30, 15).unwrap();
        let newly = reveal(&mut map, Coord::new(0, 0), 1, 0);
        assert_eq!(newly, 4);
        assert_eq!(map.count_discovered(0), 4);

        let newly = reveal(&mut map, Coord::new(29, 14), 2, 1);
        assert_eq!(newly, 9);
    }

    #[test]
    fn test_reveal_huge_radius_covers_map() {
        let mut map = Map::new(30, 15).unwrap();
        assert_eq!(reveal(&mut map, Coord::new(5, 5), u16::MAX, 0), 450);
        assert_eq!(map.count_discovered(0), map.len());
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut map = Map::new(10, 10).unwrap();
        reveal(&mut map, Coord::new(4, 4), 1, 2);
        let before = map.clone();

        assert_eq!(reveal(&mut map, Coord::new(4, 4), 1, 2), 0);
        assert_eq!(map, before);
        assert_eq!(map.get(Coord::new(4, 4)).unwrap().discovered_by.len(), 1);
    }

    #[test]
    fn test_reveal_along_widens_on_mountains() {
        let mut map = Map::new(20, 20).unwrap();
        map.set(Coord::new(6, 5), Tile::mountain());
        let rules = Rules::default();

        reveal_along(&mut map, &[Coord::new(6, 5), Coord::new(7, 5)], 0, &rules);

        // Radius 2 from the mountain step reaches x = 4
        assert!(map.get(Coord::new(4, 3)).unwrap().is_discovered_by(0));
        // Radius 1 from the plains step stops at x = 8
        assert!(map.get(Coord::new(8, 5)).unwrap().is_discovered_by(0));
        assert!(!map.get(Coord::new(9, 5)).unwrap().is_discovered_by(0));
    }

    #[test]
    fn test_sight_radius() {
        let rules = Rules::default();
        assert_eq!(sight_radius(Terrain::Plains, &rules), 1);
        assert_eq!(sight_radius(Terrain::Mountain, &rules), 2);
    }
}
