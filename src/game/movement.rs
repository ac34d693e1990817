//! Movement range and pathing.
//!
//! [`compute_reachable`] runs a budget-bounded uniform-cost flood fill over the
//! 8-connected grid and returns a [`Reachable`] owned by the caller. Nothing is
//! written back to the map, so results for different units (or the same unit
//! at different times) never interfere.
//!
//! The frontier is a FIFO worklist rather than a priority queue. A tile goes
//! back on the worklist whenever its cost drops while within budget, and its
//! predecessor follows the cheapest route found. When the worklist drains,
//! every reachable tile carries its true minimum cost, so a larger budget
//! only ever adds tiles.

use std::collections::VecDeque;

use tracing::debug;

use crate::game::{CivId, Coord, Map, Terrain, Unit, UnitId};
use crate::rules::Rules;

/// The tiles one unit can reach this turn, with costs and predecessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Reachable {
    /// Unit the query was run for.
    unit: UnitId,
    /// The unit's position when the query ran.
    origin: Coord,
    /// Map width, for indexing.
    width: u16,
    /// Map height, for indexing.
    height: u16,
    /// Movement budget used.
    budget: f64,
    /// Best known total cost per tile; the impassable cost where never relaxed.
    costs: Vec<f64>,
    /// Predecessor on the cheapest known route.
    came_from: Vec<Option<Coord>>,
    /// Membership flag per tile.
    reachable: Vec<bool>,
    /// Reachable tiles in discovery order, origin first.
    order: Vec<Coord>,
}

impl Reachable {
    /// Unit the set was computed for.
    #[must_use]
    pub const fn unit(&self) -> UnitId {
        self.unit
    }

    /// Position the set was computed from.
    #[must_use]
    pub const fn origin(&self) -> Coord {
        self.origin
    }

    /// Movement budget the set was computed with.
    #[must_use]
    pub const fn budget(&self) -> f64 {
        self.budget
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if coord.x < self.width && coord.y < self.height {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Check whether a tile is reachable.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.index(coord).is_some_and(|idx| self.reachable[idx])
    }

    /// Total movement cost to a reachable tile.
    #[must_use]
    pub fn cost(&self, coord: Coord) -> Option<f64> {
        self.index(coord)
            .filter(|&idx| self.reachable[idx])
            .map(|idx| self.costs[idx])
    }

    /// Predecessor of a reachable tile. `None` for the origin and unreachable tiles.
    #[must_use]
    pub fn came_from(&self, coord: Coord) -> Option<Coord> {
        self.index(coord).and_then(|idx| self.came_from[idx])
    }

    /// Reachable tiles in discovery order, origin first.
    #[must_use]
    pub fn tiles(&self) -> &[Coord] {
        &self.order
    }

    /// Number of reachable tiles, origin included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// `true` only when the unit stood outside the map.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Steps from the origin to `goal`, origin excluded, goal included.
    ///
    /// Empty when `goal` is the origin or is not reachable.
    #[must_use]
    pub fn path_to(&self, goal: Coord) -> Vec<Coord> {
        reconstruct_path(self, self.origin, goal)
    }
}

/// Follow predecessor links from `to` back to `from`.
///
/// Returns the steps from `from` to `to`, excluding `from` and including `to`.
/// Returns an empty path when the chain breaks before reaching `from`, or when
/// `from == to`.
#[must_use]
pub fn reconstruct_path(reachable: &Reachable, from: Coord, to: Coord) -> Vec<Coord> {
    let mut path = Vec::new();
    let mut current = to;

    while current != from {
        // Each tile appears at most once on a valid chain.
        if path.len() > reachable.order.len() {
            return Vec::new();
        }
        let Some(previous) = reachable.came_from(current) else {
            return Vec::new();
        };
        path.push(current);
        current = previous;
    }

    path.reverse();
    path
}

/// Cost of moving `mover` into the tile at `idx`.
///
/// Friendly units block. Otherwise a road-to-road step is cheap regardless of
/// terrain, and terrain decides the rest. Enemy units do not affect cost.
fn entry_cost(
    map: &Map,
    idx: usize,
    occupant: Option<CivId>,
    mover: &Unit,
    origin_road: bool,
    rules: &Rules,
) -> f64 {
    if occupant == Some(mover.owner) {
        return rules.impassable_cost;
    }

    let tile = &map.tiles()[idx];
    if origin_road && tile.road {
        return rules.road_cost;
    }

    match tile.terrain {
        Terrain::Plains => rules.plains_cost,
        Terrain::Mountain => rules.mountain_cost,
    }
}

/// Compute every tile `mover` can reach within its movement budget.
///
/// `units` is the full active unit list; the mover may be part of it. The
/// mover's own tile is always reachable with cost 0, whatever its terrain.
#[must_use]
pub fn compute_reachable<'a, I>(map: &Map, units: I, mover: &Unit, rules: &Rules) -> Reachable
where
    I: IntoIterator<Item = &'a Unit>,
{
    let len = map.len();
    let budget = f64::from(mover.move_points);

    let mut result = Reachable {
        unit: mover.id,
        origin: mover.position,
        width: map.width(),
        height: map.height(),
        budget,
        costs: vec![rules.impassable_cost; len],
        came_from: vec![None; len],
        reachable: vec![false; len],
        order: Vec::new(),
    };

    let Some(origin_idx) = map.index_of(mover.position) else {
        debug!(unit = ?mover.id, position = %mover.position, "unit outside map, nothing reachable");
        return result;
    };

    // First unit (by iteration order) on each tile, other than at the mover's own position.
    let mut occupants: Vec<Option<CivId>> = vec![None; len];
    for unit in units {
        if unit.position == mover.position {
            continue;
        }
        if let Some(idx) = map.index_of(unit.position) {
            if occupants[idx].is_none() {
                occupants[idx] = Some(unit.owner);
            }
        }
    }

    let origin_road = map.tiles()[origin_idx].road;
    let base_costs: Vec<f64> = (0..len)
        .map(|idx| {
            if idx == origin_idx {
                0.0
            } else {
                entry_cost(map, idx, occupants[idx], mover, origin_road, rules)
            }
        })
        .collect();

    result.costs[origin_idx] = 0.0;
    result.reachable[origin_idx] = true;
    result.order.push(mover.position);

    let mut worklist = VecDeque::from([mover.position]);
    let mut queued = vec![false; len];
    queued[origin_idx] = true;
    let mut relaxations = 0usize;

    while let Some(current) = worklist.pop_front() {
        let Some(current_idx) = map.index_of(current) else {
            continue;
        };
        queued[current_idx] = false;
        let current_cost = result.costs[current_idx];

        for neighbor in map.neighbors(current) {
            let Some(idx) = map.index_of(neighbor) else {
                continue;
            };

            let candidate = current_cost + base_costs[idx];
            if candidate >= result.costs[idx] {
                continue;
            }
            result.costs[idx] = candidate;
            if candidate > budget {
                continue;
            }

            // Costs only fall, so the predecessor chain stays strictly decreasing.
            result.came_from[idx] = Some(current);
            if !result.reachable[idx] {
                result.reachable[idx] = true;
                result.order.push(neighbor);
            }
            if !queued[idx] {
                queued[idx] = true;
                relaxations += 1;
                worklist.push_back(neighbor);
            }
        }
    }

    debug!(
        unit = ?mover.id,
        origin = %mover.position,
        budget,
        reachable = result.order.len(),
        relaxations,
        "computed reachable set"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Tile;

    fn warrior(id: u32, owner: CivId, x: u16, y: u16) -> Unit {
        Unit::warrior(UnitId(id), owner, Coord::new(x, y))
    }

    fn road(map: &mut Map, x: u16, y: u16) {
        if let Some(tile) = map.get_mut(Coord::new(x, y)) {
            tile.road = true;
        }
    }

    #[test]
    fn test_origin_always_reachable() {
        let mut map = Map::new(10, 10).unwrap();
        map.set(Coord::new(5, 5), Tile::mountain());
        let mover = warrior(0, 0, 5, 5);

        let reach = compute_reachable(&map, [&mover], &mover, &Rules::default());
        assert!(reach.contains(Coord::new(5, 5)));
        assert_eq!(reach.cost(Coord::new(5, 5)), Some(0.0));
        assert_eq!(reach.tiles()[0], Coord::new(5, 5));
        assert_eq!(reach.came_from(Coord::new(5, 5)), None);
    }

    #[test]
    fn test_open_plains_range() {
        let map = Map::new(20, 20).unwrap();
        let mover = warrior(0, 0, 10, 10);

        let reach = compute_reachable(&map, [&mover], &mover, &Rules::default());
        // Budget 2 over unit-cost diagonal moves covers the 5x5 square
        assert_eq!(reach.len(), 25);
        assert!(reach.contains(Coord::new(12, 8)));
        assert!(!reach.contains(Coord::new(13, 10)));
        assert_eq!(reach.cost(Coord::new(12, 12)), Some(2.0));
    }

    #[test]
    fn test_mountain_costs_two() {
        let mut map = Map::new(10, 10).unwrap();
        map.set(Coord::new(6, 5), Tile::mountain());
        let mover = warrior(0, 0, 5, 5);

        let reach = compute_reachable(&map, [&mover], &mover, &Rules::default());
        assert_eq!(reach.cost(Coord::new(6, 5)), Some(2.0));
        assert_eq!(reach.cost(Coord::new(4, 5)), Some(1.0));
    }

    #[test]
    fn test_friendly_unit_blocks_enemy_does_not() {
        let map = Map::new(10, 10).unwrap();
        let mover = warrior(0, 0, 5, 5);
        let friend = warrior(1, 0, 6, 5);
        let enemy = warrior(2, 1, 4, 5);

        let reach = compute_reachable(&map, [&mover, &friend, &enemy], &mover, &Rules::default());
        assert!(!reach.contains(Coord::new(6, 5)));
        assert!(reach.contains(Coord::new(4, 5)));
        assert_eq!(reach.cost(Coord::new(4, 5)), Some(1.0));
        // The friend's tile can still be walked around
        assert!(reach.contains(Coord::new(7, 5)));
    }

    #[test]
    fn test_road_step_is_cheap_on_any_terrain() {
        let mut map = Map::new(20, 10).unwrap();
        map.set(Coord::new(6, 5), Tile::mountain());
        for x in 5..=13 {
            road(&mut map, x, 5);
        }
        let mover = warrior(0, 0, 5, 5);

        let reach = compute_reachable(&map, [&mover], &mover, &Rules::default());
        assert_eq!(reach.cost(Coord::new(6, 5)), Some(0.25));
        let far = reach.cost(Coord::new(13, 5)).unwrap();
        assert!((far - 2.0).abs() < 1e-9);
        assert!(!reach.contains(Coord::new(14, 5)));
    }

    #[test]
    fn test_road_needs_mover_on_road() {
        let mut map = Map::new(10, 10).unwrap();
        road(&mut map, 6, 5);
        let mover = warrior(0, 0, 5, 5);

        let reach = compute_reachable(&map, [&mover], &mover, &Rules::default());
        assert_eq!(reach.cost(Coord::new(6, 5)), Some(1.0));
    }

    /// Road detour that is cheaper but longer than the direct route over
    /// mountains. The direct route is explored first; the detour must still
    /// win and carry on to the tiles behind it.
    fn detour_map() -> Map {
        let mut map = Map::new(5, 3).unwrap();
        map.set(Coord::new(1, 0), Tile::mountain());
        map.set(Coord::new(1, 1), Tile::mountain());
        for (x, y) in [(0, 0), (0, 1), (1, 2), (2, 1), (2, 0)] {
            road(&mut map, x, y);
        }
        map
    }

    #[test]
    fn test_late_cheaper_route_propagates() {
        let map = detour_map();
        let mut mover = warrior(0, 0, 0, 0);

        for budget in [2, 3, 4] {
            mover.move_points = budget;
            let reach = compute_reachable(&map, [&mover], &mover, &Rules::default());

            assert_eq!(reach.cost(Coord::new(2, 0)), Some(1.0), "budget {budget}");
            assert_eq!(reach.cost(Coord::new(3, 0)), Some(1.75), "budget {budget}");
            assert_eq!(
                reach.path_to(Coord::new(3, 0)),
                vec![
                    Coord::new(0, 1),
                    Coord::new(1, 2),
                    Coord::new(2, 1),
                    Coord::new(3, 0)
                ]
            );
        }
    }

    #[test]
    fn test_larger_budget_keeps_every_tile() {
        let map = detour_map();
        let rules = Rules::default();
        let mut mover = warrior(0, 0, 0, 0);

        mover.move_points = 2;
        let small = compute_reachable(&map, [&mover], &mover, &rules);
        mover.move_points = 3;
        let large = compute_reachable(&map, [&mover], &mover, &rules);

        assert!(small.tiles().iter().all(|&c| large.contains(c)));
        for &coord in small.tiles() {
            assert_eq!(small.cost(coord), large.cost(coord), "{coord}");
        }
    }

    #[test]
    fn test_path_reconstruction() {
        let map = Map::new(10, 10).unwrap();
        let mover = warrior(0, 0, 0, 0);

        let reach = compute_reachable(&map, [&mover], &mover, &Rules::default());
        assert_eq!(
            reach.path_to(Coord::new(2, 0)),
            vec![Coord::new(1, 0), Coord::new(2, 0)]
        );
        assert!(reach.path_to(Coord::new(0, 0)).is_empty());
        assert!(reach.path_to(Coord::new(5, 5)).is_empty());
    }

    #[test]
    fn test_path_between_intermediate_tiles() {
        let map = Map::new(10, 10).unwrap();
        let mover = warrior(0, 0, 0, 0);

        let reach = compute_reachable(&map, [&mover], &mover, &Rules::default());
        assert_eq!(
            reconstruct_path(&reach, Coord::new(1, 0), Coord::new(2, 0)),
            vec![Coord::new(2, 0)]
        );
        // (0, 1) is not on the chain leading to (2, 0)
        assert!(reconstruct_path(&reach, Coord::new(0, 1), Coord::new(2, 0)).is_empty());
    }

    #[test]
    fn test_queries_are_independent() {
        let map = Map::new(10, 10).unwrap();
        let a = warrior(0, 0, 1, 1);
        let b = warrior(1, 1, 8, 8);
        let rules = Rules::default();

        let first = compute_reachable(&map, [&a, &b], &a, &rules);
        let snapshot = first.clone();
        let second = compute_reachable(&map, [&a, &b], &b, &rules);

        assert_eq!(first, snapshot);
        assert!(first.contains(Coord::new(0, 0)));
        assert!(!second.contains(Coord::new(0, 0)));
        assert_eq!(second.unit(), UnitId(1));
    }

    #[test]
    fn test_unit_outside_map() {
        let map = Map::new(5, 5).unwrap();
        let mover = warrior(0, 0, 9, 9);

        let reach = compute_reachable(&map, [&mover], &mover, &Rules::default());
        assert!(reach.is_empty());
        assert!(!reach.contains(Coord::new(4, 4)));
    }
}
