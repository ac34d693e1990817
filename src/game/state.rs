//! Game state management.
//!
//! [`GameState`] owns every registry (map, civilizations, units, cities) and
//! is the only place that mutates them. Each action validates its
//! preconditions before touching anything, so an `Err` always means the state
//! is unchanged.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ActionError, ActionResult};
use crate::game::{
    City, CityId, CivId, Civilization, CombatOutcome, Coord, Feature, Map, Reachable, Unit,
    UnitId, UnitKind, claim_territory, compute_reachable, resolve_combat, reveal, reveal_along,
    sight_radius,
};
use crate::rules::Rules;
use crate::scenario::Action;

/// Log a rejection and return it.
fn reject<T>(err: ActionError) -> ActionResult<T> {
    debug!(%err, "action rejected");
    Err(err)
}

/// What a successful action did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Outcome {
    /// A unit moved.
    Moved {
        /// The unit.
        unit: UnitId,
        /// Its display name.
        unit_name: String,
        /// Where it started.
        from: Coord,
        /// Steps taken, origin excluded.
        path: Vec<Coord>,
        /// Tiles newly discovered along the way.
        revealed: usize,
    },
    /// One combat exchange.
    Attacked {
        /// The attacking unit.
        attacker: UnitId,
        /// Attacker display name.
        attacker_name: String,
        /// The defending unit.
        defender: UnitId,
        /// Defender display name.
        defender_name: String,
        /// Damage and casualties.
        combat: CombatOutcome,
    },
    /// A village became a city.
    CityFounded {
        /// The new city.
        city: CityId,
        /// Its name.
        name: String,
        /// Founding civilization.
        owner: CivId,
        /// City center.
        at: Coord,
        /// Tiles newly claimed for the city, center included.
        claimed: usize,
    },
    /// A city changed hands.
    CityCaptured {
        /// The city.
        city: CityId,
        /// Its name.
        name: String,
        /// Previous owner.
        from: CivId,
        /// New owner.
        to: CivId,
    },
    /// A farm was built inside a city's territory.
    FarmBuilt {
        /// City owning the tile.
        city: CityId,
        /// The farm tile.
        at: Coord,
        /// Tiles newly claimed by the culture bomb around the farm.
        claimed: usize,
    },
}

impl Outcome {
    /// One-line log message for the player.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Outcome::Moved { unit_name, .. } => format!("You move the {unit_name}."),
            Outcome::Attacked {
                attacker_name,
                defender_name,
                combat,
                ..
            } => {
                if combat.defender_destroyed {
                    format!("Your {attacker_name} destroys the enemy {defender_name}.")
                } else if combat.attacker_destroyed {
                    format!("Your {attacker_name} falls attacking the {defender_name}.")
                } else {
                    format!("Your {attacker_name} attacks the {defender_name}.")
                }
            }
            Outcome::CityFounded { name, .. } => format!("You found {name}."),
            Outcome::CityCaptured { name, .. } => format!("You capture {name}."),
            Outcome::FarmBuilt { .. } => "You build a Farm.".to_string(),
        }
    }
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// The game map. Read through [`GameState::map`] outside the crate.
    pub(crate) map: Map,
    /// Rule constants used by every action.
    pub(crate) rules: Rules,
    /// Registered civilizations.
    civs: Vec<Civilization>,
    /// Active units, iterated in ascending id.
    units: BTreeMap<UnitId, Unit>,
    /// City registry, indexed by [`CityId`]. Cities are never removed.
    cities: Vec<City>,
    /// Cities founded so far per civilization, for naming.
    founded: BTreeMap<CivId, usize>,
    /// Next id handed out by [`GameState::spawn_unit`].
    next_unit_id: u32,
}

impl GameState {
    /// Create a game on the given map with no civilizations or units.
    #[must_use]
    pub fn new(map: Map, rules: Rules) -> Self {
        Self {
            map,
            rules,
            civs: Vec::new(),
            units: BTreeMap::new(),
            cities: Vec::new(),
            founded: BTreeMap::new(),
            next_unit_id: 0,
        }
    }

    /// The game map.
    #[must_use]
    pub const fn map(&self) -> &Map {
        &self.map
    }

    /// Rule constants in effect.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Register a civilization, replacing any existing one with the same id.
    pub fn add_civ(&mut self, civ: Civilization) {
        if let Some(existing) = self.civs.iter_mut().find(|c| c.id == civ.id) {
            *existing = civ;
        } else {
            self.civs.push(civ);
        }
    }

    /// Get a civilization by id.
    #[must_use]
    pub fn civ(&self, id: CivId) -> Option<&Civilization> {
        self.civs.iter().find(|c| c.id == id)
    }

    /// All registered civilizations, in registration order.
    #[must_use]
    pub fn civs(&self) -> &[Civilization] {
        &self.civs
    }

    /// Place a new unit.
    ///
    /// # Errors
    ///
    /// Fails if the owner is unknown, the position is off the map, or another
    /// unit already stands there.
    pub fn spawn_unit(
        &mut self,
        kind: UnitKind,
        owner: CivId,
        position: Coord,
    ) -> ActionResult<UnitId> {
        if self.civ(owner).is_none() {
            return reject(ActionError::UnknownCiv(owner));
        }
        if !self.map.in_bounds(position) {
            return reject(ActionError::OutOfBounds(position));
        }
        if self.unit_at(position).is_some() {
            return reject(ActionError::Occupied(position));
        }

        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        self.units.insert(id, Unit::new(id, kind, owner, position));
        debug!(unit = ?id, owner, position = %position, "unit spawned");
        Ok(id)
    }

    /// Get an active unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Mutable access to an active unit, bypassing every action check.
    #[cfg(test)]
    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// The unit standing on a tile, if any (lowest id first).
    #[must_use]
    pub fn unit_at(&self, coord: Coord) -> Option<&Unit> {
        self.units.values().find(|u| u.position == coord)
    }

    /// All active units in ascending id.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Get a city by id.
    #[must_use]
    pub fn city(&self, id: CityId) -> Option<&City> {
        usize::try_from(id.0).ok().and_then(|idx| self.cities.get(idx))
    }

    /// All cities with their ids, in founding order.
    pub fn cities(&self) -> impl Iterator<Item = (CityId, &City)> {
        self.cities.iter().zip(0u32..).map(|(city, idx)| (CityId(idx), city))
    }

    /// The city whose territory includes `coord`.
    #[must_use]
    pub fn city_at(&self, coord: Coord) -> Option<(CityId, &City)> {
        let id = self.map.get(coord)?.city?;
        self.city(id).map(|city| (id, city))
    }

    /// Reveal the square around `center` for a civilization.
    ///
    /// Returns how many tiles were newly discovered.
    pub fn reveal(&mut self, center: Coord, radius: u16, civ: CivId) -> usize {
        reveal(&mut self.map, center, radius, civ)
    }

    /// Compute the tiles a unit can reach this turn.
    ///
    /// # Errors
    ///
    /// Fails if the unit is not active.
    pub fn compute_reachable(&self, unit: UnitId) -> ActionResult<Reachable> {
        let Some(mover) = self.units.get(&unit) else {
            return reject(ActionError::UnknownUnit(unit));
        };
        Ok(compute_reachable(
            &self.map,
            self.units.values(),
            mover,
            &self.rules,
        ))
    }

    /// Move a unit along its reachable set, revealing every step of the path.
    ///
    /// `reachable` must have been computed for this unit at its current
    /// position. Moving onto the unit's own tile succeeds with an empty path.
    ///
    /// # Errors
    ///
    /// Fails if the unit is unknown, the reachable set is stale, the
    /// destination is off the map or not reachable, or another unit stands
    /// on it.
    pub fn move_unit(
        &mut self,
        unit: UnitId,
        reachable: &Reachable,
        to: Coord,
    ) -> ActionResult<Vec<Coord>> {
        let Some(mover) = self.units.get(&unit) else {
            return reject(ActionError::UnknownUnit(unit));
        };
        if reachable.unit() != unit || reachable.origin() != mover.position {
            return reject(ActionError::StaleReachable {
                unit,
                origin: reachable.origin(),
            });
        }
        if !self.map.in_bounds(to) {
            return reject(ActionError::OutOfBounds(to));
        }
        if !reachable.contains(to) {
            return reject(ActionError::NotReachable(to));
        }
        if to == mover.position {
            return Ok(Vec::new());
        }
        if self.unit_at(to).is_some() {
            return reject(ActionError::Occupied(to));
        }

        let path = reachable.path_to(to);
        if path.is_empty() {
            return reject(ActionError::NotReachable(to));
        }

        let owner = mover.owner;
        if let Some(mover) = self.units.get_mut(&unit) {
            mover.position = to;
        }
        let revealed = reveal_along(&mut self.map, &path, owner, &self.rules);
        debug!(unit = ?unit, to = %to, steps = path.len(), revealed, "unit moved");
        Ok(path)
    }

    /// Resolve one attack and remove any unit that died.
    ///
    /// A lethal attack moves the attacker onto the defender's tile and reveals
    /// around it.
    ///
    /// # Errors
    ///
    /// Fails if either unit is unknown or both ids are the same.
    pub fn attack(&mut self, attacker: UnitId, defender: UnitId) -> ActionResult<CombatOutcome> {
        if attacker == defender {
            return reject(ActionError::SelfAttack(attacker));
        }
        let Some(mut striker) = self.units.get(&attacker).cloned() else {
            return reject(ActionError::UnknownUnit(attacker));
        };
        let Some(mut target) = self.units.get(&defender).cloned() else {
            return reject(ActionError::UnknownUnit(defender));
        };

        let outcome = resolve_combat(&mut striker, &mut target);

        if let Some(at) = outcome.advanced_to {
            let radius = self
                .map
                .get(at)
                .map_or(self.rules.base_sight, |tile| sight_radius(tile.terrain, &self.rules));
            reveal(&mut self.map, at, radius, striker.owner);
        }

        for unit in [striker, target] {
            if unit.is_alive() {
                self.units.insert(unit.id, unit);
            } else {
                info!(unit = ?unit.id, owner = unit.owner, at = %unit.position, "unit destroyed");
                self.units.remove(&unit.id);
            }
        }

        Ok(outcome)
    }

    /// Turn a village into a city for `civ`.
    ///
    /// The center tile gets a road and always belongs to the new city; the
    /// surrounding tiles are claimed first-come. Reveals the city sight radius.
    ///
    /// # Errors
    ///
    /// Fails if the civilization is unknown, the coordinate is off the map, or
    /// the tile is not a village.
    pub fn found_city(&mut self, civ: CivId, at: Coord) -> ActionResult<CityId> {
        self.found(civ, at).map(|(id, _)| id)
    }

    /// Found a city and count the tiles it claimed, center included.
    fn found(&mut self, civ: CivId, at: Coord) -> ActionResult<(CityId, usize)> {
        let Some(founder) = self.civ(civ) else {
            return reject(ActionError::UnknownCiv(civ));
        };
        let Some(tile) = self.map.get(at) else {
            return reject(ActionError::OutOfBounds(at));
        };
        if tile.feature != Feature::Village {
            return reject(ActionError::NotAVillage(at));
        }

        let count = self.founded.get(&civ).copied().unwrap_or(0);
        let city = City::new(founder.city_name(count), civ, at);
        // At most one city per tile, and a map holds fewer than u32::MAX tiles.
        #[allow(clippy::cast_possible_truncation)]
        let id = CityId(self.cities.len() as u32);

        if let Some(tile) = self.map.get_mut(at) {
            tile.feature = Feature::City;
            tile.road = true;
            tile.city = Some(id);
        }
        let claimed = 1 + claim_territory(&mut self.map, id, &city, at, &self.rules).len();
        reveal(&mut self.map, at, self.rules.city_sight, civ);

        info!(city = %city.name, owner = civ, at = %at, claimed, "city founded");
        self.cities.push(city);
        self.founded.insert(civ, count + 1);
        Ok((id, claimed))
    }

    /// Capture a village with a unit: found a city for the unit's owner.
    ///
    /// # Errors
    ///
    /// Fails if the unit is unknown, or for any reason [`GameState::found_city`] fails.
    pub fn capture_village(&mut self, unit: UnitId, at: Coord) -> ActionResult<CityId> {
        self.capture(unit, at).map(|(id, _)| id)
    }

    fn capture(&mut self, unit: UnitId, at: Coord) -> ActionResult<(CityId, usize)> {
        let Some(capturer) = self.units.get(&unit) else {
            return reject(ActionError::UnknownUnit(unit));
        };
        self.found(capturer.owner, at)
    }

    /// Hand the city centered on `at` to the unit's owner.
    ///
    /// Only ownership changes; the tile and territory stay as they are.
    ///
    /// # Errors
    ///
    /// Fails if the unit is unknown, the coordinate is off the map, the tile
    /// is not a city center, or the unit's owner already holds the city.
    pub fn capture_city(&mut self, unit: UnitId, at: Coord) -> ActionResult<CityId> {
        let Some(capturer) = self.units.get(&unit) else {
            return reject(ActionError::UnknownUnit(unit));
        };
        let new_owner = capturer.owner;
        let Some(tile) = self.map.get(at) else {
            return reject(ActionError::OutOfBounds(at));
        };
        let (Feature::City, Some(id)) = (tile.feature, tile.city) else {
            return reject(ActionError::NotACity(at));
        };
        let Some(city) = usize::try_from(id.0)
            .ok()
            .and_then(|idx| self.cities.get_mut(idx))
        else {
            return reject(ActionError::NotACity(at));
        };
        if city.owner == new_owner {
            return reject(ActionError::AlreadyOwner { at, civ: new_owner });
        }

        let previous = city.owner;
        city.owner = new_owner;
        info!(city = %city.name, from = previous, to = new_owner, "city captured");
        Ok(id)
    }

    /// Build a farm on a tile inside a city's territory.
    ///
    /// Re-runs the culture bomb around the farm and reveals around it for the
    /// city's owner.
    ///
    /// # Errors
    ///
    /// Fails if the coordinate is off the map, the tile belongs to no city, or
    /// the tile is the city center.
    pub fn build_farm(&mut self, at: Coord) -> ActionResult<CityId> {
        self.farm(at).map(|(id, _)| id)
    }

    /// Build a farm and count the tiles its culture bomb claimed.
    fn farm(&mut self, at: Coord) -> ActionResult<(CityId, usize)> {
        let Some(tile) = self.map.get(at) else {
            return reject(ActionError::OutOfBounds(at));
        };
        let Some((id, city)) = tile.city.and_then(|id| self.city(id).map(|c| (id, c.clone())))
        else {
            return reject(ActionError::NoOwningCity(at));
        };
        if tile.feature == Feature::City {
            return reject(ActionError::CityCenter(at));
        }

        if let Some(tile) = self.map.get_mut(at) {
            tile.feature = Feature::Farm;
        }
        let claimed = claim_territory(&mut self.map, id, &city, at, &self.rules).len();
        reveal(&mut self.map, at, self.rules.farm_sight, city.owner);

        info!(city = %city.name, at = %at, claimed, "farm built");
        Ok((id, claimed))
    }

    /// Execute one scripted action.
    ///
    /// `Move` computes the unit's reachable set first.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the underlying action; the state is unchanged.
    pub fn apply(&mut self, action: &Action) -> ActionResult<Outcome> {
        match *action {
            Action::Move { unit, to } => {
                let reachable = self.compute_reachable(unit)?;
                let owner = self.units.get(&unit).map_or(0, |u| u.owner);
                let seen_before = self.map.count_discovered(owner);
                let path = self.move_unit(unit, &reachable, to)?;
                Ok(Outcome::Moved {
                    unit,
                    unit_name: self.unit_name(unit),
                    from: reachable.origin(),
                    path,
                    revealed: self.map.count_discovered(owner) - seen_before,
                })
            }
            Action::Attack { attacker, defender } => {
                let attacker_name = self.unit_name(attacker);
                let defender_name = self.unit_name(defender);
                let combat = self.attack(attacker, defender)?;
                Ok(Outcome::Attacked {
                    attacker,
                    attacker_name,
                    defender,
                    defender_name,
                    combat,
                })
            }
            Action::FoundCity { civ, at } => {
                let (city, claimed) = self.found(civ, at)?;
                Ok(self.founded_outcome(city, at, claimed))
            }
            Action::CaptureVillage { unit, at } => {
                let (city, claimed) = self.capture(unit, at)?;
                Ok(self.founded_outcome(city, at, claimed))
            }
            Action::CaptureCity { unit, at } => {
                let previous = self.city_at(at).map(|(_, city)| city.owner);
                let city = self.capture_city(unit, at)?;
                let (name, to) = self
                    .city(city)
                    .map(|c| (c.name.clone(), c.owner))
                    .unwrap_or_default();
                Ok(Outcome::CityCaptured {
                    city,
                    name,
                    from: previous.unwrap_or(to),
                    to,
                })
            }
            Action::BuildFarm { at } => {
                let (city, claimed) = self.farm(at)?;
                Ok(Outcome::FarmBuilt { city, at, claimed })
            }
        }
    }

    fn unit_name(&self, unit: UnitId) -> String {
        self.units
            .get(&unit)
            .map(|u| u.name.clone())
            .unwrap_or_default()
    }

    fn founded_outcome(&self, city: CityId, at: Coord, claimed: usize) -> Outcome {
        let (name, owner) = self
            .city(city)
            .map(|c| (c.name.clone(), c.owner))
            .unwrap_or_default();
        Outcome::CityFounded {
            city,
            name,
            owner,
            at,
            claimed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CivStyle, Terrain, Tile};

    /// Two civilizations, two villages, one warrior each.
    fn sandbox() -> GameState {
        let mut map = Map::new(20, 12).unwrap();
        for at in [Coord::new(5, 5), Coord::new(12, 5)] {
            map.get_mut(at).unwrap().feature = Feature::Village;
        }
        map.get_mut(Coord::new(6, 7)).unwrap().feature = Feature::Crop;

        let mut state = GameState::new(map, Rules::default());
        state.add_civ(Civilization::new(0, "TestCiv", CivStyle::default()).with_city_names(["Rome"]));
        state.add_civ(
            Civilization::new(1, "TestCiv2", CivStyle::default()).with_city_names(["London"]),
        );
        state
            .spawn_unit(UnitKind::Warrior, 0, Coord::new(4, 5))
            .unwrap();
        state
            .spawn_unit(UnitKind::Warrior, 1, Coord::new(7, 5))
            .unwrap();
        state
    }

    #[test]
    fn test_found_city_on_village() {
        let mut state = sandbox();

        let id = state.found_city(0, Coord::new(5, 5)).unwrap();

        let city = state.city(id).unwrap();
        assert_eq!(city.name, "Rome");
        assert_eq!(city.population, 1);
        let tile = state.map.get(Coord::new(5, 5)).unwrap();
        assert_eq!(tile.feature, Feature::City);
        assert!(tile.road);
        assert_eq!(tile.city, Some(id));
        assert_eq!(state.map.tiles_of_city(id).count(), 9);
        // Radius 2 reveal
        assert_eq!(state.map.count_discovered(0), 25);
    }

    #[test]
    fn test_found_city_rejected_leaves_state_untouched() {
        let mut state = sandbox();
        let before = state.clone();

        assert_eq!(
            state.found_city(0, Coord::new(6, 6)),
            Err(ActionError::NotAVillage(Coord::new(6, 6)))
        );
        assert_eq!(
            state.found_city(9, Coord::new(5, 5)),
            Err(ActionError::UnknownCiv(9))
        );
        assert_eq!(
            state.found_city(0, Coord::new(40, 5)),
            Err(ActionError::OutOfBounds(Coord::new(40, 5)))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_city_names_follow_list_then_fallback() {
        let mut state = sandbox();
        let first = state.found_city(0, Coord::new(5, 5)).unwrap();
        let second = state.found_city(0, Coord::new(12, 5)).unwrap();

        assert_eq!(state.city(first).unwrap().name, "Rome");
        assert_eq!(state.city(second).unwrap().name, "TestCiv 2");
    }

    #[test]
    fn test_city_center_always_belongs_to_its_city() {
        let mut state = sandbox();
        state.map.get_mut(Coord::new(6, 5)).unwrap().feature = Feature::Village;
        let rome = state.found_city(0, Coord::new(5, 5)).unwrap();

        // (6, 5) is inside Rome's territory
        let london = state.found_city(1, Coord::new(6, 5)).unwrap();

        assert_eq!(state.map.get(Coord::new(6, 5)).unwrap().city, Some(london));
        assert_eq!(state.map.get(Coord::new(6, 4)).unwrap().city, Some(rome));
        assert_eq!(state.map.get(Coord::new(7, 5)).unwrap().city, Some(london));
    }

    #[test]
    fn test_capture_village_founds_for_unit_owner() {
        let mut state = sandbox();
        let id = state.capture_village(UnitId(1), Coord::new(12, 5)).unwrap();

        assert_eq!(state.city(id).unwrap().owner, 1);
        assert_eq!(state.city(id).unwrap().name, "London");
        assert_eq!(
            state.capture_village(UnitId(7), Coord::new(5, 5)),
            Err(ActionError::UnknownUnit(UnitId(7)))
        );
    }

    #[test]
    fn test_capture_city() {
        let mut state = sandbox();
        let id = state.found_city(0, Coord::new(5, 5)).unwrap();

        assert_eq!(
            state.capture_city(UnitId(0), Coord::new(5, 5)),
            Err(ActionError::AlreadyOwner {
                at: Coord::new(5, 5),
                civ: 0
            })
        );
        assert_eq!(
            state.capture_city(UnitId(1), Coord::new(5, 4)),
            Err(ActionError::NotACity(Coord::new(5, 4)))
        );

        let territory_before: Vec<_> = state.map.tiles_of_city(id).map(|(c, _)| c).collect();
        assert_eq!(state.capture_city(UnitId(1), Coord::new(5, 5)), Ok(id));

        assert_eq!(state.city(id).unwrap().owner, 1);
        assert_eq!(state.map.get(Coord::new(5, 5)).unwrap().feature, Feature::City);
        let territory_after: Vec<_> = state.map.tiles_of_city(id).map(|(c, _)| c).collect();
        assert_eq!(territory_before, territory_after);
    }

    #[test]
    fn test_build_farm() {
        let mut state = sandbox();
        assert_eq!(
            state.build_farm(Coord::new(6, 7)),
            Err(ActionError::NoOwningCity(Coord::new(6, 7)))
        );

        let id = state.found_city(0, Coord::new(5, 5)).unwrap();
        assert_eq!(
            state.build_farm(Coord::new(5, 5)),
            Err(ActionError::CityCenter(Coord::new(5, 5)))
        );

        // (6, 6) is claimed; the square around it reaches (7, 7), inside range
        assert_eq!(state.build_farm(Coord::new(6, 6)), Ok(id));
        assert_eq!(state.map.get(Coord::new(6, 6)).unwrap().feature, Feature::Farm);
        assert_eq!(state.map.get(Coord::new(7, 7)).unwrap().city, Some(id));
        assert_eq!(state.map.tiles_of_city(id).count(), 14);
    }

    #[test]
    fn test_build_farm_reveals_for_city_owner() {
        let mut state = sandbox();
        let id = state.found_city(0, Coord::new(5, 5)).unwrap();
        state.capture_city(UnitId(1), Coord::new(5, 5)).unwrap();

        state.build_farm(Coord::new(6, 6)).unwrap();

        assert_eq!(state.city(id).unwrap().owner, 1);
        assert!(state.map.get(Coord::new(7, 7)).unwrap().is_discovered_by(1));
    }

    #[test]
    fn test_move_unit_reveals_path() {
        let mut state = sandbox();
        state.map.set(Coord::new(3, 4), Tile::new(Terrain::Mountain));
        let reach = state.compute_reachable(UnitId(0)).unwrap();

        let path = state.move_unit(UnitId(0), &reach, Coord::new(3, 4)).unwrap();

        assert_eq!(path, vec![Coord::new(3, 4)]);
        assert_eq!(state.unit(UnitId(0)).unwrap().position, Coord::new(3, 4));
        // Mountain step reveals radius 2
        assert!(state.map.get(Coord::new(1, 2)).unwrap().is_discovered_by(0));
        assert!(!state.map.get(Coord::new(1, 2)).unwrap().is_discovered_by(1));
    }

    #[test]
    fn test_move_unit_rejections() {
        let mut state = sandbox();
        let reach = state.compute_reachable(UnitId(0)).unwrap();
        let other = state.compute_reachable(UnitId(1)).unwrap();
        let before = state.clone();

        assert_eq!(
            state.move_unit(UnitId(0), &reach, Coord::new(9, 5)),
            Err(ActionError::NotReachable(Coord::new(9, 5)))
        );
        assert!(matches!(
            state.move_unit(UnitId(0), &other, Coord::new(5, 5)),
            Err(ActionError::StaleReachable { .. })
        ));
        assert_eq!(
            state.move_unit(UnitId(0), &reach, Coord::new(99, 5)),
            Err(ActionError::OutOfBounds(Coord::new(99, 5)))
        );
        assert_eq!(state, before);

        // Same-tile move succeeds without doing anything
        assert_eq!(state.move_unit(UnitId(0), &reach, Coord::new(4, 5)), Ok(Vec::new()));
        assert_eq!(state, before);
    }

    #[test]
    fn test_move_onto_enemy_is_occupied() {
        let mut state = sandbox();
        state.units.get_mut(&UnitId(0)).unwrap().position = Coord::new(6, 5);
        let reach = state.compute_reachable(UnitId(1)).unwrap();

        // Enemy tiles are reachable; taking them happens through combat
        assert!(reach.contains(Coord::new(6, 5)));
        assert_eq!(
            state.move_unit(UnitId(1), &reach, Coord::new(6, 5)),
            Err(ActionError::Occupied(Coord::new(6, 5)))
        );
        assert_eq!(state.unit(UnitId(1)).unwrap().position, Coord::new(7, 5));
    }

    #[test]
    fn test_stale_after_move() {
        let mut state = sandbox();
        let reach = state.compute_reachable(UnitId(0)).unwrap();
        state.move_unit(UnitId(0), &reach, Coord::new(3, 5)).unwrap();

        assert!(matches!(
            state.move_unit(UnitId(0), &reach, Coord::new(2, 5)),
            Err(ActionError::StaleReachable { .. })
        ));
    }

    #[test]
    fn test_lethal_attack_removes_defender_and_reveals() {
        let mut state = sandbox();
        state.units.get_mut(&UnitId(1)).unwrap().hp = 2;

        let outcome = state.attack(UnitId(0), UnitId(1)).unwrap();

        assert!(outcome.defender_destroyed);
        assert!(state.unit(UnitId(1)).is_none());
        let attacker = state.unit(UnitId(0)).unwrap();
        assert_eq!(attacker.position, Coord::new(7, 5));
        assert_eq!(attacker.kills, 1);
        assert!(state.map.get(Coord::new(8, 6)).unwrap().is_discovered_by(0));
    }

    #[test]
    fn test_attack_rejections() {
        let mut state = sandbox();
        let before = state.clone();

        assert_eq!(
            state.attack(UnitId(0), UnitId(0)),
            Err(ActionError::SelfAttack(UnitId(0)))
        );
        assert_eq!(
            state.attack(UnitId(0), UnitId(5)),
            Err(ActionError::UnknownUnit(UnitId(5)))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_counter_kill_removes_attacker_only() {
        let mut state = sandbox();
        state.units.get_mut(&UnitId(0)).unwrap().hp = 1;

        let outcome = state.attack(UnitId(0), UnitId(1)).unwrap();

        assert!(outcome.attacker_destroyed);
        assert!(state.unit(UnitId(0)).is_none());
        assert_eq!(state.unit(UnitId(1)).unwrap().kills, 1);
        assert_eq!(state.units().count(), 1);
    }

    #[test]
    fn test_spawn_unit_rejections() {
        let mut state = sandbox();
        assert_eq!(
            state.spawn_unit(UnitKind::Warrior, 0, Coord::new(4, 5)),
            Err(ActionError::Occupied(Coord::new(4, 5)))
        );
        assert_eq!(
            state.spawn_unit(UnitKind::Warrior, 3, Coord::new(1, 1)),
            Err(ActionError::UnknownCiv(3))
        );
        assert_eq!(
            state.spawn_unit(UnitKind::Warrior, 0, Coord::new(1, 1)),
            Ok(UnitId(2))
        );
    }

    #[test]
    fn test_apply_move_message() {
        let mut state = sandbox();
        let outcome = state
            .apply(&Action::Move {
                unit: UnitId(0),
                to: Coord::new(3, 3),
            })
            .unwrap();

        assert_eq!(outcome.message(), "You move the Warrior.");
        assert!(matches!(outcome, Outcome::Moved { ref path, .. } if path.len() == 2));
    }

    #[test]
    fn test_apply_reports_newly_claimed_tiles() {
        let mut state = sandbox();
        let claimed = |outcome: Outcome| match outcome {
            Outcome::CityFounded { claimed, .. } | Outcome::FarmBuilt { claimed, .. } => claimed,
            other => panic!("unexpected outcome {other:?}"),
        };

        let rome = state.apply(&Action::FoundCity { civ: 0, at: Coord::new(5, 5) }).unwrap();
        assert_eq!(claimed(rome), 9);
        assert_eq!(state.map.tiles_of_city(CityId(0)).count(), 9);

        // (7, 5), (7, 6), (7, 7), (5, 7) and (6, 7) are new
        let farm = state.apply(&Action::BuildFarm { at: Coord::new(6, 6) }).unwrap();
        assert_eq!(claimed(farm), 5);
        assert_eq!(state.map.tiles_of_city(CityId(0)).count(), 14);

        // Only the row below (6, 7) is new
        let farm = state.apply(&Action::BuildFarm { at: Coord::new(6, 7) }).unwrap();
        assert_eq!(claimed(farm), 3);
        assert_eq!(state.map.tiles_of_city(CityId(0)).count(), 17);
    }

    #[test]
    fn test_apply_found_and_capture() {
        let mut state = sandbox();
        let founded = state
            .apply(&Action::CaptureVillage {
                unit: UnitId(0),
                at: Coord::new(5, 5),
            })
            .unwrap();
        assert_eq!(founded.message(), "You found Rome.");

        let captured = state
            .apply(&Action::CaptureCity {
                unit: UnitId(1),
                at: Coord::new(5, 5),
            })
            .unwrap();
        assert_eq!(
            captured,
            Outcome::CityCaptured {
                city: CityId(0),
                name: "Rome".to_string(),
                from: 0,
                to: 1,
            }
        );
    }
}
