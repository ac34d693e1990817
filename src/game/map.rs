//! Map and tile types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{CityId, CivId};

/// A coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Shift by a signed offset.
    ///
    /// Returns `None` when the result would leave the `u16` range. Map bounds
    /// are not checked here; see [`Map::in_bounds`].
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = u16::try_from(i32::from(self.x) + dx).ok()?;
        let y = u16::try_from(i32::from(self.y) + dy).ok()?;
        Some(Self::new(x, y))
    }

    /// Independent-axis distance: `true` when both `|dx|` and `|dy|` are at most `range`.
    #[must_use]
    pub const fn within(self, other: Self, range: u16) -> bool {
        self.x.abs_diff(other.x) <= range && self.y.abs_diff(other.y) <= range
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Base terrain of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Terrain {
    /// Open ground.
    #[default]
    Plains = 0,
    /// Slow to cross, wide sightline.
    Mountain = 1,
}

impl Terrain {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Terrain::Plains => "Plains",
            Terrain::Mountain => "Mountain",
        }
    }

    /// Map glyph.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Terrain::Plains => '.',
            Terrain::Mountain => '^',
        }
    }
}

/// Improvement or settlement sitting on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Feature {
    /// Nothing built.
    #[default]
    None = 0,
    /// Neutral settlement; becomes a city when captured.
    Village = 1,
    /// City center.
    City = 2,
    /// Wild crop; a farm can be built here.
    Crop = 3,
    /// Farm.
    Farm = 4,
}

impl Feature {
    /// Display name, or `None` for an empty tile.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Feature::None => None,
            Feature::Village => Some("Village"),
            Feature::City => Some("City"),
            Feature::Crop => Some("Crop"),
            Feature::Farm => Some("Farm"),
        }
    }

    /// Map glyph.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Feature::None => ' ',
            Feature::Village => '+',
            Feature::City => '@',
            Feature::Crop => ',',
            Feature::Farm => '#',
        }
    }
}

/// Set of civilizations, one bit per [`CivId`].
///
/// Fixed-size so tiles stay `Copy`; ids must be below [`CivMask::CAPACITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CivMask(u64);

impl CivMask {
    /// Number of distinct civilization ids a mask can hold.
    pub const CAPACITY: usize = 64;

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add a civilization. Ids at or above capacity are ignored.
    pub fn insert(&mut self, civ: CivId) {
        if usize::from(civ) < Self::CAPACITY {
            self.0 |= 1 << civ;
        }
    }

    /// Check membership.
    #[must_use]
    pub const fn contains(self, civ: CivId) -> bool {
        (civ as usize) < Self::CAPACITY && self.0 & (1 << civ) != 0
    }

    /// Check if no civilization is present.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of civilizations present.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate member ids in ascending order.
    pub fn iter(self) -> impl Iterator<Item = CivId> {
        (0..64u8).filter(move |&civ| self.contains(civ))
    }
}

/// A single tile on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    /// Base terrain.
    pub terrain: Terrain,
    /// Improvement or settlement.
    pub feature: Feature,
    /// Whether a road runs through the tile.
    pub road: bool,
    /// City whose territory includes this tile.
    pub city: Option<CityId>,
    /// Civilizations that have ever seen this tile.
    pub discovered_by: CivMask,
}

impl Tile {
    /// Create an empty tile with the given terrain.
    #[must_use]
    pub const fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            feature: Feature::None,
            road: false,
            city: None,
            discovered_by: CivMask::empty(),
        }
    }

    /// Create an empty plains tile.
    #[must_use]
    pub const fn plains() -> Self {
        Self::new(Terrain::Plains)
    }

    /// Create an empty mountain tile.
    #[must_use]
    pub const fn mountain() -> Self {
        Self::new(Terrain::Mountain)
    }

    /// Check whether a civilization has discovered this tile.
    #[must_use]
    pub const fn is_discovered_by(&self, civ: CivId) -> bool {
        self.discovered_by.contains(civ)
    }
}

/// The game map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    /// Width of the map in tiles.
    width: u16,
    /// Height of the map in tiles.
    height: u16,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
}

impl Map {
    /// Create a new map filled with plains tiles.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        Some(Self {
            width,
            height,
            tiles: vec![Tile::plains(); size],
        })
    }

    /// Get the width of the map.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the map.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always `false`; maps have at least one tile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Get a reference to the raw tiles slice in row-major order.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Check if a coordinate is within the map bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Convert a coordinate to an index into the tiles array.
    #[must_use]
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Convert a tile index back to its coordinate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn coord_of(&self, idx: usize) -> Coord {
        let width = usize::from(self.width);
        Coord::new((idx % width) as u16, (idx / width) as u16)
    }

    /// Get a reference to the tile at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Tile> {
        self.index_of(coord).map(|idx| &self.tiles[idx])
    }

    /// Get a mutable reference to the tile at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        self.index_of(coord).map(|idx| &mut self.tiles[idx])
    }

    /// Set the tile at the given coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, tile: Tile) -> bool {
        if let Some(idx) = self.index_of(coord) {
            self.tiles[idx] = tile;
            true
        } else {
            false
        }
    }

    /// In-bounds coordinates of the `(2r+1)²` square around `center`, center included.
    ///
    /// Rows are visited top to bottom, columns left to right. The square is
    /// clipped to the map before iterating, so the cost is bounded by the map
    /// size whatever the radius.
    pub fn square(&self, center: Coord, radius: u16) -> impl Iterator<Item = Coord> + '_ {
        // Inclusive span along one axis; empty (lo > hi) when the center is
        // further than `radius` past the edge.
        let span = |c: u16, limit: u16| {
            let lo = c.saturating_sub(radius);
            let hi = c.saturating_add(radius).min(limit - 1);
            lo..=hi
        };
        let columns = span(center.x, self.width);
        span(center.y, self.height)
            .flat_map(move |y| columns.clone().map(move |x| Coord::new(x, y)))
    }

    /// In-bounds 8-connected neighbors of `center`, in the same order as [`Map::square`].
    pub fn neighbors(&self, center: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.square(center, 1).filter(move |&coord| coord != center)
    }

    /// Iterate over all coordinates and tiles.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(idx, tile)| (self.coord_of(idx), tile))
    }

    /// Tiles claimed by a city.
    pub fn tiles_of_city(&self, city: CityId) -> impl Iterator<Item = (Coord, &Tile)> {
        self.iter().filter(move |(_, tile)| tile.city == Some(city))
    }

    /// Count tiles a civilization has discovered.
    #[must_use]
    pub fn count_discovered(&self, civ: CivId) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.is_discovered_by(civ))
            .count()
    }
}
