//! Units.

use serde::{Deserialize, Serialize};

use crate::game::{CivId, Coord};

/// Unique identifier for a unit. Never reused within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

/// Kind of unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Basic melee unit.
    #[default]
    Warrior,
}

impl UnitKind {
    /// Map glyph.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            UnitKind::Warrior => 'w',
        }
    }

    /// Movement budget per turn for units of this kind.
    #[must_use]
    pub const fn move_points(self) -> u32 {
        match self {
            UnitKind::Warrior => 2,
        }
    }
}

/// A mobile actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Unique identifier.
    pub id: UnitId,
    /// Display name.
    pub name: String,
    /// Kind of unit.
    pub kind: UnitKind,
    /// Current hit points. The unit is destroyed at zero or below.
    pub hp: i32,
    /// Full-health hit points.
    pub max_hp: i32,
    /// Damage dealt when attacking at full health.
    pub attack: i32,
    /// Damage dealt when counterattacking at full health.
    pub defense: i32,
    /// Enemy units destroyed.
    pub kills: u32,
    /// Current position.
    pub position: Coord,
    /// Owning civilization.
    pub owner: CivId,
    /// Movement budget per turn.
    pub move_points: u32,
}

impl Unit {
    /// Create a unit of the given kind with that kind's starting stats.
    #[must_use]
    pub fn new(id: UnitId, kind: UnitKind, owner: CivId, position: Coord) -> Self {
        match kind {
            UnitKind::Warrior => Self::warrior(id, owner, position),
        }
    }

    /// Create a warrior: 4 HP, 3 attack, 3 defense, 2 movement.
    #[must_use]
    pub fn warrior(id: UnitId, owner: CivId, position: Coord) -> Self {
        Self {
            id,
            name: "Warrior".to_string(),
            kind: UnitKind::Warrior,
            hp: 4,
            max_hp: 4,
            attack: 3,
            defense: 3,
            kills: 0,
            position,
            owner,
            move_points: UnitKind::Warrior.move_points(),
        }
    }

    /// Check whether the unit still has hit points.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Damage this unit deals when striking first.
    ///
    /// Scales with remaining health: `round(attack * hp / max_hp)`.
    #[must_use]
    pub fn attack_damage(&self) -> i32 {
        scaled_damage(self.attack, self.hp, self.max_hp)
    }

    /// Damage this unit deals when striking back.
    ///
    /// Scales with remaining health: `round(defense * hp / max_hp)`.
    #[must_use]
    pub fn defense_damage(&self) -> i32 {
        scaled_damage(self.defense, self.hp, self.max_hp)
    }
}

/// `round(strength * hp / max_hp)`, rounding half away from zero.
#[allow(clippy::cast_possible_truncation)]
fn scaled_damage(strength: i32, hp: i32, max_hp: i32) -> i32 {
    if max_hp <= 0 {
        return 0;
    }
    (f64::from(strength) * (f64::from(hp) / f64::from(max_hp))).round() as i32
}
