//! Combat resolution.
//!
//! One exchange per attack. Both strikes are sized from health before the
//! exchange: the attacker deals `round(attack * hp / max_hp)`, the defender
//! `round(defense * hp / max_hp)`, so wounded units hit softer. The attacker
//! strikes first. A defender that survives strikes back; a defender that dies
//! gets no counterattack and the attacker advances onto its tile.

use serde::Serialize;

use crate::game::{Coord, Unit};

/// What happened in one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatOutcome {
    /// Damage the attacker dealt.
    pub damage_dealt: i32,
    /// Damage the defender dealt back (0 when it died first).
    pub damage_taken: i32,
    /// The defender dropped to 0 HP or below.
    pub defender_destroyed: bool,
    /// The attacker dropped to 0 HP or below from the counterattack.
    pub attacker_destroyed: bool,
    /// Tile the attacker advanced onto, when the defender was destroyed.
    pub advanced_to: Option<Coord>,
}

/// Resolve one attack, mutating both units.
///
/// Always applicable; adjacency and ownership are the caller's concern. Dead
/// units are left in place with `hp <= 0` for the caller to remove.
pub fn resolve_combat(attacker: &mut Unit, defender: &mut Unit) -> CombatOutcome {
    let damage_dealt = attacker.attack_damage();
    let counter = defender.defense_damage();
    defender.hp -= damage_dealt;

    if defender.is_alive() {
        let damage_taken = counter;
        attacker.hp -= damage_taken;
        let attacker_destroyed = !attacker.is_alive();
        if attacker_destroyed {
            defender.kills += 1;
        }

        CombatOutcome {
            damage_dealt,
            damage_taken,
            defender_destroyed: false,
            attacker_destroyed,
            advanced_to: None,
        }
    } else {
        attacker.position = defender.position;
        attacker.kills += 1;

        CombatOutcome {
            damage_dealt,
            damage_taken: 0,
            defender_destroyed: true,
            attacker_destroyed: false,
            advanced_to: Some(defender.position),
        }
    }
}

/// Kani formal verification proofs.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use crate::game::{Coord, Unit, UnitId};

    /// Prove that both strikes stay within base strength for healthy units.
    #[kani::proof]
    fn prove_damage_bounded_by_strength() {
        let mut unit = Unit::warrior(UnitId(0), 0, Coord::new(0, 0));
        unit.attack = kani::any();
        unit.defense = kani::any();
        unit.max_hp = kani::any();
        unit.hp = kani::any();
        kani::assume(unit.attack >= 0 && unit.attack <= 1_000);
        kani::assume(unit.defense >= 0 && unit.defense <= 1_000);
        kani::assume(unit.max_hp > 0 && unit.max_hp <= 1_000);
        kani::assume(unit.hp > 0 && unit.hp <= unit.max_hp);

        let attack = unit.attack_damage();
        let defense = unit.defense_damage();

        assert!(attack >= 0 && attack <= unit.attack);
        assert!(defense >= 0 && defense <= unit.defense);
    }
}
