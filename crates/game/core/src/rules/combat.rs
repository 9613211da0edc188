//! Combat resolution: positional modifiers and the damage formula.
//!
//! # Formula
//!
//! ```text
//! height_bonus = clamp(attacker_height - defender_height, -2, 2)
//! arc_bonus    = Front: 0, Flank: +1, Rear: +2
//! variance     = rng.range(0, 1)
//! damage       = max(0, base + height_bonus + arc_bonus + variance)
//! ```
//!
//! Damage floors at zero; hit-point flooring and kill bookkeeping belong to
//! the command pipeline.

use crate::config::BattleConfig;
use crate::rng::SimRng;
use crate::state::{AttackArc, Facing, UnitState};

/// Fully resolved attack, before it is applied to the defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackResolution {
    pub arc: AttackArc,
    pub damage: u32,
}

/// Height advantage term, clamped to ±[`BattleConfig::HEIGHT_BONUS_CLAMP`]
/// levels. Attacking downhill adds damage, uphill subtracts.
pub fn height_bonus(attacker_height: i8, defender_height: i8) -> i32 {
    (attacker_height as i32 - defender_height as i32).clamp(
        -BattleConfig::HEIGHT_BONUS_CLAMP,
        BattleConfig::HEIGHT_BONUS_CLAMP,
    )
}

/// Flat bonus for bypassing the defender's guard.
pub fn arc_bonus(arc: AttackArc) -> i32 {
    match arc {
        AttackArc::Front => 0,
        AttackArc::Flank => BattleConfig::FLANK_BONUS,
        AttackArc::Rear => BattleConfig::REAR_BONUS,
    }
}

/// Combines the damage terms, flooring at zero.
pub fn calculate_damage(base: u32, height_bonus: i32, arc_bonus: i32, variance: u32) -> u32 {
    (base as i32 + height_bonus + arc_bonus + variance as i32).max(0) as u32
}

/// Resolves an attack between two units, drawing variance from `rng`.
///
/// The attack direction is the dominant-axis direction from the defender
/// toward the attacker; the defender's facing classifies it into an arc.
pub fn resolve_attack(
    attacker: &UnitState,
    defender: &UnitState,
    rng: &mut SimRng,
) -> AttackResolution {
    let attack_dir = Facing::between(defender.position, attacker.position);
    let arc = defender.facing.arc_from(attack_dir);
    let variance = rng.range(0, BattleConfig::VARIANCE_MAX);
    let damage = calculate_damage(
        attacker.attack,
        height_bonus(attacker.height, defender.height),
        arc_bonus(arc),
        variance,
    );
    AttackResolution { arc, damage }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_bonus_clamps() {
        assert_eq!(height_bonus(2, 0), 2);
        assert_eq!(height_bonus(5, 0), 2);
        assert_eq!(height_bonus(0, 5), -2);
        assert_eq!(height_bonus(1, 1), 0);
    }

    #[test]
    fn arc_bonuses() {
        assert_eq!(arc_bonus(AttackArc::Front), 0);
        assert_eq!(arc_bonus(AttackArc::Flank), 1);
        assert_eq!(arc_bonus(AttackArc::Rear), 2);
    }

    #[test]
    fn damage_floors_at_zero() {
        // Base 1 attacked from two levels below with no arc bonus.
        assert_eq!(calculate_damage(1, -2, 0, 0), 0);
        assert_eq!(calculate_damage(0, -2, 0, 1), 0);
    }

    #[test]
    fn flank_and_height_beat_frontal() {
        let frontal = calculate_damage(3, 0, arc_bonus(AttackArc::Front), 0);
        let elevated_flank = calculate_damage(3, 2, arc_bonus(AttackArc::Flank), 0);
        assert_eq!(frontal, 3);
        assert_eq!(elevated_flank, 6);
        assert!(elevated_flank > frontal);
    }
}
