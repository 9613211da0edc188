//! Unit state: the single mutable record per combatant.

use super::common::{Facing, Position, ResourceMeter, TeamId, UnitId};
use super::status::StatusEffects;

/// A combatant tracked by the simulation.
///
/// Owned by [`BattleState`](crate::BattleState) and mutated only through the
/// command pipeline; everything else reads it via snapshots or shared
/// references.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub team: TeamId,
    pub position: Position,
    /// Height level of the occupied cell, cached on every move.
    pub height: i8,
    pub facing: Facing,
    pub hp: ResourceMeter,
    pub ap: ResourceMeter,
    /// Turn-order weight; higher acts earlier, ties break by unit id.
    pub initiative: u8,
    /// Base damage of this unit's attacks before modifiers.
    pub attack: u32,
    pub statuses: StatusEffects,
}

impl UnitState {
    /// Derived liveness: a unit is alive while it has hit points.
    #[inline]
    pub fn alive(&self) -> bool {
        !self.hp.is_empty()
    }

    #[inline]
    pub fn is_enemy_of(&self, other: &UnitState) -> bool {
        self.team != other.team
    }

    /// Hit points as a percentage of maximum, rounded down.
    pub fn hp_percent(&self) -> u32 {
        if self.hp.maximum == 0 {
            return 0;
        }
        self.hp.current * 100 / self.hp.maximum
    }
}
