//! Authoritative battle state representation.
//!
//! This module owns the data structures that describe units, the grid, and
//! turn bookkeeping. Runtime layers clone or query this state but mutate it
//! exclusively through the command pipeline ([`BattleState::submit`]).
pub mod turn;
pub mod types;

pub use turn::TurnState;
pub use types::{
    AttackArc, Cell, Facing, GridState, Position, ResourceMeter, StatusEffect, StatusEffects,
    StatusKind, TeamId, TerrainKind, Tick, UnitId, UnitState,
};

use crate::rng::SimRng;

/// Canonical snapshot of the deterministic battle state.
///
/// One value per battle; nothing here is process-global, so any number of
/// independent simulations can run side by side.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// RNG seed recorded at initialization, kept for the replay log.
    pub seed: u64,

    /// Random stream, advanced only while applying commands.
    pub rng: SimRng,

    /// Applied-command counter.
    pub nonce: u64,

    /// Turn bookkeeping: initiative order, cursor, round.
    pub turn: TurnState,

    /// All units, in scenario order. Dead units are retained with zero hit
    /// points so ids stay resolvable for events and objectives.
    units: Vec<UnitState>,

    /// Terrain, height, and occupancy.
    pub grid: GridState,
}

/// Errors from assembling a state out of scenario parts.
///
/// Ingestion validates descriptors up front, so hitting one of these means
/// the caller skipped validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitializationError {
    #[error("unit {unit} cannot be placed at {position}")]
    UnplaceableUnit {
        unit: UnitId,
        position: Position,
    },

    #[error("duplicate unit id {unit}")]
    DuplicateUnit { unit: UnitId },
}

impl BattleState {
    /// Builds a battle from pre-validated parts: places every unit on the
    /// grid and freezes the initiative order (initiative descending, unit id
    /// ascending).
    pub fn new(
        seed: u64,
        mut grid: GridState,
        units: Vec<UnitState>,
    ) -> Result<Self, InitializationError> {
        for (i, unit) in units.iter().enumerate() {
            if units[..i].iter().any(|u| u.id == unit.id) {
                return Err(InitializationError::DuplicateUnit { unit: unit.id });
            }
            if !grid.place(unit.position, unit.id) {
                return Err(InitializationError::UnplaceableUnit {
                    unit: unit.id,
                    position: unit.position,
                });
            }
        }

        let mut order: Vec<UnitId> = units.iter().map(|u| u.id).collect();
        order.sort_by_key(|&id| {
            let unit = units.iter().find(|u| u.id == id).map(|u| u.initiative);
            (std::cmp::Reverse(unit.unwrap_or(0)), id)
        });

        Ok(Self {
            seed,
            rng: SimRng::new(seed),
            nonce: 0,
            turn: TurnState::new(order),
            units,
            grid,
        })
    }

    /// Looks up a unit by id.
    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.units.iter().find(|u| u.id == id)
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// All units in scenario order, dead ones included.
    pub fn units(&self) -> &[UnitState] {
        &self.units
    }

    /// Live units in scenario order.
    pub fn live_units(&self) -> impl Iterator<Item = &UnitState> {
        self.units.iter().filter(|u| u.alive())
    }

    /// Live units of one team.
    pub fn live_units_of_team(&self, team: TeamId) -> impl Iterator<Item = &UnitState> {
        self.live_units().filter(move |u| u.team == team)
    }

    /// The unit whose turn is active.
    ///
    /// The initiative cursor can rest on a unit that died outside its own
    /// turn; [`advance_turn`](Self::advance_turn) skips it. Callers asking
    /// mid-turn get the raw cursor value.
    pub fn current_unit(&self) -> Option<UnitId> {
        self.turn.current_unit()
    }

    /// Steps the initiative cursor to the next live unit, wrapping rounds as
    /// needed. Returns `None` when no live units remain.
    pub fn advance_turn(&mut self) -> Option<UnitId> {
        if !self.units.iter().any(|u| u.alive()) {
            return None;
        }
        for _ in 0..=self.turn.order.len() {
            let next = self.turn.step()?;
            if self.unit(next).is_some_and(|u| u.alive()) {
                return Some(next);
            }
        }
        None
    }

    /// Skips the cursor forward if it currently rests on a dead unit.
    pub fn ensure_live_current(&mut self) -> Option<UnitId> {
        match self.current_unit() {
            Some(id) if self.unit(id).is_some_and(|u| u.alive()) => Some(id),
            Some(_) => self.advance_turn(),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: u32, team: u8, pos: Position, initiative: u8) -> UnitState {
        UnitState {
            id: UnitId(id),
            team: TeamId(team),
            position: pos,
            height: 0,
            facing: Facing::North,
            hp: ResourceMeter::full(10),
            ap: ResourceMeter::full(6),
            initiative,
            attack: 3,
            statuses: StatusEffects::empty(),
        }
    }

    #[test]
    fn initiative_order_descending_with_id_tiebreak() {
        let grid = GridState::filled(4, 4, TerrainKind::Open);
        let units = vec![
            unit(1, 0, Position::new(0, 0), 5),
            unit(2, 1, Position::new(1, 0), 9),
            unit(3, 1, Position::new(2, 0), 5),
        ];
        let state = BattleState::new(0, grid, units).unwrap();
        assert_eq!(
            state.turn.order,
            vec![UnitId(2), UnitId(1), UnitId(3)],
            "initiative desc, id asc on ties"
        );
    }

    #[test]
    fn duplicate_ids_rejected() {
        let grid = GridState::filled(4, 4, TerrainKind::Open);
        let units = vec![
            unit(1, 0, Position::new(0, 0), 1),
            unit(1, 1, Position::new(1, 0), 1),
        ];
        assert_eq!(
            BattleState::new(0, grid, units),
            Err(InitializationError::DuplicateUnit { unit: UnitId(1) })
        );
    }

    #[test]
    fn overlapping_placement_rejected() {
        let grid = GridState::filled(4, 4, TerrainKind::Open);
        let units = vec![
            unit(1, 0, Position::new(0, 0), 1),
            unit(2, 1, Position::new(0, 0), 1),
        ];
        assert!(matches!(
            BattleState::new(0, grid, units),
            Err(InitializationError::UnplaceableUnit { .. })
        ));
    }

    #[test]
    fn advance_skips_dead_units() {
        let grid = GridState::filled(4, 4, TerrainKind::Open);
        let units = vec![
            unit(1, 0, Position::new(0, 0), 3),
            unit(2, 1, Position::new(1, 0), 2),
            unit(3, 0, Position::new(2, 0), 1),
        ];
        let mut state = BattleState::new(0, grid, units).unwrap();
        state.unit_mut(UnitId(2)).unwrap().hp.deplete(10);

        assert_eq!(state.current_unit(), Some(UnitId(1)));
        assert_eq!(state.advance_turn(), Some(UnitId(3)));
    }
}
