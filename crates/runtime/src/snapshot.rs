//! Read-only state views for presentation layers.
//!
//! A snapshot is an owned copy: hosts pull one at their own cadence and
//! render it without holding any borrow into the simulation. Nothing in a
//! snapshot can mutate the core.

use battle_core::{
    BattleState, Facing, ObjectiveOutcome, Position, StatusKind, TeamId, TerrainKind, Tick, UnitId,
};
use serde::{Deserialize, Serialize};

/// Immutable view of one battle at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: Tick,
    pub round: u32,
    pub active_unit: Option<UnitId>,
    pub outcome: Option<ObjectiveOutcome>,
    pub units: Vec<UnitView>,
    pub grid: GridView,
}

/// One unit as seen by a presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub team: TeamId,
    pub position: Position,
    pub height: i8,
    pub facing: Facing,
    pub hp_current: u32,
    pub hp_maximum: u32,
    pub ap_current: u32,
    pub ap_maximum: u32,
    pub alive: bool,
    pub statuses: Vec<StatusView>,
}

/// One active status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub kind: StatusKind,
    pub duration: u8,
    pub magnitude: u8,
}

/// The grid as seen by a presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridView {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<CellView>,
}

/// One cell, row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub terrain: TerrainKind,
    pub height: i8,
    pub occupant: Option<UnitId>,
}

impl Snapshot {
    pub(crate) fn capture(
        state: &BattleState,
        tick: Tick,
        outcome: Option<ObjectiveOutcome>,
    ) -> Self {
        let units = state
            .units()
            .iter()
            .map(|u| UnitView {
                id: u.id,
                team: u.team,
                position: u.position,
                height: u.height,
                facing: u.facing,
                hp_current: u.hp.current,
                hp_maximum: u.hp.maximum,
                ap_current: u.ap.current,
                ap_maximum: u.ap.maximum,
                alive: u.alive(),
                statuses: u
                    .statuses
                    .iter()
                    .map(|e| StatusView {
                        kind: e.kind,
                        duration: e.duration,
                        magnitude: e.magnitude,
                    })
                    .collect(),
            })
            .collect();

        let cells = state
            .grid
            .iter()
            .map(|(_, cell)| CellView {
                terrain: cell.terrain,
                height: cell.height,
                occupant: cell.occupant(),
            })
            .collect();

        Self {
            tick,
            round: state.turn.round,
            active_unit: state.current_unit(),
            outcome,
            units,
            grid: GridView {
                width: state.grid.width(),
                height: state.grid.height(),
                cells,
            },
        }
    }

    /// View of one unit by id.
    pub fn unit(&self, id: UnitId) -> Option<&UnitView> {
        self.units.iter().find(|u| u.id == id)
    }
}
