//! Scenario ingestion: the external-collaborator boundary.
//!
//! A [`ScenarioDescriptor`] is the initial-state value an external loader
//! hands the runtime — the runtime itself never parses scenario files (the
//! CLI driver deserializes RON at the process edge). Validation happens
//! before the first tick; a descriptor that fails it aborts the run.

use std::collections::BTreeMap;

use battle_core::{
    BattleState, Cell, Facing, GridState, InitializationError, Objective, ObjectiveTracker,
    Position, ResourceMeter, StatusEffects, TeamId, TerrainKind, UnitId, UnitState,
};
use serde::{Deserialize, Serialize};

use crate::ai::presets;
use crate::controller::Controller;

/// Complete initial-state description of one battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    pub name: String,
    pub grid: GridDescriptor,
    pub units: Vec<UnitDescriptor>,
    /// Team whose elimination is an implicit defeat.
    pub player_team: TeamId,
    /// Objective whose completion wins the battle.
    pub victory: Objective,
    /// Objective whose completion loses the battle.
    pub defeat: Objective,
}

/// Grid layout: dimensions plus row-major cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDescriptor {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<CellDescriptor>,
}

impl GridDescriptor {
    /// Uniform open terrain at height zero.
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![CellDescriptor::default(); (width * height) as usize],
        }
    }

    /// Row-major cell lookup, `None` out of bounds.
    pub fn cell(&self, position: Position) -> Option<&CellDescriptor> {
        if position.x < 0
            || position.y < 0
            || position.x >= self.width as i32
            || position.y >= self.height as i32
        {
            return None;
        }
        self.cells
            .get((position.y as u32 * self.width + position.x as u32) as usize)
    }

    /// Overwrites one cell; no-op out of bounds. Builder-style helper for
    /// tests and generated scenarios.
    pub fn set(&mut self, position: Position, cell: CellDescriptor) {
        if position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
        {
            let index = (position.y as u32 * self.width + position.x as u32) as usize;
            self.cells[index] = cell;
        }
    }
}

/// One cell of the scenario grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDescriptor {
    pub terrain: TerrainKind,
    pub height: i8,
}

impl CellDescriptor {
    pub fn new(terrain: TerrainKind, height: i8) -> Self {
        Self { terrain, height }
    }
}

/// Initial description of one unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub id: UnitId,
    pub team: TeamId,
    pub position: Position,
    pub facing: Facing,
    pub max_hp: u32,
    pub attack: u32,
    pub initiative: u8,
    pub controller: ControllerKind,
}

/// Closed set of controller archetypes a scenario can assign.
///
/// New personalities are new parameterizations or new preset trees over the
/// existing node vocabulary, not new variants of runtime polymorphism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerKind {
    /// Commands injected by the host.
    Player,
    Aggressive,
    Cautious { flee_percent: u32 },
    Skirmisher { poison_range: u32 },
    Dummy,
}

impl ControllerKind {
    fn build(self) -> Controller {
        match self {
            ControllerKind::Player => Controller::player(),
            ControllerKind::Aggressive => Controller::ai(presets::aggressive()),
            ControllerKind::Cautious { flee_percent } => {
                Controller::ai(presets::cautious(flee_percent))
            }
            ControllerKind::Skirmisher { poison_range } => {
                Controller::ai(presets::skirmisher(poison_range))
            }
            ControllerKind::Dummy => Controller::ai(presets::dummy()),
        }
    }
}

/// Fatal pre-start validation failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("scenario could not be parsed: {message}")]
    Parse { message: String },

    #[error("grid has zero area")]
    EmptyGrid,

    #[error("grid declares {expected} cells but carries {actual}")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error("scenario has no units")]
    NoUnits,

    #[error("duplicate unit id {unit}")]
    DuplicateUnitId { unit: UnitId },

    #[error("unit {unit} placed out of bounds at {position}")]
    OutOfBounds { unit: UnitId, position: Position },

    #[error("unit {unit} placed on impassable terrain at {position}")]
    ImpassablePlacement { unit: UnitId, position: Position },

    #[error("unit {unit} placed on an already occupied cell {position}")]
    PlacementConflict { unit: UnitId, position: Position },

    #[error("unit {unit} has zero hit points")]
    ZeroHitPoints { unit: UnitId },

    #[error("player team {team} has no units")]
    EmptyPlayerTeam { team: TeamId },

    #[error("objective references unknown unit {unit}")]
    UnknownObjectiveUnit { unit: UnitId },

    #[error("objective references team {team}, which has no units")]
    UnknownObjectiveTeam { team: TeamId },

    #[error("objective references cell {position} outside the grid")]
    ZoneOutOfBounds { position: Position },
}

impl IngestError {
    /// Stable code for process exit mapping.
    pub fn error_code(&self) -> &'static str {
        match self {
            IngestError::Parse { .. } => "INGEST_PARSE",
            IngestError::EmptyGrid => "INGEST_EMPTY_GRID",
            IngestError::CellCountMismatch { .. } => "INGEST_CELL_COUNT_MISMATCH",
            IngestError::NoUnits => "INGEST_NO_UNITS",
            IngestError::DuplicateUnitId { .. } => "INGEST_DUPLICATE_UNIT_ID",
            IngestError::OutOfBounds { .. } => "INGEST_OUT_OF_BOUNDS",
            IngestError::ImpassablePlacement { .. } => "INGEST_IMPASSABLE_PLACEMENT",
            IngestError::PlacementConflict { .. } => "INGEST_PLACEMENT_CONFLICT",
            IngestError::ZeroHitPoints { .. } => "INGEST_ZERO_HIT_POINTS",
            IngestError::EmptyPlayerTeam { .. } => "INGEST_EMPTY_PLAYER_TEAM",
            IngestError::UnknownObjectiveUnit { .. } => "INGEST_UNKNOWN_OBJECTIVE_UNIT",
            IngestError::UnknownObjectiveTeam { .. } => "INGEST_UNKNOWN_OBJECTIVE_TEAM",
            IngestError::ZoneOutOfBounds { .. } => "INGEST_ZONE_OUT_OF_BOUNDS",
        }
    }
}

impl ScenarioDescriptor {
    /// Parses a descriptor from RON text. File handling stays with the
    /// external loader; this is the value boundary.
    pub fn from_ron(text: &str) -> Result<Self, IngestError> {
        ron::from_str(text).map_err(|e| IngestError::Parse {
            message: e.to_string(),
        })
    }

    /// Serializes the descriptor to RON text.
    pub fn to_ron(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .expect("scenario serialization should not fail")
    }

    /// Checks the descriptor for internal consistency.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(IngestError::EmptyGrid);
        }
        let expected = (self.grid.width * self.grid.height) as usize;
        if self.grid.cells.len() != expected {
            return Err(IngestError::CellCountMismatch {
                expected,
                actual: self.grid.cells.len(),
            });
        }
        if self.units.is_empty() {
            return Err(IngestError::NoUnits);
        }

        for (i, unit) in self.units.iter().enumerate() {
            if self.units[..i].iter().any(|u| u.id == unit.id) {
                return Err(IngestError::DuplicateUnitId { unit: unit.id });
            }
            let Some(cell) = self.grid.cell(unit.position) else {
                return Err(IngestError::OutOfBounds {
                    unit: unit.id,
                    position: unit.position,
                });
            };
            if !cell.terrain.is_passable() {
                return Err(IngestError::ImpassablePlacement {
                    unit: unit.id,
                    position: unit.position,
                });
            }
            if self.units[..i].iter().any(|u| u.position == unit.position) {
                return Err(IngestError::PlacementConflict {
                    unit: unit.id,
                    position: unit.position,
                });
            }
            if unit.max_hp == 0 {
                return Err(IngestError::ZeroHitPoints { unit: unit.id });
            }
        }

        if !self.units.iter().any(|u| u.team == self.player_team) {
            return Err(IngestError::EmptyPlayerTeam {
                team: self.player_team,
            });
        }

        for objective in [&self.victory, &self.defeat] {
            let mut referenced_units = Vec::new();
            objective.referenced_units(&mut referenced_units);
            for unit in referenced_units {
                if !self.units.iter().any(|u| u.id == unit) {
                    return Err(IngestError::UnknownObjectiveUnit { unit });
                }
            }

            let mut referenced_teams = Vec::new();
            objective.referenced_teams(&mut referenced_teams);
            for team in referenced_teams {
                if !self.units.iter().any(|u| u.team == team) {
                    return Err(IngestError::UnknownObjectiveTeam { team });
                }
            }

            let mut zones = Vec::new();
            objective.referenced_zones(&mut zones);
            for position in zones {
                if self.grid.cell(position).is_none() {
                    return Err(IngestError::ZoneOutOfBounds { position });
                }
            }
        }

        Ok(())
    }

    /// Builds the initial battle state. Callers validate first; placement
    /// errors the validator would have caught map back to ingest errors.
    pub(crate) fn build_state(&self, seed: u64) -> Result<BattleState, IngestError> {
        let cells = self
            .grid
            .cells
            .iter()
            .map(|c| Cell::new(c.terrain, c.height))
            .collect();
        let grid = GridState::new(self.grid.width, self.grid.height, cells);

        let units = self
            .units
            .iter()
            .map(|u| UnitState {
                id: u.id,
                team: u.team,
                position: u.position,
                height: grid.height_at(u.position),
                facing: u.facing,
                hp: ResourceMeter::full(u.max_hp),
                ap: ResourceMeter::full(battle_core::BattleConfig::MAX_ACTION_POINTS),
                initiative: u.initiative,
                attack: u.attack,
                statuses: StatusEffects::empty(),
            })
            .collect();

        BattleState::new(seed, grid, units).map_err(|e| match e {
            InitializationError::DuplicateUnit { unit } => IngestError::DuplicateUnitId { unit },
            InitializationError::UnplaceableUnit { unit, position } => {
                IngestError::PlacementConflict { unit, position }
            }
        })
    }

    /// Builds the per-unit controllers.
    pub(crate) fn build_controllers(&self) -> BTreeMap<UnitId, Controller> {
        self.units
            .iter()
            .map(|u| (u.id, u.controller.build()))
            .collect()
    }

    /// Builds the victory and defeat trackers, in evaluation order.
    pub(crate) fn build_trackers(&self, state: &BattleState) -> Vec<ObjectiveTracker> {
        vec![
            ObjectiveTracker::victory(&self.victory, state),
            ObjectiveTracker::defeat(&self.defeat, state),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ScenarioDescriptor {
        ScenarioDescriptor {
            name: "duel".into(),
            grid: GridDescriptor::open(8, 8),
            units: vec![
                UnitDescriptor {
                    id: UnitId(1),
                    team: TeamId(0),
                    position: Position::new(1, 1),
                    facing: Facing::East,
                    max_hp: 10,
                    attack: 3,
                    initiative: 5,
                    controller: ControllerKind::Player,
                },
                UnitDescriptor {
                    id: UnitId(2),
                    team: TeamId(1),
                    position: Position::new(6, 6),
                    facing: Facing::West,
                    max_hp: 8,
                    attack: 2,
                    initiative: 3,
                    controller: ControllerKind::Aggressive,
                },
            ],
            player_team: TeamId(0),
            victory: Objective::EliminateBoss { unit: UnitId(2) },
            defeat: Objective::EliminateBoss { unit: UnitId(1) },
        }
    }

    #[test]
    fn valid_descriptor_passes() {
        assert_eq!(descriptor().validate(), Ok(()));
    }

    #[test]
    fn duplicate_unit_ids_rejected() {
        let mut bad = descriptor();
        bad.units[1].id = UnitId(1);
        assert_eq!(
            bad.validate(),
            Err(IngestError::DuplicateUnitId { unit: UnitId(1) })
        );
    }

    #[test]
    fn out_of_bounds_placement_rejected() {
        let mut bad = descriptor();
        bad.units[1].position = Position::new(9, 9);
        assert!(matches!(
            bad.validate(),
            Err(IngestError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn wall_placement_rejected() {
        let mut bad = descriptor();
        bad.grid.set(
            Position::new(1, 1),
            CellDescriptor::new(TerrainKind::Wall, 0),
        );
        assert!(matches!(
            bad.validate(),
            Err(IngestError::ImpassablePlacement { .. })
        ));
    }

    #[test]
    fn unknown_objective_unit_rejected() {
        let mut bad = descriptor();
        bad.victory = Objective::EliminateBoss { unit: UnitId(99) };
        assert_eq!(
            bad.validate(),
            Err(IngestError::UnknownObjectiveUnit { unit: UnitId(99) })
        );
    }

    #[test]
    fn cell_count_mismatch_rejected() {
        let mut bad = descriptor();
        bad.grid.cells.pop();
        assert!(matches!(
            bad.validate(),
            Err(IngestError::CellCountMismatch { .. })
        ));
    }

    #[test]
    fn ron_round_trip() {
        let scenario = descriptor();
        let text = scenario.to_ron();
        let parsed = ScenarioDescriptor::from_ron(&text).unwrap();
        assert_eq!(parsed, scenario);
    }

    #[test]
    fn garbage_ron_is_a_parse_error() {
        let err = ScenarioDescriptor::from_ron("not a scenario").unwrap_err();
        assert_eq!(err.error_code(), "INGEST_PARSE");
    }

    #[test]
    fn unit_height_comes_from_grid() {
        let mut scenario = descriptor();
        scenario.grid.set(
            Position::new(1, 1),
            CellDescriptor::new(TerrainKind::Open, 2),
        );
        let state = scenario.build_state(0).unwrap();
        assert_eq!(state.unit(UnitId(1)).unwrap().height, 2);
    }
}
