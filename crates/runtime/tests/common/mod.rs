//! Shared scenario builders for integration tests.
#![allow(dead_code)] // each test binary uses a different subset

use battle_core::{Facing, Objective, Position, TeamId, UnitId};
use battle_runtime::{
    CellDescriptor, ControllerKind, GridDescriptor, ScenarioDescriptor, UnitDescriptor,
};

pub fn unit(
    id: u32,
    team: u8,
    position: Position,
    initiative: u8,
    controller: ControllerKind,
) -> UnitDescriptor {
    UnitDescriptor {
        id: UnitId(id),
        team: TeamId(team),
        position,
        facing: Facing::North,
        max_hp: 10,
        attack: 3,
        initiative,
        controller,
    }
}

/// Open 8x8 arena; victory on killing unit 2, defeat on losing unit 1.
pub fn duel_scenario(
    left_controller: ControllerKind,
    right_controller: ControllerKind,
) -> ScenarioDescriptor {
    ScenarioDescriptor {
        name: "duel".into(),
        grid: GridDescriptor::open(8, 8),
        units: vec![
            unit(1, 0, Position::new(1, 3), 5, left_controller),
            unit(2, 1, Position::new(6, 3), 3, right_controller),
        ],
        player_team: TeamId(0),
        victory: Objective::EliminateBoss { unit: UnitId(2) },
        defeat: Objective::EliminateBoss { unit: UnitId(1) },
    }
}

/// Two aggressive teams of two units each on a 10x10 arena with a rough
/// center; ends by elimination either way.
pub fn skirmish_scenario() -> ScenarioDescriptor {
    let mut grid = GridDescriptor::open(10, 10);
    for x in 3..7 {
        for y in 4..6 {
            grid.set(
                Position::new(x, y),
                CellDescriptor::new(battle_core::TerrainKind::Rough, 0),
            );
        }
    }

    ScenarioDescriptor {
        name: "skirmish".into(),
        grid,
        units: vec![
            unit(1, 0, Position::new(1, 2), 6, ControllerKind::Aggressive),
            unit(2, 0, Position::new(1, 7), 5, ControllerKind::Skirmisher { poison_range: 2 }),
            unit(3, 1, Position::new(8, 2), 4, ControllerKind::Aggressive),
            unit(4, 1, Position::new(8, 7), 3, ControllerKind::Cautious { flee_percent: 30 }),
        ],
        player_team: TeamId(0),
        victory: Objective::AllOf(vec![
            Objective::EliminateBoss { unit: UnitId(3) },
            Objective::EliminateBoss { unit: UnitId(4) },
        ]),
        defeat: Objective::AllOf(vec![
            Objective::EliminateBoss { unit: UnitId(1) },
            Objective::EliminateBoss { unit: UnitId(2) },
        ]),
    }
}
