//! Internal-consistency checks.
//!
//! An invariant violation is a programmer error, never a gameplay outcome:
//! the simulation must stop rather than silently repair state, so that
//! determinism bugs surface instead of being masked.

use crate::state::{BattleState, Position, UnitId};

/// Unrecoverable internal fault detected in battle state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("cell {position} is occupied by {occupant}, which does not match any live unit")]
    OrphanOccupant {
        position: Position,
        occupant: UnitId,
    },

    #[error("live unit {unit} at {position} is not the occupant of its cell")]
    MissingOccupancy { unit: UnitId, position: Position },

    #[error("dead unit {unit} still occupies {position}")]
    DeadUnitOnGrid { unit: UnitId, position: Position },

    #[error("unit {unit} hit points {current} exceed maximum {maximum}")]
    HitPointsOverCap {
        unit: UnitId,
        current: u32,
        maximum: u32,
    },

    #[error("unit {unit} action points {current} exceed maximum {maximum}")]
    ActionPointsOverCap {
        unit: UnitId,
        current: u32,
        maximum: u32,
    },

    #[error("unit {unit} appears more than once in the initiative order")]
    DuplicateInOrder { unit: UnitId },
}

impl InvariantViolation {
    /// Stable code for diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            InvariantViolation::OrphanOccupant { .. } => "INVARIANT_ORPHAN_OCCUPANT",
            InvariantViolation::MissingOccupancy { .. } => "INVARIANT_MISSING_OCCUPANCY",
            InvariantViolation::DeadUnitOnGrid { .. } => "INVARIANT_DEAD_UNIT_ON_GRID",
            InvariantViolation::HitPointsOverCap { .. } => "INVARIANT_HP_OVER_CAP",
            InvariantViolation::ActionPointsOverCap { .. } => "INVARIANT_AP_OVER_CAP",
            InvariantViolation::DuplicateInOrder { .. } => "INVARIANT_DUPLICATE_IN_ORDER",
        }
    }
}

/// Cross-checks the unit table, grid occupancy, and initiative order.
///
/// Cheap enough to run after every applied command in debug builds; the
/// runtime also exposes it on demand.
pub fn verify(state: &BattleState) -> Result<(), InvariantViolation> {
    // Every occupied cell must point at a live unit standing there.
    for (position, cell) in state.grid.iter() {
        if let Some(occupant) = cell.occupant() {
            match state.unit(occupant) {
                Some(unit) if !unit.alive() => {
                    return Err(InvariantViolation::DeadUnitOnGrid {
                        unit: occupant,
                        position,
                    });
                }
                Some(unit) if unit.position != position => {
                    return Err(InvariantViolation::OrphanOccupant {
                        position,
                        occupant,
                    });
                }
                Some(_) => {}
                None => {
                    return Err(InvariantViolation::OrphanOccupant {
                        position,
                        occupant,
                    });
                }
            }
        }
    }

    for unit in state.units() {
        if unit.alive() && state.grid.occupant(unit.position) != Some(unit.id) {
            return Err(InvariantViolation::MissingOccupancy {
                unit: unit.id,
                position: unit.position,
            });
        }
        if unit.hp.current > unit.hp.maximum {
            return Err(InvariantViolation::HitPointsOverCap {
                unit: unit.id,
                current: unit.hp.current,
                maximum: unit.hp.maximum,
            });
        }
        if unit.ap.current > unit.ap.maximum {
            return Err(InvariantViolation::ActionPointsOverCap {
                unit: unit.id,
                current: unit.ap.current,
                maximum: unit.ap.maximum,
            });
        }
    }

    for (i, unit) in state.turn.order.iter().enumerate() {
        if state.turn.order[..i].contains(unit) {
            return Err(InvariantViolation::DuplicateInOrder { unit: *unit });
        }
    }

    Ok(())
}
