//! Runtime error surface.

use battle_core::{InvariantViolation, UnitId};

/// Errors surfaced by the scheduler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// A terminal objective already fired; the simulation is frozen.
    #[error("simulation has terminated")]
    Terminated,

    /// No live units remain to schedule.
    #[error("no live units remain")]
    NoLiveUnits,

    /// A command was pushed for a unit that is not player-controlled.
    #[error("unit {unit} is not player-controlled")]
    NotPlayerControlled { unit: UnitId },

    /// A command was pushed for a unit the battle does not know.
    #[error("unit {unit} does not exist")]
    UnknownUnit { unit: UnitId },

    /// The safe fallback (EndTurn) was itself rejected — internal fault.
    #[error("fallback end-turn rejected with {code}")]
    FallbackRejected { code: &'static str },

    /// State failed a consistency check; the simulation must stop rather
    /// than silently repair itself.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl RuntimeError {
    /// Stable code for host branching and process exit mapping.
    pub fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Terminated => "RUNTIME_TERMINATED",
            RuntimeError::NoLiveUnits => "RUNTIME_NO_LIVE_UNITS",
            RuntimeError::NotPlayerControlled { .. } => "RUNTIME_NOT_PLAYER_CONTROLLED",
            RuntimeError::UnknownUnit { .. } => "RUNTIME_UNKNOWN_UNIT",
            RuntimeError::FallbackRejected { .. } => "RUNTIME_FALLBACK_REJECTED",
            RuntimeError::Invariant(violation) => violation.error_code(),
        }
    }
}
