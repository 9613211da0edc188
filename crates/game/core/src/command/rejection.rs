//! Reason-coded command rejection.

use crate::state::UnitId;

/// A declined command.
///
/// Recoverable and local: the submitting controller can branch on the reason
/// (an AI selector treats it as a failed option) and no state was touched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("unit {unit} does not exist")]
    UnitNotFound { unit: UnitId },

    #[error("unit {unit} is dead")]
    UnitDead { unit: UnitId },

    #[error("it is not unit {unit}'s turn")]
    NotUnitsTurn { unit: UnitId },

    #[error("unit {unit} needs {required} action points but has {available}")]
    InsufficientActionPoints {
        unit: UnitId,
        required: u32,
        available: u32,
    },

    #[error("target {target} is out of range")]
    OutOfRange { target: UnitId },

    #[error("destination is occupied")]
    DestinationOccupied,

    #[error("no traversable route to the destination")]
    Unreachable,

    #[error("move path is empty")]
    EmptyPath,

    #[error("move path does not start at the unit's position")]
    PathDetached,

    #[error("target {target} does not exist")]
    TargetNotFound { target: UnitId },

    #[error("target {target} is dead")]
    TargetDead { target: UnitId },

    #[error("target {target} is friendly")]
    FriendlyTarget { target: UnitId },

    #[error("a unit cannot target itself")]
    SelfTarget,

    #[error("status effect list is full")]
    StatusListFull,
}

impl Rejection {
    /// Stable reason code for host branching and logs.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Rejection::UnitNotFound { .. } => "UNIT_NOT_FOUND",
            Rejection::UnitDead { .. } => "UNIT_DEAD",
            Rejection::NotUnitsTurn { .. } => "NOT_UNITS_TURN",
            Rejection::InsufficientActionPoints { .. } => "INSUFFICIENT_ACTION_POINTS",
            Rejection::OutOfRange { .. } => "OUT_OF_RANGE",
            Rejection::DestinationOccupied => "DESTINATION_OCCUPIED",
            Rejection::Unreachable => "UNREACHABLE",
            Rejection::EmptyPath => "EMPTY_PATH",
            Rejection::PathDetached => "PATH_DETACHED",
            Rejection::TargetNotFound { .. } => "TARGET_NOT_FOUND",
            Rejection::TargetDead { .. } => "TARGET_DEAD",
            Rejection::FriendlyTarget { .. } => "FRIENDLY_TARGET",
            Rejection::SelfTarget => "SELF_TARGET",
            Rejection::StatusListFull => "STATUS_LIST_FULL",
        }
    }
}
