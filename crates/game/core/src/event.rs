//! Events: the append-only record of everything that happened.
//!
//! Every state change made by the command pipeline is mirrored by exactly one
//! event, emitted in the order the change happened. Events are immutable once
//! emitted; subscribers receive them in emission order and can never observe
//! a partial command.

use crate::state::{Position, StatusKind, UnitId};

/// Terminal result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveOutcome {
    Victory,
    Defeat,
}

/// Everything the simulation can report.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A unit completed a move along a validated path.
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
    },

    /// A unit took damage from an attack or a status effect.
    ///
    /// `source` is the attacking unit for combat damage and `None` for
    /// status-effect damage (poison).
    UnitDamaged {
        unit: UnitId,
        source: Option<UnitId>,
        amount: u32,
        hp_remaining: u32,
    },

    /// A unit's hit points reached zero; its cell has been vacated.
    UnitKilled { unit: UnitId, position: Position },

    /// A status effect was recorded (or refreshed) on a unit.
    StatusApplied {
        unit: UnitId,
        kind: StatusKind,
        duration: u8,
        magnitude: u8,
    },

    /// A status effect ran out of duration at the owner's turn end.
    StatusExpired { unit: UnitId, kind: StatusKind },

    /// A command was declined. Emitted by the scheduler for observability;
    /// the rejection itself is returned to the submitter.
    CommandRejected { unit: UnitId, code: String },

    /// A unit ended its turn (status effects ticked, action points
    /// regenerated). `round` is the initiative round the turn belonged to.
    TurnEnded { unit: UnitId, round: u32 },

    /// An objective advanced without completing.
    ObjectiveProgressed {
        index: u32,
        progress: u32,
        required: u32,
    },

    /// A terminal objective fired; the scheduler stops on this.
    ObjectiveCompleted { outcome: ObjectiveOutcome },
}

impl Event {
    /// Short machine-readable tag, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::UnitMoved { .. } => "unit_moved",
            Event::UnitDamaged { .. } => "unit_damaged",
            Event::UnitKilled { .. } => "unit_killed",
            Event::StatusApplied { .. } => "status_applied",
            Event::StatusExpired { .. } => "status_expired",
            Event::CommandRejected { .. } => "command_rejected",
            Event::TurnEnded { .. } => "turn_ended",
            Event::ObjectiveProgressed { .. } => "objective_progressed",
            Event::ObjectiveCompleted { .. } => "objective_completed",
        }
    }
}
