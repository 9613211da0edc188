//! Command domain: the sole mutation entry point.
//!
//! A [`Command`] is an immutable description of an intended action. It
//! carries no side effects until [`BattleState::submit`] resolves it:
//! validation runs read-only against the current state, and only a fully
//! valid command mutates anything. Rejection therefore leaves the state
//! byte-for-byte untouched.
//!
//! # Module Structure
//!
//! - `rejection`: Reason-coded rejection type
//! - `validate`: Read-only precondition checks
//! - `apply`: State mutation and event emission

mod apply;
mod rejection;
mod validate;

pub use rejection::Rejection;

use crate::event::Event;
use crate::state::{BattleState, Position, StatusEffect, UnitId};

/// An intended action, submitted by a controller (AI or external caller).
///
/// AI-issued and player-issued commands travel the same path; there is no
/// privileged route around validation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Walk along `path`, which must start at the unit's current cell and
    /// proceed in orthogonal steps. Callers resolve a destination into a
    /// path via [`find_path`](crate::path::find_path) first.
    Move { unit: UnitId, path: Vec<Position> },

    /// Strike a target within melee reach.
    Attack { attacker: UnitId, target: UnitId },

    /// Inflict a status effect on a target within status reach.
    ApplyStatus {
        source: UnitId,
        target: UnitId,
        effect: StatusEffect,
    },

    /// Finish the turn: tick statuses, regenerate action points.
    EndTurn { unit: UnitId },
}

impl Command {
    /// The unit performing this command.
    pub fn actor(&self) -> UnitId {
        match self {
            Command::Move { unit, .. } => *unit,
            Command::Attack { attacker, .. } => *attacker,
            Command::ApplyStatus { source, .. } => *source,
            Command::EndTurn { unit } => *unit,
        }
    }

    /// Short machine-readable tag, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Move { .. } => "move",
            Command::Attack { .. } => "attack",
            Command::ApplyStatus { .. } => "apply_status",
            Command::EndTurn { .. } => "end_turn",
        }
    }
}

impl BattleState {
    /// Resolves a command: validate, then apply.
    ///
    /// On success the state is mutated and the ordered events describing
    /// every change are returned — state changes and events are generated
    /// together, never one without the other. On rejection nothing is
    /// mutated and the reason is returned.
    pub fn submit(&mut self, command: &Command) -> Result<Vec<Event>, Rejection> {
        validate::validate(self, command)?;
        let events = apply::apply(self, command);
        self.nonce += 1;
        Ok(events)
    }
}
