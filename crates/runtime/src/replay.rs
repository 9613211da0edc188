//! Replay log: seed + ordered commands + final-state hash.
//!
//! The durable record of a run. Replaying the log through a fresh
//! simulation must reproduce the identical final-state root — that is the
//! compatibility contract for the persisted format, and verification fails
//! loudly when it does not hold.

use std::path::Path;

use battle_core::{Command, ObjectiveOutcome, Tick, UnitId};
use serde::{Deserialize, Serialize};

use crate::scenario::{IngestError, ScenarioDescriptor};
use crate::scheduler::Simulation;

/// One applied command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEntry {
    pub tick: Tick,
    pub unit: UnitId,
    pub command: Command,
}

/// Complete record of a run: enough to reproduce it exactly.
///
/// Only accepted commands are recorded; rejections produced no state change
/// and replay without them is identical.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub seed: u64,
    pub entries: Vec<ReplayEntry>,
    /// Hex state root the source run ended with.
    pub final_root: String,
}

impl ReplayLog {
    /// Parses a log from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ReplayError> {
        ron::from_str(text).map_err(|e| ReplayError::Parse {
            message: e.to_string(),
        })
    }

    /// Serializes the log to RON text.
    pub fn to_ron(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .expect("replay serialization should not fail")
    }

    /// Reads a log from a RON file.
    pub fn read_file(path: &Path) -> Result<Self, ReplayError> {
        let text = std::fs::read_to_string(path).map_err(|e| ReplayError::Io {
            message: e.to_string(),
        })?;
        Self::from_ron(&text)
    }

    /// Writes the log to a RON file.
    pub fn write_file(&self, path: &Path) -> Result<(), ReplayError> {
        std::fs::write(path, self.to_ron()).map_err(|e| ReplayError::Io {
            message: e.to_string(),
        })
    }
}

/// Result of a successful replay verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayReport {
    pub commands_applied: usize,
    pub outcome: Option<ObjectiveOutcome>,
    /// Root the replayed run ended with (equal to the log's, or verification
    /// would have failed).
    pub final_root: String,
}

/// Replay verification failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("replay log could not be parsed: {message}")]
    Parse { message: String },

    #[error("replay log could not be read or written: {message}")]
    Io { message: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("entry {index}: log says unit {logged} acts but the schedule has {scheduled:?}")]
    TurnMismatch {
        index: usize,
        logged: UnitId,
        scheduled: Option<UnitId>,
    },

    #[error("entry {index}: recorded command was rejected with {code}")]
    RejectedCommand { index: usize, code: &'static str },

    #[error("final state root mismatch: log has {expected}, replay produced {actual}")]
    HashMismatch { expected: String, actual: String },
}

impl ReplayError {
    /// Stable code for process exit mapping.
    pub fn error_code(&self) -> &'static str {
        match self {
            ReplayError::Parse { .. } => "REPLAY_PARSE",
            ReplayError::Io { .. } => "REPLAY_IO",
            ReplayError::Ingest(err) => err.error_code(),
            ReplayError::TurnMismatch { .. } => "REPLAY_TURN_MISMATCH",
            ReplayError::RejectedCommand { .. } => "REPLAY_REJECTED_COMMAND",
            ReplayError::HashMismatch { .. } => "REPLAY_HASH_MISMATCH",
        }
    }
}

/// Replays `log` against a fresh simulation of `scenario` and verifies the
/// final-state root.
///
/// Every recorded command runs through the exact execution path of the
/// original run — same pipeline, same dispatch, same turn advancement — so
/// any divergence is a determinism bug or a tampered log, and surfaces as a
/// hash mismatch.
pub fn replay(scenario: &ScenarioDescriptor, log: &ReplayLog) -> Result<ReplayReport, ReplayError> {
    let mut sim = Simulation::new(scenario, log.seed)?;

    for (index, entry) in log.entries.iter().enumerate() {
        let scheduled = sim.resolve_current_unit();
        if scheduled != Some(entry.unit) {
            return Err(ReplayError::TurnMismatch {
                index,
                logged: entry.unit,
                scheduled,
            });
        }
        sim.execute(entry.unit, &entry.command)
            .map_err(|rejection| ReplayError::RejectedCommand {
                index,
                code: rejection.reason_code(),
            })?;
    }

    let actual = sim.state_root();
    if actual != log.final_root {
        return Err(ReplayError::HashMismatch {
            expected: log.final_root.clone(),
            actual,
        });
    }

    tracing::info!(
        commands = log.entries.len(),
        root = %actual,
        "replay verified"
    );

    Ok(ReplayReport {
        commands_applied: log.entries.len(),
        outcome: sim.outcome(),
        final_root: actual,
    })
}
