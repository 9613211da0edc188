//! Deterministic tactical-combat simulation core.
//!
//! `battle-core` defines the canonical rules (commands, combat resolution,
//! status effects, pathfinding, objectives) and exposes pure APIs reused by
//! the runtime and offline tools. All state mutation flows through
//! [`BattleState::submit`], which either applies a command atomically and
//! returns the events it produced, or rejects it without touching state.
pub mod command;
pub mod config;
pub mod event;
pub mod hash;
pub mod invariant;
pub mod objective;
pub mod path;
pub mod rng;
pub mod rules;
pub mod state;

pub use command::{Command, Rejection};
pub use config::BattleConfig;
pub use event::{Event, ObjectiveOutcome};
pub use invariant::InvariantViolation;
pub use objective::{Objective, ObjectiveTracker};
pub use path::find_path;
pub use rng::SimRng;
pub use state::{
    AttackArc, BattleState, Cell, Facing, GridState, InitializationError, Position, ResourceMeter,
    StatusEffect, StatusEffects, StatusKind, TeamId, TerrainKind, Tick, TurnState, UnitId,
    UnitState,
};
