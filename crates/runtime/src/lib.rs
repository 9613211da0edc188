//! Orchestration layer for the deterministic battle core.
//!
//! `battle-runtime` owns everything around the pure rules: the scheduler
//! that drives ticks, controllers (behavior-tree AI and player command
//! queues), the synchronous event bus, objective wiring, scenario ingestion,
//! and the replay log. It mutates [`battle_core::BattleState`] only through
//! the command pipeline — there is no privileged path.
pub mod ai;
pub mod controller;
pub mod error;
pub mod events;
pub mod replay;
pub mod scenario;
pub mod scheduler;
pub mod snapshot;

pub use controller::{Controller, PlayerController};
pub use error::RuntimeError;
pub use events::EventBus;
pub use replay::{ReplayEntry, ReplayError, ReplayLog, ReplayReport, replay};
pub use scenario::{
    CellDescriptor, ControllerKind, GridDescriptor, IngestError, ScenarioDescriptor,
    UnitDescriptor,
};
pub use scheduler::{Simulation, TickReport};
pub use snapshot::{CellView, GridView, Snapshot, StatusView, UnitView};
