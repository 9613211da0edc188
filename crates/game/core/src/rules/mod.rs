//! Rules engine: combat resolution and status-effect ticking.
//!
//! Everything here is pure arithmetic over unit and grid data; the command
//! pipeline is the only caller that feeds results back into state.

pub mod combat;
pub mod status;

pub use combat::{AttackResolution, arc_bonus, calculate_damage, height_bonus, resolve_attack};
pub use status::regen_under_slow;
