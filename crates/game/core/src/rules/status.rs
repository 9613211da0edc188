//! Status-effect ticking at turn end.
//!
//! Ticking happens once per owner's `EndTurn`, strictly before action-point
//! regeneration, in effect insertion order:
//!
//! 1. Each active Poison deals its magnitude as flat damage.
//! 2. Every duration decrements; effects reaching zero are removed and
//!    reported as expired.
//! 3. Action points regenerate, reduced by the Slow magnitudes that were
//!    active at the start of the tick — a Slow expiring this turn-end still
//!    suppresses this regeneration.

use crate::config::BattleConfig;
use crate::event::Event;
use crate::state::{BattleState, StatusKind, UnitId};

/// Action points regenerated for a unit with the given total Slow magnitude.
pub fn regen_under_slow(slow_total: u32) -> u32 {
    BattleConfig::AP_REGEN_PER_TURN.saturating_sub(slow_total)
}

/// Runs one turn-end tick for `unit`, appending events in emission order.
///
/// A unit killed by poison stops ticking immediately: its cell is vacated
/// and no expiry or regeneration follows.
pub(crate) fn tick_turn_end(state: &mut BattleState, unit: UnitId, events: &mut Vec<Event>) {
    let Some(actor) = state.unit(unit) else {
        return;
    };

    let poison_hits: Vec<u32> = actor
        .statuses
        .iter()
        .filter(|e| e.kind == StatusKind::Poison)
        .map(|e| e.magnitude as u32)
        .collect();
    let slow_total = actor.statuses.total_magnitude(StatusKind::Slow);

    for amount in poison_hits {
        let Some(actor) = state.unit_mut(unit) else {
            return;
        };
        actor.hp.deplete(amount);
        let hp_remaining = actor.hp.current;
        let position = actor.position;
        events.push(Event::UnitDamaged {
            unit,
            source: None,
            amount,
            hp_remaining,
        });
        if hp_remaining == 0 {
            state.grid.vacate(position, unit);
            events.push(Event::UnitKilled { unit, position });
            return;
        }
    }

    let Some(actor) = state.unit_mut(unit) else {
        return;
    };
    for kind in actor.statuses.tick_down() {
        events.push(Event::StatusExpired { unit, kind });
    }

    let Some(actor) = state.unit_mut(unit) else {
        return;
    };
    actor.ap.restore(regen_under_slow(slow_total));
}
