//! State mutation and event emission.
//!
//! Runs only after `validate` has passed; every mutation appends the event
//! describing it, in the order it happened.

use crate::config::BattleConfig;
use crate::event::Event;
use crate::rules;
use crate::state::{BattleState, Facing, Position, StatusEffect, UnitId};

use super::Command;

pub(super) fn apply(state: &mut BattleState, command: &Command) -> Vec<Event> {
    let mut events = Vec::new();
    match command {
        Command::Move { unit, path } => apply_move(state, *unit, path, &mut events),
        Command::Attack { attacker, target } => {
            apply_attack(state, *attacker, *target, &mut events)
        }
        Command::ApplyStatus {
            source,
            target,
            effect,
        } => apply_status(state, *source, *target, *effect, &mut events),
        Command::EndTurn { unit } => apply_end_turn(state, *unit, &mut events),
    }
    events
}

fn apply_move(state: &mut BattleState, unit: UnitId, path: &[Position], events: &mut Vec<Event>) {
    let from = path[0];
    let to = *path.last().expect("validated path is non-empty");
    let steps = (path.len() - 1) as u32;
    // Facing follows the final step direction.
    let facing = Facing::between(path[path.len() - 2], to);
    let height = state.grid.height_at(to);

    state.grid.vacate(from, unit);
    state.grid.place(to, unit);

    let actor = state.unit_mut(unit).expect("validated actor exists");
    actor.position = to;
    actor.height = height;
    actor.facing = facing;
    actor.ap.deplete(steps * BattleConfig::MOVE_COST_PER_STEP);

    events.push(Event::UnitMoved { unit, from, to });
}

fn apply_attack(state: &mut BattleState, attacker: UnitId, target: UnitId, events: &mut Vec<Event>) {
    let attacker_state = state.unit(attacker).expect("validated actor exists").clone();
    let defender_state = state.unit(target).expect("validated target exists").clone();

    let resolution = rules::resolve_attack(&attacker_state, &defender_state, &mut state.rng);
    let new_facing = Facing::between(attacker_state.position, defender_state.position);

    let actor = state.unit_mut(attacker).expect("validated actor exists");
    actor.facing = new_facing;
    actor.ap.deplete(BattleConfig::ATTACK_COST);

    let defender = state.unit_mut(target).expect("validated target exists");
    defender.hp.deplete(resolution.damage);
    let hp_remaining = defender.hp.current;
    let position = defender.position;

    events.push(Event::UnitDamaged {
        unit: target,
        source: Some(attacker),
        amount: resolution.damage,
        hp_remaining,
    });

    if hp_remaining == 0 {
        state.grid.vacate(position, target);
        events.push(Event::UnitKilled {
            unit: target,
            position,
        });
    }
}

fn apply_status(
    state: &mut BattleState,
    source: UnitId,
    target: UnitId,
    effect: StatusEffect,
    events: &mut Vec<Event>,
) {
    let actor = state.unit_mut(source).expect("validated actor exists");
    actor.ap.deplete(BattleConfig::APPLY_STATUS_COST);

    let target_unit = state.unit_mut(target).expect("validated target exists");
    target_unit.statuses.apply(effect);

    events.push(Event::StatusApplied {
        unit: target,
        kind: effect.kind,
        duration: effect.duration,
        magnitude: effect.magnitude,
    });
}

fn apply_end_turn(state: &mut BattleState, unit: UnitId, events: &mut Vec<Event>) {
    let round = state.turn.round;
    rules::status::tick_turn_end(state, unit, events);
    events.push(Event::TurnEnded { unit, round });
}
