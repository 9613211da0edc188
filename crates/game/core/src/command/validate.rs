//! Read-only precondition checks.
//!
//! Every check here runs against the state **before** mutation; the first
//! failure aborts the submission with a specific reason. `apply` may assume
//! everything validated here.

use crate::config::BattleConfig;
use crate::state::{BattleState, Position, StatusEffect, UnitId, UnitState};

use super::{Command, Rejection};

pub(super) fn validate(state: &BattleState, command: &Command) -> Result<(), Rejection> {
    let actor = resolve_actor(state, command.actor())?;

    match command {
        Command::Move { path, .. } => validate_move(state, actor, path),
        Command::Attack { target, .. } => {
            let target = resolve_target(state, actor, *target)?;
            validate_attack(actor, target)
        }
        Command::ApplyStatus { target, effect, .. } => {
            let target = resolve_target(state, actor, *target)?;
            validate_apply_status(actor, target, effect)
        }
        // Ending the turn has no preconditions beyond the actor checks.
        Command::EndTurn { .. } => Ok(()),
    }
}

/// Actor checks shared by every command: the unit exists, is alive, and owns
/// the active turn.
fn resolve_actor(state: &BattleState, unit: UnitId) -> Result<&UnitState, Rejection> {
    let actor = state
        .unit(unit)
        .ok_or(Rejection::UnitNotFound { unit })?;
    if !actor.alive() {
        return Err(Rejection::UnitDead { unit });
    }
    if state.current_unit() != Some(unit) {
        return Err(Rejection::NotUnitsTurn { unit });
    }
    Ok(actor)
}

/// Target checks shared by attacks and status application.
fn resolve_target<'a>(
    state: &'a BattleState,
    actor: &UnitState,
    target: UnitId,
) -> Result<&'a UnitState, Rejection> {
    if target == actor.id {
        return Err(Rejection::SelfTarget);
    }
    let target_unit = state
        .unit(target)
        .ok_or(Rejection::TargetNotFound { target })?;
    if !target_unit.alive() {
        return Err(Rejection::TargetDead { target });
    }
    Ok(target_unit)
}

fn require_ap(actor: &UnitState, required: u32) -> Result<(), Rejection> {
    if actor.ap.current < required {
        return Err(Rejection::InsufficientActionPoints {
            unit: actor.id,
            required,
            available: actor.ap.current,
        });
    }
    Ok(())
}

fn validate_move(
    state: &BattleState,
    actor: &UnitState,
    path: &[Position],
) -> Result<(), Rejection> {
    // A path is the full cell sequence including the start; fewer than two
    // cells means no movement was requested.
    let Some((&start, steps)) = path.split_first() else {
        return Err(Rejection::EmptyPath);
    };
    if steps.is_empty() {
        return Err(Rejection::EmptyPath);
    }
    if start != actor.position {
        return Err(Rejection::PathDetached);
    }

    require_ap(actor, steps.len() as u32 * BattleConfig::MOVE_COST_PER_STEP)?;

    // Paths computed earlier this tick can be stale; occupancy and terrain
    // are re-checked here at execution time regardless of their origin.
    let mut previous = start;
    for &step in steps {
        if !previous.is_adjacent(step) {
            return Err(Rejection::Unreachable);
        }
        match state.grid.cell(step) {
            None => return Err(Rejection::Unreachable),
            Some(cell) if !cell.terrain.is_passable() => return Err(Rejection::Unreachable),
            Some(cell) if cell.is_occupied() => return Err(Rejection::DestinationOccupied),
            Some(_) => {}
        }
        previous = step;
    }
    Ok(())
}

fn validate_attack(actor: &UnitState, target: &UnitState) -> Result<(), Rejection> {
    if !actor.is_enemy_of(target) {
        return Err(Rejection::FriendlyTarget { target: target.id });
    }
    if actor.position.chebyshev(target.position) > BattleConfig::MELEE_RANGE {
        return Err(Rejection::OutOfRange { target: target.id });
    }
    require_ap(actor, BattleConfig::ATTACK_COST)
}

fn validate_apply_status(
    actor: &UnitState,
    target: &UnitState,
    effect: &StatusEffect,
) -> Result<(), Rejection> {
    if actor.position.chebyshev(target.position) > BattleConfig::STATUS_RANGE {
        return Err(Rejection::OutOfRange { target: target.id });
    }
    require_ap(actor, BattleConfig::APPLY_STATUS_COST)?;
    if !target.statuses.can_apply(effect.kind) {
        return Err(Rejection::StatusListFull);
    }
    Ok(())
}
