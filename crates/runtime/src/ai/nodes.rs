//! The closed AI node vocabulary.
//!
//! Conditions check the battle state and return Success or Failure without
//! deciding anything; actions compute a command candidate, store it on the
//! context, and succeed. New personalities are new trees composed from this
//! vocabulary with different parameters, not new node types.

use battle_core::{
    BattleConfig, Command, Facing, Position, StatusEffect, StatusKind, find_path,
};
use behavior_tree::{Behavior, Status};

use super::AiContext;

/// One leaf of an AI behavior tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiNode {
    // ========================================================================
    // Conditions
    // ========================================================================
    /// Succeeds if any live enemy is within `range` (Chebyshev).
    EnemyInRange { range: u32 },

    /// Succeeds if the acting unit's hit points are below `percent` of max.
    HpBelow { percent: u32 },

    /// Succeeds if the acting unit has at least `at_least` action points.
    HasActionPoints { at_least: u32 },

    // ========================================================================
    // Actions
    // ========================================================================
    /// Attack the nearest enemy in melee reach.
    AttackNearestEnemy,

    /// Path toward a free cell adjacent to the nearest enemy, walking as far
    /// as action points allow.
    MoveTowardNearestEnemy,

    /// Step away from the nearest enemy until it is at least `distance`
    /// cells away (Manhattan).
    Retreat { distance: u32 },

    /// Poison the nearest enemy within `range` that is not already poisoned.
    PoisonNearestEnemy {
        range: u32,
        duration: u8,
        magnitude: u8,
    },

    /// Always decides to end the turn. The universal fallback leaf.
    Pass,
}

impl<'a> Behavior<AiContext<'a>> for AiNode {
    fn tick(&self, ctx: &mut AiContext<'a>) -> Status {
        match *self {
            AiNode::EnemyInRange { range } => status_of(ctx.nearest_enemy_within(range).is_some()),
            AiNode::HpBelow { percent } => {
                let Some(actor) = ctx.actor() else {
                    return Status::Failure;
                };
                status_of(actor.hp_percent() < percent)
            }
            AiNode::HasActionPoints { at_least } => {
                let Some(actor) = ctx.actor() else {
                    return Status::Failure;
                };
                status_of(actor.ap.current >= at_least)
            }
            AiNode::AttackNearestEnemy => attack_nearest(ctx),
            AiNode::MoveTowardNearestEnemy => move_toward_nearest(ctx),
            AiNode::Retreat { distance } => retreat(ctx, distance),
            AiNode::PoisonNearestEnemy {
                range,
                duration,
                magnitude,
            } => poison_nearest(ctx, range, duration, magnitude),
            AiNode::Pass => {
                ctx.command = Some(Command::EndTurn { unit: ctx.unit });
                Status::Success
            }
        }
    }
}

#[inline]
fn status_of(condition: bool) -> Status {
    if condition {
        Status::Success
    } else {
        Status::Failure
    }
}

fn attack_nearest(ctx: &mut AiContext<'_>) -> Status {
    let Some(actor) = ctx.actor() else {
        return Status::Failure;
    };
    if actor.ap.current < BattleConfig::ATTACK_COST {
        return Status::Failure;
    }
    let Some(target) = ctx.nearest_enemy_within(BattleConfig::MELEE_RANGE) else {
        return Status::Failure;
    };

    ctx.command = Some(Command::Attack {
        attacker: ctx.unit,
        target: target.id,
    });
    Status::Success
}

fn move_toward_nearest(ctx: &mut AiContext<'_>) -> Status {
    let Some(actor) = ctx.actor() else {
        return Status::Failure;
    };
    let budget = (actor.ap.current / BattleConfig::MOVE_COST_PER_STEP) as usize;
    if budget == 0 {
        return Status::Failure;
    }
    let Some(enemy) = ctx.nearest_enemy() else {
        return Status::Failure;
    };

    // Path to the best free cell adjacent to the enemy: shortest path wins,
    // ties broken by the fixed direction order.
    let mut best: Option<Vec<Position>> = None;
    for direction in Facing::all() {
        let (dx, dy) = direction.offset();
        let dest = Position::new(enemy.position.x + dx, enemy.position.y + dy);
        if !ctx.state.grid.can_enter(dest) {
            continue;
        }
        if let Some(path) = find_path(&ctx.state.grid, actor.position, dest)
            && best.as_ref().is_none_or(|b| path.len() < b.len())
        {
            best = Some(path);
        }
    }
    let Some(mut path) = best else {
        return Status::Failure;
    };

    // Walk as far as the budget allows.
    path.truncate(budget + 1);
    if path.len() < 2 {
        return Status::Failure;
    }

    ctx.command = Some(Command::Move {
        unit: ctx.unit,
        path,
    });
    Status::Success
}

fn retreat(ctx: &mut AiContext<'_>, distance: u32) -> Status {
    let Some(actor) = ctx.actor() else {
        return Status::Failure;
    };
    if actor.ap.current < BattleConfig::MOVE_COST_PER_STEP {
        return Status::Failure;
    }
    let Some(enemy) = ctx.nearest_enemy() else {
        return Status::Failure;
    };

    let current = actor.position.manhattan(enemy.position);
    if current >= distance {
        return Status::Failure;
    }

    // One step in the direction that gains the most ground; the fixed
    // direction order breaks ties.
    let mut best: Option<(u32, Position)> = None;
    for direction in Facing::all() {
        let (dx, dy) = direction.offset();
        let step = Position::new(actor.position.x + dx, actor.position.y + dy);
        if !ctx.state.grid.can_enter(step) {
            continue;
        }
        let gained = step.manhattan(enemy.position);
        if gained > current && best.as_ref().is_none_or(|(b, _)| gained > *b) {
            best = Some((gained, step));
        }
    }
    let Some((_, step)) = best else {
        return Status::Failure;
    };

    ctx.command = Some(Command::Move {
        unit: ctx.unit,
        path: vec![actor.position, step],
    });
    Status::Success
}

fn poison_nearest(ctx: &mut AiContext<'_>, range: u32, duration: u8, magnitude: u8) -> Status {
    let Some(actor) = ctx.actor() else {
        return Status::Failure;
    };
    if actor.ap.current < BattleConfig::APPLY_STATUS_COST {
        return Status::Failure;
    }
    let Some(target) = ctx.nearest_enemy_within(range.min(BattleConfig::STATUS_RANGE)) else {
        return Status::Failure;
    };
    if target.statuses.has(StatusKind::Poison) {
        return Status::Failure;
    }

    ctx.command = Some(Command::ApplyStatus {
        source: ctx.unit,
        target: target.id,
        effect: StatusEffect {
            kind: StatusKind::Poison,
            duration,
            magnitude,
        },
    });
    Status::Success
}
