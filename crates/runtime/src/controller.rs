//! Per-unit command sources.
//!
//! A controller answers one question each turn: which command does this unit
//! submit next? AI units evaluate their behavior tree; player units drain a
//! queue filled by the host. Both funnel into the same pipeline.

use std::collections::VecDeque;

use battle_core::{BattleState, Command, UnitId};
use behavior_tree::Tree;

use crate::ai::{AiContext, AiNode};

/// Command source for one unit.
pub enum Controller {
    /// Host-driven: commands are injected via
    /// [`Simulation::push_command`](crate::Simulation::push_command).
    Player(PlayerController),

    /// Behavior-tree driven.
    Ai(Tree<AiNode>),
}

impl Controller {
    pub fn player() -> Self {
        Controller::Player(PlayerController::default())
    }

    pub fn ai(tree: Tree<AiNode>) -> Self {
        Controller::Ai(tree)
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Controller::Player(_))
    }

    /// Decides the unit's next command.
    ///
    /// Never blocks: a player controller with an empty queue ends the turn,
    /// so headless runs proceed at full speed, and an AI tree that decides
    /// nothing (all options failed) does the same.
    pub fn decide(&mut self, state: &BattleState, unit: UnitId) -> Command {
        match self {
            Controller::Player(player) => player
                .queue
                .pop_front()
                .unwrap_or(Command::EndTurn { unit }),
            Controller::Ai(tree) => {
                let mut ctx = AiContext::new(state, unit);
                let status = tree.tick(&mut ctx);
                tracing::trace!(unit = %unit, ?status, "behavior tree evaluated");
                ctx.command.unwrap_or(Command::EndTurn { unit })
            }
        }
    }
}

/// Queue of host-injected commands for a player unit.
#[derive(Default)]
pub struct PlayerController {
    queue: VecDeque<Command>,
}

impl PlayerController {
    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
