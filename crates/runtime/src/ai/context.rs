//! Evaluation context shared by all AI nodes.

use battle_core::{BattleState, Command, UnitId, UnitState};

/// Blackboard for one tree evaluation.
///
/// Read-only over the battle; the only thing nodes write is the decided
/// command. Target selection helpers break distance ties by unit id so two
/// evaluations over the same state always pick the same target.
pub struct AiContext<'a> {
    pub state: &'a BattleState,
    pub unit: UnitId,
    /// Command candidate produced by the first succeeding action leaf.
    pub command: Option<Command>,
}

impl<'a> AiContext<'a> {
    pub fn new(state: &'a BattleState, unit: UnitId) -> Self {
        Self {
            state,
            unit,
            command: None,
        }
    }

    /// The unit this evaluation decides for.
    pub fn actor(&self) -> Option<&'a UnitState> {
        self.state.unit(self.unit)
    }

    /// Live enemies of the acting unit, in scenario order.
    pub fn enemies(&self) -> impl Iterator<Item = &'a UnitState> {
        let team = self.actor().map(|u| u.team);
        self.state
            .live_units()
            .filter(move |u| Some(u.team) != team)
    }

    /// Closest live enemy by Manhattan distance, ties broken by unit id.
    pub fn nearest_enemy(&self) -> Option<&'a UnitState> {
        let actor = self.actor()?;
        self.enemies()
            .min_by_key(|e| (actor.position.manhattan(e.position), e.id))
    }

    /// Closest live enemy within `range` (Chebyshev), ties broken by id.
    pub fn nearest_enemy_within(&self, range: u32) -> Option<&'a UnitState> {
        let actor = self.actor()?;
        self.enemies()
            .filter(|e| actor.position.chebyshev(e.position) <= range)
            .min_by_key(|e| (actor.position.chebyshev(e.position), e.id))
    }
}
