//! Objectives: win/loss predicates evaluated against the event stream.
//!
//! Each objective subscribes to the event kinds that can affect it and
//! updates its progress incrementally — nothing here rescans the full battle
//! state. Compound objectives combine children under AND/OR and propagate
//! completion upward exactly once.
//!
//! A tracker is bound to the outcome it produces when it completes. A
//! tracker whose objective becomes impossible (the escorted unit died)
//! reports its failure outcome instead, also exactly once.

use std::collections::{BTreeMap, BTreeSet};

use crate::event::{Event, ObjectiveOutcome};
use crate::state::{BattleState, Position, TeamId, UnitId};

/// Objective configuration, as ingested from a scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    /// Completes when the named unit is killed.
    EliminateBoss { unit: UnitId },

    /// Completes once units of `team` have ended turns across `turns`
    /// distinct initiative rounds.
    SurviveNTurns { team: TeamId, turns: u32 },

    /// Completes once units of `team` cover every zone cell at
    /// `consecutive_rounds` successive round boundaries.
    HoldZones {
        team: TeamId,
        zones: Vec<Position>,
        consecutive_rounds: u32,
    },

    /// Completes when the named unit reaches `goal`; fails if it dies.
    Escort { unit: UnitId, goal: Position },

    /// All children must complete.
    AllOf(Vec<Objective>),

    /// First completing child wins.
    AnyOf(Vec<Objective>),
}

impl Objective {
    /// Collects every unit id the objective refers to, for ingestion
    /// validation.
    pub fn referenced_units(&self, out: &mut Vec<UnitId>) {
        match self {
            Objective::EliminateBoss { unit } | Objective::Escort { unit, .. } => {
                out.push(*unit);
            }
            Objective::SurviveNTurns { .. } | Objective::HoldZones { .. } => {}
            Objective::AllOf(children) | Objective::AnyOf(children) => {
                for child in children {
                    child.referenced_units(out);
                }
            }
        }
    }

    /// Collects every zone cell the objective refers to, for bounds checks.
    pub fn referenced_zones(&self, out: &mut Vec<Position>) {
        match self {
            Objective::HoldZones { zones, .. } => out.extend_from_slice(zones),
            Objective::Escort { goal, .. } => out.push(*goal),
            Objective::EliminateBoss { .. } | Objective::SurviveNTurns { .. } => {}
            Objective::AllOf(children) | Objective::AnyOf(children) => {
                for child in children {
                    child.referenced_zones(out);
                }
            }
        }
    }

    /// Collects every team id the objective refers to.
    pub fn referenced_teams(&self, out: &mut Vec<TeamId>) {
        match self {
            Objective::SurviveNTurns { team, .. } | Objective::HoldZones { team, .. } => {
                out.push(*team);
            }
            Objective::EliminateBoss { .. } | Objective::Escort { .. } => {}
            Objective::AllOf(children) | Objective::AnyOf(children) => {
                for child in children {
                    child.referenced_teams(out);
                }
            }
        }
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// Live progress state for one objective tree.
#[derive(Clone, Debug)]
pub struct ObjectiveTracker {
    outcome: ObjectiveOutcome,
    /// Outcome reported if the objective becomes impossible; `None` makes an
    /// impossible objective inert.
    on_fail: Option<ObjectiveOutcome>,
    root: TrackerNode,
    completed: bool,
}

impl ObjectiveTracker {
    /// Builds a tracker whose completion means victory; its failure (escort
    /// death) means defeat.
    pub fn victory(objective: &Objective, state: &BattleState) -> Self {
        Self::new(objective, state, ObjectiveOutcome::Victory, Some(ObjectiveOutcome::Defeat))
    }

    /// Builds a tracker whose completion means defeat. A defeat condition
    /// that becomes impossible simply stops firing.
    pub fn defeat(objective: &Objective, state: &BattleState) -> Self {
        Self::new(objective, state, ObjectiveOutcome::Defeat, None)
    }

    fn new(
        objective: &Objective,
        state: &BattleState,
        outcome: ObjectiveOutcome,
        on_fail: Option<ObjectiveOutcome>,
    ) -> Self {
        let mut next_index = 0;
        Self {
            outcome,
            on_fail,
            root: TrackerNode::build(objective, state, &mut next_index),
            completed: false,
        }
    }

    /// Whether this tracker has produced its terminal event.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Feeds one event through the tree, returning any objective events it
    /// produced. At most one `ObjectiveCompleted` is ever emitted.
    pub fn observe(&mut self, event: &Event) -> Vec<Event> {
        if self.completed {
            return Vec::new();
        }

        let mut produced = Vec::new();
        self.root.update(event, &mut produced);

        if self.root.is_failed() {
            self.completed = true;
            if let Some(outcome) = self.on_fail {
                produced.push(Event::ObjectiveCompleted { outcome });
            }
        } else if self.root.is_complete() {
            self.completed = true;
            produced.push(Event::ObjectiveCompleted {
                outcome: self.outcome,
            });
        }

        produced
    }
}

/// One node of the live tracker tree, mirroring the objective config.
///
/// Leaf nodes carry a stable `index` (pre-order position) so progress events
/// identify which sub-objective moved.
#[derive(Clone, Debug)]
enum TrackerNode {
    EliminateBoss {
        index: u32,
        unit: UnitId,
        done: bool,
    },
    SurviveNTurns {
        index: u32,
        members: BTreeSet<UnitId>,
        required: u32,
        seen: u32,
        last_round: Option<u32>,
    },
    HoldZones {
        index: u32,
        members: BTreeSet<UnitId>,
        /// Last known member positions, maintained from move/kill events.
        positions: BTreeMap<UnitId, Position>,
        zones: Vec<Position>,
        required: u32,
        streak: u32,
        last_round: Option<u32>,
    },
    Escort {
        index: u32,
        unit: UnitId,
        goal: Position,
        done: bool,
        failed: bool,
    },
    AllOf(Vec<TrackerNode>),
    AnyOf(Vec<TrackerNode>),
}

impl TrackerNode {
    fn build(objective: &Objective, state: &BattleState, next_index: &mut u32) -> Self {
        let index = *next_index;
        *next_index += 1;
        match objective {
            Objective::EliminateBoss { unit } => TrackerNode::EliminateBoss {
                index,
                unit: *unit,
                done: false,
            },
            Objective::SurviveNTurns { team, turns } => TrackerNode::SurviveNTurns {
                index,
                members: team_members(state, *team),
                required: *turns,
                seen: 0,
                last_round: None,
            },
            Objective::HoldZones {
                team,
                zones,
                consecutive_rounds,
            } => {
                let members = team_members(state, *team);
                let positions = members
                    .iter()
                    .filter_map(|&id| state.unit(id).map(|u| (id, u.position)))
                    .collect();
                TrackerNode::HoldZones {
                    index,
                    members,
                    positions,
                    zones: zones.clone(),
                    required: *consecutive_rounds,
                    streak: 0,
                    last_round: None,
                }
            }
            Objective::Escort { unit, goal } => TrackerNode::Escort {
                index,
                unit: *unit,
                goal: *goal,
                done: false,
                failed: false,
            },
            Objective::AllOf(children) => TrackerNode::AllOf(
                children
                    .iter()
                    .map(|c| TrackerNode::build(c, state, next_index))
                    .collect(),
            ),
            Objective::AnyOf(children) => TrackerNode::AnyOf(
                children
                    .iter()
                    .map(|c| TrackerNode::build(c, state, next_index))
                    .collect(),
            ),
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            TrackerNode::EliminateBoss { done, .. } => *done,
            TrackerNode::SurviveNTurns { seen, required, .. } => seen >= required,
            TrackerNode::HoldZones {
                streak, required, ..
            } => streak >= required,
            TrackerNode::Escort { done, .. } => *done,
            TrackerNode::AllOf(children) => children.iter().all(TrackerNode::is_complete),
            TrackerNode::AnyOf(children) => children.iter().any(TrackerNode::is_complete),
        }
    }

    fn is_failed(&self) -> bool {
        match self {
            TrackerNode::Escort { failed, .. } => *failed,
            TrackerNode::EliminateBoss { .. }
            | TrackerNode::SurviveNTurns { .. }
            | TrackerNode::HoldZones { .. } => false,
            TrackerNode::AllOf(children) => children.iter().any(TrackerNode::is_failed),
            TrackerNode::AnyOf(children) => children.iter().all(TrackerNode::is_failed),
        }
    }

    fn update(&mut self, event: &Event, produced: &mut Vec<Event>) {
        match self {
            TrackerNode::EliminateBoss { index, unit, done } => {
                if *done {
                    return;
                }
                if let Event::UnitKilled { unit: killed, .. } = event
                    && *killed == *unit
                {
                    *done = true;
                    produced.push(Event::ObjectiveProgressed {
                        index: *index,
                        progress: 1,
                        required: 1,
                    });
                }
            }

            TrackerNode::SurviveNTurns {
                index,
                members,
                required,
                seen,
                last_round,
            } => {
                if *seen >= *required {
                    return;
                }
                if let Event::TurnEnded { unit, round } = event
                    && members.contains(unit)
                    && *last_round != Some(*round)
                {
                    *last_round = Some(*round);
                    *seen += 1;
                    produced.push(Event::ObjectiveProgressed {
                        index: *index,
                        progress: *seen,
                        required: *required,
                    });
                }
            }

            TrackerNode::HoldZones {
                index,
                members,
                positions,
                zones,
                required,
                streak,
                last_round,
            } => {
                if *streak >= *required {
                    return;
                }
                match event {
                    Event::UnitMoved { unit, to, .. } if members.contains(unit) => {
                        positions.insert(*unit, *to);
                    }
                    Event::UnitKilled { unit, .. } if members.contains(unit) => {
                        positions.remove(unit);
                    }
                    // The first turn-end of each new round closes out the
                    // previous one; evaluate whether the zones were held.
                    Event::TurnEnded { round, .. } => match last_round {
                        None => *last_round = Some(*round),
                        Some(last) if *round > *last => {
                            *last_round = Some(*round);
                            let held = zones
                                .iter()
                                .all(|zone| positions.values().any(|p| p == zone));
                            let previous = *streak;
                            if held {
                                *streak += 1;
                            } else {
                                *streak = 0;
                            }
                            if *streak != previous {
                                produced.push(Event::ObjectiveProgressed {
                                    index: *index,
                                    progress: *streak,
                                    required: *required,
                                });
                            }
                        }
                        Some(_) => {}
                    },
                    _ => {}
                }
            }

            TrackerNode::Escort {
                index,
                unit,
                goal,
                done,
                failed,
            } => {
                if *done || *failed {
                    return;
                }
                match event {
                    Event::UnitMoved { unit: moved, to, .. }
                        if *moved == *unit && *to == *goal =>
                    {
                        *done = true;
                        produced.push(Event::ObjectiveProgressed {
                            index: *index,
                            progress: 1,
                            required: 1,
                        });
                    }
                    Event::UnitKilled { unit: killed, .. } if *killed == *unit => {
                        *failed = true;
                    }
                    _ => {}
                }
            }

            TrackerNode::AllOf(children) | TrackerNode::AnyOf(children) => {
                for child in children {
                    child.update(event, produced);
                }
            }
        }
    }
}

fn team_members(state: &BattleState, team: TeamId) -> BTreeSet<UnitId> {
    state
        .units()
        .iter()
        .filter(|u| u.team == team)
        .map(|u| u.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        Facing, GridState, ResourceMeter, StatusEffects, TerrainKind, UnitState,
    };

    fn state_with_units(units: Vec<(u32, u8, Position)>) -> BattleState {
        let grid = GridState::filled(8, 8, TerrainKind::Open);
        let units = units
            .into_iter()
            .map(|(id, team, pos)| UnitState {
                id: UnitId(id),
                team: TeamId(team),
                position: pos,
                height: 0,
                facing: Facing::North,
                hp: ResourceMeter::full(10),
                ap: ResourceMeter::full(6),
                initiative: 1,
                attack: 3,
                statuses: StatusEffects::empty(),
            })
            .collect();
        BattleState::new(0, grid, units).unwrap()
    }

    fn turn_ended(id: u32, round: u32) -> Event {
        Event::TurnEnded {
            unit: UnitId(id),
            round,
        }
    }

    #[test]
    fn eliminate_boss_completes_once() {
        let state = state_with_units(vec![(1, 0, Position::new(0, 0)), (2, 1, Position::new(1, 0))]);
        let mut tracker =
            ObjectiveTracker::victory(&Objective::EliminateBoss { unit: UnitId(2) }, &state);

        let miss = tracker.observe(&Event::UnitKilled {
            unit: UnitId(1),
            position: Position::new(0, 0),
        });
        assert!(miss.is_empty());

        let hit = tracker.observe(&Event::UnitKilled {
            unit: UnitId(2),
            position: Position::new(1, 0),
        });
        assert!(hit.contains(&Event::ObjectiveCompleted {
            outcome: ObjectiveOutcome::Victory
        }));
        assert!(tracker.is_completed());

        // Latched: further events produce nothing.
        assert!(
            tracker
                .observe(&Event::UnitKilled {
                    unit: UnitId(2),
                    position: Position::new(1, 0),
                })
                .is_empty()
        );
    }

    #[test]
    fn survive_counts_distinct_rounds() {
        let state = state_with_units(vec![(1, 0, Position::new(0, 0))]);
        let mut tracker = ObjectiveTracker::victory(
            &Objective::SurviveNTurns {
                team: TeamId(0),
                turns: 3,
            },
            &state,
        );

        assert!(tracker.observe(&turn_ended(1, 0)).iter().all(|e| matches!(
            e,
            Event::ObjectiveProgressed { progress: 1, .. }
        )));
        assert!(tracker.observe(&turn_ended(1, 1)).iter().all(|e| matches!(
            e,
            Event::ObjectiveProgressed { progress: 2, .. }
        )));
        let last = tracker.observe(&turn_ended(1, 2));
        assert!(last.contains(&Event::ObjectiveCompleted {
            outcome: ObjectiveOutcome::Victory
        }));
    }

    #[test]
    fn survive_ignores_other_teams_and_repeat_rounds() {
        let state = state_with_units(vec![(1, 0, Position::new(0, 0)), (2, 1, Position::new(1, 0))]);
        let mut tracker = ObjectiveTracker::victory(
            &Objective::SurviveNTurns {
                team: TeamId(0),
                turns: 2,
            },
            &state,
        );

        assert!(tracker.observe(&turn_ended(2, 0)).is_empty());
        assert_eq!(tracker.observe(&turn_ended(1, 0)).len(), 1);
        // Same round again: no double count.
        assert!(tracker.observe(&turn_ended(1, 0)).is_empty());
    }

    #[test]
    fn escort_death_fails_to_defeat() {
        let state = state_with_units(vec![(1, 0, Position::new(0, 0))]);
        let mut tracker = ObjectiveTracker::victory(
            &Objective::Escort {
                unit: UnitId(1),
                goal: Position::new(5, 5),
            },
            &state,
        );

        let out = tracker.observe(&Event::UnitKilled {
            unit: UnitId(1),
            position: Position::new(0, 0),
        });
        assert!(out.contains(&Event::ObjectiveCompleted {
            outcome: ObjectiveOutcome::Defeat
        }));
    }

    #[test]
    fn any_of_first_completion_wins() {
        let state = state_with_units(vec![(1, 0, Position::new(0, 0)), (2, 1, Position::new(1, 0))]);
        let objective = Objective::AnyOf(vec![
            Objective::EliminateBoss { unit: UnitId(2) },
            Objective::SurviveNTurns {
                team: TeamId(0),
                turns: 99,
            },
        ]);
        let mut tracker = ObjectiveTracker::victory(&objective, &state);

        let out = tracker.observe(&Event::UnitKilled {
            unit: UnitId(2),
            position: Position::new(1, 0),
        });
        assert!(out.contains(&Event::ObjectiveCompleted {
            outcome: ObjectiveOutcome::Victory
        }));
    }

    #[test]
    fn all_of_requires_every_child() {
        let state = state_with_units(vec![(1, 0, Position::new(0, 0)), (2, 1, Position::new(1, 0))]);
        let objective = Objective::AllOf(vec![
            Objective::EliminateBoss { unit: UnitId(2) },
            Objective::SurviveNTurns {
                team: TeamId(0),
                turns: 1,
            },
        ]);
        let mut tracker = ObjectiveTracker::victory(&objective, &state);

        assert!(
            !tracker
                .observe(&Event::UnitKilled {
                    unit: UnitId(2),
                    position: Position::new(1, 0),
                })
                .iter()
                .any(|e| matches!(e, Event::ObjectiveCompleted { .. }))
        );
        let out = tracker.observe(&turn_ended(1, 0));
        assert!(out.contains(&Event::ObjectiveCompleted {
            outcome: ObjectiveOutcome::Victory
        }));
    }

    #[test]
    fn hold_zones_consecutive_streak() {
        let state = state_with_units(vec![(1, 0, Position::new(3, 3))]);
        let mut tracker = ObjectiveTracker::victory(
            &Objective::HoldZones {
                team: TeamId(0),
                zones: vec![Position::new(3, 3)],
                consecutive_rounds: 2,
            },
            &state,
        );

        // Round 0 opens the window; rounds 1 and 2 evaluate the hold.
        assert!(tracker.observe(&turn_ended(1, 0)).is_empty());
        assert_eq!(tracker.observe(&turn_ended(1, 1)).len(), 1);
        let out = tracker.observe(&turn_ended(1, 2));
        assert!(out.contains(&Event::ObjectiveCompleted {
            outcome: ObjectiveOutcome::Victory
        }));
    }

    #[test]
    fn hold_zones_streak_resets_when_vacated() {
        let state = state_with_units(vec![(1, 0, Position::new(3, 3))]);
        let mut tracker = ObjectiveTracker::victory(
            &Objective::HoldZones {
                team: TeamId(0),
                zones: vec![Position::new(3, 3)],
                consecutive_rounds: 2,
            },
            &state,
        );

        tracker.observe(&turn_ended(1, 0));
        tracker.observe(&turn_ended(1, 1)); // streak 1
        tracker.observe(&Event::UnitMoved {
            unit: UnitId(1),
            from: Position::new(3, 3),
            to: Position::new(4, 3),
        });
        tracker.observe(&turn_ended(1, 2)); // streak back to 0
        tracker.observe(&Event::UnitMoved {
            unit: UnitId(1),
            from: Position::new(4, 3),
            to: Position::new(3, 3),
        });
        tracker.observe(&turn_ended(1, 3)); // streak 1
        let out = tracker.observe(&turn_ended(1, 4)); // streak 2
        assert!(out.contains(&Event::ObjectiveCompleted {
            outcome: ObjectiveOutcome::Victory
        }));
    }
}
