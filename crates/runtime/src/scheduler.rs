//! The game loop: tick-by-tick advancement of one battle.
//!
//! [`Simulation`] owns the battle state, per-unit controllers, objective
//! trackers, the event bus, and the replay recorder. [`Simulation::tick`]
//! processes exactly one unit's command: collect → resolve → dispatch →
//! objective check. It is synchronous and non-reentrant; driving it at
//! unbounded speed is the headless soak mode, pacing it to real time is the
//! host's business.

use std::collections::BTreeMap;
use std::sync::mpsc::Receiver;

use battle_core::{
    BattleState, Command, Event, ObjectiveOutcome, ObjectiveTracker, Rejection, TeamId, Tick,
    UnitId, hash, invariant,
};

use crate::controller::Controller;
use crate::error::RuntimeError;
use crate::events::EventBus;
use crate::replay::{ReplayEntry, ReplayLog};
use crate::scenario::{IngestError, ScenarioDescriptor};
use crate::snapshot::Snapshot;

/// Outcome of one scheduler step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    /// Unit whose turn was processed.
    pub unit: UnitId,
    /// Command that was actually applied (the fallback end-turn when the
    /// controller's choice was rejected).
    pub command: Command,
    /// Every event the command produced, in emission order, including
    /// objective progress and any terminal event.
    pub events: Vec<Event>,
    /// Set once a terminal objective fired; repeated on every report after.
    pub outcome: Option<ObjectiveOutcome>,
}

/// One independent battle: state, controllers, objectives, observers.
///
/// Nothing is process-global; hosts run concurrent battles by creating
/// multiple simulations.
pub struct Simulation {
    state: BattleState,
    controllers: BTreeMap<UnitId, Controller>,
    trackers: Vec<ObjectiveTracker>,
    bus: EventBus,
    entries: Vec<ReplayEntry>,
    ticks: Tick,
    outcome: Option<ObjectiveOutcome>,
    player_team: TeamId,
}

impl Simulation {
    /// Validates the scenario and builds a fresh battle seeded with `seed`.
    pub fn new(scenario: &ScenarioDescriptor, seed: u64) -> Result<Self, IngestError> {
        scenario.validate()?;
        let state = scenario.build_state(seed)?;
        let controllers = scenario.build_controllers();
        let trackers = scenario.build_trackers(&state);

        tracing::info!(
            scenario = %scenario.name,
            seed,
            units = state.units().len(),
            "simulation initialized"
        );

        Ok(Self {
            state,
            controllers,
            trackers,
            bus: EventBus::new(),
            entries: Vec::new(),
            ticks: Tick::ZERO,
            outcome: None,
            player_team: scenario.player_team,
        })
    }

    /// Advances the battle by one unit turn step.
    ///
    /// Asks the active unit's controller for a command and resolves it. A
    /// rejected command is surfaced as a `CommandRejected` event and the
    /// unit falls back to ending its turn, so the loop always makes
    /// progress.
    pub fn tick(&mut self) -> Result<TickReport, RuntimeError> {
        if self.outcome.is_some() {
            return Err(RuntimeError::Terminated);
        }
        let unit = self
            .state
            .ensure_live_current()
            .ok_or(RuntimeError::NoLiveUnits)?;
        let tick = self.ticks;

        let command = match self.controllers.get_mut(&unit) {
            Some(controller) => controller.decide(&self.state, unit),
            // A unit without a controller idles.
            None => Command::EndTurn { unit },
        };

        let (command, events) = match self.execute(unit, &command) {
            Ok(events) => (command, events),
            Err(rejection) => {
                tracing::debug!(
                    unit = %unit,
                    code = rejection.reason_code(),
                    "command rejected, falling back to end turn"
                );
                let mut events = vec![Event::CommandRejected {
                    unit,
                    code: rejection.reason_code().to_string(),
                }];
                self.dispatch(&mut events);

                let fallback = Command::EndTurn { unit };
                match self.execute(unit, &fallback) {
                    Ok(fallback_events) => {
                        events.extend(fallback_events);
                        (fallback, events)
                    }
                    Err(second) => {
                        return Err(RuntimeError::FallbackRejected {
                            code: second.reason_code(),
                        });
                    }
                }
            }
        };

        self.entries.push(ReplayEntry {
            tick,
            unit,
            command: command.clone(),
        });

        Ok(TickReport {
            tick,
            unit,
            command,
            events,
            outcome: self.outcome,
        })
    }

    /// Runs until a terminal outcome or `max_ticks`, whichever comes first.
    pub fn run_until_outcome(
        &mut self,
        max_ticks: u64,
    ) -> Result<Option<ObjectiveOutcome>, RuntimeError> {
        for _ in 0..max_ticks {
            self.tick()?;
            if self.outcome.is_some() {
                break;
            }
        }
        Ok(self.outcome)
    }

    /// Submits one accepted command and runs the shared post-processing:
    /// event dispatch, elimination check, turn advancement, tick count.
    ///
    /// Used by `tick` for controller output and by replay for recorded
    /// commands — there is exactly one execution path.
    pub(crate) fn execute(
        &mut self,
        unit: UnitId,
        command: &Command,
    ) -> Result<Vec<Event>, Rejection> {
        let mut events = self.state.submit(command)?;

        if cfg!(debug_assertions)
            && let Err(violation) = invariant::verify(&self.state)
        {
            // Stop loudly instead of repairing: masking this would hide
            // determinism bugs.
            panic!("invariant violated after {}: {violation}", command.kind());
        }

        self.dispatch(&mut events);
        self.check_elimination(&mut events);

        let actor_alive = self.state.unit(unit).is_some_and(|u| u.alive());
        if matches!(command, Command::EndTurn { .. }) || !actor_alive {
            self.state.advance_turn();
        }
        self.ticks = self.ticks + 1;

        Ok(events)
    }

    /// Delivers events in emission order: each one goes to the bus, then to
    /// every objective tracker. Tracker-produced events are appended to the
    /// same batch so subscribers see them before the next command starts.
    fn dispatch(&mut self, events: &mut Vec<Event>) {
        let mut i = 0;
        while i < events.len() {
            let event = events[i].clone();
            self.bus.publish(&event);

            let is_objective_event = matches!(
                event,
                Event::ObjectiveProgressed { .. } | Event::ObjectiveCompleted { .. }
            );
            if self.outcome.is_none() && !is_objective_event {
                for tracker in &mut self.trackers {
                    for produced in tracker.observe(&event) {
                        match produced {
                            Event::ObjectiveCompleted { outcome } => {
                                if self.outcome.is_none() {
                                    self.outcome = Some(outcome);
                                    tracing::info!(%outcome, "terminal objective fired");
                                    events.push(produced);
                                }
                            }
                            other => events.push(other),
                        }
                    }
                }
            }
            i += 1;
        }
    }

    /// Implicit loss: the player team being wiped out ends the battle even
    /// when no configured defeat objective covers it.
    fn check_elimination(&mut self, events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        if self.state.live_units_of_team(self.player_team).count() == 0 {
            let event = Event::ObjectiveCompleted {
                outcome: ObjectiveOutcome::Defeat,
            };
            self.outcome = Some(ObjectiveOutcome::Defeat);
            tracing::info!(team = %self.player_team, "player team eliminated");
            self.bus.publish(&event);
            events.push(event);
        }
    }

    // ========================================================================
    // Host surface
    // ========================================================================

    /// Queues a command for a player-controlled unit. The scheduler pulls it
    /// on that unit's next turn.
    pub fn push_command(&mut self, unit: UnitId, command: Command) -> Result<(), RuntimeError> {
        match self.controllers.get_mut(&unit) {
            None => Err(RuntimeError::UnknownUnit { unit }),
            Some(Controller::Player(player)) => {
                player.push(command);
                Ok(())
            }
            Some(_) => Err(RuntimeError::NotPlayerControlled { unit }),
        }
    }

    /// Registers an observer receiving every event in emission order.
    pub fn subscribe(&mut self) -> Receiver<Event> {
        self.bus.subscribe()
    }

    /// Read-only view of the current state for presentation layers.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.ticks, self.outcome)
    }

    /// Direct read access for in-process hosts and tests.
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// The unit whose turn is next.
    pub fn current_unit(&self) -> Option<UnitId> {
        self.state.current_unit()
    }

    /// Like [`current_unit`](Self::current_unit), but first skips a cursor
    /// resting on a unit that died outside its own turn.
    pub(crate) fn resolve_current_unit(&mut self) -> Option<UnitId> {
        self.state.ensure_live_current()
    }

    /// Terminal outcome, once one has fired.
    pub fn outcome(&self) -> Option<ObjectiveOutcome> {
        self.outcome
    }

    /// Ticks processed so far.
    pub fn ticks(&self) -> Tick {
        self.ticks
    }

    /// Current state root in hex, the replay verification anchor.
    pub fn state_root(&self) -> String {
        hash::state_root_hex(&self.state)
    }

    /// On-demand consistency check.
    pub fn verify_invariants(&self) -> Result<(), RuntimeError> {
        invariant::verify(&self.state).map_err(RuntimeError::from)
    }

    /// The replay log of everything applied so far.
    pub fn replay_log(&self) -> ReplayLog {
        ReplayLog {
            seed: self.state.seed,
            entries: self.entries.clone(),
            final_root: self.state_root(),
        }
    }
}
