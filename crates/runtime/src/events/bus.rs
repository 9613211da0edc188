//! Synchronous fan-out event bus.
//!
//! Observers subscribe once and pull events from a channel at their own
//! cadence; the scheduler pushes every event of a command, in emission
//! order, before the next command is accepted. Observers receive copies and
//! cannot alter core decisions — there is no callback into the core.

use std::sync::mpsc::{Receiver, Sender, channel};

use battle_core::Event;

/// Fan-out sender over any number of subscribers.
///
/// Subscribers that drop their [`Receiver`] are pruned on the next publish.
#[derive(Default)]
pub struct EventBus {
    senders: Vec<Sender<Event>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener receiving each event in emission order.
    pub fn subscribe(&mut self) -> Receiver<Event> {
        let (tx, rx) = channel();
        self.senders.push(tx);
        rx
    }

    /// Delivers one event to every live subscriber.
    pub fn publish(&mut self, event: &Event) {
        if self.senders.is_empty() {
            // No subscribers is normal for headless runs.
            tracing::trace!(kind = event.kind(), "event dropped: no subscribers");
            return;
        }
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{ObjectiveOutcome, UnitId};

    #[test]
    fn subscribers_receive_in_emission_order() {
        let mut bus = EventBus::new();
        let rx = bus.subscribe();

        bus.publish(&Event::TurnEnded {
            unit: UnitId(1),
            round: 0,
        });
        bus.publish(&Event::ObjectiveCompleted {
            outcome: ObjectiveOutcome::Victory,
        });

        assert_eq!(
            rx.try_recv().unwrap(),
            Event::TurnEnded {
                unit: UnitId(1),
                round: 0
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            Event::ObjectiveCompleted {
                outcome: ObjectiveOutcome::Victory
            }
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut bus = EventBus::new();
        let rx = bus.subscribe();
        drop(rx);

        bus.publish(&Event::TurnEnded {
            unit: UnitId(1),
            round: 0,
        });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
