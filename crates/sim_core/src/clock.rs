//! Simulation clock: a min-heap of timestamped events driving discrete time.
//!
//! Events are ordered by timestamp; equal timestamps run in scheduling
//! (FIFO) order via a monotonic sequence number assigned by [SimulationClock::schedule].
//! That makes the execution order of a run fully deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

/// The five event kinds of the simulation, each carrying the entity
/// handles its transition needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    RiderRequest(Entity),
    DriverRequest(Entity),
    Cancellation(Entity),
    Pickup { rider: Entity, driver: Entity },
    Dropoff { rider: Entity, driver: Entity },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    /// Scheduling order, unique per clock; tie-break for equal timestamps.
    pub seq: u64,
    pub kind: EventKind,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, seq).
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event the schedule is currently reacting to; inserted by the runner
/// before each step.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `kind` at `timestamp`. Scheduling into the past is a
    /// programming error.
    pub fn schedule(&mut self, timestamp: u64, kind: EventKind) {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            timestamp,
            seq,
            kind,
        });
    }

    /// Pop the earliest event and advance the clock to its timestamp.
    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|event| event.timestamp)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
