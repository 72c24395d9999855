//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each
//! step pops the next event from [SimulationClock], inserts it as
//! [CurrentEvent], then runs the schedule; each event-kind system is gated
//! by a run condition so only the matching transition fires. Every
//! transition runs to completion before the next event is popped.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::scenario::SimulationEndTime;
use crate::systems::{
    cancellation::cancellation_system, driver_request::driver_request_system,
    dropoff::dropoff_system, pickup::pickup_system, rider_request::rider_request_system,
};

// Condition functions for each event kind
fn is_rider_request(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::RiderRequest(_)))
        .unwrap_or(false)
}

fn is_driver_request(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::DriverRequest(_)))
        .unwrap_or(false)
}

fn is_cancellation(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Cancellation(_)))
        .unwrap_or(false)
}

fn is_pickup(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Pickup { .. }))
        .unwrap_or(false)
}

fn is_dropoff(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Dropoff { .. }))
        .unwrap_or(false)
}

/// Runs one simulation step: pops the next event, inserts it as
/// [CurrentEvent], then runs the schedule. Returns `true` if an event was
/// processed, `false` if the clock was empty or the next event is at or
/// past [SimulationEndTime] (when that resource is present).
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    run_next_event_with_hook(world, schedule, |_, _| {})
}

/// [run_next_event] variant invoking `hook` after the step, for tracing.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    let stop_at = world.get_resource::<SimulationEndTime>().map(|e| e.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end), Some(ts)) = (stop_at, next_ts) {
        if ts >= end {
            return false;
        }
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));

    schedule.run(world);
    hook(world, &event);
    true
}

/// Runs simulation steps until the event queue is empty or `max_steps` is
/// reached. Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    steps
}

/// Builds the default simulation schedule: one system per event kind,
/// gated by a condition on the current event.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        rider_request_system.run_if(is_rider_request),
        driver_request_system.run_if(is_driver_request),
        cancellation_system.run_if(is_cancellation),
        pickup_system.run_if(is_pickup),
        dropoff_system.run_if(is_dropoff),
    ));
    schedule
}
