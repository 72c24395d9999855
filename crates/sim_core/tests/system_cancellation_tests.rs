mod support;

use sim_core::clock::{EventKind, SimulationClock};
use sim_core::dispatch::Dispatcher;
use sim_core::ecs::{Driver, Rider, RiderStatus};
use sim_core::grid::Location;
use sim_core::monitor::{ActivityKind, ActorCategory, Monitor};
use sim_core::runner::{run_until_empty, run_until_empty_with_hook, simulation_schedule};
use support::world::{schedule, spawn_driver, spawn_rider, test_world};

/// R2 requested at t=0 with patience 3 and no drivers anywhere: the
/// cancellation fires at exactly t=3 and no pickup is ever created.
#[test]
fn unmatched_rider_cancels_when_patience_runs_out() {
    let mut world = test_world();
    let rider = spawn_rider(
        &mut world,
        "R2",
        3,
        Location::new(2, 2),
        Location::new(8, 8),
    );
    schedule(&mut world, 0, EventKind::RiderRequest(rider));

    let mut sched = simulation_schedule();
    let mut timeline = Vec::new();
    let steps = run_until_empty_with_hook(&mut world, &mut sched, 100, |_, event| {
        timeline.push((event.timestamp, event.kind));
    });
    assert_eq!(steps, 2);
    assert_eq!(
        timeline,
        vec![
            (0, EventKind::RiderRequest(rider)),
            (3, EventKind::Cancellation(rider)),
        ]
    );

    assert_eq!(
        world.entity(rider).get::<Rider>().map(|r| r.status),
        Some(RiderStatus::Cancelled)
    );
    assert_eq!(world.resource::<Dispatcher>().waitlist().count(), 0);

    let monitor = world.resource::<Monitor>();
    let log = monitor.activities_for(ActorCategory::Rider, "R2");
    assert_eq!(
        log.iter().map(|a| (a.time, a.kind)).collect::<Vec<_>>(),
        vec![(0, ActivityKind::Request), (3, ActivityKind::Cancel)]
    );
    assert_eq!(monitor.report().average_rider_wait_time, Some(3.0));
}

#[test]
fn cancellation_after_pickup_is_a_noop() {
    let mut world = test_world();
    let driver = spawn_driver(&mut world, "D1", Location::new(0, 0), 1);
    let rider = spawn_rider(
        &mut world,
        "R1",
        20,
        Location::new(0, 5),
        Location::new(0, 9),
    );
    schedule(&mut world, 0, EventKind::DriverRequest(driver));
    schedule(&mut world, 0, EventKind::RiderRequest(rider));

    let mut sched = simulation_schedule();
    run_until_empty(&mut world, &mut sched, 100);

    // Picked up at t=5, well before patience ran out at t=20: the rider
    // stays satisfied and no cancel activity is logged.
    assert_eq!(
        world.entity(rider).get::<Rider>().map(|r| r.status),
        Some(RiderStatus::Satisfied)
    );
    let monitor = world.resource::<Monitor>();
    assert!(monitor
        .activities_for(ActorCategory::Rider, "R1")
        .iter()
        .all(|a| a.kind != ActivityKind::Cancel));
}

/// The driver was already en route when the rider cancelled: the driver
/// still arrives, goes idle there, and immediately re-enters matching.
/// The cancelled branch of pickup notifies nothing.
#[test]
fn pickup_of_cancelled_rider_returns_driver_to_matching() {
    let mut world = test_world();
    let driver = spawn_driver(&mut world, "D1", Location::new(0, 0), 1);
    let rider = spawn_rider(
        &mut world,
        "R1",
        2,
        Location::new(0, 9),
        Location::new(5, 5),
    );
    schedule(&mut world, 0, EventKind::DriverRequest(driver));
    schedule(&mut world, 0, EventKind::RiderRequest(rider));

    let mut sched = simulation_schedule();
    let mut timeline = Vec::new();
    run_until_empty_with_hook(&mut world, &mut sched, 100, |_, event| {
        timeline.push((event.timestamp, event.kind));
    });

    // Cancellation at t=2 precedes the pickup at t=9.
    assert!(timeline.contains(&(2, EventKind::Cancellation(rider))));
    assert!(timeline.contains(&(9, EventKind::Pickup { rider, driver })));
    assert!(timeline.contains(&(9, EventKind::DriverRequest(driver))));
    assert!(!timeline
        .iter()
        .any(|(_, kind)| matches!(kind, EventKind::Dropoff { .. })));

    let driver_state = world.entity(driver).get::<Driver>().expect("driver");
    assert!(driver_state.is_idle);
    assert_eq!(driver_state.location, Location::new(0, 9));
    assert_eq!(driver_state.passenger, None);

    let monitor = world.resource::<Monitor>();
    assert!(monitor
        .activities_for(ActorCategory::Driver, "D1")
        .iter()
        .all(|a| a.kind != ActivityKind::Pickup));
    assert!(monitor
        .activities_for(ActorCategory::Rider, "R1")
        .iter()
        .all(|a| a.kind != ActivityKind::Pickup));
}

#[test]
fn cancelled_rider_leaves_the_waitlist_for_the_next_driver() {
    let mut world = test_world();
    let impatient = spawn_rider(
        &mut world,
        "Impatient",
        1,
        Location::new(1, 1),
        Location::new(2, 2),
    );
    let patient = spawn_rider(
        &mut world,
        "Patient",
        100,
        Location::new(3, 3),
        Location::new(4, 4),
    );
    let driver = spawn_driver(&mut world, "D1", Location::new(3, 3), 1);
    schedule(&mut world, 0, EventKind::RiderRequest(impatient));
    schedule(&mut world, 0, EventKind::RiderRequest(patient));
    // The driver shows up after the first rider has cancelled.
    schedule(&mut world, 5, EventKind::DriverRequest(driver));

    let mut sched = simulation_schedule();
    run_until_empty(&mut world, &mut sched, 100);

    assert_eq!(
        world.entity(impatient).get::<Rider>().map(|r| r.status),
        Some(RiderStatus::Cancelled)
    );
    // The driver skipped the cancelled rider and served the patient one.
    assert_eq!(
        world.entity(patient).get::<Rider>().map(|r| r.status),
        Some(RiderStatus::Satisfied)
    );
    assert!(world.resource::<SimulationClock>().is_empty());
}
