use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::dispatch::Dispatcher;
use crate::ecs::{ActorId, Driver, Rider};
use crate::monitor::{ActivityKind, ActorCategory, Monitor};

/// A driver requests a rider.
///
/// Registers the driver on first contact, then takes the earliest-waiting
/// rider off the waitlist if there is one: the driver starts driving to
/// that rider's origin and a pickup is scheduled at arrival time.
pub fn driver_request_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut dispatcher: ResMut<Dispatcher>,
    mut monitor: ResMut<Monitor>,
    riders: Query<(&Rider, &ActorId)>,
    mut drivers: Query<(&mut Driver, &ActorId)>,
) {
    let EventKind::DriverRequest(driver_entity) = event.0.kind else {
        return;
    };
    let now = event.0.timestamp;
    let Ok((driver, driver_id)) = drivers.get(driver_entity) else {
        return;
    };

    monitor.notify(
        now,
        ActorCategory::Driver,
        ActivityKind::Request,
        &driver_id.0,
        driver.location,
    );

    // Waitlisted riders are always still Waiting: a cancellation removes
    // them from the waitlist at the moment it fires.
    if let Some(rider_entity) = dispatcher.request_rider(driver_entity) {
        let Ok((rider, _)) = riders.get(rider_entity) else {
            return;
        };
        let Ok((mut driver, _)) = drivers.get_mut(driver_entity) else {
            return;
        };
        let pickup_eta = driver.start_drive(rider.origin);
        clock.schedule(
            now + pickup_eta,
            EventKind::Pickup {
                rider: rider_entity,
                driver: driver_entity,
            },
        );
    }
}
