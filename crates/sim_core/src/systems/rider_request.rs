use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::dispatch::Dispatcher;
use crate::ecs::{ActorId, Driver, Rider};
use crate::monitor::{ActivityKind, ActorCategory, Monitor};
use crate::systems::driver_candidates;

/// A rider requests a driver.
///
/// The dispatcher assigns the nearest idle driver, who immediately starts
/// driving to the rider's origin (pickup scheduled at arrival time); with
/// no idle driver the rider is waitlisted. Either way a cancellation is
/// scheduled for when the rider's patience runs out.
pub fn rider_request_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut dispatcher: ResMut<Dispatcher>,
    mut monitor: ResMut<Monitor>,
    riders: Query<(&Rider, &ActorId)>,
    mut drivers: Query<(&mut Driver, &ActorId)>,
) {
    let EventKind::RiderRequest(rider_entity) = event.0.kind else {
        return;
    };
    let now = event.0.timestamp;
    let Ok((rider, rider_id)) = riders.get(rider_entity) else {
        return;
    };

    monitor.notify(
        now,
        ActorCategory::Rider,
        ActivityKind::Request,
        &rider_id.0,
        rider.origin,
    );

    let candidates = driver_candidates(&dispatcher, &drivers);
    if let Some(driver_entity) = dispatcher.request_driver(rider_entity, rider.origin, &candidates)
    {
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
    clock.schedule(now + rider.patience, EventKind::Cancellation(rider_entity));
}
