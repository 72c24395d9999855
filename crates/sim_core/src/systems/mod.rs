//! One system per event kind, each reacting to [crate::clock::CurrentEvent]
//! and scheduling any follow-up events back onto the clock.

pub mod cancellation;
pub mod driver_request;
pub mod dropoff;
pub mod pickup;
pub mod rider_request;

use bevy_ecs::prelude::Query;

use crate::dispatch::{Dispatcher, DriverCandidate};
use crate::ecs::{ActorId, Driver};

/// Snapshot the registered drivers in registration order, for
/// [Dispatcher::request_driver].
pub(crate) fn driver_candidates(
    dispatcher: &Dispatcher,
    drivers: &Query<(&mut Driver, &ActorId)>,
) -> Vec<DriverCandidate> {
    dispatcher
        .registered_drivers()
        .iter()
        .filter_map(|&entity| {
            let (driver, _) = drivers.get(entity).ok()?;
            Some(DriverCandidate {
                entity,
                location: driver.location,
                speed: driver.speed,
                is_idle: driver.is_idle,
            })
        })
        .collect()
}
