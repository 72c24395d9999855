use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{ActorId, Driver, Rider, RiderStatus};
use crate::monitor::{ActivityKind, ActorCategory, Monitor};

/// The driver arrives at the rider's origin.
///
/// If the rider is still waiting, the ride starts: the rider is satisfied,
/// the driver retargets to the rider's destination, and a dropoff is
/// scheduled at arrival time. If the rider cancelled in the meantime, the
/// driver simply arrives, goes idle, and immediately re-enters matching;
/// that branch notifies nothing.
pub fn pickup_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut monitor: ResMut<Monitor>,
    mut riders: Query<(&mut Rider, &ActorId)>,
    mut drivers: Query<(&mut Driver, &ActorId)>,
) {
    let EventKind::Pickup {
        rider: rider_entity,
        driver: driver_entity,
    } = event.0.kind
    else {
        return;
    };
    let now = event.0.timestamp;
    let Ok((mut rider, rider_id)) = riders.get_mut(rider_entity) else {
        return;
    };
    let Ok((mut driver, driver_id)) = drivers.get_mut(driver_entity) else {
        return;
    };

    if rider.status == RiderStatus::Waiting {
        rider.status = RiderStatus::Satisfied;
        let ride_ticks = driver.start_ride(rider_entity, rider.destination);
        monitor.notify(
            now,
            ActorCategory::Driver,
            ActivityKind::Pickup,
            &driver_id.0,
            rider.origin,
        );
        monitor.notify(
            now,
            ActorCategory::Rider,
            ActivityKind::Pickup,
            &rider_id.0,
            rider.origin,
        );
        clock.schedule(
            now + ride_ticks,
            EventKind::Dropoff {
                rider: rider_entity,
                driver: driver_entity,
            },
        );
    } else {
        driver.end_drive();
        clock.schedule(now, EventKind::DriverRequest(driver_entity));
    }
}
