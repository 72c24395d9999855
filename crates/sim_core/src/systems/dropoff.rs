use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{ActorId, Driver, Rider, RiderStatus};
use crate::monitor::{ActivityKind, ActorCategory, Monitor};

/// The driver arrives at the rider's destination.
///
/// The rider is dropped off (their origin moves to the dropoff point, so a
/// later re-request starts from there), the driver goes idle and
/// immediately re-enters matching.
pub fn dropoff_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut monitor: ResMut<Monitor>,
    mut riders: Query<(&mut Rider, &ActorId)>,
    mut drivers: Query<(&mut Driver, &ActorId)>,
) {
    let EventKind::Dropoff {
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

    monitor.notify(
        now,
        ActorCategory::Driver,
        ActivityKind::Dropoff,
        &driver_id.0,
        rider.destination,
    );
    monitor.notify(
        now,
        ActorCategory::Rider,
        ActivityKind::Dropoff,
        &rider_id.0,
        rider.destination,
    );

    let passenger = driver.end_ride();
    debug_assert_eq!(passenger, rider_entity, "dropoff for a different passenger");
    rider.origin = driver.location;
    driver.end_drive();
    rider.status = RiderStatus::Satisfied;
    clock.schedule(now, EventKind::DriverRequest(driver_entity));
}
