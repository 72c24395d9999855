use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::dispatch::Dispatcher;
use crate::ecs::{ActorId, Rider, RiderStatus};
use crate::monitor::{ActivityKind, ActorCategory, Monitor};

/// A rider gives up waiting.
///
/// Only acts on riders still `Waiting`: the rider becomes `Cancelled` and
/// leaves the waitlist. Firing after a pickup is the documented no-op path,
/// with no notification and no dispatcher call.
pub fn cancellation_system(
    event: Res<CurrentEvent>,
    mut dispatcher: ResMut<Dispatcher>,
    mut monitor: ResMut<Monitor>,
    mut riders: Query<(&mut Rider, &ActorId)>,
) {
    let EventKind::Cancellation(rider_entity) = event.0.kind else {
        return;
    };
    let Ok((mut rider, rider_id)) = riders.get_mut(rider_entity) else {
        return;
    };
    if rider.status != RiderStatus::Waiting {
        return;
    }

    rider.status = RiderStatus::Cancelled;
    monitor.notify(
        event.0.timestamp,
        ActorCategory::Rider,
        ActivityKind::Cancel,
        &rider_id.0,
        rider.origin,
    );
    dispatcher.cancel_ride(rider_entity);
}
