//! Dispatcher: pairs idle drivers with waiting riders.
//!
//! The dispatcher owns two orderings that the matching semantics depend on:
//! the driver registry (registration order, used for tie-breaking) and the
//! rider waitlist (FIFO by request time). Selection itself is a pure scan
//! over a candidate slice assembled by the calling system from the ECS.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource};

use crate::grid::{travel_time, Location};

/// Snapshot of one registered driver, in registration order.
#[derive(Debug, Clone, Copy)]
pub struct DriverCandidate {
    pub entity: Entity,
    pub location: Location,
    pub speed: u64,
    pub is_idle: bool,
}

/// Fulfills requests from riders and drivers.
///
/// When a rider requests a driver, the nearest idle driver (by travel time
/// to the rider's origin) is assigned; with none available the rider joins
/// the waitlist. When a driver requests a rider, the earliest-waiting rider
/// is assigned, and the driver is registered for future rider requests.
#[derive(Debug, Default, Resource)]
pub struct Dispatcher {
    drivers: Vec<Entity>,
    waitlist: VecDeque<Entity>,
}

impl Dispatcher {
    /// Registered drivers, in registration order.
    pub fn registered_drivers(&self) -> &[Entity] {
        &self.drivers
    }

    /// Riders currently waiting, earliest first.
    pub fn waitlist(&self) -> impl Iterator<Item = Entity> + '_ {
        self.waitlist.iter().copied()
    }

    /// Select a driver for `rider`, or waitlist the rider and return `None`
    /// if no idle driver exists.
    ///
    /// `candidates` must list the registered drivers in registration order;
    /// the idle one with the lowest travel time to `rider_origin` wins, and
    /// only a strict improvement replaces the current best, so ties go to
    /// the earlier-registered driver. Driver state is left untouched; the
    /// caller starts the drive.
    pub fn request_driver(
        &mut self,
        rider: Entity,
        rider_origin: Location,
        candidates: &[DriverCandidate],
    ) -> Option<Entity> {
        let mut best: Option<(Entity, u64)> = None;
        for candidate in candidates.iter().filter(|c| c.is_idle) {
            let eta = travel_time(candidate.location, rider_origin, candidate.speed);
            match best {
                Some((_, best_eta)) if eta >= best_eta => {}
                _ => best = Some((candidate.entity, eta)),
            }
        }

        match best {
            Some((driver, _)) => Some(driver),
            None => {
                if !self.waitlist.contains(&rider) {
                    self.waitlist.push_back(rider);
                }
                None
            }
        }
    }

    /// Pop the earliest-waiting rider for `driver`, registering the driver
    /// on first contact. Registration is idempotent and preserves
    /// first-registration order.
    pub fn request_rider(&mut self, driver: Entity) -> Option<Entity> {
        if !self.drivers.contains(&driver) {
            self.drivers.push(driver);
        }
        self.waitlist.pop_front()
    }

    /// Remove `rider` from the waitlist; no-op if already matched or gone.
    pub fn cancel_ride(&mut self, rider: Entity) {
        self.waitlist.retain(|waiting| *waiting != rider);
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::prelude::World;

    use super::*;

    fn candidate(entity: Entity, location: Location, speed: u64, is_idle: bool) -> DriverCandidate {
        DriverCandidate {
            entity,
            location,
            speed,
            is_idle,
        }
    }

    #[test]
    fn rider_is_waitlisted_when_no_drivers_registered() {
        let mut world = World::new();
        let rider = world.spawn_empty().id();
        let mut dispatcher = Dispatcher::default();

        assert_eq!(
            dispatcher.request_driver(rider, Location::new(0, 0), &[]),
            None
        );
        assert_eq!(dispatcher.waitlist().collect::<Vec<_>>(), vec![rider]);
    }

    #[test]
    fn rider_is_waitlisted_at_most_once() {
        let mut world = World::new();
        let rider = world.spawn_empty().id();
        let mut dispatcher = Dispatcher::default();

        dispatcher.request_driver(rider, Location::new(0, 0), &[]);
        dispatcher.request_driver(rider, Location::new(0, 0), &[]);
        assert_eq!(dispatcher.waitlist().count(), 1);
    }

    #[test]
    fn non_idle_drivers_are_never_selected() {
        let mut world = World::new();
        let rider = world.spawn_empty().id();
        let busy = world.spawn_empty().id();
        let mut dispatcher = Dispatcher::default();

        let candidates = [candidate(busy, Location::new(0, 0), 5, false)];
        assert_eq!(
            dispatcher.request_driver(rider, Location::new(0, 0), &candidates),
            None
        );
        assert_eq!(dispatcher.waitlist().collect::<Vec<_>>(), vec![rider]);
    }

    #[test]
    fn nearest_idle_driver_wins() {
        let mut world = World::new();
        let rider = world.spawn_empty().id();
        let far = world.spawn_empty().id();
        let near = world.spawn_empty().id();
        let busy_nearest = world.spawn_empty().id();
        let mut dispatcher = Dispatcher::default();

        let candidates = [
            candidate(far, Location::new(0, 10), 1, true),
            candidate(near, Location::new(0, 3), 1, true),
            candidate(busy_nearest, Location::new(0, 1), 1, false),
        ];
        assert_eq!(
            dispatcher.request_driver(rider, Location::new(0, 0), &candidates),
            Some(near)
        );
        // Matched riders are not waitlisted.
        assert_eq!(dispatcher.waitlist().count(), 0);
    }

    #[test]
    fn travel_time_ties_break_to_registration_order() {
        let mut world = World::new();
        let rider = world.spawn_empty().id();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();
        let mut dispatcher = Dispatcher::default();

        // Same distance, same speed: the earlier-registered driver wins.
        let candidates = [
            candidate(first, Location::new(0, 4), 2, true),
            candidate(second, Location::new(4, 0), 2, true),
        ];
        assert_eq!(
            dispatcher.request_driver(rider, Location::new(0, 0), &candidates),
            Some(first)
        );
    }

    #[test]
    fn faster_driver_beats_closer_slow_driver() {
        let mut world = World::new();
        let rider = world.spawn_empty().id();
        let slow = world.spawn_empty().id();
        let fast = world.spawn_empty().id();
        let mut dispatcher = Dispatcher::default();

        // slow: distance 4 at speed 1 = 4 ticks; fast: distance 8 at speed 4 = 2 ticks.
        let candidates = [
            candidate(slow, Location::new(0, 4), 1, true),
            candidate(fast, Location::new(0, 8), 4, true),
        ];
        assert_eq!(
            dispatcher.request_driver(rider, Location::new(0, 0), &candidates),
            Some(fast)
        );
    }

    #[test]
    fn driver_registration_is_idempotent() {
        let mut world = World::new();
        let driver = world.spawn_empty().id();
        let mut dispatcher = Dispatcher::default();

        assert_eq!(dispatcher.request_rider(driver), None);
        assert_eq!(dispatcher.request_rider(driver), None);
        assert_eq!(dispatcher.registered_drivers(), &[driver]);
    }

    #[test]
    fn waitlist_is_fifo() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();
        let driver = world.spawn_empty().id();
        let mut dispatcher = Dispatcher::default();

        dispatcher.request_driver(first, Location::new(0, 0), &[]);
        dispatcher.request_driver(second, Location::new(1, 1), &[]);

        assert_eq!(dispatcher.request_rider(driver), Some(first));
        assert_eq!(dispatcher.request_rider(driver), Some(second));
        assert_eq!(dispatcher.request_rider(driver), None);
    }

    #[test]
    fn cancel_removes_from_waitlist_and_is_noop_otherwise() {
        let mut world = World::new();
        let rider = world.spawn_empty().id();
        let other = world.spawn_empty().id();
        let mut dispatcher = Dispatcher::default();

        dispatcher.request_driver(rider, Location::new(0, 0), &[]);
        dispatcher.cancel_ride(other); // not waitlisted: no-op
        assert_eq!(dispatcher.waitlist().count(), 1);

        dispatcher.cancel_ride(rider);
        assert_eq!(dispatcher.waitlist().count(), 0);
        dispatcher.cancel_ride(rider); // already gone: no-op
    }
}
