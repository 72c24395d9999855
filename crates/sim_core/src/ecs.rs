//! Entity components: riders and drivers live in the ECS world, and every
//! cross-reference (waitlist membership, an in-flight pickup, a carried
//! passenger) is an [Entity] handle into it.

use bevy_ecs::prelude::{Component, Entity};

use crate::grid::{travel_time, Location};

/// Scenario-facing identifier, used by the monitor ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Component)]
pub struct ActorId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiderStatus {
    Waiting,
    Cancelled,
    Satisfied,
}

/// A rider requesting a ride. `Cancelled` and `Satisfied` are terminal:
/// no event transition touches a rider again once it leaves `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Rider {
    /// Ticks the rider will wait for pickup before auto-cancelling.
    pub patience: u64,
    pub origin: Location,
    pub destination: Location,
    pub status: RiderStatus,
}

impl Rider {
    pub fn new(patience: u64, origin: Location, destination: Location) -> Self {
        Self {
            patience,
            origin,
            destination,
            status: RiderStatus::Waiting,
        }
    }
}

/// A driver. Movement is deferred: `start_drive` only records the target,
/// and the location jumps there when the arrival fires (`end_drive` or
/// `start_ride`).
///
/// Invariants: `destination` is `Some` whenever `is_idle` is false;
/// `passenger` is `Some` only between `start_ride` and `end_ride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Driver {
    pub location: Location,
    /// Grid cells per tick, > 0.
    pub speed: u64,
    pub is_idle: bool,
    pub passenger: Option<Entity>,
    pub destination: Option<Location>,
}

impl Driver {
    pub fn new(location: Location, speed: u64) -> Self {
        assert!(speed > 0, "driver speed must be positive");
        Self {
            location,
            speed,
            is_idle: true,
            passenger: None,
            destination: None,
        }
    }

    /// Ticks to reach `destination` from the current location.
    pub fn travel_time_to(&self, destination: Location) -> u64 {
        travel_time(self.location, destination, self.speed)
    }

    /// Start driving towards `destination`; returns the travel time.
    pub fn start_drive(&mut self, destination: Location) -> u64 {
        self.is_idle = false;
        self.destination = Some(destination);
        self.travel_time_to(destination)
    }

    /// Arrive at the pending destination and go idle.
    ///
    /// Precondition: a drive is in progress.
    pub fn end_drive(&mut self) {
        let destination = self
            .destination
            .take()
            .expect("end_drive called with no pending destination");
        self.location = destination;
        self.is_idle = true;
    }

    /// Pick up `passenger` at the pending destination (the rider's origin)
    /// and start driving to `rider_destination`; returns the ride time.
    /// The driver stays non-idle for the whole ride.
    ///
    /// Precondition: a drive to the rider's origin is in progress.
    pub fn start_ride(&mut self, passenger: Entity, rider_destination: Location) -> u64 {
        let arrival = self
            .destination
            .expect("start_ride called with no pending destination");
        self.location = arrival;
        self.destination = Some(rider_destination);
        self.passenger = Some(passenger);
        self.travel_time_to(rider_destination)
    }

    /// Arrive at the ride destination and detach the passenger, returning
    /// it so the caller can move the rider to the dropoff point. The
    /// destination stays pending until `end_drive` clears it.
    ///
    /// Precondition: a ride is in progress.
    pub fn end_ride(&mut self) -> Entity {
        let destination = self
            .destination
            .expect("end_ride called with no pending destination");
        let passenger = self
            .passenger
            .take()
            .expect("end_ride called with no passenger");
        self.location = destination;
        passenger
    }
}
