#![allow(dead_code)]

use bevy_ecs::prelude::{Entity, World};
use sim_core::clock::{EventKind, SimulationClock};
use sim_core::ecs::{ActorId, Driver, Rider};
use sim_core::grid::Location;
use sim_core::scenario::build_world;

/// A world with the standard resources for integration tests.
pub fn test_world() -> World {
    build_world()
}

pub fn spawn_driver(world: &mut World, id: &str, location: Location, speed: u64) -> Entity {
    world
        .spawn((Driver::new(location, speed), ActorId(id.to_string())))
        .id()
}

pub fn spawn_rider(
    world: &mut World,
    id: &str,
    patience: u64,
    origin: Location,
    destination: Location,
) -> Entity {
    world
        .spawn((
            Rider::new(patience, origin, destination),
            ActorId(id.to_string()),
        ))
        .id()
}

pub fn schedule(world: &mut World, timestamp: u64, kind: EventKind) {
    world
        .resource_mut::<SimulationClock>()
        .schedule(timestamp, kind);
}
