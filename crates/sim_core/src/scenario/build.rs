//! World setup and scenario generation.

use bevy_ecs::prelude::{Resource, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::{EventKind, SimulationClock};
use crate::dispatch::Dispatcher;
use crate::ecs::{ActorId, Driver, Rider};
use crate::grid::Location;
use crate::monitor::Monitor;
use crate::scenario::{DriverSpec, RiderSpec, ScenarioEvent, ScenarioEventKind};

/// Simulation end time in ticks. When set, the runner stops once the next
/// event would be at or after this timestamp.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEndTime(pub u64);

/// A fresh world with the standard resources: clock, dispatcher, monitor.
pub fn build_world() -> World {
    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(Dispatcher::default());
    world.insert_resource(Monitor::default());
    world
}

/// Spawns the scenario's riders and drivers and schedules their seed
/// events on the clock.
pub fn seed_scenario(world: &mut World, events: &[ScenarioEvent]) {
    for event in events {
        let kind = match &event.kind {
            ScenarioEventKind::DriverRequest(spec) => {
                let entity = world
                    .spawn((
                        Driver::new(spec.location, spec.speed),
                        ActorId(spec.id.clone()),
                    ))
                    .id();
                EventKind::DriverRequest(entity)
            }
            ScenarioEventKind::RiderRequest(spec) => {
                let entity = world
                    .spawn((
                        Rider::new(spec.patience, spec.origin, spec.destination),
                        ActorId(spec.id.clone()),
                    ))
                    .id();
                EventKind::RiderRequest(entity)
            }
        };
        world
            .resource_mut::<SimulationClock>()
            .schedule(event.timestamp, kind);
    }
}

/// Parameters for random scenario generation. Ranges are inclusive.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioParams {
    pub num_riders: usize,
    pub num_drivers: usize,
    pub grid_rows: i64,
    pub grid_cols: i64,
    /// Requests are spread uniformly over `[0, request_window)`.
    pub request_window: u64,
    pub patience: (u64, u64),
    pub speed: (u64, u64),
    /// Seed for RNG (for reproducibility).
    pub seed: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_riders: 100,
            num_drivers: 20,
            grid_rows: 100,
            grid_cols: 100,
            request_window: 1_000,
            patience: (5, 60),
            speed: (1, 5),
            seed: 0,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_request_window(mut self, ticks: u64) -> Self {
        self.request_window = ticks;
        self
    }

    pub fn with_grid(mut self, rows: i64, cols: i64) -> Self {
        self.grid_rows = rows;
        self.grid_cols = cols;
        self
    }

    pub fn with_patience(mut self, min: u64, max: u64) -> Self {
        self.patience = (min, max);
        self
    }

    pub fn with_speed(mut self, min: u64, max: u64) -> Self {
        assert!(min > 0, "driver speed must be positive");
        self.speed = (min, max);
        self
    }
}

/// Generates a random scenario, sorted by timestamp. Deterministic for a
/// given set of parameters.
pub fn generate_scenario(params: &ScenarioParams) -> Vec<ScenarioEvent> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut events = Vec::with_capacity(params.num_drivers + params.num_riders);

    for i in 0..params.num_drivers {
        events.push(ScenarioEvent {
            timestamp: rng.gen_range(0..params.request_window.max(1)),
            kind: ScenarioEventKind::DriverRequest(DriverSpec {
                id: format!("driver-{i}"),
                location: random_location(&mut rng, params),
                speed: rng.gen_range(params.speed.0..=params.speed.1),
            }),
        });
    }
    for i in 0..params.num_riders {
        events.push(ScenarioEvent {
            timestamp: rng.gen_range(0..params.request_window.max(1)),
            kind: ScenarioEventKind::RiderRequest(RiderSpec {
                id: format!("rider-{i}"),
                origin: random_location(&mut rng, params),
                destination: random_location(&mut rng, params),
                patience: rng.gen_range(params.patience.0..=params.patience.1),
            }),
        });
    }

    events.sort_by_key(|event| event.timestamp);
    events
}

fn random_location(rng: &mut StdRng, params: &ScenarioParams) -> Location {
    Location::new(
        rng.gen_range(0..params.grid_rows.max(1)),
        rng.gen_range(0..params.grid_cols.max(1)),
    )
}
