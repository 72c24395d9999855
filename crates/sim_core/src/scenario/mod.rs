//! Scenario setup: parse seed records, seed the world, or generate random
//! scenarios with a seeded RNG.
//!
//! The engine never reads files; callers hand it already-parsed
//! [ScenarioEvent]s (the CLI does the IO).

mod build;
mod parse;

pub use build::{
    build_world, generate_scenario, seed_scenario, ScenarioParams, SimulationEndTime,
};
pub use parse::{
    parse_scenario, DriverSpec, RiderSpec, ScenarioError, ScenarioEvent, ScenarioEventKind,
};
