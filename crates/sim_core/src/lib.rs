pub mod clock;
pub mod dispatch;
pub mod ecs;
pub mod grid;
pub mod monitor;
pub mod runner;
pub mod scenario;
pub mod systems;
