pub mod grid;
pub mod clock;
pub mod ecs;
pub mod dispatch;
pub mod systems;
pub mod runner;
pub mod scenario;
pub mod solution;
pub mod telemetry;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
