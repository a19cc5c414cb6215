//! Simulation driver: the discrete-step loop hosting the scheduler and the
//! movement simulator.
//!
//! Each step settles in two scheduler phases: an assignment pass at the
//! current step claims pending rides for idle vehicles, every vehicle then
//! advances one movement tick, and a second assignment pass at `step + 1`
//! claims work for vehicles that became Free within the same tick.

use bevy_ecs::prelude::{Schedule, World};

use crate::clock::{CurrentStep, StepClock};
use crate::systems::{assignment::assignment_system, movement::movement_system};

/// The two schedules one step runs through. Building them once up front
/// avoids re-initializing system state every tick.
pub struct SimulationSchedules {
    assignment: Schedule,
    movement: Schedule,
}

impl SimulationSchedules {
    pub fn new() -> Self {
        let mut assignment = Schedule::default();
        assignment.add_systems(assignment_system);
        let mut movement = Schedule::default();
        movement.add_systems(movement_system);
        Self {
            assignment,
            movement,
        }
    }
}

impl Default for SimulationSchedules {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one simulated step. Returns `false` without touching the world once
/// the clock has reached its horizon.
pub fn run_step(world: &mut World, schedules: &mut SimulationSchedules) -> bool {
    let clock = *world.resource::<StepClock>();
    if clock.is_finished() {
        return false;
    }
    let step = clock.step();

    world.insert_resource(CurrentStep(step));
    schedules.assignment.run(world);
    schedules.movement.run(world);

    // Look-ahead settle pass for vehicles freed this tick.
    world.insert_resource(CurrentStep(step + 1));
    schedules.assignment.run(world);

    world.resource_mut::<StepClock>().advance();
    true
}

/// Runs the simulation to its horizon. Returns the number of steps executed.
pub fn run_to_horizon(world: &mut World, schedules: &mut SimulationSchedules) -> u64 {
    let mut steps = 0;
    while run_step(world, schedules) {
        steps += 1;
    }
    steps
}
