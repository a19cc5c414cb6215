//! Discrete step clock: a bounded tick counter owned by one simulation run.

use bevy_ecs::prelude::Resource;

/// Owns the simulated time of one run: the current step and the fixed
/// horizon. A run always terminates after exactly `horizon` steps.
#[derive(Debug, Clone, Copy, Resource)]
pub struct StepClock {
    step: u64,
    horizon: u64,
}

impl StepClock {
    pub fn new(horizon: u64) -> Self {
        Self { step: 0, horizon }
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn horizon(&self) -> u64 {
        self.horizon
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.horizon
    }

    pub fn advance(&mut self) {
        debug_assert!(self.step < self.horizon, "clock advanced past the horizon");
        self.step += 1;
    }
}

/// The step a schedule pass evaluates against. The runner inserts this before
/// each assignment/movement phase; the settle pass after movement sees
/// `step + 1` within the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct CurrentStep(pub u64);
