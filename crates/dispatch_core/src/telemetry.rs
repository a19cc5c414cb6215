//! Telemetry: per-ride lifecycle records for scoring and analysis.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::ecs::{RideBook, RideId, VehicleId};

/// Lifecycle of one ride through a run. All steps are simulation ticks.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RideOutcome {
    /// Vehicle the ride was committed to, if any.
    pub assigned_to: Option<VehicleId>,
    /// Step of the commit (scheduler pass it was claimed in).
    pub assigned_at: Option<u64>,
    /// Step the vehicle reached the pickup cell.
    pub reached_pickup_at: Option<u64>,
    /// Step the vehicle reached the dropoff cell.
    pub completed_at: Option<u64>,
    /// Step the ride was dropped after failing its feasibility check.
    pub discarded_at: Option<u64>,
}

/// Collects per-ride outcomes. Insert as a resource before running; the
/// assignment and movement systems record into it.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    outcomes: Vec<RideOutcome>,
}

impl SimTelemetry {
    pub fn with_ride_count(count: usize) -> Self {
        Self {
            outcomes: vec![RideOutcome::default(); count],
        }
    }

    pub fn outcome(&self, ride: RideId) -> &RideOutcome {
        &self.outcomes[ride.0]
    }

    pub fn outcomes(&self) -> &[RideOutcome] {
        &self.outcomes
    }

    pub fn record_assigned(&mut self, ride: RideId, vehicle: VehicleId, step: u64) {
        let outcome = &mut self.outcomes[ride.0];
        outcome.assigned_to = Some(vehicle);
        outcome.assigned_at = Some(step);
    }

    pub fn record_discarded(&mut self, ride: RideId, step: u64) {
        self.outcomes[ride.0].discarded_at = Some(step);
    }

    pub fn record_reached_pickup(&mut self, ride: RideId, step: u64) {
        self.outcomes[ride.0].reached_pickup_at = Some(step);
    }

    pub fn record_completed(&mut self, ride: RideId, step: u64) {
        self.outcomes[ride.0].completed_at = Some(step);
    }

    pub fn assigned_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.assigned_to.is_some()).count()
    }

    pub fn completed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.completed_at.is_some()).count()
    }

    pub fn discarded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.discarded_at.is_some()).count()
    }

    /// Total score: every completed ride earns its distance, plus `bonus` if
    /// the vehicle was at the pickup no later than the ride's earliest start
    /// (the ride then departs exactly on time).
    pub fn score(&self, rides: &RideBook, bonus: u64) -> u64 {
        self.outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.completed_at.is_some())
            .map(|(idx, o)| {
                let ride = rides.get(RideId(idx));
                let punctual = o
                    .reached_pickup_at
                    .is_some_and(|at| at <= ride.earliest_start);
                ride.distance + if punctual { bonus } else { 0 }
            })
            .sum()
    }
}
