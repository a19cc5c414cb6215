//! Metrics extraction from finished simulation worlds.

use bevy_ecs::prelude::World;
use dispatch_core::ecs::{RideBook, SimulationConfig, Vehicle};
use dispatch_core::telemetry::SimTelemetry;

/// Aggregated outcome of one instance run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InstanceMetrics {
    pub total_rides: usize,
    pub total_vehicles: usize,
    /// Rides committed to a vehicle (counted at commit, not completion).
    pub assigned_rides: usize,
    /// Rides whose dropoff was reached before the horizon.
    pub completed_rides: usize,
    /// Rides dropped after failing their feasibility check.
    pub discarded_rides: usize,
    /// Vehicles with at least one ride in their history.
    pub vehicles_used: usize,
    /// Completed distance plus punctual-pickup bonuses.
    pub score: u64,
    pub horizon: u64,
}

/// Reads telemetry and the fleet out of a run world.
pub fn extract_metrics(world: &mut World) -> InstanceMetrics {
    let horizon = world
        .get_resource::<dispatch_core::clock::StepClock>()
        .map(|clock| clock.horizon())
        .unwrap_or(0);
    let bonus = world
        .get_resource::<SimulationConfig>()
        .map(|config| config.bonus)
        .unwrap_or(0);

    let (total_vehicles, vehicles_used) = {
        let mut total = 0;
        let mut used = 0;
        for vehicle in world.query::<&Vehicle>().iter(world) {
            total += 1;
            if !vehicle.history.is_empty() {
                used += 1;
            }
        }
        (total, used)
    };

    let rides = world.resource::<RideBook>();
    let telemetry = world.resource::<SimTelemetry>();
    InstanceMetrics {
        total_rides: rides.len(),
        total_vehicles,
        assigned_rides: telemetry.assigned_count(),
        completed_rides: telemetry.completed_count(),
        discarded_rides: telemetry.discarded_count(),
        vehicles_used,
        score: telemetry.score(rides, bonus),
        horizon,
    }
}

#[cfg(test)]
mod tests {
    use dispatch_core::runner::{run_to_horizon, SimulationSchedules};
    use dispatch_core::test_helpers::{instance_with_rides, ride_spec, world_for};

    use super::*;

    #[test]
    fn counts_line_up_after_a_run() {
        let instance = instance_with_rides(
            2,
            30,
            vec![
                ride_spec((0, 0), (0, 3), 0, 30), // served
                ride_spec((0, 0), (0, 9), 0, 2),  // infeasible, discarded
            ],
        );
        let mut world = world_for(&instance);
        run_to_horizon(&mut world, &mut SimulationSchedules::new());

        let metrics = extract_metrics(&mut world);
        assert_eq!(metrics.total_rides, 2);
        assert_eq!(metrics.total_vehicles, 2);
        assert_eq!(metrics.assigned_rides, 1);
        assert_eq!(metrics.completed_rides, 1);
        assert_eq!(metrics.discarded_rides, 1);
        assert_eq!(metrics.vehicles_used, 1);
        // Distance 3 plus bonus 1 for the punctual pickup.
        assert_eq!(metrics.score, 4);
        assert_eq!(metrics.horizon, 30);
    }
}
