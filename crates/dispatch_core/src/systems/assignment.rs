//! Assignment system: one scheduler pass over Free vehicles and the pending
//! queue.
//!
//! Collects the Free vehicles, hands them to the configured policy together
//! with the pending-ride queue, then applies the outcome: committed rides
//! move their vehicle out of Free and leave the queue; discarded rides leave
//! the queue with no further effect.

use bevy_ecs::prelude::{Entity, Query, Res, ResMut};

use crate::clock::CurrentStep;
use crate::dispatch::{AssignmentPolicyResource, FreeVehicle};
use crate::ecs::{PendingRides, Position, RideBook, RideId, Vehicle};
use crate::telemetry::SimTelemetry;

pub fn assignment_system(
    step: Res<CurrentStep>,
    policy: Res<AssignmentPolicyResource>,
    rides: Res<RideBook>,
    mut pending: ResMut<PendingRides>,
    mut telemetry: ResMut<SimTelemetry>,
    mut vehicles: Query<(Entity, &mut Vehicle, &Position)>,
) {
    if pending.is_empty() {
        return;
    }

    let free: Vec<FreeVehicle> = vehicles
        .iter()
        .filter(|(_, vehicle, _)| vehicle.is_free())
        .map(|(entity, vehicle, position)| FreeVehicle {
            entity,
            id: vehicle.id,
            position: position.0,
        })
        .collect();
    if free.is_empty() {
        return;
    }

    let queue: Vec<RideId> = pending.0.iter().copied().collect();
    let outcome = policy.assign(step.0, &free, &queue, &rides);

    for assignment in &outcome.assignments {
        let Ok((_, mut vehicle, _)) = vehicles.get_mut(assignment.vehicle) else {
            continue;
        };
        vehicle.assign(assignment.ride);
        telemetry.record_assigned(assignment.ride, vehicle.id, step.0);
        pending.remove(assignment.ride);
    }
    for &ride_id in &outcome.discarded {
        pending.remove(ride_id);
        telemetry.record_discarded(ride_id, step.0);
    }
}
