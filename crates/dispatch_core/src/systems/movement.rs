//! Movement system: advances every vehicle one grid cell per tick.
//!
//! A vehicle heads for its ride's start while `ToStart` and for the end while
//! `ToEnd`, row axis before column axis. Reaching the pickup parks it in
//! `Waiting`; leaving `Waiting` (and any further progress toward the dropoff)
//! is gated on the ride's earliest start, so a too-early vehicle holds
//! position and burns the tick.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::CurrentStep;
use crate::ecs::{Position, RideBook, Vehicle, VehicleStatus};
use crate::telemetry::SimTelemetry;

pub fn movement_system(
    step: Res<CurrentStep>,
    rides: Res<RideBook>,
    mut telemetry: ResMut<SimTelemetry>,
    mut vehicles: Query<(&mut Vehicle, &mut Position)>,
) {
    for (mut vehicle, mut position) in vehicles.iter_mut() {
        // Free vehicles hold no ride, so this guard is also the Free skip.
        let Some(ride_id) = vehicle.current_ride else {
            continue;
        };
        let ride = rides.get(ride_id);

        if vehicle.status == VehicleStatus::ToStart {
            position.0 = position.0.step_toward(ride.start);
            if position.0 == ride.start {
                vehicle.status = VehicleStatus::Waiting;
                telemetry.record_reached_pickup(ride_id, step.0);
            }
        } else {
            // Waiting or ToEnd.
            if step.0 < ride.earliest_start {
                // Mandatory wait: time passes, no displacement.
                continue;
            }
            vehicle.status = VehicleStatus::ToEnd;
            position.0 = position.0.step_toward(ride.end);
            if position.0 == ride.end {
                vehicle.complete_ride();
                telemetry.record_completed(ride_id, step.0);
            }
        }
    }
}
