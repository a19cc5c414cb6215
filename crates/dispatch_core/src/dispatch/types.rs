use bevy_ecs::prelude::Entity;

use crate::ecs::{RideId, VehicleId};
use crate::grid::Coordinate;

/// Snapshot of a Free vehicle handed to the assignment policy.
#[derive(Debug, Clone, Copy)]
pub struct FreeVehicle {
    pub entity: Entity,
    pub id: VehicleId,
    pub position: Coordinate,
}

/// One committed vehicle-ride pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub vehicle: Entity,
    pub ride: RideId,
}

/// Result of one assignment pass. `discarded` rides failed the feasibility
/// check against their top-ranked candidate and leave the pending queue
/// without ever being served.
#[derive(Debug, Clone, Default)]
pub struct AssignmentOutcome {
    pub assignments: Vec<Assignment>,
    pub discarded: Vec<RideId>,
}
