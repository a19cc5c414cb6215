//! Test helpers for common instance and world setup.

use bevy_ecs::prelude::World;

use crate::ecs::{Ride, RideId};
use crate::grid::Coordinate;
use crate::scenario::{build_world, Instance};

/// Ride description as plain tuples: start, end, earliest start, latest
/// finish. Ids are assigned by position in [`instance_with_rides`].
pub type RideSpec = ((u32, u32), (u32, u32), u64, u64);

pub fn ride_spec(start: (u32, u32), end: (u32, u32), earliest: u64, latest: u64) -> RideSpec {
    (start, end, earliest, latest)
}

/// A 10x10 instance with bonus 1 and the given fleet, horizon, and rides.
pub fn instance_with_rides(vehicle_count: usize, horizon: u64, specs: Vec<RideSpec>) -> Instance {
    let rides = specs
        .into_iter()
        .enumerate()
        .map(|(id, (start, end, earliest, latest))| {
            Ride::new(
                RideId(id),
                Coordinate::new(start.0, start.1),
                Coordinate::new(end.0, end.1),
                earliest,
                latest,
            )
        })
        .collect();
    Instance {
        rows: 10,
        columns: 10,
        vehicle_count,
        bonus: 1,
        horizon,
        rides,
    }
}

/// A fresh world built from `instance` with the canonical policy installed.
pub fn world_for(instance: &Instance) -> World {
    let mut world = World::new();
    build_world(&mut world, instance);
    world
}
