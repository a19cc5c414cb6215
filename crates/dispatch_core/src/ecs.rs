//! Entity model: rides, vehicles, and the resources that own them.
//!
//! Rides are immutable once ingested and owned by the [`RideBook`] resource;
//! vehicles only ever hold a [`RideId`] reference to the ride they are
//! serving. Vehicles are ECS entities carrying a [`Vehicle`] component and a
//! [`Position`] component.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Component, Resource};
use serde::{Deserialize, Serialize};

use crate::grid::{manhattan, Coordinate};

/// Zero-based ingestion index of a ride. Doubles as the index into
/// [`RideBook`] and as the id written to the output sink.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RideId(pub usize);

/// Zero-based fleet-creation index of a vehicle. Output lines are emitted in
/// this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VehicleId(pub usize);

/// A transportation request: pick up at `start` no earlier than
/// `earliest_start`, drop off at `end` no later than `latest_finish`.
/// Immutable once constructed; `distance` is derived at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ride {
    pub id: RideId,
    pub start: Coordinate,
    pub end: Coordinate,
    pub earliest_start: u64,
    pub latest_finish: u64,
    pub distance: u64,
}

impl Ride {
    pub fn new(
        id: RideId,
        start: Coordinate,
        end: Coordinate,
        earliest_start: u64,
        latest_finish: u64,
    ) -> Self {
        Self {
            id,
            start,
            end,
            earliest_start,
            latest_finish,
            distance: manhattan(start, end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    /// Idle, no ride held; the only state the scheduler assigns from.
    Free,
    /// Driving toward the current ride's pickup cell.
    ToStart,
    /// At the pickup cell, holding until `earliest_start`.
    Waiting,
    /// Driving toward the current ride's dropoff cell.
    ToEnd,
}

/// A dispatchable agent. Starts Free at the grid origin with an empty
/// history; `history` records ride ids in commit order and is append-only.
///
/// Invariant: `status == Free` exactly when `current_ride` is `None`.
#[derive(Debug, Clone, Component)]
pub struct Vehicle {
    pub id: VehicleId,
    pub status: VehicleStatus,
    pub current_ride: Option<RideId>,
    pub history: Vec<RideId>,
}

impl Vehicle {
    pub fn new(id: VehicleId) -> Self {
        Self {
            id,
            status: VehicleStatus::Free,
            current_ride: None,
            history: Vec::new(),
        }
    }

    pub fn is_free(&self) -> bool {
        self.status == VehicleStatus::Free
    }

    /// Commit a ride to this vehicle. The history entry is appended here, at
    /// commit time, not at completion.
    pub fn assign(&mut self, ride: RideId) {
        debug_assert!(self.is_free(), "assign requires a Free vehicle");
        self.current_ride = Some(ride);
        self.status = VehicleStatus::ToStart;
        self.history.push(ride);
    }

    /// Release the current ride after dropoff. The ride stays in `history`.
    pub fn complete_ride(&mut self) {
        debug_assert!(self.current_ride.is_some(), "no ride in progress");
        self.current_ride = None;
        self.status = VehicleStatus::Free;
    }
}

/// Current grid cell of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Position(pub Coordinate);

/// Owns every ride of one run, indexed by [`RideId`].
#[derive(Debug, Default, Resource)]
pub struct RideBook {
    rides: Vec<Ride>,
}

impl RideBook {
    pub fn new(rides: Vec<Ride>) -> Self {
        debug_assert!(rides.iter().enumerate().all(|(i, r)| r.id == RideId(i)));
        Self { rides }
    }

    pub fn get(&self, id: RideId) -> &Ride {
        &self.rides[id.0]
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ride> {
        self.rides.iter()
    }
}

/// Ride requests not yet committed to any vehicle, ordered by
/// `(earliest_start, ingestion id)`. Built sorted once at world construction;
/// assignment passes only ever remove from it.
#[derive(Debug, Clone, Default, Resource)]
pub struct PendingRides(pub VecDeque<RideId>);

impl PendingRides {
    /// Build the queue from a ride book, sorted by earliest start with
    /// ingestion order breaking ties.
    pub fn from_ride_book(rides: &RideBook) -> Self {
        let mut order: Vec<RideId> = rides.iter().map(|r| r.id).collect();
        order.sort_by_key(|id| (rides.get(*id).earliest_start, id.0));
        Self(order.into())
    }

    pub fn remove(&mut self, id: RideId) {
        if let Some(idx) = self.0.iter().position(|r| *r == id) {
            self.0.remove(idx);
        }
    }

    pub fn contains(&self, id: RideId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-run grid and scoring configuration, owned by the world (no
/// process-wide state).
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationConfig {
    pub rows: u32,
    pub columns: u32,
    /// Score bonus for a ride picked up exactly at its earliest start.
    pub bonus: u64,
}
