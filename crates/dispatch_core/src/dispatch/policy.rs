use crate::ecs::{RideBook, RideId};

use super::types::{AssignmentOutcome, FreeVehicle};

/// Trait for assignment policies that pair Free vehicles with pending rides.
///
/// The scheduler runs twice per simulated step: once before vehicle movement
/// at the current step, and once after movement at `step + 1` to claim work
/// for vehicles that became Free within the same tick.
pub trait AssignmentPolicy: Send + Sync {
    /// Produce the pairings for one assignment pass.
    ///
    /// `pending` is the pending-ride queue in `(earliest_start, ingestion)`
    /// order. The policy never mutates world state: it reports committed
    /// pairings and permanently discarded rides in the returned outcome, and
    /// the assignment system applies both. Each committed pairing must use a
    /// distinct vehicle and a distinct ride.
    fn assign(
        &self,
        step: u64,
        free_vehicles: &[FreeVehicle],
        pending: &[RideId],
        rides: &RideBook,
    ) -> AssignmentOutcome;
}
