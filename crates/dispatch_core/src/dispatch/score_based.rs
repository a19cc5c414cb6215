//! Score-maximization assignment: vehicle-centric scoring of every pending
//! ride, one pick per vehicle per pass.
//!
//! Historical variant kept behind the common policy trait. Unlike
//! [`LeadTimeMatching`](super::LeadTimeMatching) there is no separate
//! feasibility veto: a ride that cannot finish in time is pushed out of
//! contention by a disqualifying score penalty instead.

use crate::ecs::{Ride, RideBook, RideId};
use crate::grid::{manhattan, Coordinate};

use super::policy::AssignmentPolicy;
use super::types::{Assignment, AssignmentOutcome, FreeVehicle};

/// Large enough to dominate any realistic combination of the other terms.
const UNSERVABLE_PENALTY: i128 = i128::MAX / 4;

#[derive(Debug)]
pub struct ScoreBasedMatching {
    /// Multiplier applied to ride distance for an exact on-time pickup;
    /// taken from the instance's bonus value.
    pub bonus: u64,
}

impl ScoreBasedMatching {
    pub fn new(bonus: u64) -> Self {
        Self { bonus }
    }

    // Scored in i128 so u64-sized time windows cannot wrap any term.
    fn score_pairing(&self, step: u64, position: Coordinate, ride: &Ride) -> i128 {
        let pickup = i128::from(manhattan(position, ride.start));
        let lead = i128::from(step) + pickup - i128::from(ride.earliest_start);
        let slack =
            i128::from(ride.latest_finish) - (i128::from(step) + pickup + i128::from(ride.distance));

        let mut score = i128::from(ride.distance) - pickup;
        if lead == 0 {
            score += i128::from(self.bonus) * i128::from(ride.distance);
        } else if lead < 0 {
            // Early arrival: the vehicle idles at the pickup.
            score += lead;
        } else {
            // Late arrival weighs twice as much as early idling.
            score -= 2 * lead;
        }
        if slack < 0 {
            score -= UNSERVABLE_PENALTY;
        } else {
            score -= slack;
        }
        score
    }
}

impl AssignmentPolicy for ScoreBasedMatching {
    fn assign(
        &self,
        step: u64,
        free_vehicles: &[FreeVehicle],
        pending: &[RideId],
        rides: &RideBook,
    ) -> AssignmentOutcome {
        let mut remaining: Vec<RideId> = pending.to_vec();
        let mut outcome = AssignmentOutcome::default();

        for vehicle in free_vehicles {
            if remaining.is_empty() {
                break;
            }
            // Each vehicle independently takes its best-scoring ride,
            // unconditionally. Smaller ride id wins score ties.
            let best = remaining
                .iter()
                .enumerate()
                .max_by_key(|(_, id)| {
                    (
                        self.score_pairing(step, vehicle.position, rides.get(**id)),
                        std::cmp::Reverse(id.0),
                    )
                })
                .map(|(idx, _)| idx);
            let Some(idx) = best else {
                break;
            };

            let ride_id = remaining.swap_remove(idx);
            outcome.assignments.push(Assignment {
                vehicle: vehicle.entity,
                ride: ride_id,
            });
        }

        outcome
    }
}
