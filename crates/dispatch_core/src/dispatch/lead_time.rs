//! Feasibility-first assignment: rank candidates by pickup lead time, gate
//! every commit on the ride's deadline.

use crate::ecs::{Ride, RideBook, RideId};
use crate::grid::{manhattan, Coordinate};

use super::policy::AssignmentPolicy;
use super::types::{Assignment, AssignmentOutcome, FreeVehicle};

/// Signed difference between a vehicle's earliest possible pickup-arrival
/// step and the ride's earliest start. Zero is an exact on-time arrival,
/// negative is early, positive is late. Widened so any parseable `u64`
/// window stays exact.
pub fn lead_time(step: u64, position: Coordinate, ride: &Ride) -> i128 {
    i128::from(step) + i128::from(manhattan(position, ride.start))
        - i128::from(ride.earliest_start)
}

/// Deadline gate: can the vehicle still complete the ride by `latest_finish`
/// if committed at `step`?
pub fn completes_in_time(step: u64, position: Coordinate, ride: &Ride) -> bool {
    u128::from(step) + u128::from(manhattan(position, ride.start)) + u128::from(ride.distance)
        <= u128::from(ride.latest_finish)
}

/// The canonical assignment policy: ride-centric, deadline-aware.
///
/// Pending rides are visited in queue order and each ride picks one winner
/// among the vehicles still free in this pass. An exact on-time candidate
/// ranks first; otherwise early candidates outrank late ones and smaller
/// absolute lead time wins within each side. The vehicle id breaks remaining
/// ties so the ranking is a total, stable order. The winner is committed only
/// if it passes the deadline gate; a ride whose winner fails the gate is
/// discarded outright and never retried.
#[derive(Debug, Default)]
pub struct LeadTimeMatching;

/// Sort key realizing the candidate ranking. Lower is better.
fn rank(lead: i128, vehicle: usize) -> (u8, u128, usize) {
    let side = match lead {
        0 => 0,
        l if l < 0 => 1,
        _ => 2,
    };
    (side, lead.unsigned_abs(), vehicle)
}

impl AssignmentPolicy for LeadTimeMatching {
    fn assign(
        &self,
        step: u64,
        free_vehicles: &[FreeVehicle],
        pending: &[RideId],
        rides: &RideBook,
    ) -> AssignmentOutcome {
        let mut free: Vec<FreeVehicle> = free_vehicles.to_vec();
        let mut outcome = AssignmentOutcome::default();

        for &ride_id in pending {
            if free.is_empty() {
                break;
            }
            let ride = rides.get(ride_id);
            let best = free
                .iter()
                .enumerate()
                .min_by_key(|(_, v)| rank(lead_time(step, v.position, ride), v.id.0))
                .map(|(idx, _)| idx);
            let Some(idx) = best else {
                break;
            };

            let candidate = free[idx];
            if completes_in_time(step, candidate.position, ride) {
                outcome.assignments.push(Assignment {
                    vehicle: candidate.entity,
                    ride: ride_id,
                });
                free.swap_remove(idx);
            } else {
                outcome.discarded.push(ride_id);
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::prelude::Entity;

    use crate::ecs::VehicleId;

    use super::*;

    fn free_vehicle(id: usize, row: u32, column: u32) -> FreeVehicle {
        FreeVehicle {
            entity: Entity::from_raw(id as u32 + 1),
            id: VehicleId(id),
            position: Coordinate::new(row, column),
        }
    }

    fn one_ride(start: Coordinate, end: Coordinate, earliest: u64, latest: u64) -> RideBook {
        RideBook::new(vec![Ride::new(RideId(0), start, end, earliest, latest)])
    }

    #[test]
    fn exact_on_time_candidate_wins_over_closer_early_one() {
        // Vehicle 0 arrives at step 2 (early), vehicle 1 exactly at step 5.
        let rides = one_ride(Coordinate::new(0, 5), Coordinate::new(0, 9), 5, 100);
        let free = [free_vehicle(0, 0, 3), free_vehicle(1, 0, 0)];

        let outcome = LeadTimeMatching.assign(0, &free, &[RideId(0)], &rides);
        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].vehicle, free[1].entity);
        assert!(outcome.discarded.is_empty());
    }

    #[test]
    fn early_candidate_outranks_late_one_of_equal_magnitude() {
        // Both vehicles are 2 steps off earliest start, on opposite sides.
        let rides = one_ride(Coordinate::new(0, 4), Coordinate::new(0, 9), 6, 100);
        let early = free_vehicle(0, 0, 0); // arrives at 4, lead -2
        let late = free_vehicle(1, 0, 12); // arrives at 8, lead +2

        let outcome = LeadTimeMatching.assign(0, &[late, early], &[RideId(0)], &rides);
        assert_eq!(outcome.assignments[0].vehicle, early.entity);
    }

    #[test]
    fn smaller_absolute_lead_time_wins_within_a_side() {
        let rides = one_ride(Coordinate::new(0, 10), Coordinate::new(0, 12), 20, 100);
        let very_early = free_vehicle(0, 0, 10); // lead -20
        let slightly_early = free_vehicle(1, 0, 5); // lead -15

        let outcome =
            LeadTimeMatching.assign(0, &[very_early, slightly_early], &[RideId(0)], &rides);
        assert_eq!(outcome.assignments[0].vehicle, slightly_early.entity);
    }

    #[test]
    fn vehicle_id_breaks_exact_ties() {
        let rides = one_ride(Coordinate::new(0, 3), Coordinate::new(0, 5), 0, 100);
        let a = free_vehicle(1, 0, 0);
        let b = free_vehicle(0, 3, 3);

        // Both have lead time +3; the smaller vehicle id wins.
        let outcome = LeadTimeMatching.assign(0, &[a, b], &[RideId(0)], &rides);
        assert_eq!(outcome.assignments[0].vehicle, b.entity);
    }

    #[test]
    fn infeasible_ride_is_discarded_not_assigned() {
        // Minimum completion is 3 steps but the deadline is 2.
        let rides = one_ride(Coordinate::new(0, 0), Coordinate::new(0, 3), 0, 2);
        let free = [free_vehicle(0, 0, 0)];

        let outcome = LeadTimeMatching.assign(0, &free, &[RideId(0)], &rides);
        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.discarded, vec![RideId(0)]);
    }

    #[test]
    fn extreme_time_windows_keep_the_arithmetic_exact() {
        let far_future = Ride::new(
            RideId(0),
            Coordinate::new(0, 5),
            Coordinate::new(0, 9),
            u64::MAX,
            u64::MAX,
        );
        // Arrival at step 5 against an earliest start of u64::MAX is early,
        // not late; a narrowing cast would flip the sign.
        assert!(lead_time(0, Coordinate::ORIGIN, &far_future) < 0);
        assert!(completes_in_time(0, Coordinate::ORIGIN, &far_future));

        // Committing at the last representable step cannot overflow the gate.
        assert!(!completes_in_time(u64::MAX, Coordinate::ORIGIN, &far_future));
        assert!(lead_time(u64::MAX, Coordinate::ORIGIN, &far_future) > 0);
    }

    #[test]
    fn one_ride_per_vehicle_per_pass() {
        let rides = RideBook::new(vec![
            Ride::new(RideId(0), Coordinate::new(0, 0), Coordinate::new(0, 2), 0, 50),
            Ride::new(RideId(1), Coordinate::new(0, 0), Coordinate::new(0, 4), 0, 50),
            Ride::new(RideId(2), Coordinate::new(0, 0), Coordinate::new(0, 6), 0, 50),
        ]);
        let free = [free_vehicle(0, 0, 0), free_vehicle(1, 0, 0)];

        let outcome = LeadTimeMatching.assign(
            0,
            &free,
            &[RideId(0), RideId(1), RideId(2)],
            &rides,
        );
        // Two free vehicles bound the pass; the third ride stays pending.
        assert_eq!(outcome.assignments.len(), 2);
        assert!(outcome.discarded.is_empty());
        let vehicles: Vec<_> = outcome.assignments.iter().map(|a| a.vehicle).collect();
        assert_ne!(vehicles[0], vehicles[1]);
    }

    #[test]
    fn discard_does_not_consume_a_vehicle() {
        let rides = RideBook::new(vec![
            // Dead on arrival: deadline already unreachable.
            Ride::new(RideId(0), Coordinate::new(0, 0), Coordinate::new(0, 9), 0, 3),
            Ride::new(RideId(1), Coordinate::new(0, 0), Coordinate::new(0, 2), 0, 50),
        ]);
        let free = [free_vehicle(0, 0, 0)];

        let outcome = LeadTimeMatching.assign(0, &free, &[RideId(0), RideId(1)], &rides);
        assert_eq!(outcome.discarded, vec![RideId(0)]);
        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].ride, RideId(1));
    }
}
