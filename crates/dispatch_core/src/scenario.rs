//! Instance ingestion and world setup.
//!
//! An [`Instance`] is one self-contained problem: grid dimensions, fleet
//! size, scoring bonus, horizon, and the ride list. Instances come from the
//! line-oriented text format ([`parse_instance`]) or from the seeded random
//! generator ([`generate_instance`]); either way [`build_world`] turns one
//! into a ready-to-run ECS world.

use std::fmt;

use bevy_ecs::prelude::World;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::clock::StepClock;
use crate::dispatch::{
    AssignmentPolicyResource, LeadTimeMatching, ScoreBasedMatching,
};
use crate::ecs::{
    PendingRides, Position, Ride, RideBook, RideId, SimulationConfig, Vehicle, VehicleId,
};
use crate::grid::{manhattan, Coordinate};
use crate::telemetry::SimTelemetry;

/// One parsed problem instance. Owns its ride list; `rides[i].id == i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub rows: u32,
    pub columns: u32,
    pub vehicle_count: usize,
    pub bonus: u64,
    pub horizon: u64,
    pub rides: Vec<Ride>,
}

/// Fatal ingestion errors. Any of these aborts the instance; siblings in a
/// batch are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    MissingHeader,
    WrongFieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    MalformedInteger {
        line: usize,
        field: String,
    },
    WrongRideCount {
        declared: usize,
        found: usize,
    },
    CoordinateOutOfBounds {
        line: usize,
    },
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::MissingHeader => write!(f, "input has no configuration record"),
            InstanceError::WrongFieldCount {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {line}: expected {expected} fields, found {found}"
            ),
            InstanceError::MalformedInteger { line, field } => {
                write!(f, "line {line}: malformed integer field {field:?}")
            }
            InstanceError::WrongRideCount { declared, found } => write!(
                f,
                "declared {declared} ride records, found {found}"
            ),
            InstanceError::CoordinateOutOfBounds { line } => {
                write!(f, "line {line}: coordinate outside the declared grid")
            }
        }
    }
}

impl std::error::Error for InstanceError {}

fn parse_record(line: &str, line_no: usize, expected: usize) -> Result<Vec<u64>, InstanceError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != expected {
        return Err(InstanceError::WrongFieldCount {
            line: line_no,
            expected,
            found: fields.len(),
        });
    }
    fields
        .into_iter()
        .map(|field| {
            field.parse::<u64>().map_err(|_| InstanceError::MalformedInteger {
                line: line_no,
                field: field.to_string(),
            })
        })
        .collect()
}

fn narrow(value: u64, line_no: usize) -> Result<u32, InstanceError> {
    u32::try_from(value).map_err(|_| InstanceError::MalformedInteger {
        line: line_no,
        field: value.to_string(),
    })
}

/// Parses one instance from its text form: a six-integer configuration
/// record (`rows columns vehicles rides bonus steps`), then exactly one
/// six-integer record per declared ride. Blank lines are ignored; ride ids
/// are the ingestion order.
pub fn parse_instance(input: &str) -> Result<Instance, InstanceError> {
    let mut records = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line));

    let (header_no, header) = records.next().ok_or(InstanceError::MissingHeader)?;
    let config = parse_record(header, header_no, 6)?;
    let rows = narrow(config[0], header_no)?;
    let columns = narrow(config[1], header_no)?;
    let vehicle_count = config[2] as usize;
    let ride_count = config[3] as usize;
    let bonus = config[4];
    let horizon = config[5];

    let mut rides = Vec::with_capacity(ride_count);
    for id in 0..ride_count {
        let Some((line_no, line)) = records.next() else {
            return Err(InstanceError::WrongRideCount {
                declared: ride_count,
                found: id,
            });
        };
        let fields = parse_record(line, line_no, 6)?;
        let start = Coordinate::new(narrow(fields[0], line_no)?, narrow(fields[1], line_no)?);
        let end = Coordinate::new(narrow(fields[2], line_no)?, narrow(fields[3], line_no)?);
        for cell in [start, end] {
            if cell.row >= rows || cell.column >= columns {
                return Err(InstanceError::CoordinateOutOfBounds { line: line_no });
            }
        }
        rides.push(Ride::new(RideId(id), start, end, fields[4], fields[5]));
    }

    let trailing = records.count();
    if trailing > 0 {
        return Err(InstanceError::WrongRideCount {
            declared: ride_count,
            found: ride_count + trailing,
        });
    }

    Ok(Instance {
        rows,
        columns,
        vehicle_count,
        bonus,
        horizon,
        rides,
    })
}

/// Create the canonical feasibility-first policy.
pub fn create_lead_time_matching() -> AssignmentPolicyResource {
    AssignmentPolicyResource::new(Box::new(LeadTimeMatching))
}

/// Create the historical score-maximization policy with the instance bonus.
pub fn create_score_based_matching(bonus: u64) -> AssignmentPolicyResource {
    AssignmentPolicyResource::new(Box::new(ScoreBasedMatching::new(bonus)))
}

/// Tag for selecting one of the two assignment policies per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentPolicyKind {
    #[default]
    LeadTime,
    ScoreBased,
}

impl AssignmentPolicyKind {
    pub fn build(self, bonus: u64) -> AssignmentPolicyResource {
        match self {
            AssignmentPolicyKind::LeadTime => create_lead_time_matching(),
            AssignmentPolicyKind::ScoreBased => create_score_based_matching(bonus),
        }
    }
}

/// Populates `world` with the clock, configuration, ride book, pending
/// queue, telemetry, the canonical policy, and one Free vehicle per fleet
/// slot at the origin. Callers wanting a different policy overwrite the
/// resource afterwards.
pub fn build_world(world: &mut World, instance: &Instance) {
    world.insert_resource(StepClock::new(instance.horizon));
    world.insert_resource(SimulationConfig {
        rows: instance.rows,
        columns: instance.columns,
        bonus: instance.bonus,
    });
    world.insert_resource(SimTelemetry::with_ride_count(instance.rides.len()));
    world.insert_resource(create_lead_time_matching());

    let book = RideBook::new(instance.rides.clone());
    world.insert_resource(PendingRides::from_ride_book(&book));
    world.insert_resource(book);

    for i in 0..instance.vehicle_count {
        world.spawn((Vehicle::new(VehicleId(i)), Position(Coordinate::ORIGIN)));
    }
}

/// Parameters for the seeded random instance generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceParams {
    pub rows: u32,
    pub columns: u32,
    pub vehicle_count: usize,
    pub ride_count: usize,
    pub bonus: u64,
    pub horizon: u64,
    /// Seed for reproducibility; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for InstanceParams {
    fn default() -> Self {
        Self {
            rows: 100,
            columns: 100,
            vehicle_count: 20,
            ride_count: 200,
            bonus: 2,
            horizon: 1_000,
            seed: None,
        }
    }
}

impl InstanceParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Generates a random instance. Deadlines get uniform slack on top of the
/// minimum completion time, clamped to the horizon, so most rides are
/// feasible and a few are not.
pub fn generate_instance(params: &InstanceParams) -> Instance {
    let mut rng: StdRng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut random_cell = |rng: &mut StdRng| {
        Coordinate::new(
            rng.gen_range(0..params.rows.max(1)),
            rng.gen_range(0..params.columns.max(1)),
        )
    };

    let rides = (0..params.ride_count)
        .map(|id| {
            let start = random_cell(&mut rng);
            let end = random_cell(&mut rng);
            let distance = manhattan(start, end);
            let earliest_start = rng.gen_range(0..params.horizon.max(1));
            let slack = rng.gen_range(0..=params.horizon / 4);
            let latest_finish = (earliest_start + distance + slack).min(params.horizon);
            Ride::new(RideId(id), start, end, earliest_start, latest_finish)
        })
        .collect();

    Instance {
        rows: params.rows,
        columns: params.columns,
        vehicle_count: params.vehicle_count,
        bonus: params.bonus,
        horizon: params.horizon,
        rides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "3 4 2 3 2 10\n0 0 1 3 2 9\n1 2 1 0 0 9\n2 0 2 2 0 9\n";

    #[test]
    fn parses_a_well_formed_instance() {
        let instance = parse_instance(WELL_FORMED).expect("parse");
        assert_eq!(instance.rows, 3);
        assert_eq!(instance.columns, 4);
        assert_eq!(instance.vehicle_count, 2);
        assert_eq!(instance.bonus, 2);
        assert_eq!(instance.horizon, 10);
        assert_eq!(instance.rides.len(), 3);

        let ride = &instance.rides[0];
        assert_eq!(ride.id, RideId(0));
        assert_eq!(ride.start, Coordinate::new(0, 0));
        assert_eq!(ride.end, Coordinate::new(1, 3));
        assert_eq!(ride.earliest_start, 2);
        assert_eq!(ride.latest_finish, 9);
        assert_eq!(ride.distance, 4);
    }

    #[test]
    fn malformed_integer_is_fatal() {
        let err = parse_instance("3 4 1 1 2 10\n0 0 1 x 2 9\n").unwrap_err();
        assert_eq!(
            err,
            InstanceError::MalformedInteger {
                line: 2,
                field: "x".to_string()
            }
        );
    }

    #[test]
    fn missing_field_is_fatal() {
        let err = parse_instance("3 4 1 1 2\n").unwrap_err();
        assert!(matches!(
            err,
            InstanceError::WrongFieldCount {
                line: 1,
                expected: 6,
                found: 5
            }
        ));
    }

    #[test]
    fn empty_input_is_fatal() {
        assert_eq!(parse_instance("\n\n").unwrap_err(), InstanceError::MissingHeader);
    }

    #[test]
    fn ride_count_mismatch_is_fatal() {
        let missing = parse_instance("3 4 1 2 2 10\n0 0 1 3 2 9\n").unwrap_err();
        assert_eq!(
            missing,
            InstanceError::WrongRideCount {
                declared: 2,
                found: 1
            }
        );

        let extra =
            parse_instance("3 4 1 1 2 10\n0 0 1 3 2 9\n1 1 2 2 0 9\n").unwrap_err();
        assert_eq!(
            extra,
            InstanceError::WrongRideCount {
                declared: 1,
                found: 2
            }
        );
    }

    #[test]
    fn out_of_bounds_coordinate_is_fatal() {
        let err = parse_instance("3 4 1 1 2 10\n0 0 3 0 0 9\n").unwrap_err();
        assert_eq!(err, InstanceError::CoordinateOutOfBounds { line: 2 });
    }

    #[test]
    fn build_world_seeds_all_resources_and_the_fleet() {
        let instance = parse_instance(WELL_FORMED).expect("parse");
        let mut world = World::new();
        build_world(&mut world, &instance);

        assert_eq!(world.resource::<StepClock>().horizon(), 10);
        assert_eq!(world.resource::<SimulationConfig>().bonus, 2);
        assert_eq!(world.resource::<RideBook>().len(), 3);
        assert_eq!(world.resource::<PendingRides>().len(), 3);

        let vehicles: Vec<(VehicleId, Coordinate)> = world
            .query::<(&Vehicle, &Position)>()
            .iter(&world)
            .map(|(v, p)| (v.id, p.0))
            .collect();
        assert_eq!(vehicles.len(), 2);
        assert!(vehicles.iter().all(|(_, p)| *p == Coordinate::ORIGIN));
    }

    #[test]
    fn generator_is_deterministic_under_a_seed() {
        let params = InstanceParams {
            ride_count: 25,
            ..Default::default()
        }
        .with_seed(7);
        let a = generate_instance(&params);
        let b = generate_instance(&params);
        assert_eq!(a, b);
        assert_eq!(a.rides.len(), 25);
        assert!(a
            .rides
            .iter()
            .all(|r| r.start.row < a.rows && r.end.column < a.columns));
    }
}
