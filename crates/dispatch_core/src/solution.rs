//! Output sink: per-vehicle assignment histories in the line-oriented text
//! form `<count> <ride ids...>`.

use std::fmt;
use std::io::{self, Write};

use bevy_ecs::prelude::World;

use crate::ecs::{RideId, Vehicle};

/// Assignment histories of one finished run, indexed by vehicle id in
/// fleet-creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub assignments: Vec<Vec<RideId>>,
}

impl Solution {
    /// Extracts every vehicle's history from a run world.
    pub fn from_world(world: &mut World) -> Self {
        let mut rows: Vec<(usize, Vec<RideId>)> = world
            .query::<&Vehicle>()
            .iter(world)
            .map(|vehicle| (vehicle.id.0, vehicle.history.clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        Self {
            assignments: rows.into_iter().map(|(_, history)| history).collect(),
        }
    }

    /// Total number of committed rides across the fleet.
    pub fn assigned_rides(&self) -> usize {
        self.assignments.iter().map(Vec::len).sum()
    }

    /// Writes one line per vehicle: the count, then the ride ids in commit
    /// order. A never-assigned vehicle produces `0 ` with an empty id list.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for history in &self.assignments {
            let ids: Vec<String> = history.iter().map(|ride| ride.0.to_string()).collect();
            writeln!(writer, "{} {}", history.len(), ids.join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for history in &self.assignments {
            let ids: Vec<String> = history.iter().map(|ride| ride.0.to_string()).collect();
            writeln!(f, "{} {}", history.len(), ids.join(" "))?;
        }
        Ok(())
    }
}
