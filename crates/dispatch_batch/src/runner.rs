//! Instance execution: single runs, file-backed runs, and rayon-parallel
//! batches with an indicatif progress bar.

use std::fs;
use std::path::Path;

use bevy_ecs::prelude::World;
use dispatch_core::runner::{run_to_horizon, SimulationSchedules};
use dispatch_core::scenario::{build_world, parse_instance, AssignmentPolicyKind, Instance};
use dispatch_core::solution::Solution;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::metrics::{extract_metrics, InstanceMetrics};

/// Everything one run produces: the output-sink solution and the aggregate
/// metrics.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    pub solution: Solution,
    pub metrics: InstanceMetrics,
}

/// Runs one instance to its horizon under the given policy.
pub fn run_instance(instance: &Instance, policy: AssignmentPolicyKind) -> RunArtifacts {
    let mut world = World::new();
    build_world(&mut world, instance);
    world.insert_resource(policy.build(instance.bonus));

    let mut schedules = SimulationSchedules::new();
    run_to_horizon(&mut world, &mut schedules);

    RunArtifacts {
        solution: Solution::from_world(&mut world),
        metrics: extract_metrics(&mut world),
    }
}

/// Reads, parses, and runs one instance file. Failures stay scoped to this
/// instance; callers decide whether to keep going with the rest of a batch.
pub fn run_instance_file(
    path: &Path,
    policy: AssignmentPolicyKind,
) -> Result<RunArtifacts, String> {
    let input = fs::read_to_string(path)
        .map_err(|error| format!("{}: read failed: {error}", path.display()))?;
    let instance = parse_instance(&input)
        .map_err(|error| format!("{}: {error}", path.display()))?;
    Ok(run_instance(&instance, policy))
}

/// Runs a batch of instances in parallel. Results come back in input order;
/// each entry is the run's artifacts or the error that aborted that instance
/// alone.
pub fn run_parallel_instances(
    instances: &[Instance],
    policy: AssignmentPolicyKind,
    show_progress: bool,
) -> Vec<RunArtifacts> {
    let pb = progress_bar(instances.len(), show_progress);
    let results = instances
        .par_iter()
        .map(|instance| {
            let artifacts = run_instance(instance, policy);
            if let Some(ref bar) = pb {
                bar.inc(1);
            }
            artifacts
        })
        .collect();
    if let Some(ref bar) = pb {
        bar.finish_with_message("done");
    }
    results
}

/// Runs a batch of instance files in parallel, isolating per-file failures.
pub fn run_parallel_instance_files(
    paths: &[&Path],
    policy: AssignmentPolicyKind,
    show_progress: bool,
) -> Vec<Result<RunArtifacts, String>> {
    let pb = progress_bar(paths.len(), show_progress);
    let results = paths
        .par_iter()
        .map(|path| {
            let result = run_instance_file(path, policy);
            if let Some(ref bar) = pb {
                bar.inc(1);
            }
            result
        })
        .collect();
    if let Some(ref bar) = pb {
        bar.finish_with_message("done");
    }
    results
}

fn progress_bar(total: usize, show_progress: bool) -> Option<ProgressBar> {
    if !show_progress || total == 0 {
        return None;
    }
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .ok()?
        .progress_chars("#>-");
    bar.set_style(style);
    Some(bar)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use dispatch_core::scenario::{generate_instance, InstanceParams};
    use dispatch_core::test_helpers::{instance_with_rides, ride_spec};

    use super::*;

    #[test]
    fn run_instance_produces_matching_solution_and_metrics() {
        let instance = instance_with_rides(1, 10, vec![ride_spec((0, 0), (0, 3), 0, 10)]);
        let artifacts = run_instance(&instance, AssignmentPolicyKind::LeadTime);

        assert_eq!(artifacts.solution.to_string(), "1 0\n");
        assert_eq!(artifacts.metrics.assigned_rides, 1);
        assert_eq!(artifacts.solution.assigned_rides(), artifacts.metrics.assigned_rides);
        assert_eq!(artifacts.metrics.score, 4);
    }

    #[test]
    fn both_policies_run_the_same_instance() {
        let instance = generate_instance(&InstanceParams::default().with_seed(11));
        let canonical = run_instance(&instance, AssignmentPolicyKind::LeadTime);
        let historical = run_instance(&instance, AssignmentPolicyKind::ScoreBased);

        assert_eq!(canonical.metrics.total_rides, historical.metrics.total_rides);
        assert!(canonical.metrics.assigned_rides > 0);
        assert!(historical.metrics.assigned_rides > 0);
    }

    #[test]
    fn parallel_results_keep_input_order() {
        let instances: Vec<Instance> = (0..6)
            .map(|seed| {
                generate_instance(
                    &InstanceParams {
                        vehicle_count: 3 + seed as usize,
                        ride_count: 30,
                        horizon: 200,
                        ..Default::default()
                    }
                    .with_seed(seed),
                )
            })
            .collect();

        let results = run_parallel_instances(&instances, AssignmentPolicyKind::LeadTime, false);
        assert_eq!(results.len(), instances.len());
        for (instance, artifacts) in instances.iter().zip(&results) {
            assert_eq!(artifacts.metrics.total_vehicles, instance.vehicle_count);
            assert_eq!(artifacts.solution.assignments.len(), instance.vehicle_count);
        }
    }

    #[test]
    fn a_failing_file_does_not_abort_its_siblings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good_path = dir.path().join("good.in");
        let bad_path = dir.path().join("bad.in");
        let mut good = std::fs::File::create(&good_path).expect("create");
        good.write_all(b"3 4 1 1 2 10\n0 0 1 3 2 9\n").expect("write");
        let mut bad = std::fs::File::create(&bad_path).expect("create");
        bad.write_all(b"3 4 1 1 2 10\n0 0 oops 3 2 9\n").expect("write");

        let paths = [bad_path.as_path(), good_path.as_path()];
        let results =
            run_parallel_instance_files(&paths, AssignmentPolicyKind::LeadTime, false);

        assert!(results[0].is_err());
        let good_run = results[1].as_ref().expect("good instance runs");
        assert_eq!(good_run.metrics.total_rides, 1);
    }
}
