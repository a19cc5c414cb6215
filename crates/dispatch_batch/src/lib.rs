//! Batch execution over many dispatch problem instances.
//!
//! One instance is a bounded, single-threaded simulation; instances share no
//! state, so a batch fans out across cores with rayon. Each run yields the
//! assignment [`Solution`](dispatch_core::solution::Solution) plus aggregate
//! [`metrics`], exportable as CSV or JSON summaries. A failing instance is
//! reported and skipped; its siblings always run to completion.

pub mod export;
pub mod metrics;
pub mod runner;

pub use export::{export_to_csv, export_to_json};
pub use metrics::InstanceMetrics;
pub use runner::{
    run_instance, run_instance_file, run_parallel_instance_files, run_parallel_instances,
    RunArtifacts,
};
