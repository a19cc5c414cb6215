//! Batch dispatch runner.
//!
//! Runs each instance file to its horizon, writes the assignment plan next to
//! the input as `<name>.out`, and prints a per-instance summary. Optional
//! flags export the batch summary as CSV or JSON.
//!
//! Usage:
//!   dispatch [--policy lead-time|score] [--summary-csv PATH]
//!            [--summary-json PATH] [--quiet] <instance.in>...

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dispatch_batch::export::{export_to_csv, export_to_json, BatchRecord};
use dispatch_batch::runner::run_parallel_instance_files;
use dispatch_core::scenario::AssignmentPolicyKind;

struct Options {
    policy: AssignmentPolicyKind,
    summary_csv: Option<PathBuf>,
    summary_json: Option<PathBuf>,
    show_progress: bool,
    inputs: Vec<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        policy: AssignmentPolicyKind::LeadTime,
        summary_csv: None,
        summary_json: None,
        show_progress: true,
        inputs: Vec::new(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--policy" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--policy requires a value".to_string())?;
                options.policy = match value.as_str() {
                    "lead-time" => AssignmentPolicyKind::LeadTime,
                    "score" => AssignmentPolicyKind::ScoreBased,
                    other => return Err(format!("unknown policy '{other}'")),
                };
            }
            "--summary-csv" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--summary-csv requires a path".to_string())?;
                options.summary_csv = Some(PathBuf::from(value));
            }
            "--summary-json" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--summary-json requires a path".to_string())?;
                options.summary_json = Some(PathBuf::from(value));
            }
            "--quiet" => options.show_progress = false,
            other if other.starts_with("--") => {
                return Err(format!("unknown flag '{other}'"));
            }
            _ => options.inputs.push(PathBuf::from(arg)),
        }
    }

    if options.inputs.is_empty() {
        return Err("no instance files given".to_string());
    }
    Ok(options)
}

fn instance_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn output_path(input: &Path) -> PathBuf {
    input.with_extension("out")
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("dispatch: {message}");
            eprintln!(
                "usage: dispatch [--policy lead-time|score] [--summary-csv PATH] \
                 [--summary-json PATH] [--quiet] <instance.in>..."
            );
            return ExitCode::from(2);
        }
    };

    let paths: Vec<&Path> = options.inputs.iter().map(PathBuf::as_path).collect();
    println!(
        "Running {} instance(s) with the {:?} policy...",
        paths.len(),
        options.policy
    );
    let results = run_parallel_instance_files(&paths, options.policy, options.show_progress);

    let mut records = Vec::new();
    let mut failures = 0usize;
    let mut total_score = 0u64;
    for (input, result) in options.inputs.iter().zip(results) {
        match result {
            Ok(artifacts) => {
                let out_path = output_path(input);
                if let Err(error) = write_solution(&artifacts.solution, &out_path) {
                    eprintln!("dispatch: {}: {error}", out_path.display());
                    failures += 1;
                    continue;
                }
                let metrics = &artifacts.metrics;
                println!(
                    "{}: score {} ({}/{} rides completed, {} discarded) -> {}",
                    instance_label(input),
                    metrics.score,
                    metrics.completed_rides,
                    metrics.total_rides,
                    metrics.discarded_rides,
                    out_path.display()
                );
                total_score += metrics.score;
                records.push(BatchRecord {
                    instance: instance_label(input),
                    metrics: artifacts.metrics,
                });
            }
            Err(message) => {
                eprintln!("dispatch: {message}");
                failures += 1;
            }
        }
    }
    println!("Total score: {total_score}");

    if let Some(path) = &options.summary_csv {
        if let Err(error) = export_to_csv(&records, path) {
            eprintln!("dispatch: {}: {error}", path.display());
            failures += 1;
        }
    }
    if let Some(path) = &options.summary_json {
        if let Err(error) = export_to_json(&records, path) {
            eprintln!("dispatch: {}: {error}", path.display());
            failures += 1;
        }
    }

    if failures > 0 {
        eprintln!("dispatch: {failures} instance(s) failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn write_solution(
    solution: &dispatch_core::solution::Solution,
    path: &Path,
) -> Result<(), std::io::Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    solution.write_to(&mut writer)
}
