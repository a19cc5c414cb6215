//! Batch summary export: one record per instance, as CSV or pretty JSON.

mod csv;
mod json;

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::metrics::InstanceMetrics;

/// One summary row: the instance label (usually the input file stem) and its
/// run metrics.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub instance: String,
    #[serde(flatten)]
    pub metrics: InstanceMetrics,
}

pub fn export_to_csv(
    records: &[BatchRecord],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    csv::export_to_csv_impl(records, file)
}

pub fn export_to_json(
    records: &[BatchRecord],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    json::export_to_json_impl(records, file)
}
