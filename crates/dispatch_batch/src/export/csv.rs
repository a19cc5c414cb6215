use std::io::Write;

use super::BatchRecord;

// Written field by field: the csv serializer cannot flatten the nested
// metrics struct into a single row.
pub(super) fn export_to_csv_impl<W: Write>(
    records: &[BatchRecord],
    writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "instance",
        "total_rides",
        "total_vehicles",
        "assigned_rides",
        "completed_rides",
        "discarded_rides",
        "vehicles_used",
        "score",
        "horizon",
    ])?;
    for record in records {
        let metrics = &record.metrics;
        out.write_record([
            record.instance.clone(),
            metrics.total_rides.to_string(),
            metrics.total_vehicles.to_string(),
            metrics.assigned_rides.to_string(),
            metrics.completed_rides.to_string(),
            metrics.discarded_rides.to_string(),
            metrics.vehicles_used.to_string(),
            metrics.score.to_string(),
            metrics.horizon.to_string(),
        ])?;
    }
    out.flush()?;
    Ok(())
}
