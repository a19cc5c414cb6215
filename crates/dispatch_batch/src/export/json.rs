use std::io::Write;

use super::BatchRecord;

pub(super) fn export_to_json_impl<W: Write>(
    records: &[BatchRecord],
    mut writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}
