//! JSON export of the recap tables

use crate::aggregate::RecapSummary;
use crate::error::{RecapError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the recap tables as pretty-printed JSON
pub fn write_summary_json(summary: &RecapSummary, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        RecapError::DataError(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.flush()?;
    Ok(())
}
