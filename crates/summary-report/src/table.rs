//! Per-person counts table written as CSV.

use std::path::Path;

use csv::WriterBuilder;
use summary_core::models::PersonStats;
use summary_core::{Result, SummaryError};

/// Header row of the counts table.
pub const TABLE_HEADER: [&str; 3] = ["person", "sent", "received"];

/// Write `stats` to `path` in the given order, header first.
///
/// The header is written even when `stats` is empty.
pub fn write_person_stats(path: &Path, stats: &[PersonStats]) -> Result<()> {
    let csv_err = |source: csv::Error| SummaryError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;

    writer.write_record(TABLE_HEADER).map_err(csv_err)?;
    for row in stats {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| SummaryError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
