// Storage: persist the cleaned table for downstream reporting tools

use csv::WriterBuilder;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use crate::error::ExportError;
use crate::pipeline::processing::aggregate::ReportAggregates;
use crate::types::RecordTable;

/// Write the table with a header row of its current column names.
///
/// Missing cells become empty fields. Parent directories are created.
#[instrument(skip_all, fields(path = %path.display(), rows = table.len()))]
pub fn export_table(table: &RecordTable, path: &Path, delimiter: u8) -> Result<(), ExportError> {
    ensure_parent_dir(path)?;

    let write_err = |source: csv::Error| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(write_err)?;

    writer.write_record(table.columns()).map_err(write_err)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|value| value.to_string()))
            .map_err(write_err)?;
    }
    writer.flush().map_err(|source| ExportError::Flush {
        path: path.to_path_buf(),
        source,
    })?;

    info!("💾 Cleaned dataset saved: {} ({} rows)", path.display(), table.len());
    crate::metrics::rows_exported(table.len());
    Ok(())
}

/// Write the aggregate bundle as pretty JSON.
pub fn write_summary(aggregates: &ReportAggregates, path: &Path) -> crate::error::Result<()> {
    ensure_parent_dir(path)?;
    let json_content = serde_json::to_string_pretty(aggregates)?;
    fs::write(path, json_content).map_err(|source| ExportError::Summary {
        path: path.to_path_buf(),
        source,
    })?;
    info!("📝 Summary written to {}", path.display());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
