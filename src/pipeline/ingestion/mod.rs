// Ingestion: read the delimited sales export into a record table

use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::error::DataSourceError;
use crate::types::{RecordTable, Value};

/// Read a delimited file with a header row.
///
/// Columns keep their header names verbatim. Cells stay raw text; an empty
/// cell is loaded as missing. A record shorter than the header is padded with
/// missing cells, a longer one is rejected.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_table(path: &Path, delimiter: u8) -> Result<RecordTable, DataSourceError> {
    if !path.is_file() {
        return Err(DataSourceError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|source| DataSourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| DataSourceError::Malformed {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(DataSourceError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let mut table = RecordTable::new(headers);
    for record in reader.records() {
        let record = record.map_err(|source| DataSourceError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        let width = table.columns().len();
        if record.len() > width {
            return Err(DataSourceError::TooManyFields {
                path: path.to_path_buf(),
                line: record.position().map_or(0, |p| p.line()),
                expected: width,
                found: record.len(),
            });
        }
        let mut row: Vec<Value> = record.iter().map(raw_cell).collect();
        row.resize(width, Value::Missing);
        table.push_row(row);
    }

    info!(
        "📂 Dataset loaded: {} rows, {} columns",
        table.len(),
        table.columns().len()
    );
    for column in table.profile() {
        debug!(column = %column.name, non_missing = column.non_missing, "column profile");
    }
    crate::metrics::rows_loaded(table.len());

    Ok(table)
}

fn raw_cell(field: &str) -> Value {
    if field.is_empty() {
        Value::Missing
    } else {
        Value::text(field)
    }
}
