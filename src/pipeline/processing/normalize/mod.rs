use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

use crate::constants::ROW_INDEX_COLUMN;
use crate::error::DataSourceError;
use crate::types::RecordTable;

/// Placeholder headers spreadsheet tools give to blank trailing columns
static UNNAMED_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Unnamed: \d+$").expect("valid unnamed-column pattern"));

/// Canonical column identifier: trimmed, lowercased, spaces → underscores
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Whether a raw header belongs to the fixed exclusion set
pub fn is_excluded_column(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case(ROW_INDEX_COLUMN)
        || UNNAMED_COLUMN.is_match(trimmed)
}

/// Drop excluded columns, then rename the rest. Remaining columns keep their order.
#[instrument(skip_all)]
pub fn normalize(table: RecordTable) -> RecordTable {
    let (columns, rows) = table.into_parts();

    let keep: Vec<bool> = columns.iter().map(|c| !is_excluded_column(c)).collect();
    for (column, _) in columns.iter().zip(&keep).filter(|(_, k)| !**k) {
        debug!(column = %column, "dropping column");
    }

    let columns = columns
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(c, _)| normalize_column_name(c))
        .collect();

    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(value, _)| value)
                .collect()
        })
        .collect();

    RecordTable::from_parts(columns, rows)
}

/// Fail when two headers collapsed onto the same normalized name.
pub fn reject_duplicate_columns(table: &RecordTable) -> Result<(), DataSourceError> {
    let mut seen = HashSet::new();
    match table.columns().iter().find(|c| !seen.insert(c.as_str())) {
        Some(column) => {
            warn!(column = %column, "duplicate column after normalization");
            Err(DataSourceError::DuplicateColumn {
                column: column.clone(),
            })
        }
        None => Ok(()),
    }
}

/// Verify the normalized table carries every column in `required`.
pub fn require_columns(table: &RecordTable, required: &[&str]) -> Result<(), DataSourceError> {
    match required.iter().find(|c| !table.has_column(c)) {
        Some(column) => Err(DataSourceError::MissingColumn {
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}
