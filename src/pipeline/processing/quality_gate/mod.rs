use serde::Serialize;
use tracing::{info, instrument};

use crate::constants::{AMOUNT, CANCELLED_STATUS, QTY, STATUS};
use crate::types::{RecordTable, Row};

/// Configuration for the row validity rules
#[derive(Debug, Clone)]
pub struct QualityGateConfig {
    /// Status value (exact, case-sensitive) whose rows are removed
    pub cancelled_status: String,
    /// Columns that must hold a value for a row to survive
    pub required_values: Vec<String>,
}

impl Default for QualityGateConfig {
    fn default() -> Self {
        Self {
            cancelled_status: CANCELLED_STATUS.to_string(),
            required_values: vec![AMOUNT.to_string(), QTY.to_string()],
        }
    }
}

/// How many rows each rule removed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub cancelled_removed: usize,
    pub incomplete_removed: usize,
    pub retained: usize,
}

/// Removes cancelled orders, then rows missing any required value.
pub struct QualityGate {
    pub config: QualityGateConfig,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityGate {
    pub fn new() -> Self {
        Self {
            config: QualityGateConfig::default(),
        }
    }

    pub fn with_config(config: QualityGateConfig) -> Self {
        Self { config }
    }

    /// Apply both rules in order. Surviving rows keep their original order;
    /// an empty result is valid.
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn apply(&self, table: RecordTable) -> (RecordTable, CleaningReport) {
        let status_idx = table.column_index(STATUS);
        let required_idx: Vec<usize> = self
            .config
            .required_values
            .iter()
            .filter_map(|c| table.column_index(c))
            .collect();
        let (columns, rows) = table.into_parts();
        let input_rows = rows.len();

        let active: Vec<Row> = rows
            .into_iter()
            .filter(|row| !self.is_cancelled(row, status_idx))
            .collect();
        let cancelled_removed = input_rows - active.len();

        let complete: Vec<Row> = active
            .into_iter()
            .filter(|row| required_idx.iter().all(|&i| !row[i].is_missing()))
            .collect();
        let incomplete_removed = input_rows - cancelled_removed - complete.len();

        let report = CleaningReport {
            input_rows,
            cancelled_removed,
            incomplete_removed,
            retained: complete.len(),
        };

        info!(
            "🧹 Cleaning completed: {} retained ({} cancelled, {} incomplete removed)",
            report.retained, report.cancelled_removed, report.incomplete_removed
        );
        crate::metrics::rows_removed("cancelled", cancelled_removed);
        crate::metrics::rows_removed("incomplete", incomplete_removed);
        crate::metrics::rows_retained(report.retained);

        (RecordTable::from_parts(columns, complete), report)
    }

    /// A missing status is not a cancellation
    fn is_cancelled(&self, row: &Row, status_idx: Option<usize>) -> bool {
        status_idx
            .and_then(|i| row[i].as_text())
            .is_some_and(|s| s == self.config.cancelled_status)
    }
}
