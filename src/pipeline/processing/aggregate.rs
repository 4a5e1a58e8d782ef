use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::instrument;

use crate::constants::{CATEGORY, MONTH, ORDER_ID, QTY, REVENUE, STATUS};
use crate::types::RecordTable;

/// One key of a grouped summary with its summed value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// KPI scalars and grouped summaries for one cleaned table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportAggregates {
    pub total_orders: usize,
    pub total_revenue: f64,
    pub total_quantity: f64,
    /// Ascending by month label
    pub monthly_revenue: Vec<GroupTotal>,
    /// Descending by revenue, ties in first-encounter order
    pub top_categories: Vec<GroupTotal>,
    /// Descending by count, ties in first-encounter order
    pub status_counts: Vec<GroupCount>,
}

/// Compute every aggregate. Missing cells are excluded from each sum and
/// grouping; zero rows give zero/empty results.
#[instrument(skip_all, fields(rows = table.len(), top_n = top_n))]
pub fn aggregate(table: &RecordTable, top_n: usize) -> ReportAggregates {
    let mut top_categories = grouped_sum(table, CATEGORY, REVENUE);
    // sort_by is stable, so equal totals keep encounter order
    top_categories.sort_by(|a, b| b.total.total_cmp(&a.total));
    top_categories.truncate(top_n);

    let monthly: BTreeMap<String, f64> = grouped_sum(table, MONTH, REVENUE)
        .into_iter()
        .map(|g| (g.key, g.total))
        .collect();

    ReportAggregates {
        total_orders: distinct_count(table, ORDER_ID),
        total_revenue: column_sum(table, REVENUE),
        total_quantity: column_sum(table, QTY),
        monthly_revenue: monthly
            .into_iter()
            .map(|(key, total)| GroupTotal { key, total })
            .collect(),
        top_categories,
        status_counts: value_counts(table, STATUS),
    }
}

pub fn distinct_count(table: &RecordTable, column: &str) -> usize {
    table
        .column_values(column)
        .map(|values| values.filter_map(|v| v.group_key()).collect::<HashSet<_>>().len())
        .unwrap_or(0)
}

pub fn column_sum(table: &RecordTable, column: &str) -> f64 {
    table
        .column_values(column)
        .map(|values| values.filter_map(|v| v.as_f64()).sum::<f64>())
        .unwrap_or(0.0)
}

/// Sum `value_column` per key of `key_column`, in first-encounter key order.
pub fn grouped_sum(table: &RecordTable, key_column: &str, value_column: &str) -> Vec<GroupTotal> {
    let (Some(key_idx), Some(value_idx)) =
        (table.column_index(key_column), table.column_index(value_column))
    else {
        return Vec::new();
    };

    let mut groups: Vec<GroupTotal> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for row in table.rows() {
        let Some(key) = row[key_idx].group_key() else {
            continue;
        };
        let value = row[value_idx].as_f64().unwrap_or(0.0);
        match positions.get(&key) {
            Some(&pos) => groups[pos].total += value,
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(GroupTotal { key, total: value });
            }
        }
    }
    groups
}

/// Row count per distinct value, descending by count.
pub fn value_counts(table: &RecordTable, column: &str) -> Vec<GroupCount> {
    let Some(values) = table.column_values(column) else {
        return Vec::new();
    };

    let mut counts: Vec<GroupCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for key in values.filter_map(|v| v.group_key()) {
        match positions.get(&key) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(key.clone(), counts.len());
                counts.push(GroupCount { key, count: 1 });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
