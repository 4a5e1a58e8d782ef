use chrono::Datelike;
use tracing::{debug, instrument};

use crate::constants::{AMOUNT, DATE, MONTH, REVENUE, YEAR};
use crate::types::{RecordTable, Row, Value};

/// Year-month label ("2024-03") of a parsed date cell
pub fn month_label(date: &Value) -> Value {
    match date.as_timestamp() {
        Some(ts) => Value::Text(ts.format("%Y-%m").to_string()),
        None => Value::Missing,
    }
}

pub fn year_of(date: &Value) -> Value {
    match date.as_timestamp() {
        Some(ts) => Value::Integer(i64::from(ts.year())),
        None => Value::Missing,
    }
}

/// Add `month`, `year` and `revenue`.
///
/// A missing date yields missing month/year for that row. Columns with the
/// derived names already present are overwritten in place.
#[instrument(skip_all, fields(rows = table.len()))]
pub fn derive_features(table: RecordTable) -> RecordTable {
    let date_idx = table.column_index(DATE);
    let amount_idx = table.column_index(AMOUNT);
    let (mut columns, rows) = table.into_parts();

    let targets: Vec<usize> = [MONTH, YEAR, REVENUE]
        .iter()
        .map(|name| match columns.iter().position(|c| c == name) {
            Some(idx) => idx,
            None => {
                columns.push(name.to_string());
                columns.len() - 1
            }
        })
        .collect();
    let width = columns.len();

    let rows: Vec<Row> = rows
        .into_iter()
        .map(|mut row| {
            row.resize(width, Value::Missing);
            let date = date_idx.map(|i| row[i].clone()).unwrap_or(Value::Missing);
            let revenue = amount_idx.map(|i| row[i].clone()).unwrap_or(Value::Missing);
            row[targets[0]] = month_label(&date);
            row[targets[1]] = year_of(&date);
            row[targets[2]] = revenue;
            row
        })
        .collect();

    debug!("🧠 New features created: month, year, revenue");
    RecordTable::from_parts(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> Value {
        Value::Timestamp(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    #[test]
    fn test_derive_features_appends_columns() {
        let table = RecordTable::from_parts(
            vec!["date".to_string(), "amount".to_string()],
            vec![vec![ts(2024, 3, 9), Value::Number(12.5)]],
        );

        let table = derive_features(table);
        assert_eq!(table.columns(), &["date", "amount", "month", "year", "revenue"]);
        assert_eq!(table.get(0, "month"), Some(&Value::text("2024-03")));
        assert_eq!(table.get(0, "year"), Some(&Value::Integer(2024)));
        assert_eq!(table.get(0, "revenue"), Some(&Value::Number(12.5)));
    }

    #[test]
    fn test_missing_date_propagates() {
        let table = RecordTable::from_parts(
            vec!["date".to_string(), "amount".to_string()],
            vec![vec![Value::Missing, Value::Number(7.0)]],
        );

        let table = derive_features(table);
        assert_eq!(table.get(0, "month"), Some(&Value::Missing));
        assert_eq!(table.get(0, "year"), Some(&Value::Missing));
        assert_eq!(table.get(0, "revenue"), Some(&Value::Number(7.0)));
    }

    #[test]
    fn test_existing_derived_column_is_replaced() {
        let table = RecordTable::from_parts(
            vec!["date".to_string(), "month".to_string(), "amount".to_string()],
            vec![vec![ts(2022, 4, 30), Value::text("April"), Value::Number(1.0)]],
        );

        let table = derive_features(table);
        assert_eq!(table.columns(), &["date", "month", "amount", "year", "revenue"]);
        assert_eq!(table.get(0, "month"), Some(&Value::text("2022-04")));
    }

    #[test]
    fn test_derive_features_is_recomputed() {
        let table = RecordTable::from_parts(
            vec!["date".to_string(), "amount".to_string()],
            vec![vec![ts(2024, 1, 15), Value::Number(50.0)]],
        );

        let once = derive_features(table);
        let twice = derive_features(once.clone());
        assert_eq!(once, twice);
    }
}
