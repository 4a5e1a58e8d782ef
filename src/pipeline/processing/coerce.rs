use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{info, instrument};

use crate::constants::{AMOUNT, DATE, QTY};
use crate::types::{RecordTable, Value};

const ISO_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
// Month-first, as sales exports write them (e.g. "04-30-22")
const US_DATE_FORMATS: &[&str] = &["%m-%d-%y", "%m-%d-%Y", "%m/%d/%y", "%m/%d/%Y"];

/// Per-column count of non-missing cells that failed to parse
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoercionReport {
    pub date_fallbacks: usize,
    pub amount_fallbacks: usize,
    pub qty_fallbacks: usize,
}

/// Parse a date or datetime cell. `None` on anything unrecognised.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }

    let year_first = raw.len() >= 4 && raw.as_bytes()[..4].iter().all(u8::is_ascii_digit);
    if year_first {
        ISO_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| parse_date_with(raw, ISO_DATE_FORMATS))
    } else {
        parse_date_with(raw, US_DATE_FORMATS)
    }
}

fn parse_date_with(raw: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a numeric cell. Non-finite values count as unparseable.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn coerce_cell(value: Value, parse: impl Fn(&str) -> Option<Value>, fallbacks: &mut usize) -> Value {
    match value {
        Value::Text(raw) => parse(&raw).unwrap_or_else(|| {
            *fallbacks += 1;
            Value::Missing
        }),
        other => other,
    }
}

/// Re-type `date`, `amount` and `qty`. Bad cells become missing; all other
/// columns pass through untouched. Absent columns are skipped.
#[instrument(skip_all)]
pub fn coerce(table: RecordTable) -> (RecordTable, CoercionReport) {
    let date_idx = table.column_index(DATE);
    let amount_idx = table.column_index(AMOUNT);
    let qty_idx = table.column_index(QTY);
    let (columns, rows) = table.into_parts();

    let mut report = CoercionReport::default();
    let to_timestamp = |raw: &str| parse_timestamp(raw).map(Value::Timestamp);
    let to_number = |raw: &str| parse_number(raw).map(Value::Number);

    let rows = rows
        .into_iter()
        .map(|mut row| {
            if let Some(i) = date_idx {
                let cell = std::mem::replace(&mut row[i], Value::Missing);
                row[i] = coerce_cell(cell, to_timestamp, &mut report.date_fallbacks);
            }
            if let Some(i) = amount_idx {
                let cell = std::mem::replace(&mut row[i], Value::Missing);
                row[i] = coerce_cell(cell, to_number, &mut report.amount_fallbacks);
            }
            if let Some(i) = qty_idx {
                let cell = std::mem::replace(&mut row[i], Value::Missing);
                row[i] = coerce_cell(cell, to_number, &mut report.qty_fallbacks);
            }
            row
        })
        .collect();

    info!(
        date = report.date_fallbacks,
        amount = report.amount_fallbacks,
        qty = report.qty_fallbacks,
        "coerced typed columns (unparseable cells set to missing)"
    );
    crate::metrics::coercion_fallbacks(DATE, report.date_fallbacks);
    crate::metrics::coercion_fallbacks(AMOUNT, report.amount_fallbacks);
    crate::metrics::coercion_fallbacks(QTY, report.qty_fallbacks);

    (RecordTable::from_parts(columns, rows), report)
}
