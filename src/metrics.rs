//! Metric catalog for the report pipeline
//!
//! Stages record through these helpers rather than raw strings. No exporter
//! is installed by the binary, so without a recorder every call is a no-op.

use std::fmt;
use std::time::Instant;

/// Enum representing all metric names used in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RowsLoaded,
    CoercionFallbacks,
    RowsRemoved,
    RowsRetained,
    RowsExported,
    ChartsRendered,
    StageDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowsLoaded => "sales_report_rows_loaded_total",
            MetricName::CoercionFallbacks => "sales_report_coercion_fallbacks_total",
            MetricName::RowsRemoved => "sales_report_rows_removed_total",
            MetricName::RowsRetained => "sales_report_rows_retained_total",
            MetricName::RowsExported => "sales_report_rows_exported_total",
            MetricName::ChartsRendered => "sales_report_charts_rendered_total",
            MetricName::StageDuration => "sales_report_stage_duration_seconds",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            RowsLoaded,
            CoercionFallbacks,
            RowsRemoved,
            RowsRetained,
            RowsExported,
            ChartsRendered,
            StageDuration,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn rows_loaded(count: usize) {
    ::metrics::counter!(MetricName::RowsLoaded.as_str()).increment(count as u64);
}

pub fn coercion_fallbacks(column: &str, count: usize) {
    ::metrics::counter!(MetricName::CoercionFallbacks.as_str(), "column" => column.to_string())
        .increment(count as u64);
}

pub fn rows_removed(rule: &'static str, count: usize) {
    ::metrics::counter!(MetricName::RowsRemoved.as_str(), "rule" => rule).increment(count as u64);
}

pub fn rows_retained(count: usize) {
    ::metrics::counter!(MetricName::RowsRetained.as_str()).increment(count as u64);
}

pub fn rows_exported(count: usize) {
    ::metrics::counter!(MetricName::RowsExported.as_str()).increment(count as u64);
}

pub fn chart_rendered(chart: &'static str) {
    ::metrics::counter!(MetricName::ChartsRendered.as_str(), "chart" => chart).increment(1);
}

/// Records the elapsed time of a stage into the duration histogram when dropped
pub struct StageTimer {
    start: Instant,
    stage: &'static str,
}

impl StageTimer {
    pub fn start(stage: &'static str) -> Self {
        Self {
            start: Instant::now(),
            stage,
        }
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        let secs = self.start.elapsed().as_secs_f64();
        ::metrics::histogram!(MetricName::StageDuration.as_str(), "stage" => self.stage).record(secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique() {
        let names: HashSet<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        assert_eq!(names.len(), MetricName::all_metrics().count());
        assert!(names.iter().all(|n| n.starts_with("sales_report_")));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        rows_loaded(3);
        rows_removed("cancelled", 1);
        let _timer = StageTimer::start("test");
    }
}
