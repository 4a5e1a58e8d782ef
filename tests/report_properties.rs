use approx::assert_relative_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use sales_report::app::ChartRenderer;
use sales_report::config::ReportConfig;
use sales_report::error::{ChartError, ReportError};
use sales_report::infra::PlottersSvgRenderer;
use sales_report::Pipeline;

const STATUSES: &[&str] = &["Shipped", "Cancelled", "Shipped - Delivered to Buyer", "Pending", "Shipped"];

/// A larger export shaped like a marketplace sales report, with a sprinkling
/// of bad cells.
fn sample_export() -> String {
    let mut csv = String::from("index,Order ID,Date,Status,Amount,Qty,Category,ship-city,Unnamed: 22\n");
    for i in 0..120 {
        let order = format!("40{}-{}", i % 7, i / 2);
        let date = match i % 17 {
            0 => "n/a".to_string(),
            _ => format!("{:02}-{:02}-22", 3 + i % 4, 1 + i % 28),
        };
        let amount = match i % 23 {
            0 => String::new(),
            5 => "free".to_string(),
            _ => format!("{}.{}", 100 + (i * 37) % 900, i % 10),
        };
        let qty = if i % 29 == 3 { "" } else { "1" };
        let category = format!("cat{}", i % 13);
        let status = STATUSES[i % STATUSES.len()];
        csv.push_str(&format!(
            "{i},{order},{date},{status},{amount},{qty},{category},\"PUNE, MH\",\n"
        ));
    }
    csv
}

fn config_for(dir: &Path, render_charts: bool) -> ReportConfig {
    let input = dir.join("sales.csv");
    fs::write(&input, sample_export()).unwrap();
    ReportConfig {
        input_path: input,
        output_path: dir.join("out").join("cleaned.csv"),
        charts_dir: dir.join("out").join("charts"),
        render_charts,
        ..ReportConfig::default()
    }
}

#[test]
fn test_exported_rows_are_never_cancelled_or_incomplete() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), false);
    Pipeline::run(&config, None).unwrap();

    let mut reader = csv::Reader::from_path(&config.output_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let (status, amount, qty) = (col("status"), col("amount"), col("qty"));
    assert!(headers.iter().all(|h| h != "index" && !h.starts_with("Unnamed")));

    let mut rows = 0;
    for record in reader.records() {
        let record = record.unwrap();
        assert_ne!(&record[status], "Cancelled");
        assert!(record[amount].parse::<f64>().is_ok());
        assert!(record[qty].parse::<f64>().is_ok());
        rows += 1;
    }
    assert!(rows > 0);
}

#[test]
fn test_export_is_byte_identical_across_runs() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), false);

    Pipeline::run(&config, None).unwrap();
    let first = fs::read(&config.output_path).unwrap();
    Pipeline::run(&config, None).unwrap();
    let second = fs::read(&config.output_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_aggregate_invariants() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), false);
    let result = Pipeline::run(&config, None).unwrap();
    let agg = &result.aggregates;

    assert!(agg.total_orders <= result.cleaning.retained);
    assert!(agg.top_categories.len() <= 10);
    assert!(agg.top_categories.windows(2).all(|w| w[0].total >= w[1].total));
    assert!(agg.monthly_revenue.windows(2).all(|w| w[0].key < w[1].key));

    let status_total: usize = agg.status_counts.iter().map(|s| s.count).sum();
    assert_eq!(status_total, result.cleaning.retained);
    assert!(agg.status_counts.windows(2).all(|w| w[0].count >= w[1].count));
}

#[test]
fn test_monthly_revenue_sums_to_total_when_all_dates_parse() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sales.csv");
    fs::write(
        &input,
        "Order ID,Date,Status,Amount,Qty,Category\n\
         1,2024-01-15,Shipped,10.25,1,A\n\
         2,2024-02-01,Shipped,20.5,2,B\n\
         3,2024-02-20,Pending,0.1,1,A\n\
         4,2023-12-31,Shipped,0.2,1,C\n",
    )
    .unwrap();
    let config = ReportConfig {
        input_path: input,
        output_path: dir.path().join("cleaned.csv"),
        render_charts: false,
        ..ReportConfig::default()
    };

    let result = Pipeline::run(&config, None).unwrap();
    let agg = &result.aggregates;
    let monthly_sum: f64 = agg.monthly_revenue.iter().map(|g| g.total).sum();

    assert_relative_eq!(monthly_sum, agg.total_revenue, epsilon = 1e-9);
    assert_eq!(agg.monthly_revenue[0].key, "2023-12");
}

#[test]
fn test_full_run_writes_svg_charts() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), true);
    let renderer = PlottersSvgRenderer::default();
    let renderer: &dyn ChartRenderer = &renderer;

    let result = Pipeline::run(&config, Some(renderer)).unwrap();

    assert_eq!(result.charts.len(), 3);
    for name in ["monthly_sales.svg", "top_categories.svg", "order_status.svg"] {
        let svg = fs::read_to_string(config.charts_dir.join(name)).unwrap();
        assert!(svg.contains("<svg"));
    }
}

#[test]
fn test_disabled_charts_are_not_rendered() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), false);
    let renderer = PlottersSvgRenderer::default();
    let renderer: &dyn ChartRenderer = &renderer;

    let result = Pipeline::run(&config, Some(renderer)).unwrap();
    assert!(result.charts.is_empty());
    assert!(!config.charts_dir.exists());
}

#[test]
fn test_overflowing_revenue_fails_chart_rendering_instead_of_hanging() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sales.csv");
    fs::write(
        &input,
        "Order ID,Date,Status,Amount,Qty,Category\n\
         1,2024-01-15,Shipped,1e308,1,A\n\
         2,2024-01-16,Shipped,1e308,1,A\n",
    )
    .unwrap();
    let config = ReportConfig {
        input_path: input,
        output_path: dir.path().join("cleaned.csv"),
        charts_dir: dir.path().join("charts"),
        ..ReportConfig::default()
    };
    let renderer = PlottersSvgRenderer::default();
    let renderer: &dyn ChartRenderer = &renderer;

    let err = Pipeline::run(&config, Some(renderer)).unwrap_err();
    assert!(matches!(err, ReportError::Chart(ChartError::Render { .. })));
    assert!(!config.output_path.exists());
}
