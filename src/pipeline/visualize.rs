// Visualization: hand the grouped summaries to the chart renderer

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::app::ports::{ChartKind, ChartRenderer, ChartSpec};
use crate::constants::{MONTHLY_SALES_CHART, ORDER_STATUS_CHART, TOP_CATEGORIES_CHART};
use crate::error::ChartError;
use crate::pipeline::processing::aggregate::ReportAggregates;

/// The three report charts with their file names
pub fn report_charts(aggregates: &ReportAggregates, top_n: usize) -> Vec<(&'static str, ChartSpec)> {
    vec![
        (
            MONTHLY_SALES_CHART,
            ChartSpec {
                kind: ChartKind::Line,
                title: "Monthly Revenue Trend".to_string(),
                x_desc: "Month".to_string(),
                y_desc: "Revenue".to_string(),
                points: aggregates
                    .monthly_revenue
                    .iter()
                    .map(|g| (g.key.clone(), g.total))
                    .collect(),
            },
        ),
        (
            TOP_CATEGORIES_CHART,
            ChartSpec {
                kind: ChartKind::HorizontalBar,
                title: format!("Top {} Categories by Revenue", top_n),
                x_desc: "Revenue".to_string(),
                y_desc: "Category".to_string(),
                points: aggregates
                    .top_categories
                    .iter()
                    .map(|g| (g.key.clone(), g.total))
                    .collect(),
            },
        ),
        (
            ORDER_STATUS_CHART,
            ChartSpec {
                kind: ChartKind::Bar,
                title: "Order Status Distribution".to_string(),
                x_desc: "Status".to_string(),
                y_desc: "Count".to_string(),
                points: aggregates
                    .status_counts
                    .iter()
                    .map(|g| (g.key.clone(), g.count as f64))
                    .collect(),
            },
        ),
    ]
}

/// Render every report chart into `charts_dir`, creating it if absent.
#[instrument(skip_all, fields(dir = %charts_dir.display()))]
pub fn render_charts(
    renderer: &dyn ChartRenderer,
    aggregates: &ReportAggregates,
    charts_dir: &Path,
    top_n: usize,
) -> Result<Vec<PathBuf>, ChartError> {
    fs::create_dir_all(charts_dir).map_err(|source| ChartError::CreateDir {
        path: charts_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for (file_name, spec) in report_charts(aggregates, top_n) {
        let path = charts_dir.join(file_name);
        renderer.render(&spec, &path)?;
        crate::metrics::chart_rendered(file_name);
        written.push(path);
    }

    info!("📈 Charts saved in {}", charts_dir.display());
    Ok(written)
}
