use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::error;

use sales_report::app::ChartRenderer;
use sales_report::config::{ConfigOverrides, ReportConfig};
use sales_report::constants;
use sales_report::infra::PlottersSvgRenderer;
use sales_report::logging;
use sales_report::types::Value;
use sales_report::{Pipeline, PipelineResult};

#[derive(Parser)]
#[command(name = "sales_report")]
#[command(about = "Cleans a sales export, reports KPIs and renders charts")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML config file. The default location is only read if it exists
    #[arg(long)]
    config: Option<PathBuf>,
    /// Delimited sales export to read
    #[arg(long)]
    input: Option<PathBuf>,
    /// Where to write the cleaned export
    #[arg(long)]
    output: Option<PathBuf>,
    /// Directory for the chart images
    #[arg(long)]
    charts_dir: Option<PathBuf>,
    /// Also write the KPI bundle as JSON
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Field delimiter for input and output
    #[arg(long)]
    delimiter: Option<char>,
    /// Number of categories in the top-categories summary
    #[arg(long)]
    top_n: Option<usize>,
    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,
}

impl Cli {
    fn into_config(self) -> sales_report::error::Result<ReportConfig> {
        let config = match &self.config {
            Some(path) => ReportConfig::load(path)?,
            None => ReportConfig::load_or_default(&PathBuf::from(constants::DEFAULT_CONFIG_PATH))?,
        };
        config.apply_overrides(ConfigOverrides {
            input_path: self.input,
            output_path: self.output,
            charts_dir: self.charts_dir,
            summary_path: self.summary,
            delimiter: self.delimiter,
            top_n: self.top_n,
            no_charts: self.no_charts,
        })
    }
}

fn print_report(result: &PipelineResult) {
    let agg = &result.aggregates;
    println!("\n✅ Dataset loaded: {} rows", result.loaded_rows);
    println!(
        "🧹 Cleaning: {} cancelled, {} incomplete removed, {} retained",
        result.cleaning.cancelled_removed, result.cleaning.incomplete_removed, result.cleaning.retained
    );

    println!("\n📊 Key Metrics");
    println!("🧾 Total Orders   : {}", agg.total_orders);
    println!("💰 Total Revenue  : ₹{:.2}", agg.total_revenue);
    println!("📦 Total Quantity : {}", Value::Number(agg.total_quantity));

    if !result.charts.is_empty() {
        println!("\n📈 Charts:");
        for chart in &result.charts {
            println!("   - {}", chart.display());
        }
    }
    println!("\n💾 Cleaned dataset saved: {}", result.output_file.display());
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.into_config().context("invalid configuration")?;

    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = logging::init_logging(&config.log_dir);

    println!("{}", "=".repeat(60));
    println!("📦 SALES PERFORMANCE ANALYSIS");
    println!("{}", "=".repeat(60));

    let renderer = PlottersSvgRenderer::default();
    let renderer: &dyn ChartRenderer = &renderer;
    let result = match Pipeline::run(&config, Some(renderer)) {
        Ok(result) => result,
        Err(e) => {
            error!("Report run failed: {}", e);
            println!("❌ Report run failed: {}", e);
            return Err(e).context("report run failed");
        }
    };

    print_report(&result);
    println!("\n🎉 ANALYSIS COMPLETED SUCCESSFULLY");
    println!("{}", "=".repeat(60));
    Ok(())
}
