// Report pipeline: load → clean → derive → aggregate → visualize → export

pub mod ingestion;
pub mod processing;
pub mod storage;
pub mod visualize;

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::app::ports::ChartRenderer;
use crate::config::ReportConfig;
use crate::constants;
use crate::error::Result;
use crate::metrics::StageTimer;
use crate::types::RecordTable;
use processing::aggregate::{self, ReportAggregates};
use processing::coerce::{self, CoercionReport};
use processing::quality_gate::{CleaningReport, QualityGate};
use processing::{enrich, normalize};

/// The cleaned, feature-bearing table together with what each stage did
#[derive(Debug, Clone)]
pub struct ProcessedTable {
    pub table: RecordTable,
    pub coercion: CoercionReport,
    pub cleaning: CleaningReport,
}

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub loaded_rows: usize,
    pub coercion: CoercionReport,
    pub cleaning: CleaningReport,
    pub aggregates: ReportAggregates,
    pub output_file: PathBuf,
    pub charts: Vec<PathBuf>,
}

pub struct Pipeline;

impl Pipeline {
    /// Normalize, type, filter and enrich a freshly loaded table.
    pub fn process(raw: RecordTable, gate: &QualityGate) -> Result<ProcessedTable> {
        let table = {
            let _timer = StageTimer::start("normalize");
            normalize::normalize(raw)
        };
        normalize::reject_duplicate_columns(&table)?;
        normalize::require_columns(&table, &constants::required_columns())?;

        let (table, coercion) = {
            let _timer = StageTimer::start("coerce");
            coerce::coerce(table)
        };
        let (table, cleaning) = {
            let _timer = StageTimer::start("quality_gate");
            gate.apply(table)
        };
        let table = {
            let _timer = StageTimer::start("enrich");
            enrich::derive_features(table)
        };

        Ok(ProcessedTable {
            table,
            coercion,
            cleaning,
        })
    }

    /// Run every stage for one input file.
    ///
    /// Charts are rendered before the export, so an export failure leaves
    /// already written charts in place.
    #[instrument(skip_all, fields(input = %config.input_path.display()))]
    pub fn run(config: &ReportConfig, renderer: Option<&dyn ChartRenderer>) -> Result<PipelineResult> {
        config.validate()?;
        let delimiter = config.delimiter_byte()?;

        info!("📂 Loading dataset...");
        let raw = {
            let _timer = StageTimer::start("load");
            ingestion::load_table(&config.input_path, delimiter)?
        };
        let loaded_rows = raw.len();

        let processed = Self::process(raw, &QualityGate::new())?;

        let aggregates = {
            let _timer = StageTimer::start("aggregate");
            aggregate::aggregate(&processed.table, config.top_n)
        };

        let charts = match renderer {
            Some(renderer) if config.render_charts => {
                info!("📈 Creating visualizations...");
                let _timer = StageTimer::start("visualize");
                visualize::render_charts(renderer, &aggregates, &config.charts_dir, config.top_n)?
            }
            _ => Vec::new(),
        };

        {
            let _timer = StageTimer::start("export");
            storage::export_table(&processed.table, &config.output_path, delimiter)?;
        }
        if let Some(summary_path) = &config.summary_path {
            storage::write_summary(&aggregates, summary_path)?;
        }

        Ok(PipelineResult {
            loaded_rows,
            coercion: processed.coercion,
            cleaning: processed.cleaning,
            aggregates,
            output_file: config.output_path.clone(),
            charts,
        })
    }
}
