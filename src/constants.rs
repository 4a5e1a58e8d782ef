/// Column name constants to ensure consistency across the pipeline stages.
/// These are the names after column normalization.

pub const ORDER_ID: &str = "order_id";
pub const DATE: &str = "date";
pub const STATUS: &str = "status";
pub const AMOUNT: &str = "amount";
pub const QTY: &str = "qty";
pub const CATEGORY: &str = "category";

// Derived by the enrich stage
pub const MONTH: &str = "month";
pub const YEAR: &str = "year";
pub const REVENUE: &str = "revenue";

/// Header of the auto-generated row index column written by spreadsheet exports
pub const ROW_INDEX_COLUMN: &str = "index";

/// Status value marking an order that never shipped
pub const CANCELLED_STATUS: &str = "Cancelled";

pub const DEFAULT_TOP_N: usize = 10;

// Default locations, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_INPUT_PATH: &str = "data/Amazon Sale Report.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "outputs/cleaned_amazon_sales.csv";
pub const DEFAULT_CHARTS_DIR: &str = "outputs/charts";
pub const DEFAULT_LOG_DIR: &str = "logs";

// Chart artifact file names
pub const MONTHLY_SALES_CHART: &str = "monthly_sales.svg";
pub const TOP_CATEGORIES_CHART: &str = "top_categories.svg";
pub const ORDER_STATUS_CHART: &str = "order_status.svg";

/// Columns the pipeline cannot run without
pub fn required_columns() -> Vec<&'static str> {
    vec![ORDER_ID, DATE, STATUS, AMOUNT, QTY, CATEGORY]
}
