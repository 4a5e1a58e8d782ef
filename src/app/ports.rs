use std::path::Path;

use crate::error::ChartError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    HorizontalBar,
}

/// What to draw: a labeled numeric series plus its presentation
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub points: Vec<(String, f64)>,
}

/// Rendering collaborator: turns a chart spec into an image file at `path`.
pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec, path: &Path) -> Result<(), ChartError>;
}
