// Infrastructure adapters implementing the application ports

pub mod plotters_chart_adapter;

pub use plotters_chart_adapter::PlottersSvgRenderer;
