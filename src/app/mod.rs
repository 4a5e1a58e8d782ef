// Application boundary: ports implemented by infrastructure adapters

pub mod ports;

pub use ports::{ChartKind, ChartRenderer, ChartSpec};
