// Pipeline processing: normalization, typing, validation, derivation and aggregation

pub mod normalize;
pub mod coerce;
pub mod quality_gate;
pub mod enrich;
pub mod aggregate;
