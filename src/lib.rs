//! race-chart: deterministic layout engine for horizontal "race" charts.
//!
//! Records (name, value, optional icon) are placed along a value axis.
//! Markers sharing a value are stacked, and labels of close values are
//! staggered across a small fixed set of heights. Layout is a pure function
//! of the input order; icon fetching and drawing sit behind separate seams.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod ingest;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, LayoutEngine, RaceChart, RenderOutcome};
pub use error::{ChartError, ChartResult};
