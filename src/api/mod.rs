//! Public configuration and orchestration layer.

mod config;
mod frame_builder;
mod layout_engine;
mod race_chart;

pub use config::ChartConfig;
pub use frame_builder::{FrameStyle, build_render_frame};
pub use layout_engine::{LayoutEngine, compute_layout};
pub use race_chart::{RaceChart, RenderOutcome};
