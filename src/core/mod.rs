//! Pure layout math: axis scaling, marker stacking, label de-collision.
//!
//! Nothing here performs I/O or keeps state between calls.

pub mod axis;
pub mod format;
pub mod icon_kind;
pub mod label_decollision;
pub mod layout;
pub mod scale;
pub mod stacking;
pub mod types;

pub use axis::{Axis, AxisScaling, AxisTick, RoundingPolicy, compute_axis, nice_ceiling};
pub use format::format_grouped_thousands;
pub use icon_kind::{IconKind, IconPolicy, classify_icon};
pub use label_decollision::{LabelDecollision, LabelSlot, place_labels};
pub use layout::{ChartLayout, PlacedLabel, PlacedMarker, Placement};
pub use scale::LinearScale;
pub use stacking::{MarkerSlot, MarkerStacking, StackingVariant, StemSegment, place_markers};
pub use types::{Record, Viewport, value_order};
