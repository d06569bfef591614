use serde::{Deserialize, Serialize};

use crate::core::axis::Axis;
use crate::core::icon_kind::IconKind;
use crate::core::stacking::StemSegment;
use crate::core::types::Record;
use crate::error::{ChartError, ChartResult};

/// Marker position. `x` is always the record value, never adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedMarker {
    pub x: u64,
    pub y: f64,
    pub stack_index: usize,
    pub stack_size: usize,
    pub stem: StemSegment,
}

/// Name label position, strictly above its marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedLabel {
    pub x: u64,
    pub y: f64,
    pub level: usize,
    /// Distance above the marker.
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Position of the record in the caller's input.
    pub input_index: usize,
    pub record: Record,
    pub icon: IconKind,
    pub marker: PlacedMarker,
    pub label: PlacedLabel,
}

/// Complete, renderer-agnostic layout of one chart.
///
/// Placements are ordered by value ascending, ties in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub axis: Axis,
    pub placements: Vec<Placement>,
    pub cluster_count: usize,
}

impl ChartLayout {
    /// Highest label offset in layout units, or `0.0` for an empty layout.
    #[must_use]
    pub fn top_label_y(&self) -> f64 {
        self.placements
            .iter()
            .map(|placement| placement.label.y)
            .fold(0.0, f64::max)
    }

    /// Lowest marker offset in layout units, or `0.0` for an empty layout.
    #[must_use]
    pub fn bottom_marker_y(&self) -> f64 {
        self.placements
            .iter()
            .map(|placement| placement.marker.y)
            .fold(0.0, f64::min)
    }

    #[must_use]
    pub fn placement_for_input(&self, input_index: usize) -> Option<&Placement> {
        self.placements
            .iter()
            .find(|placement| placement.input_index == input_index)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize layout: {e}")))
    }
}
