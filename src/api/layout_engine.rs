use tracing::{debug, trace};

use crate::core::{
    AxisScaling, ChartLayout, IconPolicy, LabelDecollision, MarkerStacking, PlacedLabel,
    PlacedMarker, Placement, Record, classify_icon, compute_axis, place_labels, place_markers,
    value_order,
};
use crate::error::{ChartError, ChartResult};

use super::ChartConfig;

/// Stateless layout engine.
///
/// Holds only validated configuration, so one instance can serve any number
/// of concurrent layout calls.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEngine {
    axis: AxisScaling,
    stacking: MarkerStacking,
    labels: LabelDecollision,
    icons: IconPolicy,
}

impl LayoutEngine {
    pub fn new(config: &ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            axis: config.axis_scaling(),
            stacking: config.marker_stacking(),
            labels: config.label_decollision(),
            icons: config.icon_policy(),
        })
    }

    /// Lays out a non-empty record set.
    ///
    /// Returns `ChartError::EmptyDataset` for empty input; callers are
    /// expected to check for that before invoking the engine.
    pub fn compute(&self, records: &[Record]) -> ChartResult<ChartLayout> {
        if records.is_empty() {
            return Err(ChartError::EmptyDataset);
        }

        let axis = compute_axis(records, &self.axis)?;
        let markers = place_markers(records, &self.stacking);
        let marker_ys: Vec<f64> = markers.iter().map(|slot| slot.y).collect();
        let labels = place_labels(records, axis.max, &marker_ys, &self.labels)?;

        let mut placements = Vec::with_capacity(records.len());
        for index in value_order(records) {
            let record = &records[index];
            let marker = markers[index];
            let label = labels[index];
            if label.y <= marker.y {
                return Err(ChartError::LayoutInvariant(format!(
                    "label for `{}` is not above its marker",
                    record.name()
                )));
            }
            trace!(
                name = record.name(),
                value = record.value(),
                marker_y = marker.y,
                label_level = label.level,
                "placed record"
            );

            placements.push(Placement {
                input_index: index,
                record: record.clone(),
                icon: classify_icon(record.icon_ref(), &self.icons),
                marker: PlacedMarker {
                    x: record.value(),
                    y: marker.y,
                    stack_index: marker.stack_index,
                    stack_size: marker.stack_size,
                    stem: marker.stem,
                },
                label: PlacedLabel {
                    x: record.value(),
                    y: label.y,
                    level: label.level,
                    offset: label.offset,
                },
            });
        }

        let cluster_count = labels
            .iter()
            .map(|slot| slot.cluster)
            .max()
            .map_or(0, |last| last + 1);
        debug!(
            record_count = records.len(),
            axis_max = axis.max,
            tick_count = axis.ticks.len(),
            cluster_count,
            "computed chart layout"
        );

        Ok(ChartLayout {
            axis,
            placements,
            cluster_count,
        })
    }
}

/// One-shot layout with a throwaway engine.
pub fn compute_layout(records: &[Record], config: &ChartConfig) -> ChartResult<ChartLayout> {
    LayoutEngine::new(config)?.compute(records)
}
