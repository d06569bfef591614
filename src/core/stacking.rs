use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::types::Record;
use crate::error::{ChartError, ChartResult};

/// How markers sharing an identical value are spread vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum StackingVariant {
    /// Centers the stack on the baseline.
    #[default]
    Symmetric,
    /// Grows upward from the baseline.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStacking {
    pub variant: StackingVariant,
    pub baseline: f64,
    pub step: f64,
    /// Stem start, just above the axis line.
    pub stem_base: f64,
    /// Gap left between the stem top and the marker center.
    pub stem_gap: f64,
}

impl Default for MarkerStacking {
    fn default() -> Self {
        Self {
            variant: StackingVariant::Symmetric,
            baseline: 0.55,
            step: 0.35,
            stem_base: 0.02,
            stem_gap: 0.02,
        }
    }
}

impl MarkerStacking {
    pub fn validate(&self) -> ChartResult<()> {
        for (value, name) in [
            (self.baseline, "stackBaseline"),
            (self.step, "stackStep"),
            (self.stem_gap, "stemGap"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "`{name}` must be finite and > 0"
                )));
            }
        }
        if !self.stem_base.is_finite() || self.stem_base < 0.0 {
            return Err(ChartError::InvalidConfig(
                "`stemBase` must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Vertical stem anchoring a marker to the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StemSegment {
    pub y_start: f64,
    pub y_end: f64,
}

/// Marker offset for one record, index-aligned with the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerSlot {
    pub y: f64,
    /// Position inside the same-value group, in input order.
    pub stack_index: usize,
    pub stack_size: usize,
    pub stem: StemSegment,
}

/// Assigns marker offsets so records with equal values never overlap.
///
/// Records are grouped by exact value; members keep their input order.
/// Singleton groups sit exactly on the baseline.
#[must_use]
pub fn place_markers(records: &[Record], stacking: &MarkerStacking) -> Vec<MarkerSlot> {
    let mut groups: IndexMap<u64, SmallVec<[usize; 4]>> = IndexMap::new();
    for (index, record) in records.iter().enumerate() {
        groups.entry(record.value()).or_default().push(index);
    }

    let mut slots = vec![
        MarkerSlot {
            y: stacking.baseline,
            stack_index: 0,
            stack_size: 1,
            stem: stem_for(stacking.baseline, stacking),
        };
        records.len()
    ];

    for members in groups.values() {
        let size = members.len();
        let start = match stacking.variant {
            StackingVariant::Symmetric => {
                stacking.baseline - (size - 1) as f64 * stacking.step / 2.0
            }
            StackingVariant::Append => stacking.baseline,
        };

        for (stack_index, &record_index) in members.iter().enumerate() {
            let y = start + stack_index as f64 * stacking.step;
            slots[record_index] = MarkerSlot {
                y,
                stack_index,
                stack_size: size,
                stem: stem_for(y, stacking),
            };
        }
    }

    slots
}

fn stem_for(y: f64, stacking: &MarkerStacking) -> StemSegment {
    StemSegment {
        y_start: stacking.stem_base,
        y_end: (y - stacking.stem_gap).max(stacking.stem_base),
    }
}
