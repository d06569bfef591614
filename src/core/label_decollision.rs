use serde::{Deserialize, Serialize};

use crate::core::types::{Record, value_order};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDecollision {
    /// Closeness threshold as a fraction of the axis width.
    pub near_pct: f64,
    /// Label offsets above the marker, cycled inside a cluster.
    pub levels: Vec<f64>,
}

impl Default for LabelDecollision {
    fn default() -> Self {
        Self {
            near_pct: 0.03,
            levels: vec![0.35, 0.60, 0.85],
        }
    }
}

impl LabelDecollision {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.near_pct.is_finite() || self.near_pct < 0.0 {
            return Err(ChartError::InvalidConfig(
                "`nearPct` must be finite and >= 0".to_owned(),
            ));
        }
        if self.levels.is_empty() {
            return Err(ChartError::InvalidConfig(
                "`labelLevels` must not be empty".to_owned(),
            ));
        }
        if self
            .levels
            .iter()
            .any(|level| !level.is_finite() || *level <= 0.0)
        {
            return Err(ChartError::InvalidConfig(
                "`labelLevels` entries must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Absolute value distance under which two neighbours share a cluster.
    #[must_use]
    pub fn threshold(&self, axis_max: u64) -> f64 {
        axis_max as f64 * self.near_pct
    }
}

/// Label placement for one record, index-aligned with the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelSlot {
    pub level: usize,
    pub offset: f64,
    pub y: f64,
    /// Cluster ordinal along the value-sorted walk.
    pub cluster: usize,
}

/// Staggers name labels of records whose values are close.
///
/// Single greedy pass over records sorted by value (stable). A record opens a
/// new cluster at level 0 when it is first or its gap to the previous record
/// exceeds the threshold; otherwise it takes the next level, wrapping around.
/// Records with exactly the previous value keep its level because their
/// markers are already stacked apart. More than `levels.len()` records inside
/// one window reuse levels.
pub fn place_labels(
    records: &[Record],
    axis_max: u64,
    marker_ys: &[f64],
    config: &LabelDecollision,
) -> ChartResult<Vec<LabelSlot>> {
    if marker_ys.len() != records.len() {
        return Err(ChartError::LayoutInvariant(format!(
            "label placement got {} marker offsets for {} records",
            marker_ys.len(),
            records.len()
        )));
    }
    if config.levels.is_empty() {
        return Err(ChartError::LayoutInvariant(
            "label placement requires at least one level".to_owned(),
        ));
    }

    let threshold = config.threshold(axis_max);
    let mut slots = vec![
        LabelSlot {
            level: 0,
            offset: config.levels[0],
            y: 0.0,
            cluster: 0,
        };
        records.len()
    ];

    let mut previous: Option<(u64, usize)> = None;
    let mut cluster = 0;
    for index in value_order(records) {
        let value = records[index].value();
        let level = match previous {
            None => 0,
            Some((previous_value, previous_level)) if previous_value == value => previous_level,
            Some((previous_value, _)) if (value - previous_value) as f64 > threshold => {
                cluster += 1;
                0
            }
            Some((_, previous_level)) => (previous_level + 1) % config.levels.len(),
        };

        let offset = config.levels[level];
        slots[index] = LabelSlot {
            level,
            offset,
            y: marker_ys[index] + offset,
            cluster,
        };
        previous = Some((value, level));
    }

    Ok(slots)
}
