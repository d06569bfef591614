use serde::{Deserialize, Serialize};

use crate::core::format::format_grouped_thousands;
use crate::core::types::Record;
use crate::error::{ChartError, ChartResult};

const NICE_MULTIPLIERS: [u64; 3] = [1, 2, 5];

/// How the scaled leader value is turned into the axis upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum RoundingPolicy {
    /// Keep the scaled value as-is; ticks use an integer step of `max / target`.
    Exact,
    /// Snap upward to `{1, 2, 5} x 10^k`; ticks use a step from the same family.
    #[default]
    NiceCeiling,
}

/// Axis scaling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisScaling {
    pub scale_factor: f64,
    pub rounding_policy: RoundingPolicy,
    pub min_axis_max: u64,
    pub target_tick_count: u64,
}

impl Default for AxisScaling {
    fn default() -> Self {
        Self {
            scale_factor: 1.5,
            rounding_policy: RoundingPolicy::NiceCeiling,
            min_axis_max: 10,
            target_tick_count: 10,
        }
    }
}

impl AxisScaling {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.scale_factor.is_finite() || self.scale_factor < 1.0 {
            return Err(ChartError::InvalidConfig(
                "`scaleFactor` must be finite and >= 1".to_owned(),
            ));
        }
        if self.min_axis_max == 0 {
            return Err(ChartError::InvalidConfig(
                "`minAxisMax` must be > 0".to_owned(),
            ));
        }
        if self.target_tick_count == 0 {
            return Err(ChartError::InvalidConfig(
                "`targetTickCount` must be > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: u64,
    pub label: String,
}

impl AxisTick {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self {
            value,
            label: format_grouped_thousands(value),
        }
    }
}

/// Horizontal value axis. Always starts at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub max: u64,
    pub ticks: Vec<AxisTick>,
}

impl Axis {
    #[must_use]
    pub fn tick_values(&self) -> Vec<u64> {
        self.ticks.iter().map(|tick| tick.value).collect()
    }
}

/// Computes the axis bound and ticks for a non-empty record set.
///
/// Guarantees `max >= max(value)`, `max >= min_axis_max`, and ticks that
/// start at zero, strictly increase, and never pass `max`.
pub fn compute_axis(records: &[Record], scaling: &AxisScaling) -> ChartResult<Axis> {
    let winner = records
        .iter()
        .map(Record::value)
        .max()
        .ok_or(ChartError::EmptyDataset)?;

    // f64 loses integer precision above 2^53; never drop below the leader.
    let raw = scaled_ceiling(winner, scaling.scale_factor)?.max(winner);
    let floored = raw.max(scaling.min_axis_max);
    let (max, step) = match scaling.rounding_policy {
        RoundingPolicy::Exact => (floored, exact_tick_step(floored, scaling.target_tick_count)),
        RoundingPolicy::NiceCeiling => {
            let max = nice_ceiling(floored).ok_or_else(|| {
                ChartError::LayoutInvariant(format!("no nice ceiling for axis bound {floored}"))
            })?;
            (max, nice_tick_step(max, scaling.target_tick_count)?)
        }
    };

    Ok(Axis {
        max,
        ticks: tick_values(max, step).map(AxisTick::new).collect(),
    })
}

/// `ceil(winner * factor)`, ignoring float noise just above an integer.
fn scaled_ceiling(winner: u64, factor: f64) -> ChartResult<u64> {
    let scaled = winner as f64 * factor;
    let nearest = scaled.round();
    let ceiling = if (scaled - nearest).abs() <= scaled.abs().max(1.0) * 1e-12 {
        nearest
    } else {
        scaled.ceil()
    };

    if !ceiling.is_finite() || ceiling >= u64::MAX as f64 {
        return Err(ChartError::LayoutInvariant(format!(
            "scaled axis bound for leader value {winner} does not fit the axis range"
        )));
    }
    Ok(ceiling as u64)
}

/// Smallest value of the form `{1, 2, 5} x 10^k` that is `>= value`.
///
/// Returns `None` when that value would overflow `u64`.
#[must_use]
pub fn nice_ceiling(value: u64) -> Option<u64> {
    let mut decade: u64 = 1;
    loop {
        for multiplier in NICE_MULTIPLIERS {
            let candidate = decade.checked_mul(multiplier)?;
            if candidate >= value {
                return Some(candidate);
            }
        }
        decade = decade.checked_mul(10)?;
    }
}

fn exact_tick_step(max: u64, target_tick_count: u64) -> u64 {
    (max / target_tick_count).max(1)
}

fn nice_tick_step(max: u64, target_tick_count: u64) -> ChartResult<u64> {
    nice_ceiling(max.div_ceil(target_tick_count).max(1)).ok_or_else(|| {
        ChartError::LayoutInvariant(format!("no nice tick step for axis bound {max}"))
    })
}

fn tick_values(max: u64, step: u64) -> impl Iterator<Item = u64> {
    (0..=max).step_by(usize::try_from(step).unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::{exact_tick_step, nice_ceiling, nice_tick_step, scaled_ceiling};

    #[test]
    fn nice_ceiling_snaps_to_one_two_five_family() {
        assert_eq!(nice_ceiling(0), Some(1));
        assert_eq!(nice_ceiling(1), Some(1));
        assert_eq!(nice_ceiling(3), Some(5));
        assert_eq!(nice_ceiling(10), Some(10));
        assert_eq!(nice_ceiling(11), Some(20));
        assert_eq!(nice_ceiling(75), Some(100));
        assert_eq!(nice_ceiling(150), Some(200));
        assert_eq!(nice_ceiling(201), Some(500));
        assert_eq!(nice_ceiling(u64::MAX), None);
    }

    #[test]
    fn scaled_ceiling_ignores_float_noise() {
        assert_eq!(scaled_ceiling(10, 1.1).expect("fits"), 11);
        assert_eq!(scaled_ceiling(50, 1.5).expect("fits"), 75);
        assert_eq!(scaled_ceiling(7, 1.5).expect("fits"), 11);
        assert!(scaled_ceiling(u64::MAX, 2.0).is_err());
    }

    #[test]
    fn tick_steps_follow_policy() {
        assert_eq!(exact_tick_step(75, 10), 7);
        assert_eq!(exact_tick_step(5, 10), 1);
        assert_eq!(nice_tick_step(100, 10).expect("step"), 10);
        assert_eq!(nice_tick_step(200, 10).expect("step"), 20);
        assert_eq!(nice_tick_step(5_000, 10).expect("step"), 500);
        assert_eq!(nice_tick_step(10, 10).expect("step"), 1);
    }
}
