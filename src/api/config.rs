use serde::{Deserialize, Serialize};

use crate::core::{
    AxisScaling, IconPolicy, LabelDecollision, MarkerStacking, RoundingPolicy, StackingVariant,
};
use crate::error::{ChartError, ChartResult};
#[cfg(feature = "http-icons")]
use crate::extensions::HttpIconFetcher;
use crate::extensions::{IconFetcher, IconResolver};
use crate::ingest::{CachedDatasetLoader, DatasetSource};

/// Public chart configuration.
///
/// Serialized with camelCase keys; every field has a default so partial JSON
/// documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    #[serde(default)]
    pub rounding_policy: RoundingPolicy,
    #[serde(default = "default_min_axis_max")]
    pub min_axis_max: u64,
    #[serde(default = "default_target_tick_count")]
    pub target_tick_count: u64,
    #[serde(default)]
    pub stacking_variant: StackingVariant,
    #[serde(default = "default_stack_baseline")]
    pub stack_baseline: f64,
    #[serde(default = "default_stack_step")]
    pub stack_step: f64,
    #[serde(default = "default_stem_base")]
    pub stem_base: f64,
    #[serde(default = "default_stem_gap")]
    pub stem_gap: f64,
    #[serde(default = "default_near_pct")]
    pub near_pct: f64,
    #[serde(default = "default_label_levels")]
    pub label_levels: Vec<f64>,
    #[serde(default = "default_icon_pixel_size")]
    pub icon_pixel_size: u32,
    #[serde(default = "default_icon_fetch_timeout_ms")]
    pub icon_fetch_timeout_ms: u64,
    #[serde(default = "default_raster_extensions")]
    pub raster_extensions: Vec<String>,
    #[serde(default = "default_dataset_ttl_secs")]
    pub dataset_ttl_secs: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            scale_factor: default_scale_factor(),
            rounding_policy: RoundingPolicy::default(),
            min_axis_max: default_min_axis_max(),
            target_tick_count: default_target_tick_count(),
            stacking_variant: StackingVariant::default(),
            stack_baseline: default_stack_baseline(),
            stack_step: default_stack_step(),
            stem_base: default_stem_base(),
            stem_gap: default_stem_gap(),
            near_pct: default_near_pct(),
            label_levels: default_label_levels(),
            icon_pixel_size: default_icon_pixel_size(),
            icon_fetch_timeout_ms: default_icon_fetch_timeout_ms(),
            raster_extensions: default_raster_extensions(),
            dataset_ttl_secs: default_dataset_ttl_secs(),
        }
    }
}

impl ChartConfig {
    /// Sets the leader multiplier used for the axis bound.
    #[must_use]
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    #[must_use]
    pub fn with_rounding_policy(mut self, policy: RoundingPolicy) -> Self {
        self.rounding_policy = policy;
        self
    }

    #[must_use]
    pub fn with_min_axis_max(mut self, min_axis_max: u64) -> Self {
        self.min_axis_max = min_axis_max;
        self
    }

    #[must_use]
    pub fn with_target_tick_count(mut self, target_tick_count: u64) -> Self {
        self.target_tick_count = target_tick_count;
        self
    }

    #[must_use]
    pub fn with_stacking_variant(mut self, variant: StackingVariant) -> Self {
        self.stacking_variant = variant;
        self
    }

    /// Sets same-value marker stacking baseline and step.
    #[must_use]
    pub fn with_stacking(mut self, baseline: f64, step: f64) -> Self {
        self.stack_baseline = baseline;
        self.stack_step = step;
        self
    }

    #[must_use]
    pub fn with_near_pct(mut self, near_pct: f64) -> Self {
        self.near_pct = near_pct;
        self
    }

    #[must_use]
    pub fn with_label_levels(mut self, levels: Vec<f64>) -> Self {
        self.label_levels = levels;
        self
    }

    #[must_use]
    pub fn with_icon_pixel_size(mut self, icon_pixel_size: u32) -> Self {
        self.icon_pixel_size = icon_pixel_size;
        self
    }

    #[must_use]
    pub fn with_icon_fetch_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.icon_fetch_timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn with_dataset_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.dataset_ttl_secs = ttl_secs;
        self
    }

    #[must_use]
    pub fn axis_scaling(&self) -> AxisScaling {
        AxisScaling {
            scale_factor: self.scale_factor,
            rounding_policy: self.rounding_policy,
            min_axis_max: self.min_axis_max,
            target_tick_count: self.target_tick_count,
        }
    }

    #[must_use]
    pub fn marker_stacking(&self) -> MarkerStacking {
        MarkerStacking {
            variant: self.stacking_variant,
            baseline: self.stack_baseline,
            step: self.stack_step,
            stem_base: self.stem_base,
            stem_gap: self.stem_gap,
        }
    }

    #[must_use]
    pub fn label_decollision(&self) -> LabelDecollision {
        LabelDecollision {
            near_pct: self.near_pct,
            levels: self.label_levels.clone(),
        }
    }

    #[must_use]
    pub fn icon_policy(&self) -> IconPolicy {
        IconPolicy {
            raster_extensions: self.raster_extensions.clone(),
        }
    }

    /// Builds a memoizing icon resolver sized by `iconPixelSize`.
    pub fn icon_resolver<F: IconFetcher>(&self, fetcher: F) -> ChartResult<IconResolver<F>> {
        IconResolver::new(fetcher, self.icon_policy(), self.icon_pixel_size)
    }

    /// Builds an HTTP icon fetcher bounded by `iconFetchTimeoutMs`.
    #[cfg(feature = "http-icons")]
    pub fn http_icon_fetcher(&self) -> ChartResult<HttpIconFetcher> {
        HttpIconFetcher::new(std::time::Duration::from_millis(self.icon_fetch_timeout_ms))
    }

    /// Wraps a source in a loader cached for `datasetTtlSecs`.
    #[must_use]
    pub fn dataset_loader<S: DatasetSource>(&self, source: S) -> CachedDatasetLoader<S> {
        CachedDatasetLoader::new(source, self.dataset_ttl_secs)
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.axis_scaling().validate()?;
        self.marker_stacking().validate()?;
        self.label_decollision().validate()?;
        self.icon_policy().validate()?;
        if self.icon_pixel_size == 0 {
            return Err(ChartError::InvalidConfig(
                "`iconPixelSize` must be > 0".to_owned(),
            ));
        }
        if self.icon_fetch_timeout_ms == 0 {
            return Err(ChartError::InvalidConfig(
                "`iconFetchTimeoutMs` must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON for config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_scale_factor() -> f64 {
    AxisScaling::default().scale_factor
}

fn default_min_axis_max() -> u64 {
    AxisScaling::default().min_axis_max
}

fn default_target_tick_count() -> u64 {
    AxisScaling::default().target_tick_count
}

fn default_stack_baseline() -> f64 {
    MarkerStacking::default().baseline
}

fn default_stack_step() -> f64 {
    MarkerStacking::default().step
}

fn default_stem_base() -> f64 {
    MarkerStacking::default().stem_base
}

fn default_stem_gap() -> f64 {
    MarkerStacking::default().stem_gap
}

fn default_near_pct() -> f64 {
    LabelDecollision::default().near_pct
}

fn default_label_levels() -> Vec<f64> {
    LabelDecollision::default().levels
}

fn default_icon_pixel_size() -> u32 {
    48
}

fn default_icon_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_raster_extensions() -> Vec<String> {
    IconPolicy::default().raster_extensions
}

fn default_dataset_ttl_secs() -> u64 {
    60
}
