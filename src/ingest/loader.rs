use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::error::{ChartError, ChartResult};

use super::{NormalizedDataset, normalize_csv};

/// Supplier of raw CSV text, e.g. a published spreadsheet or a local file.
pub trait DatasetSource {
    fn fetch_csv(&self) -> ChartResult<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDatasetSource {
    path: PathBuf,
}

impl FileDatasetSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for FileDatasetSource {
    fn fetch_csv(&self) -> ChartResult<String> {
        std::fs::read_to_string(&self.path).map_err(|err| {
            ChartError::Source(format!("failed to read `{}`: {err}", self.path.display()))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CachedDataset {
    fetched_at: DateTime<Utc>,
    dataset: NormalizedDataset,
}

/// Memoizes a normalized dataset for a freshness window.
#[derive(Debug)]
pub struct CachedDatasetLoader<S: DatasetSource> {
    source: S,
    ttl: TimeDelta,
    cached: Option<CachedDataset>,
}

impl<S: DatasetSource> CachedDatasetLoader<S> {
    #[must_use]
    pub fn new(source: S, ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            source,
            ttl,
            cached: None,
        }
    }

    pub fn load(&mut self) -> ChartResult<&NormalizedDataset> {
        self.load_at(Utc::now())
    }

    /// Returns the cached dataset when fresh at `now`, refetching otherwise.
    pub fn load_at(&mut self, now: DateTime<Utc>) -> ChartResult<&NormalizedDataset> {
        if !self.is_fresh_at(now) {
            let text = self.source.fetch_csv()?;
            let dataset = normalize_csv(text.as_bytes())?;
            debug!(records = dataset.records.len(), "refreshed dataset cache");
            let cached = self.cached.insert(CachedDataset {
                fetched_at: now,
                dataset,
            });
            return Ok(&cached.dataset);
        }

        self.cached
            .as_ref()
            .map(|cached| &cached.dataset)
            .ok_or_else(|| ChartError::Source("dataset cache is empty".to_owned()))
    }

    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|cached| now.signed_duration_since(cached.fetched_at) < self.ttl)
    }

    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.cached.as_ref().map(|cached| cached.fetched_at)
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
