//! Record normalization from tabular sources.

mod loader;
mod normalizer;

pub use loader::{CachedDatasetLoader, DatasetSource, FileDatasetSource};
pub use normalizer::{DropReason, DroppedRow, NormalizedDataset, normalize_csv, parse_value};
