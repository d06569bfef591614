use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// No renderable records survived normalization.
    ///
    /// Callers surface this as a "nothing to render" state, not a failure.
    #[error("dataset has no renderable records")]
    EmptyDataset,

    #[error("icon `{reference}` could not be resolved: {reason}")]
    IconResolution { reference: String, reason: String },

    /// Contract violation inside the layout engine. Not recoverable.
    #[error("layout invariant violated: {0}")]
    LayoutInvariant(String),

    #[error("dataset source error: {0}")]
    Source(String),
}

impl ChartError {
    #[must_use]
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, Self::EmptyDataset)
    }
}
