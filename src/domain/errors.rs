use thiserror::Error;

/// Error surfaced to callers of the chart API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Configuration(String),
}

/// Failures of the rendering element or the table behind it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("failed to set attribute `{name}`: {reason}")]
    Attribute { name: String, reason: String },
    #[error("failed to load table into viewer: {0}")]
    Load(String),
    #[error("table update failed: {0}")]
    Update(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// A single input record that could not be read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record #{index} is malformed: {reason}")]
    Malformed { index: usize, reason: String },
    #[error("batch is not a JSON array: {0}")]
    NotABatch(String),
}

impl From<serde_json::Error> for SurfaceError {
    fn from(error: serde_json::Error) -> Self {
        SurfaceError::Serialization(error.to_string())
    }
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
