use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required features: {}", .0.join(", "))]
    MissingFeature(Vec<String>),

    #[error("Field '{column}' must be numeric, got {value}")]
    InvalidType { column: String, value: String },

    #[error("Invalid value for '{column}': {value}. Allowed values: {allowed:?}")]
    InvalidCategory {
        column: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("top_k must be a positive integer, got {0}")]
    InvalidTopK(i64),

    #[error("Invalid row width: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Unknown code {code} for column '{column}'")]
    UnknownCode { column: String, code: usize },

    #[error("Catalog has no row {0}")]
    MissingCatalogRow(usize),

    #[error(transparent)]
    ArtifactLoad(#[from] ArtifactLoadError),

    #[error("Prediction failed: {0}")]
    Prediction(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Errors caused by the request itself, reportable back to the caller.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingFeature(_)
                | Error::InvalidType { .. }
                | Error::InvalidCategory { .. }
                | Error::InvalidTopK(_)
        )
    }

    /// Wrap an internal failure, keeping validation errors as they are.
    pub fn into_prediction(self) -> Self {
        match self {
            e if e.is_validation() => e,
            e @ Error::Prediction(_) => e,
            e => Error::Prediction(Box::new(e)),
        }
    }
}

/// A pre-trained artifact could not be loaded. Fatal for the process.
///
/// Cloneable so a failed one-time initialization can be reported to every
/// caller that observes it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to load artifact '{artifact}': {reason}")]
pub struct ArtifactLoadError {
    pub artifact: String,
    pub reason: String,
}

impl ArtifactLoadError {
    pub fn new(artifact: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }
}
