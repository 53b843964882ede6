//! Error types for conjecture checking.
//!
//! Every failure the engine can run into is fatal for the search that hit it:
//! there is no retry and no partial outcome. The variants below therefore
//! describe *why* a search stopped, so callers can tell a short candidate
//! source apart from a faulty predicate or weight function.
//!
//! ```rust,ignore
//! match find_counterexample(n, is_even, 0u64.., false) {
//!     Ok(outcome) => println!("{:?}", outcome),
//!     Err(SearchError::StreamExhausted { requested, available }) => // Source too short,
//!     Err(e) => // Faulty predicate or weight function,
//! }
//! ```
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while checking a conjecture
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Candidate stream exhausted: {requested} checks requested, only {available} candidates available")]
    StreamExhausted { requested: u64, available: u64 },
    #[error("Predicate evaluation failed: {0}")]
    PredicateFailure(String),
    #[error("Weight evaluation failed: {0}")]
    WeightFailure(String),
    #[error("Incomparable weight: {0}")]
    IncomparableWeight(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl SearchError {
    pub fn stream_exhausted(requested: u64, available: u64) -> Self {
        Self::StreamExhausted {
            requested,
            available,
        }
    }

    pub fn predicate_failure(msg: impl Into<String>) -> Self {
        Self::PredicateFailure(msg.into())
    }

    pub fn weight_failure(msg: impl Into<String>) -> Self {
        Self::WeightFailure(msg.into())
    }

    pub fn incomparable_weight(msg: impl Into<String>) -> Self {
        Self::IncomparableWeight(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the error was raised by user code (predicate or weight) rather
    /// than by the candidate source or the surrounding configuration.
    pub fn is_evaluation_failure(&self) -> bool {
        matches!(
            self,
            Self::PredicateFailure(_) | Self::WeightFailure(_) | Self::IncomparableWeight(_)
        )
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
