//! Error types of the classification pipeline.
//!
//! Only [GrapeError::Data] and [GrapeError::Configuration] (and I/O or
//! parsing failures of the outer layers) abort a run. Everything else is
//! recovered from and reported as a [Warning](crate::diagnostics::Warning).

use crate::io::ParsingError;
use crate::model::PartitionError;
use thiserror::Error;

/// Fatal errors.
#[derive(Debug, Error)]
pub enum GrapeError {
    /// Input data cannot be classified, e.g. fewer than two languages.
    #[error("data error: {0}")]
    Data(String),
    /// Invalid or unsupported configuration, detected before any computation.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Parsing(#[from] ParsingError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A community oracle returned something that is not a partition of the
/// graph's vertices. Affects only the step at `resolution`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("community oracle '{oracle}' failed at resolution {resolution}: {source}")]
pub struct CommunityOracleFailure {
    pub oracle: String,
    pub resolution: f64,
    #[source]
    pub source: PartitionError,
}
