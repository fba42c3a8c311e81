pub mod config;
pub mod education;
pub mod experience;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod ranker;
pub mod recommendations;
pub mod requirements;
pub mod scoring;
pub mod similarity;
pub mod skills;
pub mod summary;
pub mod taxonomy;
pub mod weights;

use thiserror::Error;

/// Failures of the matching engine.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The requirement text is unusable; the run cannot proceed.
    #[error("invalid input: {0}")]
    Input(String),

    /// One candidate could not be processed; the rest of the run continues.
    #[error("candidate '{identifier}' skipped: {reason}")]
    ExtractionFailure { identifier: String, reason: String },

    #[error("similarity model could not be fitted: {0}")]
    ModelDegenerate(String),

    #[error("invalid matching configuration: {0}")]
    InvalidConfig(String),
}

impl MatchError {
    pub fn extraction(identifier: &str, reason: impl Into<String>) -> Self {
        Self::ExtractionFailure {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}
