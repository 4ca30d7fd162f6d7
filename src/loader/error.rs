//! Loader error types.

use crate::loader::validation::DescriptionViolation;
use thiserror::Error;

/// Errors that can occur while loading a description.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The description could not be parsed
    #[error("Description could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    /// The description broke one or more rules and the loader rejects violations
    #[error("Description rejected with {} violation(s)", .0.len())]
    Rejected(Vec<DescriptionViolation>),
}
