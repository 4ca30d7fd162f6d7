//! Build errors for the state machine builder.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(name) before .build()")]
    MissingInitialState,

    #[error("Initial state '{0}' was not added. Add it with .state(..)")]
    UnknownInitialState(String),

    #[error("State '{0}' was added more than once")]
    DuplicateState(String),
}
