//! UI error types

use crate::query::ValidationError;
use thiserror::Error;

/// Errors raised while turning a typed line into an intent
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// `:` command that does not exist
    #[error("Unknown command ':{0}' (try :help)")]
    UnknownCommand(String),

    /// Command needs an argument that was not given
    #[error("Usage: {0}")]
    MissingArgument(&'static str),

    /// Filter token or value rejected
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Result type for UI operations
pub type Result<T> = std::result::Result<T, InputError>;
