//! Validation errors for user-supplied query input

use thiserror::Error;

/// Malformed intent payloads, raised before anything reaches the network
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Filter field name is empty
    #[error("Filter field must not be empty")]
    EmptyField,

    /// Filter has a field but no value
    #[error("Filter '{0}' has no value")]
    EmptyValue(String),

    /// Filter field collides with a parameter the query builder owns
    #[error("'{0}' is a reserved query field and cannot be used as a filter")]
    ReservedField(String),

    /// Filter token is not of the form `FIELD=VALUE`
    #[error("Invalid filter '{0}': expected FIELD=VALUE")]
    Malformed(String),
}
