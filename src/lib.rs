//! Wallify - browse, search and filter a remote image catalog
//!
//! This library provides the pieces of a paginated image-browsing session:
//! a pure query builder, a gateway to the catalog's HTTP API, and a session
//! state machine that debounces typed search text and discards responses
//! from superseded fetches.

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod gateway;
pub mod output;
pub mod query;
pub mod session;
pub mod ui;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum WallifyError {
    /// Session rejected an intent or has shut down
    #[error("Session error: {0}")]
    SessionError(#[from] session::SessionError),
    /// Invalid filter or category
    #[error("Invalid query: {0}")]
    ValidationError(#[from] query::ValidationError),
    /// Catalog request failed; shown with its user-facing message
    #[error("{}", .0.user_message())]
    FetchError(#[from] gateway::FetchError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
