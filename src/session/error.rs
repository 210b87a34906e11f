//! Session-specific error types

use thiserror::Error;

/// Errors raised while feeding intents into a session
///
/// Payload validation happens before an intent is built (see
/// [`crate::query::ValidationError`]), so the only failure left here is a
/// session that has gone away.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The session driver has stopped and no longer accepts intents
    #[error("Session is closed")]
    Closed,
}
