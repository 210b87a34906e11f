//! Terminal view for a browse session
//!
//! The view is deliberately thin: it turns typed lines into intents and
//! prints render snapshots. All browsing logic lives in
//! [`crate::session`].
//!
//! - [`input`] parses a line into a [`input::LineCommand`]
//! - [`render`] prints snapshots incrementally
//! - [`output`] abstracts where the text goes

pub mod error;
pub mod input;
pub mod output;
pub mod render;

pub use error::InputError;
pub use input::{LineCommand, parse_line};
pub use output::{BufferWriter, MessageLevel, OutputWriter, StdoutWriter};
pub use render::{ItemDelta, SnapshotRenderer};
