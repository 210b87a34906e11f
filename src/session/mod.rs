//! Browse session: state machine, debounce scheduler and async driver
//!
//! # Architecture
//!
//! - **`state`**: data model (`SessionState`, `ResultSet`, `Intent`, snapshots)
//! - **`machine`**: `BrowseSession`, the synchronous state machine of record
//! - **`debounce`**: cancel-and-restart timer for search text
//! - **`driver`**: `SessionDriver`, which runs fetches and feeds outcomes back
//!
//! # Flow
//!
//! ```text
//! view ──Intent──► SessionHandle ──► SessionDriver
//!                                      │  TextChanged ─► Debouncer ─► SearchSettled
//!                                      ▼
//!                                  BrowseSession::apply ─► FetchTicket
//!                                      │
//!                                      ▼
//!                                  CatalogGateway::fetch (spawned)
//!                                      │
//!                                      ▼
//!                                  BrowseSession::resolve ─► RenderSnapshot ─► view
//! ```

pub mod debounce;
pub mod driver;
pub mod error;
pub mod machine;
pub mod state;

pub use debounce::{DEFAULT_DELAY, Debouncer};
pub use driver::{SessionDriver, SessionHandle};
pub use error::SessionError;
pub use machine::{BrowseSession, FetchTicket, Resolution};
pub use state::{FetchMode, Intent, RenderSnapshot, ResultSet, SessionState};
