//! Query building for catalog requests
//!
//! This module turns a browsing session's state into the canonical set of
//! parameters sent to the remote catalog. It owns the filter vocabulary the
//! view layer offers (categories and filter fields) and the validation rules
//! for user-supplied filters.
//!
//! # Rules
//!
//! - A search text of three or more characters (after trimming) wins over
//!   the active category; the two are never sent together.
//! - Every active filter is sent verbatim as its own field, whatever the
//!   search/category branch.
//! - `page`, `per_page`, `safesearch` and `editors_choice` are always sent.
//!
//! # Examples
//!
//! ```
//! use wallify::query;
//! use wallify::session::SessionState;
//!
//! let mut state = SessionState::new();
//! state.search_text = "cats & dogs".to_string();
//!
//! let params = query::build(&state);
//! assert!(params.to_query_string().contains("q=cats%20%26%20dogs"));
//! ```

pub mod error;
pub mod filters;
pub mod params;

pub use error::ValidationError;
pub use filters::{
    CATEGORIES, FILTER_FIELDS, FilterField, FilterSet, parse_filter, unfamiliar_terms,
};
pub use params::{
    EDITORS_CHOICE, MIN_QUERY_CHARS, PER_PAGE, QueryParameters, SAFE_SEARCH, build, is_searchable,
};
