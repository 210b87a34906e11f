//! Browse session state machine
//!
//! `BrowseSession` owns the `SessionState` and the `ResultSet` and is the
//! only place either is mutated. It is synchronous: applying an intent
//! returns the fetch to perform (if any) as a `FetchTicket`, and the caller
//! hands the ticket back together with the outcome once the fetch resolves.
//!
//! # Workflow
//!
//! ```text
//! start() ──► FetchTicket (replace, page 1)
//!
//! apply(intent)
//!     ├─ TextChanged ───────────────► draft only, no fetch
//!     ├─ LoadMore (idle, no error) ─► page += 1, FetchTicket (append)
//!     └─ replace-class ─────────────► page = 1, results cleared,
//!                                     FetchTicket (replace)
//!
//! resolve(ticket, outcome)
//!     ├─ issued for an earlier subject ─► Stale, nothing changes
//!     ├─ append not the latest ticket ─► Stale, nothing changes
//!     ├─ Success ─► merge (replace or append)
//!     └─ Failure ─► last_error, results untouched
//! ```
//!
//! A settled search text is trimmed when it is committed to `search_text`;
//! the draft keeps the text as typed.
//!
//! Only `LoadMore` may append. Every other fetch replaces, because the
//! subject it was issued for is not the subject of the items on screen.

use super::state::{FetchMode, Intent, RenderSnapshot, ResultSet, SessionState};
use crate::gateway::FetchOutcome;
use crate::query::{self, QueryParameters};
use log::{debug, info, warn};

/// A fetch the session wants performed
///
/// The ticket carries the subject generation and the query it was issued
/// for. A response whose generation has since been superseded is dropped,
/// even if a later request happens to rebuild the same query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Issue order, strictly increasing per session
    pub seq: u64,
    /// Subject generation at issue time; bumped by every replace
    pub generation: u64,
    pub mode: FetchMode,
    pub params: QueryParameters,
}

/// What `resolve` did with an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Items merged into the result set
    Applied,
    /// Failure recorded in `last_error`
    Failed,
    /// Issued for a subject that is no longer current; ignored
    Stale,
}

/// Browse session - owns query state and accumulated results
#[derive(Debug, Default)]
pub struct BrowseSession {
    state: SessionState,
    results: ResultSet,
    next_seq: u64,
    latest_seq: Option<u64>,
    generation: u64,
}

impl BrowseSession {
    /// Create a session in the initial state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for populating the initial view
    pub fn start(&mut self) -> FetchTicket {
        self.issue(FetchMode::Replace)
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Apply a user intent
    ///
    /// Returns the fetch to perform, or `None` when the intent only changes
    /// local state (or its precondition fails).
    pub fn apply(&mut self, intent: Intent) -> Option<FetchTicket> {
        debug!("Applying intent {intent:?}");

        match intent {
            Intent::TextChanged(text) => {
                self.state.draft_text = text;
                None
            }
            Intent::SearchSettled(text) => self.settle_search(text),
            Intent::CategorySelected(category) => {
                self.state.active_category = if self.state.active_category.as_ref() == Some(&category) {
                    None
                } else {
                    Some(category)
                };
                self.state.search_text.clear();
                self.state.draft_text.clear();
                Some(self.replace())
            }
            Intent::FiltersApplied(filters) => {
                self.state.filters = filters;
                Some(self.replace())
            }
            Intent::FilterRemoved(field) => {
                if self.state.filters.remove(&field).is_none() {
                    debug!("Filter '{field}' is not active");
                    return None;
                }
                Some(self.replace())
            }
            Intent::FiltersReset => {
                self.state.filters = query::FilterSet::new();
                Some(self.replace())
            }
            Intent::LoadMore => self.load_more(),
            Intent::ClearAll => {
                self.state = SessionState::new();
                Some(self.replace())
            }
        }
    }

    /// Merge the outcome of a ticket's fetch
    pub fn resolve(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> Resolution {
        if self.is_stale(ticket) {
            warn!(
                "Discarding stale response #{} ({}); current generation is {}",
                ticket.seq,
                ticket.params.to_query_string(),
                self.generation
            );
            return Resolution::Stale;
        }

        if self.latest_seq == Some(ticket.seq) {
            self.state.is_loading = false;
        }

        match outcome {
            FetchOutcome::Success { items, total_hits } => {
                info!(
                    "Page {} resolved with {} image(s) ({:?})",
                    ticket.params.page,
                    items.len(),
                    ticket.mode
                );
                let page_was_empty = items.is_empty();
                match ticket.mode {
                    FetchMode::Replace => self.results.replace(ticket.params.page, items, total_hits),
                    FetchMode::Append => self.results.append(ticket.params.page, items, total_hits),
                }
                self.state.last_error = None;
                self.state.exhausted = page_was_empty
                    || self
                        .results
                        .total_hits
                        .is_some_and(|total| self.results.len() as u64 >= total);
                Resolution::Applied
            }
            FetchOutcome::Failure(error) => {
                warn!("Page {} failed: {error}", ticket.params.page);
                if ticket.mode == FetchMode::Append {
                    self.state.page = self.results.page.max(1);
                }
                self.state.last_error = Some(error);
                Resolution::Failed
            }
        }
    }

    /// Immutable view for the view layer
    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            items: self.results.items.clone(),
            is_loading: self.state.is_loading,
            error_message: self
                .state
                .last_error
                .as_ref()
                .map(|e| e.user_message().to_string()),
            search_text: self.state.draft_text.clone(),
            active_category: self.state.active_category.clone(),
            active_filters: self.state.filters.clone(),
            page: self.state.page,
            has_more: !self.state.exhausted && self.state.last_error.is_none(),
        }
    }

    /// A ticket is stale once a replace has moved the subject on, or when an
    /// append is not the most recent request
    fn is_stale(&self, ticket: &FetchTicket) -> bool {
        if ticket.generation != self.generation {
            return true;
        }
        if ticket.mode == FetchMode::Append && self.latest_seq != Some(ticket.seq) {
            return true;
        }
        ticket.params != query::build(&self.state)
    }

    fn settle_search(&mut self, text: String) -> Option<FetchTicket> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.state.search_text.clear();
        } else if query::is_searchable(trimmed) {
            self.state.search_text = trimmed.to_string();
        } else {
            debug!("Search text '{trimmed}' is too short to query");
            self.state.draft_text = text;
            return None;
        }

        self.state.draft_text = text;
        self.state.active_category = None;
        Some(self.replace())
    }

    fn load_more(&mut self) -> Option<FetchTicket> {
        if self.state.is_loading {
            debug!("Ignoring load-more while a fetch is outstanding");
            return None;
        }
        if self.state.last_error.is_some() {
            debug!("Ignoring load-more after a failed page");
            return None;
        }
        if self.state.exhausted {
            debug!("Ignoring load-more; no more results");
            return None;
        }

        self.state.page += 1;
        Some(self.issue(FetchMode::Append))
    }

    fn replace(&mut self) -> FetchTicket {
        self.state.page = 1;
        self.state.exhausted = false;
        self.results.clear();
        self.generation += 1;
        self.issue(FetchMode::Replace)
    }

    fn issue(&mut self, mode: FetchMode) -> FetchTicket {
        self.next_seq += 1;
        self.latest_seq = Some(self.next_seq);
        self.state.is_loading = true;
        self.state.last_error = None;

        let ticket = FetchTicket {
            seq: self.next_seq,
            generation: self.generation,
            mode,
            params: query::build(&self.state),
        };
        debug!(
            "Issuing fetch #{} ({:?}): {}",
            ticket.seq,
            ticket.mode,
            ticket.params.to_query_string()
        );
        ticket
    }
}
