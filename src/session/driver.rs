//! Async driver for a browse session
//!
//! The driver runs on a single task and owns the [`BrowseSession`]. It
//! multiplexes three sources:
//!
//! - intents from the view, via [`SessionHandle`]
//! - settled search text from the [`Debouncer`]
//! - completed fetches from its `JoinSet`
//!
//! and publishes a [`RenderSnapshot`] after every state transition. Fetches
//! superseded by a newer subject still run to completion; the session drops
//! their outcome on arrival.

use super::debounce::{Debouncer, Settled};
use super::error::SessionError;
use super::machine::{BrowseSession, FetchTicket};
use super::state::{Intent, RenderSnapshot};
use crate::gateway::{CatalogGateway, FetchError, FetchOutcome};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{Id, JoinError, JoinSet};

/// View-side handle for feeding intents into a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Intent>,
}

impl SessionHandle {
    /// Queue an intent
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the driver has stopped.
    pub fn send(&self, intent: Intent) -> Result<(), SessionError> {
        self.tx.send(intent).map_err(|_| SessionError::Closed)
    }
}

/// Owns a browse session and performs its fetches
pub struct SessionDriver<G: CatalogGateway> {
    session: BrowseSession,
    gateway: Arc<G>,
    debouncer: Debouncer,
    settled: mpsc::UnboundedReceiver<Settled>,
    intents: mpsc::UnboundedReceiver<Intent>,
    snapshots: mpsc::UnboundedSender<RenderSnapshot>,
    in_flight: JoinSet<FetchOutcome>,
    tickets: HashMap<Id, FetchTicket>,
}

impl<G: CatalogGateway> SessionDriver<G> {
    /// Create a driver, the handle that feeds it, and the snapshot stream
    #[must_use]
    pub fn new(
        gateway: Arc<G>,
        debounce: Duration,
    ) -> (Self, SessionHandle, mpsc::UnboundedReceiver<RenderSnapshot>) {
        let (intent_tx, intents) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = mpsc::unbounded_channel();
        let (debouncer, settled) = Debouncer::channel(debounce);

        let driver = Self {
            session: BrowseSession::new(),
            gateway,
            debouncer,
            settled,
            intents,
            snapshots,
            in_flight: JoinSet::new(),
            tickets: HashMap::new(),
        };

        (driver, SessionHandle { tx: intent_tx }, snapshot_rx)
    }

    /// Run until every `SessionHandle` has been dropped
    ///
    /// Issues the initial fetch before reading any intent.
    pub async fn run(mut self) {
        let ticket = self.session.start();
        self.dispatch(ticket);
        self.publish();

        loop {
            tokio::select! {
                intent = self.intents.recv() => {
                    let Some(intent) = intent else { break };
                    self.handle_intent(intent);
                }
                Some(fired) = self.settled.recv() => {
                    if let Some(text) = self.debouncer.accept(fired) {
                        self.apply(Intent::SearchSettled(text));
                    }
                }
                Some(joined) = self.in_flight.join_next_with_id() => {
                    self.complete(joined);
                }
            }
        }

        debug!(
            "Session closed with {} fetch(es) still in flight",
            self.in_flight.len()
        );
    }

    fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::TextChanged(text) => {
                self.debouncer.schedule(text.clone());
                self.apply(Intent::TextChanged(text));
            }
            Intent::SearchSettled(_) | Intent::CategorySelected(_) | Intent::ClearAll => {
                self.debouncer.cancel();
                self.apply(intent);
            }
            other => self.apply(other),
        }
    }

    fn apply(&mut self, intent: Intent) {
        if let Some(ticket) = self.session.apply(intent) {
            self.dispatch(ticket);
        }
        self.publish();
    }

    fn dispatch(&mut self, ticket: FetchTicket) {
        let gateway = Arc::clone(&self.gateway);
        let params = ticket.params.clone();
        let handle = self
            .in_flight
            .spawn(async move { gateway.fetch(&params).await });
        self.tickets.insert(handle.id(), ticket);
    }

    fn complete(&mut self, joined: Result<(Id, FetchOutcome), JoinError>) {
        let (id, outcome) = match joined {
            Ok(done) => done,
            Err(e) => {
                warn!("Fetch task ended abnormally: {e}");
                (e.id(), FetchOutcome::Failure(FetchError::network(e.to_string())))
            }
        };

        let Some(ticket) = self.tickets.remove(&id) else {
            warn!("Completed fetch {id} has no ticket");
            return;
        };

        self.session.resolve(&ticket, outcome);
        self.publish();
    }

    fn publish(&self) {
        // The view may already be gone during shutdown
        let _ = self.snapshots.send(self.session.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::FetchOutcome;
    use crate::query::{FilterSet, QueryParameters};
    use crate::testing::{MockGateway, drain, page_of, success, wait_for};
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::time::sleep;

    type Setup = (Arc<MockGateway>, SessionHandle, mpsc::UnboundedReceiver<RenderSnapshot>);

    fn start(gateway: MockGateway) -> Setup {
        let gateway = Arc::new(gateway);
        let (driver, handle, rx) = SessionDriver::new(Arc::clone(&gateway), Duration::from_millis(400));
        tokio::spawn(driver.run());
        (gateway, handle, rx)
    }

    fn ids(snapshot: &RenderSnapshot) -> Vec<u64> {
        snapshot.items.iter().map(|r| r.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_fetch_populates_view() {
        let (gateway, _handle, mut rx) = start(MockGateway::paged(1, 3));

        let snapshot = wait_for(&mut rx, |s| !s.is_loading && !s.items.is_empty()).await;
        assert_eq!(ids(&snapshot), vec![111, 112, 113]);
        assert_eq!(gateway.calls(), vec![QueryParameters::first_page()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_issues_single_search() {
        let (gateway, handle, mut rx) = start(MockGateway::paged(1, 3));
        wait_for(&mut rx, |s| !s.is_loading).await;

        for text in ["c", "ca", "cat", "cats"] {
            handle.send(Intent::TextChanged(text.to_string())).unwrap();
        }
        sleep(Duration::from_secs(1)).await;

        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].search_term.as_deref(), Some("cats"));
        assert_eq!(calls[1].page, 1);

        let last = drain(&mut rx).pop().unwrap();
        assert_eq!(last.search_text, "cats");
        assert!(!last.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_text_does_not_fetch() {
        let (gateway, handle, mut rx) = start(MockGateway::paged(1, 3));
        wait_for(&mut rx, |s| !s.is_loading).await;

        handle.send(Intent::TextChanged("ab".to_string())).unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(gateway.calls().len(), 1);
        let last = drain(&mut rx).pop().unwrap();
        assert_eq!(last.search_text, "ab");
        assert_eq!(ids(&last), vec![111, 112, 113]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_text_refetches_unfiltered() {
        let (gateway, handle, mut rx) = start(MockGateway::paged(1, 3));
        wait_for(&mut rx, |s| !s.is_loading).await;

        handle.send(Intent::TextChanged("sunset".to_string())).unwrap();
        sleep(Duration::from_secs(1)).await;
        handle.send(Intent::TextChanged(String::new())).unwrap();
        sleep(Duration::from_secs(1)).await;

        let calls = gateway.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], QueryParameters::first_page());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_category_response_is_ignored() {
        let gateway = MockGateway::new(|params| {
            match params.category.as_deref() {
                Some("nature") => (Duration::from_millis(300), success(page_of(6, params.page, 3))),
                Some("music") => (Duration::from_millis(10), success(page_of(7, params.page, 2))),
                _ => (Duration::ZERO, success(page_of(1, params.page, 3))),
            }
        });
        let (gateway, handle, mut rx) = start(gateway);
        wait_for(&mut rx, |s| !s.is_loading).await;

        handle.send(Intent::CategorySelected("nature".to_string())).unwrap();
        handle.send(Intent::CategorySelected("music".to_string())).unwrap();

        let music = wait_for(&mut rx, |s| !s.items.is_empty()).await;
        assert_eq!(ids(&music), vec![711, 712]);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(gateway.calls().len(), 3, "superseded fetch still runs");

        for snapshot in drain(&mut rx) {
            assert_eq!(ids(&snapshot), vec![711, 712]);
            assert_eq!(snapshot.active_category.as_deref(), Some("music"));
            assert!(snapshot.error_message.is_none());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_appends_then_replace_discards() {
        let (gateway, handle, mut rx) = start(MockGateway::paged(1, 3));
        wait_for(&mut rx, |s| !s.is_loading).await;

        handle.send(Intent::LoadMore).unwrap();
        let appended = wait_for(&mut rx, |s| s.items.len() == 6).await;
        assert_eq!(ids(&appended), vec![111, 112, 113, 121, 122, 123]);

        let filters = FilterSet::from_pairs([("orientation", "vertical")]).unwrap();
        handle.send(Intent::FiltersApplied(filters)).unwrap();
        let replaced = wait_for(&mut rx, |s| !s.is_loading && !s.active_filters.is_empty()).await;
        assert_eq!(ids(&replaced), vec![111, 112, 113]);
        assert_eq!(replaced.page, 1);

        let calls = gateway.calls();
        assert_eq!(calls[1].page, 2);
        assert_eq!(calls[2].filters.get("orientation").map(String::as_str), Some("vertical"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_page_is_not_appended_after_reload() {
        // The first page-2 request is slow and answers with ids from base 9
        let first_page_two = AtomicBool::new(true);
        let gateway = MockGateway::new(move |params| {
            if params.page == 2 && first_page_two.swap(false, Ordering::SeqCst) {
                (Duration::from_secs(2), success(page_of(9, 2, 3)))
            } else {
                (Duration::from_millis(10), success(page_of(1, params.page, 3)))
            }
        });
        let (gateway, handle, mut rx) = start(gateway);
        wait_for(&mut rx, |s| !s.is_loading && !s.items.is_empty()).await;

        handle.send(Intent::LoadMore).unwrap();
        handle.send(Intent::FiltersReset).unwrap();
        wait_for(&mut rx, |s| !s.is_loading && s.items.len() == 3).await;

        handle.send(Intent::LoadMore).unwrap();
        let appended = wait_for(&mut rx, |s| !s.is_loading && s.items.len() == 6).await;
        assert_eq!(ids(&appended), vec![111, 112, 113, 121, 122, 123]);

        sleep(Duration::from_secs(3)).await;
        assert_eq!(gateway.calls().len(), 4);
        for snapshot in drain(&mut rx) {
            assert_eq!(ids(&snapshot), vec![111, 112, 113, 121, 122, 123]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_while_loading_is_ignored() {
        let gateway = MockGateway::new(|params| {
            (Duration::from_millis(200), success(page_of(1, params.page, 3)))
        });
        let (gateway, handle, mut rx) = start(gateway);

        handle.send(Intent::LoadMore).unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(gateway.calls().len(), 1);
        let last = drain(&mut rx).pop().unwrap();
        assert_eq!(last.page, 1);
        assert_eq!(last.items.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_category_cancels_pending_search() {
        let (gateway, handle, mut rx) = start(MockGateway::paged(1, 3));
        wait_for(&mut rx, |s| !s.is_loading).await;

        handle.send(Intent::TextChanged("cats".to_string())).unwrap();
        handle.send(Intent::CategorySelected("nature".to_string())).unwrap();
        sleep(Duration::from_secs(1)).await;

        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].category.as_deref(), Some("nature"));
        assert!(calls.iter().all(|c| c.search_term.is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_reported_and_session_survives() {
        let gateway = MockGateway::new(|params| match params.category.as_deref() {
            Some("broken") => (
                Duration::ZERO,
                FetchOutcome::Failure(FetchError::parse("no hits")),
            ),
            _ => (Duration::ZERO, success(page_of(1, params.page, 3))),
        });
        let (_gateway, handle, mut rx) = start(gateway);
        wait_for(&mut rx, |s| !s.is_loading).await;

        handle.send(Intent::CategorySelected("broken".to_string())).unwrap();
        let failed = wait_for(&mut rx, |s| s.error_message.is_some()).await;
        assert!(failed.items.is_empty());
        assert!(!failed.is_loading);
        assert_eq!(failed.error_message.as_deref(), Some("Failed to fetch images"));

        handle.send(Intent::ClearAll).unwrap();
        let recovered = wait_for(&mut rx, |s| !s.is_loading && !s.items.is_empty()).await;
        assert!(recovered.error_message.is_none());
        assert!(recovered.active_category.is_none());
    }

    #[tokio::test]
    async fn test_send_after_driver_dropped() {
        let (driver, handle, _rx) = SessionDriver::new(Arc::new(MockGateway::paged(1, 1)), Duration::ZERO);
        drop(driver);

        assert!(matches!(handle.send(Intent::LoadMore), Err(SessionError::Closed)));
    }
}
