//! Testing utilities for wallify
//!
//! Provides a scripted `MockGateway` and helpers for building result pages
//! and waiting on snapshot streams.
//!
//! Only available when compiled with `cfg(test)`.

use crate::gateway::{CatalogGateway, FetchOutcome, ImageRecord};
use crate::query::QueryParameters;
use crate::session::RenderSnapshot;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

type Responder = dyn Fn(&QueryParameters) -> (Duration, FetchOutcome) + Send + Sync;

/// Gateway that answers from a closure and records every request
///
/// The closure returns how long the "network" takes and what it returns;
/// delays run on tokio time, so paused-clock tests stay instant.
pub struct MockGateway {
    responder: Box<Responder>,
    calls: Mutex<Vec<QueryParameters>>,
}

impl MockGateway {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&QueryParameters) -> (Duration, FetchOutcome) + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request immediately with `count` records per page
    pub fn paged(base: u64, count: usize) -> Self {
        Self::new(move |params| (Duration::ZERO, success(page_of(base, params.page, count))))
    }

    /// Requests received so far, in order
    pub fn calls(&self) -> Vec<QueryParameters> {
        self.calls.lock().unwrap().clone()
    }
}

impl CatalogGateway for MockGateway {
    async fn fetch(&self, params: &QueryParameters) -> FetchOutcome {
        self.calls.lock().unwrap().push(params.clone());
        let (delay, outcome) = (self.responder)(params);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}

/// A landscape record with a predictable URL
pub fn record(id: u64) -> ImageRecord {
    ImageRecord {
        id,
        width: 640,
        height: 427,
        display_url: format!("https://cdn.example/{id}_640.jpg"),
        preview_url: None,
        large_url: None,
        page_url: None,
        tags: "test".to_string(),
        user: "tester".to_string(),
    }
}

/// Records for one page; ids are `base * 100 + page * 10 + n` for `n` in `1..=count`
pub fn page_of(base: u64, page: u32, count: usize) -> Vec<ImageRecord> {
    (1..=count as u64)
        .map(|n| record(base * 100 + u64::from(page) * 10 + n))
        .collect()
}

/// Successful outcome without a hit total
pub fn success(items: Vec<ImageRecord>) -> FetchOutcome {
    FetchOutcome::Success {
        items,
        total_hits: None,
    }
}

/// Receive snapshots until one matches `pred`
///
/// # Panics
///
/// Panics if the driver stops or nothing matches within ten (tokio) seconds.
pub async fn wait_for<F>(rx: &mut mpsc::UnboundedReceiver<RenderSnapshot>, pred: F) -> RenderSnapshot
where
    F: Fn(&RenderSnapshot) -> bool,
{
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let snapshot = rx.recv().await.expect("session driver stopped");
            if pred(&snapshot) {
                return snapshot;
            }
        }
    })
    .await
    .expect("timed out waiting for snapshot")
}

/// Take every snapshot already queued
pub fn drain(rx: &mut mpsc::UnboundedReceiver<RenderSnapshot>) -> Vec<RenderSnapshot> {
    let mut snapshots = Vec::new();
    while let Ok(snapshot) = rx.try_recv() {
        snapshots.push(snapshot);
    }
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_ids_do_not_collide() {
        let first: Vec<u64> = page_of(3, 1, 4).iter().map(|r| r.id).collect();
        let second: Vec<u64> = page_of(3, 2, 4).iter().map(|r| r.id).collect();
        assert_eq!(first, vec![311, 312, 313, 314]);
        assert_eq!(second, vec![321, 322, 323, 324]);
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let gateway = MockGateway::paged(1, 2);
        let mut params = QueryParameters::first_page();
        params.page = 4;

        let outcome = gateway.fetch(&params).await;
        assert!(outcome.is_success());
        assert_eq!(gateway.calls(), vec![params]);
    }
}
