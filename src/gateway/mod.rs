//! Fetch gateway for the remote image catalog
//!
//! The gateway performs one round-trip per call and reports the result as a
//! [`FetchOutcome`] value. Transport and decoding faults never escape as
//! errors: callers always get a value back and decide what to do with it.
//! There are no retries and no caching at this layer.

pub mod pixabay;

pub use pixabay::{DEFAULT_ENDPOINT, PixabayGateway};

use crate::query::QueryParameters;
use serde::Deserialize;
use thiserror::Error;

/// Message shown when the catalog answered with something unusable
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to fetch images";

/// Message shown when the request itself failed
pub const NETWORK_FAILURE_MESSAGE: &str = "An error occurred while fetching images";

/// One image in a result page
///
/// The session treats records as opaque; only the dimensions and display
/// URL matter for laying out tiles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRecord {
    pub id: u64,
    #[serde(rename = "imageWidth")]
    pub width: u32,
    #[serde(rename = "imageHeight")]
    pub height: u32,
    /// Medium-sized rendition used for grid tiles
    #[serde(rename = "webformatURL")]
    pub display_url: String,
    #[serde(rename = "previewURL", default)]
    pub preview_url: Option<String>,
    #[serde(rename = "largeImageURL", default)]
    pub large_url: Option<String>,
    #[serde(rename = "pageURL", default)]
    pub page_url: Option<String>,
    /// Comma-separated tags as reported by the catalog
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub user: String,
}

impl ImageRecord {
    /// Height divided by width; tiles in a column keep this ratio
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 {
            return 1.0;
        }
        f64::from(self.height) / f64::from(self.width)
    }

    /// Whether the image is taller than it is wide
    #[must_use]
    pub const fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

/// Failure categories surfaced by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Transport or connectivity failure, including non-success statuses
    Network,
    /// Response arrived but its payload lacked the expected fields
    Parse,
}

/// A failed fetch, as a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?} error: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    /// Diagnostic detail, for logs
    pub message: String,
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Parse,
            message: message.into(),
        }
    }

    /// Human-readable message for the view layer
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Parse => PARSE_FAILURE_MESSAGE,
            FetchErrorKind::Network => NETWORK_FAILURE_MESSAGE,
        }
    }
}

/// Result of one catalog round-trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success {
        items: Vec<ImageRecord>,
        /// Number of hits reachable through paging, when the catalog reports it
        total_hits: Option<u64>,
    },
    Failure(FetchError),
}

impl FetchOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Anything that can answer a catalog query
///
/// Implementations must be cheap to share between tasks; the session driver
/// holds one behind an `Arc` and calls it from spawned fetch tasks.
pub trait CatalogGateway: Send + Sync + 'static {
    /// Perform one round-trip for `params`
    fn fetch(&self, params: &QueryParameters) -> impl Future<Output = FetchOutcome> + Send;
}
