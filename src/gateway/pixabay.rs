//! HTTP gateway for the Pixabay image API
//!
//! Issues one `GET` per fetch with the API key and the rendered query
//! parameters. Response bodies are decoded with `serde_json`; a body without
//! a `hits` array counts as a parse failure.

use super::{CatalogGateway, FetchError, FetchOutcome, ImageRecord};
use crate::query::QueryParameters;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Public API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://pixabay.com/api/";

#[derive(Deserialize)]
struct CatalogResponse {
    #[serde(rename = "totalHits", default)]
    total_hits: Option<u64>,
    #[serde(default)]
    hits: Option<Vec<ImageRecord>>,
}

/// Catalog gateway backed by `reqwest`
#[derive(Debug, Clone)]
pub struct PixabayGateway {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl PixabayGateway {
    /// Create a gateway whose requests give up after `timeout`
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be constructed
    /// (for example when no TLS backend is available).
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Full request URL for `params`, including the API key
    #[must_use]
    pub fn request_url(&self, params: &QueryParameters) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}key={}&{}",
            self.endpoint,
            urlencoding::encode(&self.api_key),
            params.to_query_string()
        )
    }

    async fn try_fetch(
        &self,
        params: &QueryParameters,
    ) -> Result<(Vec<ImageRecord>, Option<u64>), FetchError> {
        let response = self
            .client
            .get(self.request_url(params))
            .send()
            .await
            .map_err(|e| FetchError::network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::network(format!("status {status}: {}", text.trim())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(e.without_url().to_string()))?;

        parse_body(&body)
    }
}

impl CatalogGateway for PixabayGateway {
    async fn fetch(&self, params: &QueryParameters) -> FetchOutcome {
        debug!("GET {} ({})", self.endpoint, params.to_query_string());

        match self.try_fetch(params).await {
            Ok((items, total_hits)) => {
                debug!("Received {} image(s) for page {}", items.len(), params.page);
                FetchOutcome::Success { items, total_hits }
            }
            Err(e) => {
                warn!("Catalog request failed: {e}");
                FetchOutcome::Failure(e)
            }
        }
    }
}

/// Decode a catalog response body
fn parse_body(body: &str) -> Result<(Vec<ImageRecord>, Option<u64>), FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::parse("empty response body"));
    }

    let response: CatalogResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::parse(format!("invalid response: {e}")))?;

    let hits = response
        .hits
        .ok_or_else(|| FetchError::parse("response has no hits"))?;

    Ok((hits, response.total_hits))
}
