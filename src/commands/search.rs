//! Search command - fetch one page and print it

use crate::{
    WallifyError,
    gateway::{CatalogGateway, FetchOutcome},
    output,
    query::{self, FilterSet, unfamiliar_terms},
    session::SessionState,
    ui::OutputWriter,
};
use log::info;

type Result<T> = std::result::Result<T, WallifyError>;

/// What to search for; mirrors the `search` CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub category: Option<String>,
    pub filters: FilterSet,
    pub page: u32,
}

impl SearchRequest {
    /// Session state that the query builder turns into this request
    #[must_use]
    pub fn to_state(&self) -> SessionState {
        let text = self.query.clone().unwrap_or_default();
        SessionState {
            search_text: text.trim().to_string(),
            draft_text: text,
            active_category: self.category.clone(),
            filters: self.filters.clone(),
            page: self.page.max(1),
            ..SessionState::new()
        }
    }
}

/// Execute the search command
///
/// # Errors
///
/// Returns `WallifyError::FetchError` if the catalog request fails.
pub async fn execute<G: CatalogGateway>(
    gateway: &G,
    request: &SearchRequest,
    out: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    for note in unfamiliar_terms(request.category.as_deref(), &request.filters) {
        out.warning(&note);
    }

    let params = query::build(&request.to_state());
    info!("Searching: {}", params.to_query_string());

    match gateway.fetch(&params).await {
        FetchOutcome::Success { items, total_hits } => {
            if items.is_empty() {
                out.info("No images found.");
                return Ok(());
            }

            let total = total_hits.map_or_else(|| "?".to_string(), |hits| hits.to_string());
            out.info(&format!(
                "Page {} ({} image(s), {total} total):",
                params.page,
                items.len()
            ));
            for record in &items {
                out.write(&output::image_line(record, quiet));
            }
            Ok(())
        }
        FetchOutcome::Failure(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::FetchError;
    use crate::testing::{MockGateway, success};
    use crate::ui::BufferWriter;
    use std::time::Duration;

    fn request(query: Option<&str>) -> SearchRequest {
        SearchRequest {
            query: query.map(str::to_string),
            category: Some("nature".to_string()),
            filters: FilterSet::from_pairs([("colors", "green")]).unwrap(),
            page: 2,
        }
    }

    #[tokio::test]
    async fn test_search_sends_built_query() {
        let gateway = MockGateway::paged(4, 3);
        let out = BufferWriter::new();

        execute(&gateway, &request(Some(" pine forest ")), &out, true)
            .await
            .unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].search_term.as_deref(), Some("pine forest"));
        assert_eq!(calls[0].category, None);
        assert_eq!(calls[0].page, 2);
        assert_eq!(calls[0].filters.get("colors").map(String::as_str), Some("green"));
        assert!(out.lines().contains(&"https://cdn.example/421_640.jpg".to_string()));
    }

    #[tokio::test]
    async fn test_short_query_falls_back_to_category() {
        let gateway = MockGateway::paged(4, 1);
        let out = BufferWriter::new();

        execute(&gateway, &request(Some("ok")), &out, true).await.unwrap();

        let calls = gateway.calls();
        assert_eq!(calls[0].search_term, None);
        assert_eq!(calls[0].category.as_deref(), Some("nature"));
    }

    #[tokio::test]
    async fn test_empty_page_is_not_an_error() {
        let gateway = MockGateway::new(|_| (Duration::ZERO, success(Vec::new())));
        let out = BufferWriter::new();

        execute(&gateway, &request(None), &out, false).await.unwrap();
        assert_eq!(out.lines(), vec!["No images found."]);
    }

    #[tokio::test]
    async fn test_failure_becomes_error() {
        let gateway = MockGateway::new(|_| {
            (Duration::ZERO, FetchOutcome::Failure(FetchError::parse("missing hits")))
        });
        let out = BufferWriter::new();

        let err = execute(&gateway, &request(None), &out, false).await.unwrap_err();
        assert!(matches!(err, WallifyError::FetchError(_)));
        assert_eq!(err.to_string(), "Failed to fetch images");
    }
}
