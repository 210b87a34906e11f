//! Canonical query parameters and the builder that produces them
//!
//! `build` sends the committed search text exactly as stored. Whitespace
//! is stripped once, when the session commits a settled text, so the
//! term on the wire and the term in the state are always the same string.

use crate::session::SessionState;
use std::collections::BTreeMap;

/// Results requested per page
pub const PER_PAGE: u32 = 25;

/// Safe-content flag sent with every request
pub const SAFE_SEARCH: bool = true;

/// Editors' choice flag sent with every request
pub const EDITORS_CHOICE: bool = true;

/// Minimum trimmed length for a search text to be sent
pub const MIN_QUERY_CHARS: usize = 3;

/// Whether `text` is long enough to become the query subject
#[must_use]
pub fn is_searchable(text: &str) -> bool {
    text.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Everything that varies between two catalog requests
///
/// The fixed base parameters are not stored; they are added when the
/// parameters are rendered for the wire. Two values compare equal exactly
/// when they would produce the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    /// 1-based page number
    pub page: u32,
    /// Free-text search, sent as `q`
    pub search_term: Option<String>,
    /// Category, sent as `category`
    pub category: Option<String>,
    /// Active filters, each sent as its own field
    pub filters: BTreeMap<String, String>,
}

impl QueryParameters {
    /// Parameters for the first page with no subject and no filters
    #[must_use]
    pub const fn first_page() -> Self {
        Self {
            page: 1,
            search_term: None,
            category: None,
            filters: BTreeMap::new(),
        }
    }

    /// Wire `(field, value)` pairs in request order, values unencoded
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("per_page".to_string(), PER_PAGE.to_string()),
            ("safesearch".to_string(), SAFE_SEARCH.to_string()),
            ("editors_choice".to_string(), EDITORS_CHOICE.to_string()),
            ("page".to_string(), self.page.to_string()),
        ];
        if let Some(term) = &self.search_term {
            pairs.push(("q".to_string(), term.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category".to_string(), category.clone()));
        }
        pairs.extend(
            self.filters
                .iter()
                .map(|(field, value)| (field.clone(), value.clone())),
        );
        pairs
    }

    /// Render as a `&`-joined query string
    ///
    /// Only the search term is percent-encoded; every other value is passed
    /// through as is.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.to_pairs()
            .into_iter()
            .map(|(field, value)| {
                if field == "q" {
                    format!("{field}={}", urlencoding::encode(&value))
                } else {
                    format!("{field}={value}")
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self::first_page()
    }
}

/// Build the query parameters for a session state
///
/// Pure and total. The committed `search_text` takes precedence over the
/// active category when it is searchable; filters and page are always
/// carried over.
#[must_use]
pub fn build(state: &SessionState) -> QueryParameters {
    let (search_term, category) = if is_searchable(&state.search_text) {
        (Some(state.search_text.clone()), None)
    } else if let Some(category) = &state.active_category {
        (None, Some(category.clone()))
    } else {
        (None, None)
    };

    QueryParameters {
        page: state.page,
        search_term,
        category,
        filters: state.filters.as_map().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterSet;

    fn pair<'a>(pairs: &'a [(String, String)], field: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_initial_state_has_no_subject() {
        let params = build(&SessionState::new());
        assert_eq!(params, QueryParameters::first_page());
        assert_eq!(
            params.to_query_string(),
            "per_page=25&safesearch=true&editors_choice=true&page=1"
        );
    }

    #[test]
    fn test_search_term_is_percent_encoded() {
        let mut state = SessionState::new();
        state.search_text = "cats & dogs".to_string();

        let params = build(&state);
        let query = params.to_query_string();

        assert!(query.contains("q=cats%20%26%20dogs"));
        assert!(query.contains("page=1"));
        assert!(query.contains("per_page=25"));
        assert!(query.contains("safesearch=true"));
        assert!(query.contains("editors_choice=true"));
        assert!(!query.contains("category="));
    }

    #[test]
    fn test_category_with_filter_on_second_page() {
        let mut state = SessionState::new();
        state.active_category = Some("nature".to_string());
        state.filters = FilterSet::from_pairs([("orientation", "horizontal")]).unwrap();
        state.page = 2;

        let pairs = build(&state).to_pairs();

        assert_eq!(pair(&pairs, "category"), Some("nature"));
        assert_eq!(pair(&pairs, "orientation"), Some("horizontal"));
        assert_eq!(pair(&pairs, "page"), Some("2"));
        assert_eq!(pair(&pairs, "q"), None);
    }

    #[test]
    fn test_search_wins_over_category() {
        let mut state = SessionState::new();
        state.search_text = "mountains".to_string();
        state.active_category = Some("nature".to_string());

        let params = build(&state);
        assert_eq!(params.search_term.as_deref(), Some("mountains"));
        assert_eq!(params.category, None);
    }

    #[test]
    fn test_short_search_falls_back_to_category() {
        let mut state = SessionState::new();
        state.search_text = " ab ".to_string();
        state.active_category = Some("music".to_string());

        let params = build(&state);
        assert_eq!(params.search_term, None);
        assert_eq!(params.category.as_deref(), Some("music"));
    }

    #[test]
    fn test_search_term_is_sent_as_committed() {
        let mut state = SessionState::new();
        state.search_text = "red fox".to_string();
        assert_eq!(build(&state).search_term.as_deref(), Some("red fox"));

        state.search_text = " red fox".to_string();
        assert_eq!(build(&state).search_term.as_deref(), Some(" red fox"));
    }

    #[test]
    fn test_filter_values_pass_through_unencoded() {
        let mut state = SessionState::new();
        state.filters = FilterSet::from_pairs([("colors", "red,blue")]).unwrap();

        assert!(build(&state).to_query_string().ends_with("colors=red,blue"));
    }

    #[test]
    fn test_is_searchable_counts_characters() {
        assert!(!is_searchable(""));
        assert!(!is_searchable("ab"));
        assert!(!is_searchable("  ab  "));
        assert!(is_searchable("abc"));
        assert!(is_searchable("été"));
    }
}
