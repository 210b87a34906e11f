//! Session data model
//!
//! - **`SessionState`**: what the user asked for, plus loading/error flags
//! - **`ResultSet`**: the images accumulated for the current subject
//! - **`Intent`**: everything the view layer can ask the session to do
//! - **`RenderSnapshot`**: immutable view of the session handed to the view

use crate::gateway::{FetchError, ImageRecord};
use crate::query::FilterSet;

/// Query-relevant state of one browsing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Settled search text; the only text the query builder looks at
    pub search_text: String,

    /// Text as last typed, before the debounce window settles
    pub draft_text: String,

    /// Selected category, mutually exclusive with a searchable text
    pub active_category: Option<String>,

    /// Active refinement filters
    pub filters: FilterSet,

    /// Page of the most recent request, starting at 1
    pub page: u32,

    /// A fetch for the current subject is outstanding
    pub is_loading: bool,

    /// Failure of the most recent fetch for the current subject
    pub last_error: Option<FetchError>,

    /// Every hit for the current subject has been loaded
    pub exhausted: bool,
}

impl SessionState {
    /// Initial shape: first page, no text, no category, no filters
    #[must_use]
    pub const fn new() -> Self {
        Self {
            search_text: String::new(),
            draft_text: String::new(),
            active_category: None,
            filters: FilterSet::new(),
            page: 1,
            is_loading: false,
            last_error: None,
            exhausted: false,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Images loaded for the current subject, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub items: Vec<ImageRecord>,
    /// Last page merged into `items`; 0 when nothing has been merged
    pub page: u32,
    /// Hits reachable for this subject, if the catalog said so
    pub total_hits: Option<u64>,
}

impl ResultSet {
    /// Discard everything
    pub fn clear(&mut self) {
        self.items.clear();
        self.page = 0;
        self.total_hits = None;
    }

    /// Replace the contents with a fresh page
    pub fn replace(&mut self, page: u32, items: Vec<ImageRecord>, total_hits: Option<u64>) {
        self.items = items;
        self.page = page;
        self.total_hits = total_hits;
    }

    /// Append the next page to the contents
    pub fn append(&mut self, page: u32, items: Vec<ImageRecord>, total_hits: Option<u64>) {
        self.items.extend(items);
        self.page = page;
        if total_hits.is_some() {
            self.total_hits = total_hits;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// User intent emitted by the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Raw keystroke-level change of the search box
    TextChanged(String),
    /// Search text after the debounce window went quiet
    SearchSettled(String),
    /// Category chip tapped; tapping the active chip deselects it
    CategorySelected(String),
    /// Filter sheet applied with a new filter set
    FiltersApplied(FilterSet),
    /// A single active filter chip dismissed
    FilterRemoved(String),
    /// Filter sheet reset
    FiltersReset,
    /// Scrolled to the end of the results
    LoadMore,
    /// Start over from the initial state
    ClearAll,
}

impl Intent {
    /// Whether this intent changes the query subject and so replaces results
    #[must_use]
    pub const fn is_replace_class(&self) -> bool {
        !matches!(self, Self::TextChanged(_) | Self::LoadMore)
    }
}

/// How a fetch result is merged into the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Discard previous items
    Replace,
    /// Keep previous items and add the new page after them
    Append,
}

/// Render-ready view of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub items: Vec<ImageRecord>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    /// Text to show in the search box
    pub search_text: String,
    pub active_category: Option<String>,
    pub active_filters: FilterSet,
    pub page: u32,
    /// `LoadMore` would fetch another page
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> ImageRecord {
        ImageRecord {
            id,
            width: 640,
            height: 480,
            display_url: format!("https://cdn.example/{id}.jpg"),
            preview_url: None,
            large_url: None,
            page_url: None,
            tags: String::new(),
            user: String::new(),
        }
    }

    #[test]
    fn test_initial_state() {
        let state = SessionState::default();
        assert_eq!(state.page, 1);
        assert!(state.search_text.is_empty());
        assert!(state.active_category.is_none());
        assert!(state.filters.is_empty());
        assert!(!state.is_loading);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_result_set_append_keeps_order() {
        let mut results = ResultSet::default();
        results.replace(1, vec![record(1), record(2)], Some(4));
        results.append(2, vec![record(3), record(4)], None);

        let ids: Vec<u64> = results.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(results.page, 2);
        assert_eq!(results.total_hits, Some(4));
    }

    #[test]
    fn test_result_set_replace_and_clear() {
        let mut results = ResultSet::default();
        results.replace(1, vec![record(1)], None);
        results.replace(1, vec![record(9)], None);
        assert_eq!(results.items, vec![record(9)]);

        results.clear();
        assert!(results.is_empty());
        assert_eq!(results.page, 0);
    }

    #[test]
    fn test_replace_class_intents() {
        assert!(!Intent::LoadMore.is_replace_class());
        assert!(!Intent::TextChanged("ca".into()).is_replace_class());
        assert!(Intent::SearchSettled("cat".into()).is_replace_class());
        assert!(Intent::CategorySelected("nature".into()).is_replace_class());
        assert!(Intent::FiltersReset.is_replace_class());
        assert!(Intent::ClearAll.is_replace_class());
    }
}
