//! Filter vocabulary and the active filter set
//!
//! The catalog accepts a handful of refinement fields alongside the search
//! subject. `FilterSet` holds the user's current choice for each field and
//! guarantees that no filter can shadow a parameter the query builder owns.

use super::error::ValidationError;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Categories offered in the category strip
pub const CATEGORIES: [&str; 20] = [
    "backgrounds",
    "fashion",
    "nature",
    "science",
    "education",
    "feelings",
    "health",
    "people",
    "religion",
    "places",
    "animals",
    "industry",
    "computer",
    "food",
    "sports",
    "transportation",
    "travel",
    "buildings",
    "business",
    "music",
];

/// A refinement field and the values the filter sheet offers for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    /// Wire name of the field
    pub name: &'static str,
    /// Values offered to the user
    pub options: &'static [&'static str],
}

/// Filter fields offered in the filter sheet
pub const FILTER_FIELDS: [FilterField; 4] = [
    FilterField {
        name: "order",
        options: &["popular", "latest"],
    },
    FilterField {
        name: "orientation",
        options: &["horizontal", "vertical"],
    },
    FilterField {
        name: "image_type",
        options: &["photo", "illustration", "vector"],
    },
    FilterField {
        name: "colors",
        options: &[
            "red",
            "orange",
            "yellow",
            "green",
            "turquoise",
            "blue",
            "pink",
            "gray",
            "black",
            "brown",
            "white",
        ],
    },
];

/// Query fields owned by the query builder or the gateway
const RESERVED_FIELDS: [&str; 7] = [
    "key",
    "q",
    "category",
    "page",
    "per_page",
    "safesearch",
    "editors_choice",
];

/// Look up a filter field from the vocabulary by wire name
#[must_use]
pub fn known_field(name: &str) -> Option<&'static FilterField> {
    FILTER_FIELDS.iter().find(|field| field.name == name)
}

/// Whether `name` is one of the offered categories
#[must_use]
pub fn is_known_category(name: &str) -> bool {
    CATEGORIES.contains(&name)
}

/// Notes on terms outside the offered vocabulary
///
/// The catalog accepts more than the view offers, so these are warnings,
/// not errors.
#[must_use]
pub fn unfamiliar_terms(category: Option<&str>, filters: &FilterSet) -> Vec<String> {
    let mut notes = Vec::new();

    if let Some(category) = category.filter(|name| !is_known_category(name)) {
        notes.push(format!("'{category}' is not a listed category"));
    }
    for (field, value) in filters.iter() {
        match known_field(field) {
            None => notes.push(format!("'{field}' is not a listed filter")),
            Some(known) if !known.options.contains(&value) => {
                notes.push(format!("'{value}' is not a listed value for {field}"));
            }
            Some(_) => {}
        }
    }
    notes
}

/// Parse a single `FIELD=VALUE` token
///
/// Whitespace around the field and value is ignored.
///
/// # Errors
///
/// Returns `ValidationError::Malformed` if the token has no `=`, and the
/// `FilterSet::insert` errors for empty or reserved fields.
///
/// # Examples
///
/// ```
/// use wallify::query::parse_filter;
///
/// let (field, value) = parse_filter("orientation=horizontal").unwrap();
/// assert_eq!(field, "orientation");
/// assert_eq!(value, "horizontal");
/// assert!(parse_filter("orientation").is_err());
/// ```
pub fn parse_filter(token: &str) -> Result<(String, String), ValidationError> {
    let (field, value) = token
        .split_once('=')
        .ok_or_else(|| ValidationError::Malformed(token.to_string()))?;
    let (field, value) = (field.trim(), value.trim());
    validate_entry(field, value)?;
    Ok((field.to_string(), value.to_string()))
}

fn validate_entry(field: &str, value: &str) -> Result<(), ValidationError> {
    if field.is_empty() {
        return Err(ValidationError::EmptyField);
    }
    if RESERVED_FIELDS.contains(&field) {
        return Err(ValidationError::ReservedField(field.to_string()));
    }
    if value.is_empty() {
        return Err(ValidationError::EmptyValue(field.to_string()));
    }
    Ok(())
}

/// The active filters, one value per field
///
/// Ordered by field name so two sets with the same entries always render the
/// same query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet(BTreeMap<String, String>);

impl FilterSet {
    /// Create an empty filter set
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a filter set from `(field, value)` pairs
    ///
    /// Later pairs for the same field replace earlier ones.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` raised by `insert`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (field, value) in pairs {
            set.insert(field, value)?;
        }
        Ok(set)
    }

    /// Set `field` to `value`, returning the previous value
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the field is empty or reserved, or the
    /// value is empty.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, ValidationError> {
        let (field, value) = (field.into(), value.into());
        validate_entry(&field, &value)?;
        Ok(self.0.insert(field, value))
    }

    /// Remove a field, returning its value if it was active
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    /// Value currently selected for `field`
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Overlay `other` on top of this set; fields in `other` win
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (field, value) in &other.0 {
            merged.0.insert(field.clone(), value.clone());
        }
        merged
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, value)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Borrow the underlying map
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
