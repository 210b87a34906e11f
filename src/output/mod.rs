//! Output formatting for CLI display
//!
//! Turns image records, session snapshots and the filter vocabulary into
//! printable lines. Functions take a `quiet` flag: quiet output drops
//! decoration so it can be piped.

use crate::gateway::ImageRecord;
use crate::query::{FilterField, FilterSet};
use crate::session::RenderSnapshot;
use colored::Colorize;

/// Height-to-width ratio at or below which an image counts as wide (16:9)
const WIDE_RATIO: f64 = 9.0 / 16.0;

/// Short shape hint for an image: `tall`, `wide` or nothing
#[must_use]
pub fn shape_label(record: &ImageRecord) -> &'static str {
    if record.is_portrait() {
        "tall"
    } else if record.aspect_ratio() <= WIDE_RATIO {
        "wide"
    } else {
        ""
    }
}

/// Format one image as `id  WxH shape  url`
#[must_use]
pub fn image_line(record: &ImageRecord, quiet: bool) -> String {
    if quiet {
        return record.display_url.clone();
    }

    let dims = format!("{}x{}", record.width, record.height);
    let mut line = format!(
        "  {:>9}  {:>11} {:<4}  {}",
        record.id,
        dims.dimmed(),
        shape_label(record),
        record.display_url
    );
    if !record.tags.is_empty() {
        line.push_str(&format!("  [{}]", record.tags.cyan()));
    }
    line
}

/// Render active filters as `field=value` chips
#[must_use]
pub fn filter_chips(filters: &FilterSet) -> String {
    filters
        .iter()
        .map(|(field, value)| format!("{field}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line summary of what the session is showing
#[must_use]
pub fn subject_line(snapshot: &RenderSnapshot) -> String {
    let search = if snapshot.search_text.trim().is_empty() {
        "(all)".to_string()
    } else {
        format!("\"{}\"", snapshot.search_text)
    };
    let category = snapshot.active_category.as_deref().unwrap_or("any");

    let mut line = format!("search {search} | category {category}");
    if !snapshot.active_filters.is_empty() {
        line.push_str(&format!(" | {}", filter_chips(&snapshot.active_filters)));
    }
    line
}

/// Loading/error/paging status of a snapshot
#[must_use]
pub fn status_line(snapshot: &RenderSnapshot) -> String {
    if snapshot.is_loading {
        return "loading...".yellow().to_string();
    }
    if let Some(message) = &snapshot.error_message {
        return message.red().to_string();
    }

    let more = if snapshot.has_more {
        "(:more for next page)"
    } else {
        "(end of results)"
    };
    format!(
        "{} image(s), page {} {}",
        snapshot.items.len(),
        snapshot.page,
        more.dimmed()
    )
}

/// Format a category for listing
#[must_use]
pub fn category_line(name: &str, quiet: bool) -> String {
    if quiet {
        name.to_string()
    } else {
        format!("  {}", name.green())
    }
}

/// Format a filter field with its known values
#[must_use]
pub fn filter_field_line(field: &FilterField, quiet: bool) -> String {
    if quiet {
        format!("{}={}", field.name, field.options.join(","))
    } else {
        format!("  {:<12} {}", field.name.bold(), field.options.join(" | "))
    }
}
