//! Line input for the browse view
//!
//! Each line typed at the browse prompt becomes one [`LineCommand`]. Plain
//! text is search-box input; lines starting with `:` are commands. A
//! leading `::` escapes a search that itself starts with a colon.

use super::error::{InputError, Result};
use crate::query::{FilterSet, parse_filter};
use crate::session::Intent;

/// Command names with their one-line help
pub const COMMANDS: [(&str, &str); 9] = [
    (":cat NAME", "toggle a category"),
    (":filter F=V ...", "apply filters on top of the active ones"),
    (":unfilter FIELD", "remove one active filter"),
    (":reset", "remove all filters"),
    (":more", "load the next page"),
    (":clear", "start over"),
    (":help", "show this help"),
    (":quit", "leave"),
    ("TEXT", "search (an empty line clears the search)"),
];

/// What a typed line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    /// Forward to the session
    Intent(Intent),
    /// Print the command list
    Help,
    /// End the session
    Quit,
}

/// Parse one input line
///
/// `active` is the filter set currently applied; `:filter` edits it the way
/// the filter sheet does, so untouched fields keep their values.
///
/// # Errors
///
/// Returns `InputError` for unknown commands, missing arguments, and filter
/// tokens that fail validation.
///
/// # Examples
///
/// ```
/// use wallify::query::FilterSet;
/// use wallify::session::Intent;
/// use wallify::ui::input::{LineCommand, parse_line};
///
/// let command = parse_line(":cat nature", &FilterSet::new()).unwrap();
/// assert_eq!(command, LineCommand::Intent(Intent::CategorySelected("nature".into())));
/// ```
pub fn parse_line(line: &str, active: &FilterSet) -> Result<LineCommand> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(escaped) = line.strip_prefix("::") {
        return Ok(LineCommand::Intent(Intent::TextChanged(format!(":{escaped}"))));
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(LineCommand::Intent(Intent::TextChanged(line.to_string())));
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();

    let intent = match name {
        "cat" | "category" => {
            let category = rest.join(" ");
            if category.is_empty() {
                return Err(InputError::MissingArgument(":cat NAME"));
            }
            Intent::CategorySelected(category)
        }
        "filter" | "f" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument(":filter FIELD=VALUE ..."));
            }
            let mut edits = FilterSet::new();
            for token in rest {
                let (field, value) = parse_filter(token)?;
                edits.insert(field, value)?;
            }
            Intent::FiltersApplied(active.merged(&edits))
        }
        "unfilter" | "uf" => match rest.as_slice() {
            [field] => Intent::FilterRemoved((*field).to_string()),
            _ => return Err(InputError::MissingArgument(":unfilter FIELD")),
        },
        "reset" => Intent::FiltersReset,
        "more" | "m" => Intent::LoadMore,
        "clear" => Intent::ClearAll,
        "help" | "h" | "?" => return Ok(LineCommand::Help),
        "quit" | "q" | "exit" => return Ok(LineCommand::Quit),
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };

    Ok(LineCommand::Intent(intent))
}
