//! List command - print the category and filter vocabulary

use crate::cli::ListVariant;
use crate::output;
use crate::query::{CATEGORIES, FILTER_FIELDS};
use crate::ui::OutputWriter;

/// Execute the list command
pub fn execute(variant: ListVariant, out: &dyn OutputWriter, quiet: bool) {
    match variant {
        ListVariant::Categories => {
            out.info("Categories:");
            for name in CATEGORIES {
                out.write(&output::category_line(name, quiet));
            }
        }
        ListVariant::Filters => {
            out.info("Filters (use as FIELD=VALUE):");
            for field in &FILTER_FIELDS {
                out.write(&output::filter_field_line(field, quiet));
            }
        }
    }
}
