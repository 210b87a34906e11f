//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for wallify using the `clap` crate.
//!
//! # Commands
//!
//! - **browse**: Interactive session; type to search, `:` for commands (default)
//! - **search**: One-shot search that prints a single result page
//! - **list**: Show the category and filter vocabulary
//! - **config**: Read or update settings
//!
//! # Examples
//!
//! ```
//! use wallify::cli::{Cli, Commands};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["wallify", "search", "mountain lake", "-c", "nature"]);
//! match cli.get_command() {
//!     Commands::Search { query, category, .. } => {
//!         assert_eq!(query.as_deref(), Some("mountain lake"));
//!         assert_eq!(category.as_deref(), Some("nature"));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use crate::query::{FilterSet, ValidationError, parse_filter};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// List variant for the list command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListVariant {
    /// Categories accepted by `--category` and `:cat`
    Categories,
    /// Filter fields and their known values
    Filters,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., debounce_ms=250)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., endpoint)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print every setting
    Show,

    /// Print the config file location
    Path,

    /// Prompt for the API key and save it
    Setup,
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "wallify")]
#[command(about = "Browse and search an online image catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log debug details to stderr (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Read settings from this file instead of the default location
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Quiet window before typed text becomes a search (overrides config)
    #[arg(long = "debounce-ms", value_name = "MS", global = true)]
    pub debounce_ms: Option<u64>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive browse session (default)
    #[command(visible_alias = "b")]
    Browse,

    /// Fetch a single page of results and print it
    #[command(visible_alias = "s")]
    Search {
        /// Search text; fewer than three characters searches everything
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// Restrict results to one category
        #[arg(short = 'c', long = "category", value_name = "NAME")]
        category: Option<String>,

        /// Filter as field=value (repeatable)
        #[arg(short = 'f', long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,

        /// Page number, starting at 1
        #[arg(short = 'p', long = "page", default_value_t = 1,
              value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// List categories or filter fields
    #[command(visible_alias = "ls")]
    List {
        /// What to list
        #[arg(value_enum, default_value_t = ListVariant::Categories)]
        variant: ListVariant,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to Browse if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Browse)
    }
}

impl Commands {
    /// Collect `--filter` arguments of a search into a validated set
    ///
    /// Later occurrences of a field win. Returns an empty set for other commands.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a malformed token or reserved field.
    pub fn get_filters_from_search(&self) -> Result<FilterSet, ValidationError> {
        let Self::Search { filters, .. } = self else {
            return Ok(FilterSet::new());
        };

        let mut set = FilterSet::new();
        for token in filters {
            let (field, value) = parse_filter(token)?;
            set.insert(field, value)?;
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_browse() {
        let cli = Cli::parse_from(["wallify"]);
        assert_eq!(cli.get_command(), Commands::Browse);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["wallify", "browse", "-q", "--debounce-ms", "150"]);
        assert!(cli.quiet);
        assert_eq!(cli.debounce_ms, Some(150));
    }

    #[test]
    fn test_parse_search_with_filters() {
        let cli = Cli::parse_from([
            "wallify", "s", "sunset", "-f", "colors=red", "--filter", "order=latest", "-p", "3",
        ]);
        let command = cli.get_command();
        let Commands::Search { query, page, .. } = &command else {
            panic!("Expected Search command");
        };
        assert_eq!(query.as_deref(), Some("sunset"));
        assert_eq!(*page, 3);

        let filters = command.get_filters_from_search().unwrap();
        assert_eq!(filters.get("colors"), Some("red"));
        assert_eq!(filters.get("order"), Some("latest"));
    }

    #[test]
    fn test_search_rejects_page_zero() {
        assert!(Cli::try_parse_from(["wallify", "search", "-p", "0"]).is_err());
    }

    #[test]
    fn test_search_reserved_filter_is_rejected() {
        let cli = Cli::parse_from(["wallify", "search", "-f", "page=4"]);
        assert!(matches!(
            cli.get_command().get_filters_from_search(),
            Err(ValidationError::ReservedField(_))
        ));
    }

    #[test]
    fn test_list_variants() {
        let cli = Cli::parse_from(["wallify", "ls", "filters"]);
        assert_eq!(
            cli.get_command(),
            Commands::List { variant: ListVariant::Filters }
        );

        let cli = Cli::parse_from(["wallify", "list"]);
        assert_eq!(
            cli.get_command(),
            Commands::List { variant: ListVariant::Categories }
        );
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["wallify", "config", "set", "quiet=true"]);
        assert!(matches!(
            cli.get_command(),
            Commands::Config { command: ConfigCommands::Set { ref setting } } if setting == "quiet=true"
        ));
    }
}
