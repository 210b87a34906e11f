//! Wallify CLI application entry point
//!
//! Browse, search and filter an online image catalog from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session (default command)
//! wallify
//! wallify browse
//!
//! # One page of results
//! wallify search "mountain lake" --filter orientation=horizontal
//! wallify search -c animals -p 2
//!
//! # Vocabulary
//! wallify list categories
//! wallify list filters
//!
//! # Settings
//! wallify config set api_key=YOUR_KEY
//! wallify config show
//! ```
//!
//! # Configuration
//!
//! Settings live in the user's config directory
//! (`~/.config/wallify/config.toml` on Linux) and can be overridden with
//! `WALLIFY_*` environment variables. On first interactive use without an
//! API key, wallify prompts for one.

use log::{LevelFilter, debug};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use wallify::{
    WallifyError,
    cli::{Cli, Commands},
    commands::{self, search::SearchRequest},
    config::{self, WallifyConfig},
    gateway::PixabayGateway,
    ui::{OutputWriter, StdoutWriter},
};

type Result<T> = std::result::Result<T, WallifyError>;

/// Set up `env_logger`; `RUST_LOG` wins over `-v`
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

/// Build the HTTP gateway, prompting for an API key if none is configured
fn connect(mut config: WallifyConfig, config_path: &Path) -> Result<PixabayGateway> {
    if config.api_key().is_none() && std::io::stdin().is_terminal() {
        config.api_key = config::first_time_setup(config_path)?.api_key;
    }

    let api_key = config.api_key().ok_or_else(|| {
        WallifyError::InvalidInput(
            "No API key configured. Run 'wallify config set api_key=KEY' or set WALLIFY_API_KEY."
                .into(),
        )
    })?;

    Ok(PixabayGateway::new(
        config.endpoint.clone(),
        api_key,
        config.request_timeout(),
    )?)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let quiet = cli.quiet;
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            StdoutWriter::new(quiet).error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => WallifyConfig::config_path()?,
    };
    let config = WallifyConfig::load_or_create(&config_path)?;
    debug!("Loaded configuration from {}", config_path.display());

    let quiet = cli.quiet || config.quiet;
    let out = StdoutWriter::new(quiet);
    let command = cli.get_command();

    match &command {
        Commands::List { variant } => {
            commands::list(*variant, &out, quiet);
            Ok(())
        }
        Commands::Config { command } => commands::config(config, &config_path, command, &out),
        Commands::Browse => {
            let debounce = cli
                .debounce_ms
                .map_or_else(|| config.debounce(), Duration::from_millis);
            let gateway = Arc::new(connect(config, &config_path)?);
            let stdin = BufReader::new(tokio::io::stdin());
            runtime()?.block_on(commands::browse(gateway, debounce, stdin, &out, quiet))
        }
        Commands::Search {
            query,
            category,
            page,
            ..
        } => {
            let request = SearchRequest {
                query: query.clone(),
                category: category.clone(),
                filters: command.get_filters_from_search()?,
                page: *page,
            };
            let gateway = connect(config, &config_path)?;
            runtime()?.block_on(commands::search(&gateway, &request, &out, quiet))
        }
    }
}
