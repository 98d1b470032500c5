//! passfinder (Rust)
//!
//! Fetches the entry pass collection and narrows it with an incremental
//! search. Two modes:
//! - `watch` (default): interactive, each stdin line replaces the query and
//!   results are re-rendered as debounced fetches complete
//! - `search --query <Q>`: one fetch, filter, print, exit

mod cli;
mod coordinator;
mod error;
mod http;
mod passes;
mod search;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use coordinator::{CoordinatorConfig, FetchCoordinator, SearchView};
use error::{validate_endpoint, ConfigError};
use passes::format::{format_results, format_results_json};
use passes::{HttpPassSource, PassSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags; RUST_LOG wins when set
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let endpoint = validate_endpoint(&cli.endpoint)?;
    let client = http::client_with_timeout(Duration::from_secs(cli.timeout_secs))?;
    let source = Arc::new(HttpPassSource::new(client, endpoint));
    info!("Using endpoint {}", source.endpoint());

    match cli.command {
        Some(Commands::Search(args)) => execute_search_cli(source, &args.query, cli.json).await,
        Some(Commands::Watch) | None => {
            let config = CoordinatorConfig {
                debounce: Duration::from_millis(cli.debounce_ms),
            };
            execute_watch_cli(source, config, cli.json).await
        }
    }
}

/// One-shot search. Fetch failures print as zero results, like the page does.
async fn execute_search_cli(source: Arc<HttpPassSource>, query: &str, json: bool) -> Result<()> {
    let records = match source.fetch_all().await {
        Ok(records) => records,
        Err(e) => {
            warn!(error_code = e.error_code(), "Fetch failed: {}", e);
            Vec::new()
        }
    };

    let results = search::apply_query(query, records);
    print_results(&results, query, json);
    Ok(())
}

/// Interactive search driven by stdin lines
async fn execute_watch_cli(
    source: Arc<HttpPassSource>,
    config: CoordinatorConfig,
    json: bool,
) -> Result<()> {
    let coordinator = FetchCoordinator::spawn(source, config);
    let mut views = WatchStream::new(coordinator.subscribe());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Type to search entry passes; an empty line clears the query, Ctrl-D quits.");

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => coordinator.set_query(line.trim_end_matches('\r')),
                None => break,
            },
            Some(view) = views.next() => render_view(&view, json),
        }
    }

    coordinator.shutdown().await;
    Ok(())
}

fn render_view(view: &SearchView, json: bool) {
    if view.loading {
        eprintln!("Loading entry passes...");
    } else if view.searching {
        eprintln!("Searching...");
    } else {
        print_results(&view.results, &view.query, json);
    }
}

fn print_results(results: &[passes::PassRecord], query: &str, json: bool) {
    if json {
        println!("{}", format_results_json(results, query));
    } else {
        print!("{}", format_results(results, query));
    }
}

/// Map errors to exit codes
fn get_exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some() {
        1 // Invalid arguments or setup
    } else if err.downcast_ref::<std::io::Error>().is_some() {
        2 // Terminal I/O
    } else {
        5 // Other application errors
    }
}
