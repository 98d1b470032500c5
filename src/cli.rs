//! CLI mode implementation
//!
//! Command-line front end standing in for the search page

use crate::passes::DEFAULT_ENDPOINT;
use clap::{Parser, Subcommand};

/// passfinder CLI
#[derive(Parser, Debug)]
#[command(name = "passfinder")]
#[command(about = "Search entry passes fetched from a remote endpoint", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Endpoint returning the JSON array of passes
    #[arg(long, global = true, env = "PASSFINDER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Quiet period after the last query change before fetching
    #[arg(long, global = true, default_value_t = 300)]
    pub debounce_ms: u64,

    /// Total timeout of one fetch
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Print results as the raw JSON array instead of cards
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive search: every line read from stdin replaces the query
    Watch,
    /// Fetch once, filter by the query and exit
    Search(SearchArgs),
}

/// Search command arguments
#[derive(Parser, Clone, Debug)]
pub struct SearchArgs {
    /// Name, category or pass number; empty lists everything
    #[arg(short = 'q', long, default_value = "")]
    pub query: String,
}
