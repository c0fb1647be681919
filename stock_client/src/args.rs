//! Command-line arguments for the Stock Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use stock_common::tickers::Ticker;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server address as `host:port`.
    #[clap(long, default_value = "127.0.0.1:5000")]
    pub server: String,

    /// Only print quotes for these tickers (comma-separated). Prints everything when empty.
    #[clap(long, value_enum, value_delimiter = ',')]
    pub symbols: Vec<Ticker>,

    /// Exit after this many printed quotes.
    #[clap(long)]
    pub max_events: Option<u64>,

    /// Seconds to wait before reconnecting after the stream breaks.
    #[clap(long, default_value_t = 3)]
    pub retry_secs: u64,
}
