//! Command-line arguments for the stock server.
use clap::Parser;
use std::time::Duration;
use stock_common::net::{DEFAULT_BIND, DEFAULT_PORT};
use stock_common::tickers::{DEFAULT_TICKERS, Ticker};
use stock_common::{Result, StreamError};

use crate::model::price_model::{DEFAULT_HISTORY_CAPACITY, DEFAULT_PRICE_RANGE, ModelConfig};
use crate::model::quote_stream::DEFAULT_TICK_INTERVAL;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(
    version,
    about = "Streams simulated stock quotes over Server-Sent Events",
    long_about = None
)]
pub struct Args {
    /// Interface to bind the HTTP server to.
    #[clap(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    /// HTTP port.
    #[clap(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Comma-separated tickers to simulate.
    #[clap(long, value_enum, value_delimiter = ',', default_values_t = DEFAULT_TICKERS)]
    pub symbols: Vec<Ticker>,

    /// Lower bound (inclusive) of the random starting price.
    #[clap(long, default_value_t = DEFAULT_PRICE_RANGE.start)]
    pub price_low: f64,

    /// Upper bound (exclusive) of the random starting price.
    #[clap(long, default_value_t = DEFAULT_PRICE_RANGE.end)]
    pub price_high: f64,

    /// Number of prices kept per ticker.
    #[clap(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub history: usize,

    /// Seconds between two streamed quotes.
    #[clap(long, default_value_t = DEFAULT_TICK_INTERVAL.as_secs_f64())]
    pub interval_secs: f64,

    /// Seed for reproducible prices.
    #[clap(long)]
    pub seed: Option<u64>,
}

impl Args {
    /// Validated model configuration.
    pub fn model_config(&self) -> Result<ModelConfig> {
        ModelConfig::new(self.symbols.clone(), self.price_low..self.price_high, self.history)
    }

    /// Validated pause between two frames.
    pub fn tick_interval(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.interval_secs).map_err(|e| {
            StreamError::Config(format!(
                "invalid --interval-secs {}: {}",
                self.interval_secs, e
            ))
        })
    }
}
