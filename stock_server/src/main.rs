//! Stock quotes SSE streaming server.
//!
//! This binary serves a dashboard page and a Server-Sent Events endpoint. Internally it
//! wires together:
//!
//! - `PriceModel` — rolling per-ticker price histories advanced by a small random walk,
//!   shared by all connections behind a mutex.
//! - `QuoteStream` — an endless iterator that ticks the model for a random ticker and
//!   yields `data: {json}\n\n` frames, pausing between frames.
//! - `SseServer` — accepts TCP connections and serves each one on its own thread. A
//!   `GET /stream` client gets its own `QuoteStream`; the thread ends when a write fails
//!   because the client went away.
//!
//! Defaults: `http://127.0.0.1:5000`, tickers `AAPL GOOG MSFT AMZN`, one quote every
//! 2 seconds. See `--help` for the full list of options.
use clap::Parser;
use log::info;
use stock_common::net::addr;
use stock_common::{Result, StreamError};
use stock_server::args::Args;
use stock_server::{PriceModel, SseServer};

fn main() -> Result<(), StreamError> {
    init_logger();
    let args = Args::parse();

    let config = args.model_config()?;
    let interval = args.tick_interval()?;
    info!(
        "Starting prices drawn from {:?}, keeping {} prices per ticker",
        config.price_range(),
        config.history_capacity()
    );
    let model = match args.seed {
        Some(seed) => PriceModel::seeded(&config, seed),
        None => PriceModel::initialize(&config),
    };
    for symbol in model.symbols() {
        if let Some(price) = model.last_price(symbol) {
            info!("{} starts at {:.2}", symbol, price);
        }
    }

    let server = SseServer::bind(&addr(&args.bind, args.port), model.into_shared(), interval)?;
    info!(
        "Streaming a quote every {:?}; dashboard at http://{}/",
        interval,
        server.local_addr()?
    );
    server.run()
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
