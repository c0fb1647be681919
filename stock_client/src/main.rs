//! Stock Client — a terminal consumer of the stock server's Server-Sent Events stream.
//! It opens `GET /stream`, decodes every `data:` frame into a `Quote` and logs it.
//! When the stream breaks it waits a few seconds and reconnects, like the browser
//! dashboard does.
//!
//! Usage example (CLI):
//! ```bash
//! stock_client --server 127.0.0.1:5000 --symbols aapl,msft --max-events 20
//! ```
#![warn(missing_docs)]
mod args;
mod listener;

use crate::args::Args;
use crate::listener::{QuoteListener, StreamEvent};
use chrono::Local;
use clap::Parser;
use crossbeam_channel::{Receiver, after, bounded, select, unbounded};
use log::{error, info, warn};
use stock_common::tickers::Ticker;
use stock_common::{Quote, Result, StreamError};
use std::time::Duration;

/// Why a single connection stopped.
enum Outcome {
    /// Ctrl+C or the event budget was reached.
    Finished,
    /// The stream broke and a reconnect should follow.
    Broken(String),
}

/// Returns `true` if `symbol` passes the CLI filter (an empty filter lets everything through).
fn wants(filter: &[Ticker], symbol: &Ticker) -> bool {
    filter.is_empty() || filter.contains(symbol)
}

fn print_quote(quote: &Quote) {
    let history: Vec<String> = quote.history.iter().map(|v| format!("{:.2}", v)).collect();
    info!(
        "QUOTE: {} Price={:.2} Change={:+.2} History=[{}] Received={}",
        quote.symbol,
        quote.price,
        quote.change,
        history.join(", "),
        Local::now().format("%H:%M:%S%.3f")
    );
}

/// Consume one connection until it breaks, Ctrl+C arrives or `--max-events` is reached.
fn run_connection(
    args: &Args,
    shutdown_rx: &Receiver<()>,
    printed: &mut u64,
) -> Result<Outcome, StreamError> {
    let reader = match QuoteListener::connect(&args.server) {
        Ok(reader) => reader,
        Err(e) => return Ok(Outcome::Broken(e.to_string())),
    };
    let (event_tx, event_rx) = unbounded::<StreamEvent>();
    QuoteListener::spawn(reader, event_tx);

    loop {
        select! {
            recv(shutdown_rx) -> _ => return Ok(Outcome::Finished),
            recv(event_rx) -> msg => match msg {
                Ok(StreamEvent::Quote(quote)) => {
                    if !wants(&args.symbols, &quote.symbol) {
                        continue;
                    }
                    print_quote(&quote);
                    *printed += 1;
                    if args.max_events.is_some_and(|max| *printed >= max) {
                        info!("Received {} quotes, stopping.", printed);
                        return Ok(Outcome::Finished);
                    }
                }
                Ok(StreamEvent::Closed(reason)) => return Ok(Outcome::Broken(reason)),
                Err(e) => return Err(StreamError::ChannelRecv(e.to_string())),
            }
        }
    }
}

fn main() -> Result<(), StreamError> {
    init_logger();
    let args = Args::parse();

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down client...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| StreamError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    info!("Client is running against {}. Press Ctrl+C to exit.", args.server);
    let retry = Duration::from_secs(args.retry_secs);
    let mut printed = 0;

    loop {
        match run_connection(&args, &shutdown_rx, &mut printed) {
            Ok(Outcome::Finished) => break,
            Ok(Outcome::Broken(reason)) => {
                warn!("Stream interrupted: {}. Reconnecting in {:?}", reason, retry);
                select! {
                    recv(shutdown_rx) -> _ => break,
                    recv(after(retry)) -> _ => {},
                }
            }
            Err(e) => {
                error!("Client loop failed: {}", e);
                return Err(e);
            }
        }
    }
    info!("Client stopped.");
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_accepts_everything() {
        assert!(wants(&[], &Ticker::AMZN));
    }

    #[test]
    fn filter_only_accepts_listed_symbols() {
        let filter = [Ticker::AAPL, Ticker::MSFT];
        assert!(wants(&filter, &Ticker::MSFT));
        assert!(!wants(&filter, &Ticker::GOOG));
    }

    #[test]
    fn cli_parses_symbol_filter_and_budget() {
        let args = Args::parse_from([
            "stock_client",
            "--symbols",
            "aapl,goog",
            "--max-events",
            "5",
        ]);
        assert_eq!(args.server, "127.0.0.1:5000");
        assert_eq!(args.symbols, vec![Ticker::AAPL, Ticker::GOOG]);
        assert_eq!(args.max_events, Some(5));
        assert_eq!(args.retry_secs, 3);
    }
}
