//! Stock quote SSE server.
//!
//! Library half of the `stock_server` binary:
//!
//! - `model` — the price model and the paced `QuoteStream` iterator built on it.
//! - `server` — a small HTTP/1.1 front that serves the dashboard page and streams
//!   quotes to every client on its own thread.
//! - `page` — the dashboard HTML.
//! - `args` — CLI parsing and conversion into validated settings.
#![warn(missing_docs)]
pub mod args;
pub mod model;
pub mod page;
pub mod server;

pub use model::price_model::{ModelConfig, PriceModel, SharedPriceModel};
pub use model::quote_stream::QuoteStream;
pub use server::SseServer;
