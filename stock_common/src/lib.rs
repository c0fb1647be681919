//!
//! Common types and utilities shared by the stock server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `StreamError` used across the workspace.
//! - `result` — handy `Result<T, StreamError>` alias.
//! - `tickers` — ticker symbols shared by both sides.
//! - `quote` — the `Quote` snapshot and its JSON wire encoding.
//! - `sse` — Server-Sent Events framing and decoding.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod quote;
pub mod result;
pub mod sse;
pub mod tickers;

pub use error::StreamError;
pub use quote::Quote;
pub use result::Result;
