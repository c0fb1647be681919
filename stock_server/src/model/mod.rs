//! Domain models for the stock server.
//!
//! This module groups the core of the streaming demo:
//! - `price_model` — per-symbol rolling price history and the random-walk tick.
//! - `quote_stream` — lazy, paced iterator of SSE frames pulled from the model.

pub mod price_model;
pub mod quote_stream;
