//! Error types shared between client and server.
//!
//! The `StreamError` enum unifies common failure cases for I/O, serialization,
//! channel communication, HTTP handling and internal logic, allowing crates to
//! propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum StreamError {
    /// I/O error originating from the standard library or sockets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Rejected startup configuration (empty symbol set, bad price range, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or unexpected HTTP request/response head.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Crossbeam/channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Internal logic error where a requested ticker symbol is not part of the model.
    #[error("Internal Logic Error: Ticker not found: {0}")]
    TickerNotFound(String),
}

impl<T> From<PoisonError<T>> for StreamError {
    fn from(err: PoisonError<T>) -> Self {
        StreamError::MutexLock(err.to_string())
    }
}
