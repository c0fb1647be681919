//! Quote snapshot and its JSON wire encoding.
//!
//! A `Quote` is produced on every tick: the symbol, the freshly computed price, the
//! difference to the previous price and a copy of the symbol's rolling history. Values
//! keep full `f64` precision in memory; rounding to cents happens only when the quote is
//! serialized.
//!
//! The encoding mirrors the classic `json.dumps` layout with `", "` and `": "`
//! separators, e.g.
//! `{"symbol": "AAPL", "price": 100.6, "change": 0.6, "history": [100.0, 100.6]}`.

use std::io;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::ser::Formatter;

use crate::error::StreamError;
use crate::tickers::Ticker;

/// Market quote for a single ticker symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol the tick was computed for.
    pub symbol: Ticker,
    /// New price after the tick.
    #[serde(serialize_with = "serialize_cents")]
    pub price: f64,
    /// `price` minus the previous price.
    #[serde(serialize_with = "serialize_cents")]
    pub change: f64,
    /// Rolling history, oldest first, including `price` as the last entry.
    #[serde(serialize_with = "serialize_cents_seq")]
    pub history: Vec<f64>,
}

impl Quote {
    /// Encode the quote as a JSON object string.
    pub fn to_json(&self) -> Result<String, StreamError> {
        let mut buf = Vec::with_capacity(64 + self.history.len() * 8);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| StreamError::Format(e.to_string()))
    }

    /// Decode a quote from a JSON payload.
    pub fn from_json(payload: &str) -> Result<Quote, StreamError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Round a value to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn serialize_cents<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_cents(*value))
}

fn serialize_cents_seq<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|value| round_cents(*value)))
}

/// Compact JSON with a space after every `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
