//! Ticker symbols shared between client and server.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Symbols streamed when no explicit set is configured.
pub const DEFAULT_TICKERS: [Ticker; 4] = [Ticker::AAPL, Ticker::GOOG, Ticker::MSFT, Ticker::AMZN];

/// Set of supported ticker symbols.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Ticker {
    AAPL,
    GOOG,
    MSFT,
    AMZN,
    NVDA,
    META,
    TSLA,
    JPM,
    V,
    NFLX,
    ADBE,
    INTC,
    ORCL,
    DIS,
    KO,
    PEP,
}
