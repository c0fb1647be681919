//! In-memory price model with a rolling history per symbol.
//!
//! The model owns one bounded `VecDeque<f64>` per configured ticker and computes the
//! next price with a small random walk around the last stored value:
//!
//! - the change is sampled uniformly from `[-0.6%, +0.6%]`,
//! - the result is clamped to `MIN_PRICE` so a price can never reach zero,
//! - the new value is appended to the history, evicting the oldest entry once the
//!   configured capacity is reached.
//!
//! Starting prices are rounded to cents once at initialization. Every later price is
//! stored with full precision; rounding only happens when a `Quote` is serialized, so
//! rounding error does not compound across ticks.
//!
//! The model is not synchronized. Connections share it through `SharedPriceModel`, and a
//! whole tick (symbol choice plus read-modify-append) runs under one lock.

use std::collections::{HashMap, VecDeque};
use std::ops::Range;
use std::sync::{Arc, Mutex};

use log::debug;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use stock_common::quote::round_cents;
use stock_common::tickers::{DEFAULT_TICKERS, Ticker};
use stock_common::{Quote, Result, StreamError};

/// Largest relative move of a single tick, in both directions.
pub const MAX_TICK_CHANGE: f64 = 0.006;
/// Floor applied to every computed price.
pub const MIN_PRICE: f64 = 1.0;
/// Default range for starting prices.
pub const DEFAULT_PRICE_RANGE: Range<f64> = 120.0..250.0;
/// Default number of prices kept per symbol.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Model handle shared by all connection threads.
pub type SharedPriceModel = Arc<Mutex<PriceModel>>;

/// Validated parameters for `PriceModel::initialize`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    symbols: Vec<Ticker>,
    price_range: Range<f64>,
    history_capacity: usize,
}

impl ModelConfig {
    /// Build a configuration, rejecting values the model cannot work with.
    ///
    /// Duplicate symbols are dropped while keeping the first-seen order.
    pub fn new(
        symbols: Vec<Ticker>,
        price_range: Range<f64>,
        history_capacity: usize,
    ) -> Result<Self> {
        let mut unique: Vec<Ticker> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }
        if unique.is_empty() {
            return Err(StreamError::Config("at least one symbol is required".into()));
        }
        if !price_range.start.is_finite() || !price_range.end.is_finite() {
            return Err(StreamError::Config(format!(
                "price range {:?} must be finite",
                price_range
            )));
        }
        if price_range.start < MIN_PRICE || price_range.start >= price_range.end {
            return Err(StreamError::Config(format!(
                "price range {:?} must satisfy {} <= low < high",
                price_range, MIN_PRICE
            )));
        }
        if history_capacity == 0 {
            return Err(StreamError::Config("history capacity must be at least 1".into()));
        }
        Ok(Self {
            symbols: unique,
            price_range,
            history_capacity,
        })
    }

    /// Configured symbols, in order.
    pub fn symbols(&self) -> &[Ticker] {
        &self.symbols
    }

    /// Range starting prices are drawn from.
    pub fn price_range(&self) -> Range<f64> {
        self.price_range.clone()
    }

    /// Maximum number of prices kept per symbol.
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_TICKERS.to_vec(),
            price_range: DEFAULT_PRICE_RANGE,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Round a drawn starting price to cents without leaving `[low, high)`.
///
/// Rounding to nearest can land on `high` itself; the neighbouring cents are tried
/// next, and a range too narrow to hold any cent value keeps the raw draw.
fn starting_price(draw: f64, range: &Range<f64>) -> f64 {
    let rounded = round_cents(draw);
    [rounded, round_cents(rounded - 0.01), round_cents(rounded + 0.01)]
        .into_iter()
        .find(|price| range.contains(price))
        .unwrap_or(draw)
}

/// Rolling price histories plus the random source driving them.
#[derive(Debug)]
pub struct PriceModel {
    symbols: Vec<Ticker>,
    histories: HashMap<Ticker, VecDeque<f64>>,
    capacity: usize,
    rng: StdRng,
}

impl PriceModel {
    /// Initialize with a random source seeded from the operating system.
    pub fn initialize(config: &ModelConfig) -> Self {
        Self::initialize_with_rng(config, StdRng::from_os_rng())
    }

    /// Initialize with a deterministic seed; the same seed and configuration
    /// always reproduce the same starting prices and tick sequence.
    pub fn seeded(config: &ModelConfig, seed: u64) -> Self {
        Self::initialize_with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Draw one starting price per symbol from the configured range, rounded to cents.
    pub fn initialize_with_rng(config: &ModelConfig, mut rng: StdRng) -> Self {
        let capacity = config.history_capacity;
        let histories = config
            .symbols
            .iter()
            .map(|symbol| {
                let draw = rng.random_range(config.price_range.clone());
                let price = starting_price(draw, &config.price_range);
                let mut history = VecDeque::with_capacity(capacity);
                history.push_back(price);
                (*symbol, history)
            })
            .collect();

        Self {
            symbols: config.symbols.clone(),
            histories,
            capacity,
            rng,
        }
    }

    /// Build a model from explicit starting prices. Prices are stored as given.
    pub fn with_starting_prices(
        prices: &[(Ticker, f64)],
        history_capacity: usize,
        rng: StdRng,
    ) -> Self {
        let capacity = history_capacity.max(1);
        let mut symbols = Vec::with_capacity(prices.len());
        let mut histories = HashMap::with_capacity(prices.len());
        for (symbol, price) in prices {
            if !symbols.contains(symbol) {
                symbols.push(*symbol);
            }
            let mut history = VecDeque::with_capacity(capacity);
            history.push_back(price.max(MIN_PRICE));
            histories.insert(*symbol, history);
        }
        Self {
            symbols,
            histories,
            capacity,
            rng,
        }
    }

    /// Wrap the model for sharing between connection threads.
    pub fn into_shared(self) -> SharedPriceModel {
        Arc::new(Mutex::new(self))
    }

    /// Symbols this model produces quotes for.
    pub fn symbols(&self) -> &[Ticker] {
        &self.symbols
    }

    /// Current history of `symbol`, oldest first.
    pub fn history(&self, symbol: &Ticker) -> Option<&VecDeque<f64>> {
        self.histories.get(symbol)
    }

    /// Most recent price of `symbol`.
    pub fn last_price(&self, symbol: &Ticker) -> Option<f64> {
        self.histories.get(symbol).and_then(|h| h.back().copied())
    }

    /// Pick a symbol uniformly at random and advance it by one tick.
    pub fn next_random_quote(&mut self) -> Result<Quote> {
        let symbol = *self
            .symbols
            .choose(&mut self.rng)
            .ok_or_else(|| StreamError::Config("price model has no symbols".into()))?;
        self.next_quote(&symbol)
    }

    /// Advance `symbol` by one random tick.
    pub fn next_quote(&mut self, symbol: &Ticker) -> Result<Quote> {
        let delta = self.rng.random_range(-MAX_TICK_CHANGE..=MAX_TICK_CHANGE);
        self.apply_delta(symbol, delta)
    }

    /// Advance `symbol` by a relative change of `delta` (e.g. `0.006` for +0.6%).
    pub fn apply_delta(&mut self, symbol: &Ticker, delta: f64) -> Result<Quote> {
        let capacity = self.capacity;
        let history = self
            .histories
            .get_mut(symbol)
            .ok_or_else(|| StreamError::TickerNotFound(symbol.to_string()))?;
        let last_price = *history
            .back()
            .ok_or_else(|| StreamError::TickerNotFound(symbol.to_string()))?;

        let price = (last_price * (1.0 + delta)).max(MIN_PRICE);
        let change = price - last_price;

        while history.len() >= capacity {
            history.pop_front();
        }
        history.push_back(price);
        debug!("{} tick: {:.4} -> {:.4} ({:+.4}%)", symbol, last_price, price, delta * 100.0);

        Ok(Quote {
            symbol: *symbol,
            price,
            change,
            history: history.iter().copied().collect(),
        })
    }
}
