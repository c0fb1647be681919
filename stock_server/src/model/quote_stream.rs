//! Lazy, paced stream of SSE quote frames.
//!
//! `QuoteStream` is an endless `Iterator`: every element is one tick of the shared
//! `PriceModel` for a randomly chosen symbol, encoded as a `data: {json}\n\n` frame.
//! The first frame is produced immediately; each further `next()` sleeps for the
//! configured interval before ticking. The iterator never yields `None`. Consumers stop
//! it by dropping it, typically after a write to the client fails.
//!
//! A tick that cannot be produced (poisoned model lock, encoding failure) is yielded as
//! `Err` and is not retried.

use std::thread;
use std::time::Duration;

use stock_common::Result;
use stock_common::sse::format_data_frame;

use crate::model::price_model::SharedPriceModel;

/// Default pause between two frames.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(2);

/// Endless iterator of SSE frames backed by a shared price model.
pub struct QuoteStream {
    model: SharedPriceModel,
    interval: Duration,
    produced: u64,
}

impl QuoteStream {
    /// Create a stream ticking `model` every `interval`.
    pub fn new(model: SharedPriceModel, interval: Duration) -> Self {
        Self {
            model,
            interval,
            produced: 0,
        }
    }

    fn next_frame(&self) -> Result<String> {
        let quote = {
            let mut model = self.model.lock()?;
            model.next_random_quote()?
        };
        Ok(format_data_frame(&quote.to_json()?))
    }
}

impl Iterator for QuoteStream {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.produced > 0 {
            thread::sleep(self.interval);
        }
        self.produced += 1;
        Some(self.next_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::price_model::{ModelConfig, PriceModel};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;
    use std::time::Instant;
    use stock_common::tickers::Ticker;
    use stock_common::{Quote, StreamError};

    fn payload(frame: &str) -> &str {
        frame
            .strip_prefix("data: ")
            .and_then(|f| f.strip_suffix("\n\n"))
            .unwrap()
    }

    #[test]
    fn frames_carry_a_quote_payload() {
        let model = PriceModel::seeded(&ModelConfig::default(), 5).into_shared();
        let mut stream = QuoteStream::new(model, Duration::ZERO);

        for _ in 0..10 {
            let frame = stream.next().unwrap().unwrap();
            assert!(frame.starts_with("data: {\"symbol\": "));
            assert!(frame.ends_with("}\n\n"));
            let quote = Quote::from_json(payload(&frame)).unwrap();
            assert!(quote.price >= 1.0);
            assert!(!quote.history.is_empty() && quote.history.len() <= 20);
        }
        assert_eq!(stream.produced, 10);
    }

    #[test]
    fn first_frame_is_immediate_and_later_frames_are_paced() {
        let model = PriceModel::seeded(&ModelConfig::default(), 5).into_shared();
        let mut stream = QuoteStream::new(model, Duration::from_millis(60));

        let started = Instant::now();
        stream.next().unwrap().unwrap();
        assert!(started.elapsed() < Duration::from_millis(60));

        stream.next().unwrap().unwrap();
        stream.next().unwrap().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(120));
    }

    #[test]
    fn streams_share_one_model() {
        let model = PriceModel::with_starting_prices(
            &[(Ticker::AAPL, 100.0)],
            20,
            StdRng::seed_from_u64(9),
        )
        .into_shared();
        let mut a = QuoteStream::new(Arc::clone(&model), Duration::ZERO);
        let mut b = QuoteStream::new(Arc::clone(&model), Duration::ZERO);

        a.next().unwrap().unwrap();
        let frame = b.next().unwrap().unwrap();
        let quote = Quote::from_json(payload(&frame)).unwrap();

        assert_eq!(quote.history.len(), 3);
        assert_eq!(model.lock().unwrap().history(&Ticker::AAPL).unwrap().len(), 3);
    }

    #[test]
    fn poisoned_model_yields_an_error_item() {
        let model = PriceModel::seeded(&ModelConfig::default(), 1).into_shared();
        let poisoner = Arc::clone(&model);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the model lock");
        })
        .join();

        let mut stream = QuoteStream::new(model, Duration::ZERO);
        assert!(matches!(stream.next(), Some(Err(StreamError::MutexLock(_)))));
    }
}
