//! Dashboard page served on `/`.
//!
//! The HTML shell lives in `static/index.html`; the only server-side rendering is
//! one card per configured ticker.

use stock_common::net::STREAM_PATH;
use stock_common::tickers::Ticker;

const INDEX_TEMPLATE: &str = include_str!("../static/index.html");

/// Render the dashboard for `symbols`.
pub fn render_index(symbols: &[Ticker]) -> String {
    let cards: String = symbols
        .iter()
        .map(|symbol| {
            format!(
                r#"      <article class="stock-card" data-symbol="{symbol}">
        <h2>{symbol}</h2>
        <p class="price">--</p>
        <p class="change price-neutral">--</p>
        <ol class="history"></ol>
      </article>
"#
            )
        })
        .collect();

    INDEX_TEMPLATE
        .replace("{{stream_url}}", STREAM_PATH)
        .replace("{{cards}}", &cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_card_per_symbol() {
        let html = render_index(&[Ticker::AAPL, Ticker::NFLX]);
        assert_eq!(html.matches("class=\"stock-card\"").count(), 2);
        assert!(html.contains("data-symbol=\"AAPL\""));
        assert!(html.contains("data-symbol=\"NFLX\""));
        assert!(html.contains("\"/stream\""));
        assert!(!html.contains("{{"));
    }
}
