//! Price lookups against the quote provider.
//!
//! The HTTP provider sits behind `PricePort`; `PriceService` adds pair
//! forming, the sequential batch used by `/price`, and display formatting.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;

/// A successful price lookup. Transient; exists only to format a reply.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceQuote {
    /// Trading pair echoed by the provider, e.g. `BTCUSDT`.
    pub symbol: String,
    pub price: f64,
    pub observed_at: DateTime<Utc>,
}

/// Port for the provider's ticker-price endpoint.
///
/// `pair` is the full trading pair (`BTCUSDT`). Implementations fail with
/// `Error::PriceFetch` on transport failure, non-success status, or a
/// payload missing `price`/`symbol`.
#[async_trait]
pub trait PricePort: Send + Sync {
    async fn ticker_price(&self, pair: &str) -> Result<PriceQuote>;
}

pub struct PriceService {
    port: Arc<dyn PricePort>,
    quote_asset: String,
    batch_pause: Duration,
}

impl PriceService {
    pub fn new(port: Arc<dyn PricePort>, quote_asset: String, batch_pause: Duration) -> Self {
        Self {
            port,
            quote_asset,
            batch_pause,
        }
    }

    pub fn quote_asset(&self) -> &str {
        &self.quote_asset
    }

    /// Single lookup: `symbol` + the fixed quote asset.
    pub async fn get_price(&self, symbol: &str) -> Result<PriceQuote> {
        let pair = format!("{}{}", symbol.to_uppercase(), self.quote_asset);
        self.port.ticker_price(&pair).await
    }

    /// Batch lookup for the popular-coins summary.
    ///
    /// Queries sequentially with a fixed pause between requests (provider
    /// rate limits). All-or-nothing: the first failure aborts the batch and
    /// fails the whole operation; partial results are never returned.
    pub async fn get_prices(&self, symbols: &[&str]) -> Result<Vec<PriceQuote>> {
        let mut quotes = Vec::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 && !self.batch_pause.is_zero() {
                tokio::time::sleep(self.batch_pause).await;
            }
            quotes.push(self.get_price(symbol).await?);
        }
        Ok(quotes)
    }
}

/// Renders an amount rounded to exactly 2 fractional digits with thousands
/// separators: `12345.678` becomes `12,345.68`.
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{value:.2}");
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some(parts) => parts,
        None => (rounded.as_str(), "00"),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn amounts_round_and_group() {
        assert_eq!(format_amount(12345.678), "12,345.68");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(0.5), "0.50");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(-12345.678), "-12,345.68");
    }

    /// Succeeds for every pair except the ones listed in `fail`.
    struct ScriptedPort {
        fail: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedPort {
        fn new(fail: Vec<&'static str>) -> Self {
            Self {
                fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PricePort for ScriptedPort {
        async fn ticker_price(&self, pair: &str) -> Result<PriceQuote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.contains(&pair) {
                return Err(Error::PriceFetch {
                    symbol: pair.to_string(),
                    reason: "scripted failure".to_string(),
                });
            }
            Ok(PriceQuote {
                symbol: pair.to_string(),
                price: 100.0,
                observed_at: Utc::now(),
            })
        }
    }

    fn service(port: Arc<ScriptedPort>) -> PriceService {
        PriceService::new(port, "USDT".to_string(), Duration::ZERO)
    }

    #[tokio::test]
    async fn single_lookup_forms_the_pair() {
        let port = Arc::new(ScriptedPort::new(vec![]));
        let quote = service(port).get_price("btc").await.unwrap();
        assert_eq!(quote.symbol, "BTCUSDT");
    }

    #[tokio::test]
    async fn batch_preserves_request_order() {
        let port = Arc::new(ScriptedPort::new(vec![]));
        let quotes = service(port).get_prices(&["BTC", "ETH", "BNB"]).await.unwrap();
        let pairs: Vec<_> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(pairs, ["BTCUSDT", "ETHUSDT", "BNBUSDT"]);
    }

    #[tokio::test]
    async fn batch_is_all_or_nothing() {
        let port = Arc::new(ScriptedPort::new(vec!["ETHUSDT"]));
        let result = service(port.clone()).get_prices(&["BTC", "ETH", "BNB"]).await;

        match result {
            Err(Error::PriceFetch { .. }) => {}
            other => panic!("expected PriceFetch, got {other:?}"),
        }
        // The failure aborts the batch: BNB is never queried.
        assert_eq!(port.calls.load(Ordering::SeqCst), 2);
    }
}
