//! Binance price-provider adapter.
//!
//! Implements the core `PricePort` over `GET /api/v3/ticker/price`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use cpb_core::{
    errors::Error,
    pricing::{PricePort, PriceQuote},
    Result,
};

#[derive(Clone, Debug)]
pub struct BinancePriceClient {
    base_url: String,
    http: reqwest::Client,
}

impl BinancePriceClient {
    /// `base_url` without a trailing slash, e.g. `https://api.binance.com`.
    /// `timeout` bounds every request so a hung provider cannot stall the
    /// dispatcher.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn fetch_err(pair: &str, reason: impl Into<String>) -> Error {
        Error::PriceFetch {
            symbol: pair.to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PricePort for BinancePriceClient {
    async fn ticker_price(&self, pair: &str) -> Result<PriceQuote> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("symbol", pair)])
            .send()
            .await
            .map_err(|e| Self::fetch_err(pair, format!("request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::fetch_err(
                pair,
                format!("{status} {}", body.chars().take(200).collect::<String>()),
            ));
        }

        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Self::fetch_err(pair, format!("json error: {e}")))?;

        parse_ticker_payload(pair, &v)
    }
}

/// Extracts `{symbol, price}` from the provider payload. A missing field or
/// an unparseable price string is a fetch error, never a panic.
fn parse_ticker_payload(pair: &str, v: &serde_json::Value) -> Result<PriceQuote> {
    let symbol = v
        .get("symbol")
        .and_then(|s| s.as_str())
        .ok_or_else(|| fetch_field_err(pair, "symbol"))?;
    let price = v
        .get("price")
        .and_then(|p| p.as_str())
        .ok_or_else(|| fetch_field_err(pair, "price"))?;
    let price: f64 = price
        .parse()
        .map_err(|_| fetch_field_err(pair, "price (not a number)"))?;
    if !price.is_finite() {
        return Err(fetch_field_err(pair, "price (not finite)"));
    }

    Ok(PriceQuote {
        symbol: symbol.to_string(),
        price,
        observed_at: Utc::now(),
    })
}

fn fetch_field_err(pair: &str, field: &str) -> Error {
    Error::PriceFetch {
        symbol: pair.to_string(),
        reason: format!("malformed payload: missing {field}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_well_formed_payload() {
        let v = json!({"symbol": "BTCUSDT", "price": "12345.678"});
        let quote = parse_ticker_payload("BTCUSDT", &v).unwrap();
        assert_eq!(quote.symbol, "BTCUSDT");
        assert!((quote.price - 12345.678).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_price_is_a_fetch_error() {
        let v = json!({"symbol": "BTCUSDT"});
        match parse_ticker_payload("BTCUSDT", &v) {
            Err(Error::PriceFetch { symbol, reason }) => {
                assert_eq!(symbol, "BTCUSDT");
                assert!(reason.contains("price"));
            }
            other => panic!("expected PriceFetch, got {other:?}"),
        }
    }

    #[test]
    fn missing_symbol_is_a_fetch_error() {
        let v = json!({"price": "1.0"});
        assert!(parse_ticker_payload("BTCUSDT", &v).is_err());
    }

    #[test]
    fn non_numeric_price_is_a_fetch_error() {
        let v = json!({"symbol": "BTCUSDT", "price": "n/a"});
        assert!(parse_ticker_payload("BTCUSDT", &v).is_err());
    }

    #[test]
    fn non_finite_price_is_a_fetch_error() {
        for degenerate in ["inf", "-inf", "NaN"] {
            let v = json!({"symbol": "BTCUSDT", "price": degenerate});
            assert!(
                parse_ticker_payload("BTCUSDT", &v).is_err(),
                "{degenerate} should be rejected"
            );
        }
    }
}
