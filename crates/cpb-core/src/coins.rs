//! Static coin catalogue.
//!
//! Fixed at process start; each entry becomes both a `/TICKER` command and a
//! keyboard shortcut.

/// Catalogue entry mapping a ticker to a display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoinSpec {
    pub ticker: &'static str,
    pub name: &'static str,
}

pub const CATALOGUE: &[CoinSpec] = &[
    CoinSpec { ticker: "BTC", name: "Bitcoin" },
    CoinSpec { ticker: "ETH", name: "Ethereum" },
    CoinSpec { ticker: "BNB", name: "Binance" },
    CoinSpec { ticker: "DOGE", name: "Doge" },
    CoinSpec { ticker: "TRX", name: "Tron" },
    CoinSpec { ticker: "MATIC", name: "Matic" },
    CoinSpec { ticker: "SOL", name: "Solana" },
    CoinSpec { ticker: "FTM", name: "Fantom" },
    CoinSpec { ticker: "OP", name: "Optimism" },
    CoinSpec { ticker: "SHIB", name: "Shiba" },
];

/// The fixed trio shown by the `/price` summary.
pub const POPULAR: &[&str] = &["BTC", "ETH", "BNB"];

/// Case-insensitive lookup by ticker.
pub fn find(ticker: &str) -> Option<&'static CoinSpec> {
    CATALOGUE
        .iter()
        .find(|c| c.ticker.eq_ignore_ascii_case(ticker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find("btc").map(|c| c.name), Some("Bitcoin"));
        assert_eq!(find("BTC").map(|c| c.name), Some("Bitcoin"));
        assert!(find("XMR").is_none());
    }

    #[test]
    fn popular_trio_is_catalogued() {
        for t in POPULAR {
            assert!(find(t).is_some(), "{t} missing from catalogue");
        }
    }
}
