use std::path::PathBuf;

/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the core can
/// decide on the user-facing reply consistently (join message vs retry-later
/// vs fetch-error), and never leaks raw provider detail to the user.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("user storage corrupt: {path}: {reason}")]
    StorageCorrupt { path: PathBuf, reason: String },

    #[error("user storage write failed: {path}: {reason}")]
    StorageWrite { path: PathBuf, reason: String },

    #[error("membership check failed: {0}")]
    GateCheck(String),

    #[error("price fetch failed for {symbol}: {reason}")]
    PriceFetch { symbol: String, reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
