use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{domain::ChannelRef, errors::Error, Result};

/// Typed configuration, loaded from environment variables (with an optional
/// `.env` file that never overrides the real environment).
#[derive(Clone, Debug)]
pub struct Config {
    /// Telegram bot API token.
    pub telegram_bot_token: String,
    /// Channel users must belong to before the bot answers price queries.
    pub channel_id: ChannelRef,
    /// Durable user-directory file.
    pub users_file: PathBuf,

    // Price provider
    pub price_api_base: String,
    pub quote_asset: String,
    /// Pause between requests in a `/price` batch, to respect rate limits.
    pub batch_pause: Duration,

    /// Bound applied to every outbound call (membership check, price fetch).
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").and_then(non_empty);
        let Some(telegram_bot_token) = telegram_bot_token else {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        };

        let channel_id = env_str("CHANNEL_ID").and_then(non_empty);
        let Some(channel_id) = channel_id else {
            return Err(Error::Config(
                "CHANNEL_ID environment variable is required".to_string(),
            ));
        };

        let users_file =
            PathBuf::from(env_str("USERS_FILE").unwrap_or_else(|| "users.json".to_string()));

        let price_api_base = env_str("PRICE_API_BASE")
            .and_then(non_empty)
            .unwrap_or_else(|| "https://api.binance.com".to_string());
        let quote_asset = env_str("QUOTE_ASSET")
            .and_then(non_empty)
            .unwrap_or_else(|| "USDT".to_string());

        let batch_pause = Duration::from_millis(env_u64("BATCH_PAUSE_MS").unwrap_or(500));
        let request_timeout = Duration::from_millis(env_u64("REQUEST_TIMEOUT_MS").unwrap_or(5_000));

        Ok(Self {
            telegram_bot_token,
            channel_id: ChannelRef(channel_id),
            users_file,
            price_api_base,
            quote_asset,
            batch_pause,
            request_timeout,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_does_not_override_existing_env() {
        let dir = PathBuf::from(format!("/tmp/cpb-cfg-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join(".env");
        fs::write(&file, "CPB_TEST_KEY=from_file\nCPB_TEST_ONLY_FILE='quoted'\n").unwrap();

        env::set_var("CPB_TEST_KEY", "from_env");
        load_dotenv_if_present(&file);

        assert_eq!(env::var("CPB_TEST_KEY").unwrap(), "from_env");
        assert_eq!(env::var("CPB_TEST_ONLY_FILE").unwrap(), "quoted");

        env::remove_var("CPB_TEST_KEY");
        env::remove_var("CPB_TEST_ONLY_FILE");
        let _ = fs::remove_dir_all(&dir);
    }
}
