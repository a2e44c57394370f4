//! Exchange REST endpoint configuration.

use serde::Deserialize;

/// Placeholder substituted with the exchange kline symbol in history URLs.
pub const SYMBOL_PLACEHOLDER: &str = "{symbol}";

/// `[exchange]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AlphaConfig {
    /// Token list with rolling 24h counters over all trades.
    #[serde(default = "default_ticker_url")]
    pub ticker_url: String,
    /// Token list restricted to limit-order volume. Without it the
    /// limit-only counters are reported as unknown.
    #[serde(default)]
    pub limit_ticker_url: Option<String>,
    /// Kline endpoint; must contain `{symbol}`.
    #[serde(default = "default_history_url")]
    pub history_url: String,
    /// Limit-order kline endpoint. When absent, limit tails are derived by
    /// scaling the all-trades tail.
    #[serde(default)]
    pub limit_history_url: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Maximum rows requested per kline page.
    #[serde(default = "default_history_page_limit")]
    pub history_page_limit: u32,
}

fn default_ticker_url() -> String {
    "https://www.binance.com/bapi/defi/v1/public/wallet-direct/buw/wallet/cex/alpha/all/token/list"
        .into()
}

fn default_history_url() -> String {
    "https://www.binance.com/bapi/defi/v1/public/alpha-trade/klines?symbol={symbol}".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".into()
}

const fn default_timeout_ms() -> u64 {
    2500
}

const fn default_connect_timeout_ms() -> u64 {
    1500
}

const fn default_retry_max_attempts() -> u32 {
    2
}

const fn default_retry_backoff_ms() -> u64 {
    250
}

const fn default_history_page_limit() -> u32 {
    1000
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            ticker_url: default_ticker_url(),
            limit_ticker_url: None,
            history_url: default_history_url(),
            limit_history_url: None,
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            history_page_limit: default_history_page_limit(),
        }
    }
}
