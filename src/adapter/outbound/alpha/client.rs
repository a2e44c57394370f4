//! REST client for the exchange's alpha-token market data.
//!
//! Two surfaces are used:
//! - **Token list**: every listed asset with its rolling 24h counters, polled
//!   once per realtime cycle per variant.
//! - **Klines**: per-interval candles for one asset, used to build tails and
//!   start offsets. Klines are addressed by the exchange's internal alpha id,
//!   learned from the token list and cached.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::dto::{kline_sample, Envelope, KlineRows, TokenDto};
use super::settings::{AlphaConfig, SYMBOL_PLACEHOLDER};
use crate::domain::id::AssetId;
use crate::domain::market::{Ticker, TickerVariant};
use crate::domain::tail::VolumeSample;
use crate::error::{ConfigError, FeedError, Result};
use crate::port::outbound::feed::{HistoryFeed, HistoryInterval, HistoryQuery, TickerFeed};

/// Quote asset appended to the alpha id to form the kline symbol.
const QUOTE_SUFFIX: &str = "USDT";

/// HTTP client for the token list and kline endpoints.
pub struct AlphaClient {
    http: HttpClient,
    ticker_url: String,
    limit_ticker_url: Option<String>,
    history_url: String,
    limit_history_url: Option<String>,
    page_limit: u32,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
    /// Symbol to alpha id, refreshed from every all-trades token list.
    alpha_ids: DashMap<AssetId, String>,
}

impl AlphaClient {
    #[must_use]
    pub fn from_config(config: &AlphaConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            ticker_url: config.ticker_url.clone(),
            limit_ticker_url: config.limit_ticker_url.clone(),
            history_url: config.history_url.clone(),
            limit_history_url: config.limit_history_url.clone(),
            page_limit: config.history_page_limit.max(1),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
            alpha_ids: DashMap::new(),
        }
    }

    async fn get_with_retry<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = match self.http.get(url).send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = match response.error_for_status() {
                Ok(response) => response,
                Err(err) => return Err(err.into()),
            };

            match response.json::<T>().await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }

    /// Fetch and unwrap a `{success, data}` envelope.
    async fn get_data<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let envelope: Envelope<T> = self.get_with_retry(url).await?;
        if !envelope.success {
            return Err(FeedError::Rejected(envelope.rejection()).into());
        }
        envelope
            .data
            .ok_or_else(|| FeedError::Payload("response carried no data".into()).into())
    }

    async fn token_list(&self, url: &str) -> Result<Vec<TokenDto>> {
        let tokens: Vec<TokenDto> = self.get_data(url).await?;
        debug!(count = tokens.len(), "Fetched token list");
        Ok(tokens)
    }

    fn remember_alpha_ids(&self, tokens: &[TokenDto]) {
        for token in tokens {
            let (Some(symbol), Some(alpha_id)) = (token.symbol.as_deref(), token.alpha_id.as_deref())
            else {
                continue;
            };
            if let Some(asset_id) = AssetId::parse(symbol) {
                self.alpha_ids.insert(asset_id, alpha_id.trim().to_string());
            }
        }
    }

    /// Kline symbol for `asset_id`, loading the token list once on a miss.
    async fn kline_symbol(&self, asset_id: &AssetId) -> Result<String> {
        if let Some(alpha_id) = self.alpha_ids.get(asset_id) {
            return Ok(format!("{}{QUOTE_SUFFIX}", alpha_id.value()));
        }

        let tokens = self.token_list(&self.ticker_url).await?;
        self.remember_alpha_ids(&tokens);

        self.alpha_ids
            .get(asset_id)
            .map(|alpha_id| format!("{}{QUOTE_SUFFIX}", alpha_id.value()))
            .ok_or_else(|| FeedError::UnknownAsset(asset_id.to_string()).into())
    }

    fn history_template(&self, variant: TickerVariant) -> Option<&str> {
        match variant {
            TickerVariant::All => Some(&self.history_url),
            TickerVariant::LimitOnly => self.limit_history_url.as_deref(),
        }
    }

    /// Fetch one page of klines in `[start_ms, end_ms]`.
    async fn kline_page(
        &self,
        template: &str,
        symbol: &str,
        interval: HistoryInterval,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<VolumeSample>> {
        let url = kline_url(template, symbol, interval, start_ms, end_ms, self.page_limit)?;
        let rows: KlineRows = self.get_data(url.as_str()).await?;
        Ok(rows.iter().filter_map(|row| kline_sample(row)).collect())
    }
}

/// Expand a history URL template with the kline query parameters.
fn kline_url(
    template: &str,
    symbol: &str,
    interval: HistoryInterval,
    start_ms: i64,
    end_ms: i64,
    limit: u32,
) -> Result<Url> {
    let mut url = Url::parse(&template.replace(SYMBOL_PLACEHOLDER, symbol)).map_err(|e| {
        ConfigError::InvalidValue {
            field: "history_url",
            reason: e.to_string(),
        }
    })?;
    url.query_pairs_mut()
        .append_pair("interval", interval.as_str())
        .append_pair("startTime", &start_ms.to_string())
        .append_pair("endTime", &end_ms.to_string())
        .append_pair("limit", &limit.to_string());
    Ok(url)
}

#[async_trait]
impl TickerFeed for AlphaClient {
    async fn fetch_tickers(&self, variant: TickerVariant) -> Result<Vec<Ticker>> {
        let url = match variant {
            TickerVariant::All => self.ticker_url.as_str(),
            TickerVariant::LimitOnly => self
                .limit_ticker_url
                .as_deref()
                .ok_or(FeedError::Unsupported("limit_ticker_url"))?,
        };

        let tokens = self.token_list(url).await?;
        if variant == TickerVariant::All {
            self.remember_alpha_ids(&tokens);
        }
        Ok(tokens.iter().filter_map(TokenDto::to_ticker).collect())
    }
}

#[async_trait]
impl HistoryFeed for AlphaClient {
    async fn fetch_history(&self, query: &HistoryQuery) -> Result<Vec<VolumeSample>> {
        let template = self
            .history_template(query.variant)
            .ok_or(FeedError::Unsupported("limit_history_url"))?;
        let symbol = self.kline_symbol(&query.asset_id).await?;

        let end = query.to.timestamp_millis();
        let step = query.interval.millis();
        let mut cursor = query.from.timestamp_millis();
        let mut samples: Vec<VolumeSample> = Vec::new();

        while cursor < end {
            let page = self
                .kline_page(template, &symbol, query.interval, cursor, end - 1)
                .await?;
            let fetched = page.len();
            let in_range: Vec<VolumeSample> = page
                .into_iter()
                .filter(|s| s.timestamp_ms >= cursor && s.timestamp_ms < end)
                .collect();
            let Some(latest) = in_range.iter().map(|s| s.timestamp_ms).max() else {
                break;
            };
            samples.extend(in_range);
            if fetched < self.page_limit as usize {
                break;
            }
            cursor = latest + step;
        }

        samples.sort_by_key(|s| s.timestamp_ms);
        samples.dedup_by_key(|s| s.timestamp_ms);
        debug!(
            asset = %query.asset_id,
            variant = query.variant.as_str(),
            interval = query.interval.as_str(),
            count = samples.len(),
            "Fetched history"
        );
        Ok(samples)
    }

    fn supports(&self, variant: TickerVariant) -> bool {
        self.history_template(variant).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kline_url_substitutes_symbol_and_appends_range() {
        let url = kline_url(
            "https://example.com/klines?symbol={symbol}",
            "ALPHA_22USDT",
            HistoryInterval::OneMinute,
            1_000,
            2_000,
            500,
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/klines?symbol=ALPHA_22USDT&interval=1m&startTime=1000&endTime=2000&limit=500"
        );
    }

    #[test]
    fn kline_url_rejects_garbage_template() {
        let err = kline_url("not a url {symbol}", "X", HistoryInterval::OneHour, 0, 1, 1);
        assert!(err.is_err());
    }

    #[test]
    fn limit_history_support_follows_config() {
        let client = AlphaClient::from_config(&AlphaConfig::default());
        assert!(client.supports(TickerVariant::All));
        assert!(!client.supports(TickerVariant::LimitOnly));

        let client = AlphaClient::from_config(&AlphaConfig {
            limit_history_url: Some("https://example.com/limit?symbol={symbol}".into()),
            ..AlphaConfig::default()
        });
        assert!(client.supports(TickerVariant::LimitOnly));
    }

    #[tokio::test]
    async fn limit_tickers_without_url_are_unsupported() {
        let client = AlphaClient::from_config(&AlphaConfig::default());
        let err = client
            .fetch_tickers(TickerVariant::LimitOnly)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("limit_ticker_url"));
    }
}
