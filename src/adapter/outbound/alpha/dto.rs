//! REST payloads of the exchange's alpha-token endpoints.
//!
//! Numeric fields arrive as strings, numbers, or are missing entirely, so
//! they are kept as raw JSON values and parsed leniently on conversion.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::id::AssetId;
use crate::domain::market::Ticker;
use crate::domain::tail::VolumeSample;

/// Envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Human-readable reason for a rejected response.
    #[must_use]
    pub fn rejection(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "success=false".into(),
        }
    }
}

/// One row of the token list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDto {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub alpha_id: Option<String>,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub volume24h: Value,
    #[serde(default)]
    pub count24h: Value,
}

impl TokenDto {
    /// Convert to a domain ticker; rows with a blank symbol are dropped.
    #[must_use]
    pub fn to_ticker(&self) -> Option<Ticker> {
        let asset_id = AssetId::parse(self.symbol.as_deref()?)?;
        Some(Ticker {
            asset_id,
            price: decimal(&self.price).unwrap_or_default(),
            rolling_volume_24h: decimal(&self.volume24h).unwrap_or_default(),
            rolling_tx_count_24h: unsigned(&self.count24h).unwrap_or_default(),
        })
    }
}

/// Kline rows: `[openTime, open, high, low, close, baseVolume, closeTime,
/// quoteVolume, trades, ...]`.
pub type KlineRows = Vec<Vec<Value>>;

const OPEN_TIME: usize = 0;
const QUOTE_VOLUME: usize = 7;
const TRADES: usize = 8;

/// Parse one kline row; `None` when the open time is unreadable.
#[must_use]
pub fn kline_sample(row: &[Value]) -> Option<VolumeSample> {
    let timestamp_ms = row.get(OPEN_TIME).and_then(integer)?;
    let volume = row.get(QUOTE_VOLUME).and_then(decimal).unwrap_or_default();
    let trades = row.get(TRADES).and_then(unsigned).unwrap_or_default();
    Some(VolumeSample::new(timestamp_ms, volume, trades))
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn unsigned(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn token_list_parses_string_numbers() {
        let json = r#"{
            "code": "000000",
            "success": true,
            "data": [
                {"symbol": " koge ", "alphaId": "ALPHA_22", "price": "48.01", "volume24h": "1234567.5", "count24h": "8812"},
                {"symbol": "", "alphaId": "ALPHA_1", "price": 1},
                {"symbol": "ZKJ", "price": 0.31, "volume24h": 1000, "count24h": 12}
            ]
        }"#;
        let envelope: Envelope<Vec<TokenDto>> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);

        let tickers: Vec<Ticker> = envelope
            .data
            .unwrap()
            .iter()
            .filter_map(TokenDto::to_ticker)
            .collect();
        assert_eq!(tickers.len(), 2);
        assert_eq!(tickers[0].asset_id.as_str(), "KOGE");
        assert_eq!(tickers[0].rolling_volume_24h, dec!(1234567.5));
        assert_eq!(tickers[0].rolling_tx_count_24h, 8812);
        assert_eq!(tickers[1].price, dec!(0.31));
    }

    #[test]
    fn rejection_message_prefers_code_and_message() {
        let envelope: Envelope<Vec<TokenDto>> =
            serde_json::from_str(r#"{"success": false, "code": "100001", "message": "busy"}"#)
                .unwrap();
        assert_eq!(envelope.rejection(), "100001: busy");
    }

    #[test]
    fn kline_row_reads_quote_volume_and_trades() {
        let row: Vec<Value> = serde_json::from_str(
            r#"["1717200000000","1.0","1.1","0.9","1.05","1000","1717200059999","1050.5","42"]"#,
        )
        .unwrap();
        let sample = kline_sample(&row).unwrap();
        assert_eq!(sample.timestamp_ms, 1_717_200_000_000);
        assert_eq!(sample.volume, dec!(1050.5));
        assert_eq!(sample.trades, 42);
    }

    #[test]
    fn kline_row_without_open_time_is_skipped() {
        let row: Vec<Value> = serde_json::from_str(r#"[null, "1"]"#).unwrap();
        assert!(kline_sample(&row).is_none());
    }
}
