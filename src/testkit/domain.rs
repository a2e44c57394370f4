//! Builders for domain primitives used across tests.
//!
//! Every builder anchors to June 2025 so tests can talk about "day 1",
//! "day 2" and so on without spelling out full dates.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::competition::{CompetitionConfig, CompetitionStatus, RuleType, VolumeBasis};
use crate::domain::finalized::FinalizedRecord;
use crate::domain::id::AssetId;
use crate::domain::ledger::AccumulatedVolume;
use crate::domain::market::Ticker;
use crate::domain::projection::{project, ProjectionParams};
use crate::domain::tail::VolumeSample;
use crate::domain::velocity::Velocity;

/// June `d`, 2025.
pub fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

/// June `d`, 2025 at `h:m` UTC.
pub fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, d, h, m, 0).unwrap()
}

/// A live TRADE_ALL competition running from June 1 to June 10 with 1000
/// winners and no published targets.
pub fn competition(id: &str) -> CompetitionConfig {
    CompetitionConfig {
        asset_id: AssetId::new(id),
        start_date: date(1),
        start_time: None,
        end_date: date(10),
        end_time: None,
        rule_type: RuleType::TradeAll,
        winner_count: 1000,
        admin_factor: None,
        volume_basis: VolumeBasis::All,
        target_history: Vec::new(),
        status: CompetitionStatus::Live,
    }
}

/// A ticker row with ten trades.
pub fn ticker(symbol: &str, price: Decimal, rolling_volume: Decimal) -> Ticker {
    Ticker {
        asset_id: AssetId::new(symbol),
        price,
        rolling_volume_24h: rolling_volume,
        rolling_tx_count_24h: 10,
    }
}

/// `count` one-minute samples of `volume` each, starting at `from`.
pub fn minute_samples(from: DateTime<Utc>, count: i64, volume: Decimal) -> Vec<VolumeSample> {
    (0..count)
        .map(|i| VolumeSample::new((from + Duration::minutes(i)).timestamp_millis(), volume, 1))
        .collect()
}

/// A finalized record for [`competition`]`(id)` with zero volume.
pub fn finalized_record(id: &str) -> FinalizedRecord {
    let config = competition(id);
    let now = config.end_instant();
    let accumulated = AccumulatedVolume::default();
    let prediction = project(
        &config,
        &accumulated,
        Velocity::default(),
        now,
        ProjectionParams::default(),
    );
    FinalizedRecord::new(config, accumulated, prediction, now)
}
