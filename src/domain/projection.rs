//! Projection of final tournament volume and the per-winner reward target.
//!
//! The estimate is a heuristic: accumulated volume plus a linear
//! extrapolation of the recent velocity until the tournament closes.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::competition::{CompetitionConfig, CompetitionStatus};
use super::ledger::AccumulatedVolume;
use super::velocity::Velocity;

/// Default empirically tuned base factor `K`.
pub const DEFAULT_BASE_FACTOR: Decimal = dec!(0.97);

const BILLION: Decimal = dec!(1000000000);

/// Tunables for the projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    pub base_factor: Decimal,
    /// How long before the end instant numbers freeze.
    pub freeze_lead: Duration,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            base_factor: DEFAULT_BASE_FACTOR,
            freeze_lead: Duration::seconds(60),
        }
    }
}

/// Output of the projection for one tournament and one poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub target: i64,
    /// `target` minus the latest positive published target.
    pub delta: i64,
    pub rule_description: String,
    pub effective_multiplier: Decimal,
    pub is_finalized: bool,
    pub status: CompetitionStatus,
    /// Volume after extrapolation, before the rule multiplier.
    pub projected_volume: Decimal,
    pub debug_summary: String,
    pub computed_at: DateTime<Utc>,
}

impl PredictionResult {
    /// Stamp the result as the tournament's final answer.
    #[must_use]
    pub fn into_finalized(mut self) -> Self {
        self.is_finalized = true;
        self.status = CompetitionStatus::Finalized;
        self
    }
}

/// Project the final target for `config` at `now`.
#[must_use]
pub fn project(
    config: &CompetitionConfig,
    accumulated: &AccumulatedVolume,
    velocity: Velocity,
    now: DateTime<Utc>,
    params: ProjectionParams,
) -> PredictionResult {
    let uses_limit = config.uses_limit_volume();
    let basis = if uses_limit {
        accumulated.limit_volume
    } else {
        accumulated.total_volume
    };

    let is_finalized = now >= config.freeze_instant(params.freeze_lead);
    let projected_volume = if is_finalized {
        basis
    } else {
        basis + scaled_velocity(accumulated, velocity, uses_limit) * seconds_remaining(config, now)
    };

    let effective_multiplier = config.effective_multiplier(params.base_factor);
    let target = per_winner(projected_volume * effective_multiplier, config.winner_count);
    let delta = config
        .latest_published_target()
        .map_or(target, |published| target - published.target);

    let ticket_size = accumulated.ticket_size().or(velocity.ticket_size);

    PredictionResult {
        target,
        delta,
        rule_description: describe_rule(config, effective_multiplier),
        effective_multiplier,
        is_finalized,
        status: if is_finalized {
            CompetitionStatus::Finalized
        } else {
            CompetitionStatus::Live
        },
        projected_volume,
        debug_summary: format!(
            "projected {:.3}B | ticket {} | velocity {:.2}/s",
            projected_volume / BILLION,
            ticket_size.map_or_else(|| "n/a".to_string(), |t| format!("{t:.2}")),
            velocity.volume_per_second,
        ),
        computed_at: now,
    }
}

/// Velocity measured on all trades, scaled to the limit-order share when the
/// tournament only counts limit volume.
fn scaled_velocity(accumulated: &AccumulatedVolume, velocity: Velocity, uses_limit: bool) -> Decimal {
    let v = velocity.volume_per_second.max(Decimal::ZERO);
    if !uses_limit || accumulated.total_volume <= Decimal::ZERO {
        return v;
    }
    let ratio = (accumulated.limit_volume / accumulated.total_volume).min(Decimal::ONE);
    v * ratio
}

fn seconds_remaining(config: &CompetitionConfig, now: DateTime<Utc>) -> Decimal {
    let from = now.max(config.start_instant());
    let remaining_ms = (config.end_instant() - from).num_milliseconds().max(0);
    Decimal::from(remaining_ms) / Decimal::from(1000)
}

fn per_winner(volume: Decimal, winner_count: u32) -> i64 {
    if winner_count == 0 {
        return 0;
    }
    (volume / Decimal::from(winner_count))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

fn describe_rule(config: &CompetitionConfig, effective_multiplier: Decimal) -> String {
    let basis = if config.uses_limit_volume() {
        "limit orders only"
    } else {
        "all orders"
    };
    format!(
        "{} (x{} effective, {})",
        config.rule_type.label(),
        effective_multiplier.normalize(),
        basis
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::competition::{RuleType, TargetPoint, VolumeBasis};
    use crate::domain::id::AssetId;
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    fn params(k: Decimal) -> ProjectionParams {
        ProjectionParams {
            base_factor: k,
            freeze_lead: Duration::seconds(60),
        }
    }

    fn config(rule_type: RuleType) -> CompetitionConfig {
        CompetitionConfig {
            asset_id: AssetId::new("KOGE"),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: None,
            end_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_time: NaiveTime::from_hms_opt(23, 0, 0),
            rule_type,
            winner_count: 5000,
            admin_factor: None,
            volume_basis: VolumeBasis::All,
            target_history: Vec::new(),
            status: CompetitionStatus::Live,
        }
    }

    fn accumulated(total: Decimal, limit: Decimal, tx: u64) -> AccumulatedVolume {
        AccumulatedVolume {
            total_volume: total,
            limit_volume: limit,
            tx_count: tx,
            ..AccumulatedVolume::default()
        }
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, m, s).unwrap()
    }

    fn velocity(per_second: Decimal) -> Velocity {
        Velocity {
            volume_per_second: per_second,
            ticket_size: None,
        }
    }

    #[test]
    fn buy_only_halves_volume() {
        // Frozen, so the projection equals accumulated volume.
        let result = project(
            &config(RuleType::BuyOnly),
            &accumulated(dec!(1000000), dec!(0), 0),
            Velocity::default(),
            at(22, 59, 30),
            params(dec!(1.0)),
        );
        assert_eq!(result.projected_volume, dec!(1000000));
        assert_eq!(result.target, 100);
        assert_eq!(result.effective_multiplier, dec!(0.5));
    }

    #[test]
    fn trade_x4_and_admin_factor() {
        let c = CompetitionConfig {
            admin_factor: Some(dec!(0.5)),
            ..config(RuleType::TradeX4)
        };
        let result = project(
            &c,
            &accumulated(dec!(1000000), dec!(0), 0),
            Velocity::default(),
            at(23, 0, 0),
            params(dec!(1.0)),
        );
        assert_eq!(result.target, 400);
    }

    #[test]
    fn linear_extrapolation_before_freeze() {
        // One hour left, 10/s -> 36,000 more volume.
        let result = project(
            &config(RuleType::TradeAll),
            &accumulated(dec!(64000), dec!(0), 0),
            velocity(dec!(10)),
            at(22, 0, 0),
            params(dec!(1.0)),
        );
        assert!(!result.is_finalized);
        assert_eq!(result.status, CompetitionStatus::Live);
        assert_eq!(result.projected_volume, dec!(100000));
        assert_eq!(result.target, 20);
    }

    #[test]
    fn freeze_ignores_velocity() {
        let result = project(
            &config(RuleType::TradeAll),
            &accumulated(dec!(500000), dec!(0), 0),
            velocity(dec!(1000000)),
            at(22, 59, 0),
            params(dec!(1.0)),
        );
        assert!(result.is_finalized);
        assert_eq!(result.status, CompetitionStatus::Finalized);
        assert_eq!(result.projected_volume, dec!(500000));
        assert_eq!(result.target, 100);
    }

    #[test]
    fn limit_basis_scales_velocity_by_share() {
        let c = CompetitionConfig {
            volume_basis: VolumeBasis::LimitOnly,
            ..config(RuleType::TradeAll)
        };
        // Limit share is 25%, so 40/s becomes 10/s over 3600s.
        let result = project(
            &c,
            &accumulated(dec!(400000), dec!(100000), 0),
            velocity(dec!(40)),
            at(22, 0, 0),
            params(dec!(1.0)),
        );
        assert_eq!(result.projected_volume, dec!(136000));
        assert!(result.rule_description.contains("limit orders only"));
    }

    #[test]
    fn before_start_extrapolates_from_start_only() {
        let c = CompetitionConfig {
            start_time: NaiveTime::from_hms_opt(22, 0, 0),
            ..config(RuleType::TradeAll)
        };
        let result = project(
            &c,
            &accumulated(dec!(0), dec!(0), 0),
            velocity(dec!(1)),
            at(10, 0, 0),
            params(dec!(1.0)),
        );
        assert_eq!(result.projected_volume, dec!(3600));
    }

    #[test]
    fn delta_against_latest_positive_target() {
        let c = CompetitionConfig {
            target_history: vec![
                TargetPoint {
                    date: NaiveDate::from_ymd_opt(2025, 5, 30).unwrap(),
                    target: 90,
                },
                TargetPoint {
                    date: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
                    target: 0,
                },
            ],
            ..config(RuleType::TradeAll)
        };
        let result = project(
            &c,
            &accumulated(dec!(500000), dec!(0), 0),
            Velocity::default(),
            at(23, 0, 0),
            params(dec!(1.0)),
        );
        assert_eq!(result.target, 100);
        assert_eq!(result.delta, 10);
    }

    #[test]
    fn delta_without_history_equals_target() {
        let result = project(
            &config(RuleType::TradeAll),
            &accumulated(dec!(500000), dec!(0), 0),
            Velocity::default(),
            at(23, 0, 0),
            params(dec!(1.0)),
        );
        assert_eq!(result.delta, result.target);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let c = CompetitionConfig {
            winner_count: 2,
            ..config(RuleType::TradeAll)
        };
        let result = project(
            &c,
            &accumulated(dec!(5), dec!(0), 0),
            Velocity::default(),
            at(23, 0, 0),
            params(dec!(1.0)),
        );
        assert_eq!(result.target, 3);
    }

    #[test]
    fn zero_winners_yields_zero_target() {
        let c = CompetitionConfig {
            winner_count: 0,
            ..config(RuleType::TradeAll)
        };
        let result = project(
            &c,
            &accumulated(dec!(5000), dec!(0), 0),
            Velocity::default(),
            at(23, 0, 0),
            params(dec!(1.0)),
        );
        assert_eq!(result.target, 0);
    }

    #[test]
    fn debug_summary_reports_billions_and_ticket() {
        let result = project(
            &config(RuleType::TradeAll),
            &accumulated(dec!(2500000000), dec!(0), 1000),
            Velocity::default(),
            at(23, 0, 0),
            params(dec!(1.0)),
        );
        assert!(result.debug_summary.contains("2.500B"), "{}", result.debug_summary);
        assert!(result.debug_summary.contains("ticket 2500000.00"));
    }

    #[test]
    fn ticket_falls_back_to_window_estimate() {
        let v = Velocity {
            volume_per_second: Decimal::ZERO,
            ticket_size: Some(dec!(42)),
        };
        let result = project(
            &config(RuleType::TradeAll),
            &accumulated(dec!(1000), dec!(0), 0),
            v,
            at(23, 0, 0),
            params(dec!(1.0)),
        );
        assert!(result.debug_summary.contains("ticket 42.00"));
    }
}
