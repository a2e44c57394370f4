//! Multi-loop scenarios driven through the tracker with in-memory ports.

use alpha_tourney::application::state::BaseVolumes;
use alpha_tourney::application::rollover::RolloverSummary;
use alpha_tourney::domain::id::AssetId;
use alpha_tourney::domain::market::TickerVariant;
use alpha_tourney::domain::view::CompetitionView;
use alpha_tourney::port::outbound::store::BASE_VOLUME_KEY;
use alpha_tourney::testkit::domain::{at, competition, date, minute_samples, ticker};
use alpha_tourney::testkit::ports::FakePorts;
use chrono::NaiveTime;
use rust_decimal_macros::dec;

fn only_view(fakes: &FakePorts) -> CompetitionView {
    let snapshot = fakes.dashboard.last().expect("dashboard published");
    assert_eq!(snapshot.competitions.len(), 1);
    snapshot.competitions[0].clone()
}

#[tokio::test]
async fn rollover_then_realtime_adds_yesterday_to_today() {
    let fakes = FakePorts::new();
    let mut config = competition("KOGE");
    config.start_date = date(2);
    fakes.competitions.set(vec![config]);
    fakes
        .history
        .set("KOGE", TickerVariant::All, minute_samples(at(2, 0, 0), 1440, dec!(1)));
    fakes
        .tickers
        .set(TickerVariant::All, vec![ticker("KOGE", dec!(1), dec!(1995))]);
    let tracker = fakes.tracker();
    let now = at(3, 0, 5);

    tracker.run_competition_refresh(now).await;
    let summary = tracker.run_rollover(now).await;
    tracker.run_realtime(now).await;

    assert_eq!(
        summary,
        RolloverSummary {
            built: 1,
            failed: 0,
            rolled: 1
        }
    );
    // Minutes 00:05 onwards of yesterday are still inside the rolling window.
    let view = only_view(&fakes);
    assert_eq!(view.accumulated.base_volume, dec!(1440));
    assert_eq!(view.accumulated.today_volume, dec!(560));
    assert_eq!(view.accumulated.total_volume, dec!(2000));
    assert_eq!(view.accumulated.base_tx_count, 1440);

    let archived: BaseVolumes = fakes.archive.read(BASE_VOLUME_KEY).expect("base volumes archived");
    let base = &archived[&AssetId::new("KOGE")];
    assert_eq!(base.volume, dec!(1440));
    assert_eq!(base.through, Some(date(2)));
}

#[tokio::test]
async fn repeated_rollover_checks_fold_a_day_once() {
    let fakes = FakePorts::new();
    fakes.competitions.set(vec![competition("KOGE")]);
    fakes
        .history
        .set("KOGE", TickerVariant::All, minute_samples(at(2, 0, 0), 1440, dec!(1)));
    let tracker = fakes.tracker();
    tracker.run_competition_refresh(at(3, 0, 5)).await;

    tracker.run_rollover(at(3, 0, 5)).await;
    let second = tracker.run_rollover(at(3, 0, 10)).await;
    tracker.run_base_refresh().await;
    let third = tracker.run_rollover(at(3, 5, 0)).await;

    assert_eq!(second, RolloverSummary::default());
    assert_eq!(third, RolloverSummary::default());
    let base = tracker
        .state()
        .base_volume(&AssetId::new("KOGE"))
        .expect("base present");
    assert_eq!(base.volume, dec!(1440));
    assert_eq!(fakes.archive.puts(BASE_VOLUME_KEY), 1);
}

#[tokio::test]
async fn mid_day_start_subtracts_pre_start_volume() {
    let fakes = FakePorts::new();
    let mut config = competition("KOGE");
    config.start_date = date(3);
    config.start_time = NaiveTime::from_hms_opt(12, 0, 0);
    fakes.competitions.set(vec![config]);
    fakes
        .history
        .set("KOGE", TickerVariant::All, minute_samples(at(3, 0, 0), 750, dec!(2)));
    fakes
        .tickers
        .set(TickerVariant::All, vec![ticker("KOGE", dec!(1), dec!(2000))]);
    let tracker = fakes.tracker();
    let now = at(3, 12, 30);
    tracker.run_competition_refresh(now).await;

    tracker.run_realtime(now).await;
    assert!(only_view(&fakes).accumulated.offset_pending);

    assert_eq!(tracker.run_offsets(now).await, 1);
    tracker.run_realtime(now).await;

    // 720 minutes of 2 before 12:00 are not competition volume.
    let view = only_view(&fakes);
    assert!(!view.accumulated.offset_pending);
    assert_eq!(view.accumulated.today_volume, dec!(560));
    assert_eq!(tracker.run_offsets(now).await, 0);
}

#[tokio::test]
async fn history_outage_delays_tails_without_stopping_tracking() {
    let fakes = FakePorts::new();
    fakes.competitions.set(vec![competition("KOGE")]);
    fakes
        .history
        .set("KOGE", TickerVariant::All, minute_samples(at(2, 0, 0), 1440, dec!(1)));
    fakes
        .tickers
        .set(TickerVariant::All, vec![ticker("KOGE", dec!(1), dec!(3000))]);
    fakes.history.fail(true);
    let tracker = fakes.tracker();
    let now = at(3, 6, 0);
    tracker.run_competition_refresh(now).await;

    let failed = tracker.run_rollover(now).await;
    tracker.run_realtime(now).await;

    assert_eq!(failed.failed, 1);
    assert_eq!(only_view(&fakes).accumulated.today_volume, dec!(3000));

    fakes.history.fail(false);
    let recovered = tracker.run_rollover(now).await;
    tracker.run_realtime(now).await;

    assert_eq!(recovered.built, 1);
    // 18 hours of yesterday (06:00 to 24:00) are subtracted.
    assert_eq!(only_view(&fakes).accumulated.today_volume, dec!(1920));
}
