//! Composition root: configuration in, wired tracker out.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::alpha::client::AlphaClient;
use crate::adapter::outbound::file::archive::FileArchive;
use crate::adapter::outbound::file::competitions::JsonCompetitionStore;
use crate::adapter::outbound::file::dashboard::DashboardFile;
use crate::application::tracker::{Ports, Tracker, TrackerSettings};
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::dashboard::DashboardSink;

impl From<&Config> for TrackerSettings {
    fn from(config: &Config) -> Self {
        Self {
            projection: (&config.projection).into(),
            velocity_window: config.projection.velocity_window(),
            roll_base_volume: config.storage.roll_base_volume,
            call_timeout: config.schedule.call_timeout(),
            batch_delay: config.schedule.batch_delay(),
            batch_jitter: config.schedule.batch_jitter(),
        }
    }
}

/// Build every outbound adapter named by `config`.
///
/// One exchange client serves both feeds so the alpha-id lookup learned
/// from ticker polls is shared with history queries.
pub fn build_ports(config: &Config) -> Ports {
    let exchange = Arc::new(AlphaClient::from_config(&config.exchange));
    let dashboard = config.storage.dashboard_file.as_ref().map(|path| {
        info!(path = %path, "Dashboard publishing enabled");
        Arc::new(DashboardFile::new(path)) as Arc<dyn DashboardSink>
    });

    Ports {
        tickers: exchange.clone(),
        history: exchange,
        competitions: Arc::new(JsonCompetitionStore::new(&config.storage.competitions_file)),
        archive: Arc::new(FileArchive::new(&config.storage.archive_dir)),
        dashboard,
    }
}

#[must_use]
pub fn build_tracker(config: &Config) -> Tracker {
    Tracker::new(build_ports(config), TrackerSettings::from(config))
}
