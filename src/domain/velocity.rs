//! Short-window trading velocity.
//!
//! Fed with today's normalized volume after every poll. The rolling 24h
//! counter itself is unsuitable: expiring volume makes it move backwards.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Observed rate of trading over the recent window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Velocity {
    pub volume_per_second: Decimal,
    /// Volume per transaction over the window, when trades were observed.
    pub ticket_size: Option<Decimal>,
}

#[derive(Debug, Clone, Copy)]
struct Observation {
    at: DateTime<Utc>,
    volume: Decimal,
    tx_count: u64,
}

/// Sliding window of cumulative volume observations for one asset.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    window: Duration,
    observations: VecDeque<Observation>,
}

impl VelocityTracker {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            observations: VecDeque::new(),
        }
    }

    /// Record today's cumulative volume and trade count at `at`.
    ///
    /// A drop in the cumulative figure means the series restarted (day
    /// rollover or an upstream reset) and the window starts over.
    pub fn record(&mut self, at: DateTime<Utc>, volume: Decimal, tx_count: u64) {
        if let Some(last) = self.observations.back() {
            if volume < last.volume || at < last.at {
                self.observations.clear();
            }
        }
        self.observations.push_back(Observation {
            at,
            volume,
            tx_count,
        });

        let cutoff = at - self.window;
        while self.observations.len() > 2 {
            match self.observations.get(1) {
                Some(next) if next.at <= cutoff => {
                    self.observations.pop_front();
                }
                _ => break,
            }
        }
    }

    /// Velocity between the oldest and newest observation in the window.
    #[must_use]
    pub fn velocity(&self) -> Velocity {
        let (Some(first), Some(last)) = (self.observations.front(), self.observations.back()) else {
            return Velocity::default();
        };
        let elapsed_ms = (last.at - first.at).num_milliseconds();
        if elapsed_ms <= 0 {
            return Velocity::default();
        }

        let volume = (last.volume - first.volume).max(Decimal::ZERO);
        let trades = last.tx_count.saturating_sub(first.tx_count);

        Velocity {
            volume_per_second: volume * Decimal::from(1000) / Decimal::from(elapsed_ms),
            ticket_size: (trades > 0).then(|| volume / Decimal::from(trades)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
