//! Alpha Tourney - daily volume tracking and reward-target projection for
//! exchange trading tournaments.
//!
//! The exchange only reports rolling 24h counters. This crate turns them into
//! calendar-day volume, accumulates that across a multi-day tournament, and
//! projects the per-winner reward threshold at the tournament's close. Once
//! a tournament passes its freeze instant the numbers are archived and never
//! recomputed.
//!
//! # Architecture
//!
//! Hexagonal, in the usual layers:
//!
//! - [`domain`] - Pure types and algorithms: tail tables, normalization,
//!   start offsets, accumulation, projection
//! - [`application`] - The [`Tracker`](application::tracker::Tracker) service and its
//!   shared state
//! - [`port`] - Traits for the feeds and stores the tracker depends on
//! - [`adapter`] - Exchange HTTP client, JSON file stores, and the CLI
//! - [`infrastructure`] - Configuration, wiring, and the runtime loops
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Expose in-memory port fakes and builders to integration tests
//!
//! # Example
//!
//! ```no_run
//! use alpha_tourney::infrastructure::config::settings::Config;
//! use alpha_tourney::infrastructure::orchestration::orchestrator::Orchestrator;
//!
//! # async fn run() -> alpha_tourney::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.init_logging();
//! Orchestrator::run(config).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
