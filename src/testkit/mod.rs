//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`ports`]: in-memory fakes for every outbound port, plus a
//!   [`FakePorts`](ports::FakePorts) bundle that builds a ready tracker.
//! - [`domain`]: builders for competitions, tickers, samples and records.
//! - [`config`]: canonical tracker settings with no pacing delays.

pub mod config;
pub mod domain;
pub mod ports;
