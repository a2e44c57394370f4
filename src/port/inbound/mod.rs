//! Inbound (driving) ports consumed by inbound adapters.
//!
//! # Modules
//!
//! - [`operator`]: Operator-facing use cases for running the tracker,
//!   checking configuration, and reading the archive

pub mod operator;
