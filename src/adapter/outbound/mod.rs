//! Outbound adapters (driven side).

pub mod alpha;
pub mod file;
