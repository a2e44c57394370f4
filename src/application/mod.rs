//! Application services (use cases).
//!
//! [`Tracker`](tracker::Tracker) orchestrates the domain algorithms and coordinates the
//! outbound ports. Each concern lives in its own module as an `impl Tracker`
//! block:
//!
//! - [`market`]: ticker rows to normalized market entries
//! - [`tracking`]: the realtime cycle and per-competition projection
//! - [`finalize`]: the LIVE to FINALIZED transition and queued writes
//! - [`offset`]: day-one start offsets
//! - [`rollover`]: tail rebuilds and base volume roll-forward
//! - [`refresh`]: competition and base volume reloads
//! - [`view`]: dashboard snapshots

pub mod finalize;
pub mod market;
pub mod offset;
pub mod refresh;
pub mod rollover;
pub mod state;
pub mod tracker;
pub mod tracking;
pub mod view;
