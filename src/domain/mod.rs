//! Exchange-agnostic domain types and the volume/projection algorithms.
//!
//! Everything in here is pure: no I/O, no clocks. Callers pass the current
//! instant explicitly so every computation is reproducible in tests.

pub mod competition;
pub mod finalized;
pub mod id;
pub mod ledger;
pub mod market;
pub mod normalize;
pub mod projection;
pub mod tail;
pub mod velocity;
pub mod view;
