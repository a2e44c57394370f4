//! Application orchestration.
//!
//! Runtime wiring and lifecycle management: the startup sequence, then one
//! periodic loop per concern until shutdown.

mod loops;
pub mod orchestrator;
mod runtime;
mod startup;
