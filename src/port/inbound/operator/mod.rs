//! Operator-facing inbound ports consumed by CLI adapters.

pub mod archive;
pub mod diagnostic;
pub mod port;
pub mod runtime;
