//! Operator implementations for inbound adapters.

pub mod archive;
pub mod diagnostic;
pub mod entry;
pub mod runtime;
