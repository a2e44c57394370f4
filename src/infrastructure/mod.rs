//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, adapter wiring, and the runtime loops.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`operator`] - Operator port implementation used by the CLI
//! - [`orchestration`] - Startup sequence and periodic loops

pub mod bootstrap;
pub mod config;
pub mod operator;
pub mod orchestration;
