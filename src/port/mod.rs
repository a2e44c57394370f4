//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │    CLI (operator port)   │
//!                 └────────────┬─────────────┘
//!                              ▼
//!                 ┌──────────────────────────┐
//!                 │       Application        │
//!                 │     Domain + Ports       │
//!                 └────────────┬─────────────┘
//!        ┌──────────────┬──────┴───────┬────────────────┐
//!        ▼              ▼              ▼                ▼
//!   ┌─────────┐   ┌──────────┐   ┌───────────┐   ┌───────────┐
//!   │ Tickers │   │ History  │   │  Stores   │   │ Dashboard │
//!   └─────────┘   └──────────┘   └───────────┘   └───────────┘
//! ```
//!
//! - [`inbound`]: operator use cases consumed by the CLI
//! - [`outbound`]: feeds and stores consumed by the tracker

pub mod inbound;
pub mod outbound;
