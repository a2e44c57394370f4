//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts cover the exchange feeds, the competition configuration
//! store, the durable archive, and the dashboard publisher.

pub mod dashboard;
pub mod feed;
pub mod store;
