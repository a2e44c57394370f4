//! Infrastructure configuration modules.

pub mod logging;
pub mod projection;
pub mod schedule;
pub mod settings;
pub mod storage;
