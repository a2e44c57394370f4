//! Filesystem-backed stores.

mod atomic;

pub mod archive;
pub mod competitions;
pub mod dashboard;
