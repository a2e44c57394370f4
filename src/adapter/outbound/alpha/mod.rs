//! Exchange integration over the public alpha-token REST endpoints.

pub mod client;
pub mod dto;
pub mod settings;
