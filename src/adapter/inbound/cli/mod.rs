//! CLI module graph.

pub mod check;
pub mod command;
pub mod finalized;
pub mod operator;
pub mod output;
pub mod run;
