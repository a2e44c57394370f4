//! Terminal output for the CLI.
//!
//! Every helper honours two global switches: JSON mode, which turns each
//! line into a `{"type", "payload"}` object for scripting, and quiet mode,
//! which drops everything but warnings and errors.

use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn read_config() -> OutputConfig {
    *OUTPUT_CONFIG
        .get_or_init(|| RwLock::new(OutputConfig::default()))
        .read()
}

pub fn configure(config: OutputConfig) {
    *OUTPUT_CONFIG
        .get_or_init(|| RwLock::new(OutputConfig::default()))
        .write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

fn suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// Print the application name and version.
pub fn header() {
    let config = read_config();
    let version = env!("CARGO_PKG_VERSION");
    if config.json {
        emit_json_line("header", json!({ "app": "alpha-tourney", "version": version }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("{} {}", "alpha-tourney".bold(), version.dimmed());
}

pub fn section(title: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!();
    println!("{}", title.bold());
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();
    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {:<20} {}", label.dimmed(), value);
}

pub fn success(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    if read_config().json {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }
    println!("  {} {}", "⚠".yellow(), message);
}

pub fn error(message: &str) {
    if read_config().json {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
        return;
    }
    eprintln!("  {} {}", "×".red(), message);
}

/// Print a pre-rendered block (such as a table) verbatim.
pub fn lines(text: &str) {
    if suppressed(read_config()) {
        return;
    }
    println!("{text}");
}

/// Print one JSON document, in JSON mode only.
pub fn json_output(value: Value) {
    println!("{value}");
}
