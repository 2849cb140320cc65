//! Log-level filtering for the activity log.
//!
//! In TUI mode ratatui owns stdout, so worker diagnostics cannot go through
//! a normal logger. Events carry their own level instead and are filtered
//! against `RUST_LOG` before they reach the activity panel.

use crate::error_classifier::LogLevel;
use std::env;

/// Whether an event of the given level should reach the activity log,
/// judged against the `RUST_LOG` threshold (default `info`).
pub fn passes_threshold(event_level: LogLevel) -> bool {
    event_level >= activity_log_threshold()
}

fn activity_log_threshold() -> LogLevel {
    match env::var("RUST_LOG") {
        Ok(spec) => threshold_from_spec(&spec),
        Err(_) => LogLevel::Info,
    }
}

/// Reads the leading directive of a `RUST_LOG` spec, accepting both bare
/// levels (`debug`) and module-scoped ones (`proxydash=debug`). Anything
/// unrecognized falls back to `info`.
fn threshold_from_spec(spec: &str) -> LogLevel {
    let first = spec.split(',').next().unwrap_or(spec);
    let level = first.rsplit('=').next().unwrap_or(first);
    match level.trim().to_lowercase().as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info,
    }
}
