//! Configuration for the checkerstty host.
//!
//! Every tunable has a compile-time default and can be overridden at runtime
//! via a dedicated environment variable. Command-line flags take precedence
//! over both.

/// Default tracing filter. Only warnings and errors reach stderr.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Get the tracing filter directive for the log subscriber.
///
/// Priority:
/// 1. `CHECKERSTTY_LOG` env variable if set (e.g. `checkers=debug`)
/// 2. `warn` as fallback
pub fn get_log_filter() -> String {
    if let Ok(filter) = std::env::var("CHECKERSTTY_LOG") {
        return filter;
    }

    DEFAULT_LOG_FILTER.to_string()
}

/// Get the starting layout for a new session.
///
/// Priority:
/// 1. `CHECKERSTTY_LAYOUT` env variable if set and non-empty
/// 2. `None`, meaning the standard starting position
pub fn get_start_layout() -> Option<String> {
    std::env::var("CHECKERSTTY_LAYOUT")
        .ok()
        .filter(|layout| !layout.trim().is_empty())
}
