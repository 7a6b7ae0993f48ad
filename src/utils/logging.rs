//! Tracing setup for the broker.
//!
//! The level comes from the config-driven `server.log_level` string, so the
//! same knob works via `config/default.*` or `SERVER__LOG_LEVEL`.

use tracing::Level;

/// Map a `server.log_level` string to a tracing level. Unrecognized values
/// fall back to `info` rather than failing startup.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" | "warning" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    }
}

/// Install the global subscriber at the configured level. Repeated calls
/// (tests, embedding as a library) keep the first subscriber instead of
/// panicking.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .try_init();
}
