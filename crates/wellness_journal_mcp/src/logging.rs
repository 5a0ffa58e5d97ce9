//! Log filter setup shared by the stdio and HTTP binaries.

use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_ENV: &str = "WELLNESS_JOURNAL_LOG_LEVEL";
const QUIET_TARGETS: &str = "rmcp=warn,serve_inner=warn";

/// `WELLNESS_JOURNAL_LOG_LEVEL`, then `RUST_LOG`, then `info`.
pub fn log_level_from<F>(mut get: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    get(LOG_LEVEL_ENV)
        .or_else(|| get("RUST_LOG"))
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

pub fn log_level_from_env() -> String {
    log_level_from(|key| std::env::var(key).ok())
}

/// Protocol chatter from rmcp stays at warn; an unparsable level falls back to `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("{level},{QUIET_TARGETS}"))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{QUIET_TARGETS}")))
}

/// Logs go to stderr: stdout carries the stdio MCP transport.
pub fn init(level: &str) {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter(level))
        .init();
}
