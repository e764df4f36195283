use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Nyaya";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default backend address when `NYAYA_API_URL` is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Request timeout for question calls. Answer generation can be slow.
pub const ASK_TIMEOUT_SECS: u64 = 120;

/// Timeout for the lightweight status / session endpoints.
pub const STATUS_TIMEOUT_SECS: u64 = 10;

/// A cached session older than this (from creation) is discarded.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Interval between background session-activity persists.
pub const SESSION_REFRESH_SECS: u64 = 30;

/// Interval between session-indicator re-renders.
pub const INDICATOR_REFRESH_SECS: u64 = 60;

/// Stamped into every exported document.
pub const LEGAL_DISCLAIMER: &str = "This document is for informational purposes only and does not \
constitute legal advice. Consult a qualified advocate for advice on any specific matter.";

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "nyaya=info"
}

/// Backend base URL, overridable via environment.
pub fn api_base_url() -> String {
    std::env::var("NYAYA_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}

/// Get the application data directory
/// ~/.nyaya/ on all platforms
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".nyaya")
}

/// Location of the persisted session record.
pub fn session_file() -> PathBuf {
    app_data_dir().join("session.json")
}

/// Directory receiving exported snapshots and transcripts.
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}
