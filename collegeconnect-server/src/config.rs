//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for collegeconnect-server.
///
/// Every field has a default matching the classic single-host deployment
/// (CollegeConnect on port 7000, CampusFlow on port 3000), so the server
/// works out-of-the-box without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"127.0.0.1:7000"`).
    pub bind_address: String,

    /// Path of the JSON document holding every update record
    /// (default: `"data.json"`). A `.bak` sibling is written next to it
    /// whenever normalization rewrites the file.
    pub data_file: PathBuf,

    /// CampusFlow endpoint that receives newly created updates.
    /// An empty value disables forwarding.
    pub peer_sync_url: String,

    /// Upper bound for a single outbound sync call.
    pub peer_timeout: Duration,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins. `None` means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("CC_BIND", "127.0.0.1:7000"),
            data_file: PathBuf::from(env_or("CC_DATA_FILE", "data.json")),
            peer_sync_url: env_or("CC_PEER_SYNC_URL", "http://127.0.0.1:3000/api/sync"),
            peer_timeout: Duration::from_secs(parse_env("CC_PEER_TIMEOUT_SECS", 5)),
            log_level: env_or("CC_LOG", "info"),
            log_json: env_flag("CC_LOG_JSON", false),
            cors_allowed_origins: std::env::var("CC_CORS_ORIGINS")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            enable_swagger: env_flag("CC_ENABLE_SWAGGER", true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7000".to_owned(),
            data_file: PathBuf::from("data.json"),
            peer_sync_url: "http://127.0.0.1:3000/api/sync".to_owned(),
            peer_timeout: Duration::from_secs(5),
            log_level: "info".to_owned(),
            log_json: false,
            cors_allowed_origins: None,
            enable_swagger: true,
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
