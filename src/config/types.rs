use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Catalog-Walker
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub target: TargetConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub output: OutputConfig,
}

/// The catalog endpoint every request is sent to
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Fixed endpoint URL; pages differ only by query parameters
    pub endpoint: String,

    /// Name of the query parameter carrying the action code
    #[serde(rename = "action-key", default = "default_action_key")]
    pub action_key: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional User-Agent override
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,
}

/// Retry policy for transient transport failures
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first one
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds), doubled on each retry
    #[serde(rename = "base-delay-ms", default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound for a single backoff delay (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent partition workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Courtesy delay after every request (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Letters to traverse; all 26 when absent
    #[serde(default)]
    pub letters: Option<String>,

    /// Course titles containing this text are skipped without being entered
    #[serde(rename = "placeholder-title", default = "default_placeholder_title")]
    pub placeholder_title: String,
}

/// Where session cookies come from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Inline cookie set shared by every session
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,

    /// TOML file holding a cookie table, re-read for each new session
    #[serde(rename = "cookie-file", default)]
    pub cookie_file: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory of the JSON record tree
    pub directory: String,

    /// Optional SQLite database receiving the same records
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,

    /// Optional markdown run summary
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            request_delay_ms: default_request_delay_ms(),
            letters: None,
            placeholder_title: default_placeholder_title(),
        }
    }
}

fn default_action_key() -> String {
    "ICAction".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_workers() -> u32 {
    26
}

fn default_request_delay_ms() -> u64 {
    2_000
}

fn default_placeholder_title() -> String {
    "unspecified".to_string()
}
