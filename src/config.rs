use std::time::Duration;

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Default wait budget for element lookups when a tool call omits `timeout`.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Poll interval for element waits.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Process configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// WebDriver endpoint new sessions connect to (chromedriver, geckodriver,
    /// or a Selenium server).
    pub webdriver_url: String,
    /// Log verbosity filter for the stderr tracing output.
    pub log_filter: String,
    /// Force per-message flushing of protocol output. The stdio transport
    /// already flushes after every message, so this only affects logging.
    pub unbuffered: bool,
    /// Default element-wait timeout in milliseconds.
    pub default_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let webdriver_url = std::env::var("WEBDRIVER_URL")
            .unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string());

        let log_filter = std::env::var("SELENIUM_MCP_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        let unbuffered = std::env::var("SELENIUM_MCP_UNBUFFERED")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(false);

        let default_timeout_ms = std::env::var("SELENIUM_MCP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            webdriver_url,
            log_filter,
            unbuffered,
            default_timeout_ms,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            log_filter: "info".to_string(),
            unbuffered: false,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}
