//! Chat client configuration.
//!
//! Use the builder methods to customize, or [`ChatConfig::from_env`] to pick
//! up overrides from the environment.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use streamchat::config::ChatConfig;
//!
//! let config = ChatConfig::default()
//!     .with_base_url("http://localhost:9000/api")
//!     .with_read_timeout(Duration::from_secs(30));
//! assert_eq!(config.chat_url(), "http://localhost:9000/api/chat");
//! ```

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_CHAT_PATH: &str = "/chat";

pub const ENV_API_URL: &str = "STREAMCHAT_API_URL";
pub const ENV_READ_TIMEOUT_SECS: &str = "STREAMCHAT_READ_TIMEOUT_SECS";

pub const DEFAULT_GREETING: &str = "I am the portfolio assistant. \n\n\
Ask me about **Projects**, **Skills**, **Tools**, **Experience** or the **Resume**.";

#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// API root, without trailing slash (default: http://localhost:8080/api)
    pub base_url: String,
    /// Path of the streaming chat endpoint under `base_url`
    pub chat_path: String,
    /// Longest allowed gap between two body reads before the exchange fails
    pub read_timeout: Duration,
    /// TCP connect timeout for the HTTP client
    pub connect_timeout: Duration,
    /// Sealed assistant message seeded into a new conversation
    pub greeting: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            read_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            greeting: Some(DEFAULT_GREETING.to_string()),
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_chat_path(mut self, path: impl Into<String>) -> Self {
        self.chat_path = path.into();
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set or clear the greeting message.
    pub fn with_greeting(mut self, greeting: Option<String>) -> Self {
        self.greeting = greeting;
        self
    }

    /// Defaults overridden by `STREAMCHAT_API_URL` and
    /// `STREAMCHAT_READ_TIMEOUT_SECS`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }

        if let Ok(raw) = std::env::var(ENV_READ_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.read_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    "Ignoring {}={:?}: expected a positive number of seconds",
                    ENV_READ_TIMEOUT_SECS,
                    raw
                ),
            }
        }

        config
    }

    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }
}
