//! Centralized configuration management for bizdash

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Fallback backend used when no base URL is configured
pub const DEFAULT_API_BASE_URL: &str = "https://demo.onlineorder.dev-logix.com/api";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// REST backend configuration
    pub api: ApiConfig,
    /// Active session (token and business scope)
    pub session: Session,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Terminal UI timing
    pub ui: UiConfig,
    /// Log file written by the binary
    pub log_file: PathBuf,
}

/// REST backend configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
}

/// The signed-in session. Retrieval is handled elsewhere; bizdash only
/// consumes the token and the business the user belongs to.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Bearer token attached to every request
    pub token: Option<String>,
    /// Business (tenant) scoping all list and create requests
    pub business_id: Option<i64>,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

/// Terminal UI timing configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Input poll interval (milliseconds)
    pub tick_ms: u64,
    /// How long a notification stays visible (seconds)
    pub toast_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            toast_seconds: 4,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: Session::default(),
            http: HttpConfig::default(),
            ui: UiConfig::default(),
            log_file: PathBuf::from("./bizdash.log"),
        }
    }
}

fn default_user_agent() -> String {
    format!("bizdash/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("BIZDASH_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let session = Session {
            token: std::env::var("BIZDASH_API_TOKEN").ok().filter(|t| !t.is_empty()),
            business_id: parse_env_var("BIZDASH_BUSINESS_ID")?,
        };

        let http = HttpConfig {
            timeout_seconds: parse_env_var("BIZDASH_HTTP_TIMEOUT_SECONDS")?.unwrap_or(30),
            user_agent: std::env::var("BIZDASH_USER_AGENT")
                .unwrap_or_else(|_| default_user_agent()),
        };

        let ui = UiConfig {
            tick_ms: parse_env_var("BIZDASH_TICK_MS")?.unwrap_or(250),
            toast_seconds: parse_env_var("BIZDASH_TOAST_SECONDS")?.unwrap_or(4),
        };

        let log_file = std::env::var("BIZDASH_LOG_FILE")
            .unwrap_or_else(|_| "./bizdash.log".to_string())
            .into();

        Ok(Config {
            api: ApiConfig { base_url },
            session,
            http,
            ui,
            log_file,
        })
    }

    /// Apply command line overrides on top of the loaded values
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        business_id: Option<i64>,
        token: Option<String>,
    ) -> Self {
        if let Some(base_url) = base_url {
            self.api.base_url = base_url;
        }
        if business_id.is_some() {
            self.session.business_id = business_id;
        }
        if token.is_some() {
            self.session.token = token;
        }
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Get input poll interval as Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }

    /// Get notification lifetime as Duration
    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.ui.toast_seconds)
    }

    /// Current business id, required by every list and create call
    pub fn business_id(&self) -> Result<i64> {
        self.session.business_id.ok_or_else(|| {
            anyhow::anyhow!(
                "No business id configured. Set BIZDASH_BUSINESS_ID or pass --business-id"
            )
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API base URL must start with http:// or https://: {}",
                self.api.base_url
            ));
        }

        if self.ui.tick_ms == 0 {
            return Err(anyhow::anyhow!("BIZDASH_TICK_MS must be greater than zero"));
        }

        // Check if parent directory of the log file exists
        if let Some(parent) = self.log_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "Log file parent directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.ui.tick_ms, 250);
        assert!(config.session.token.is_none());
        assert!(config.http.user_agent.starts_with("bizdash/"));
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let config = Config::default().with_overrides(
            Some("http://localhost:8000/api/".to_string()),
            Some(42),
            None,
        );
        assert_eq!(config.base_url(), "http://localhost:8000/api");
        assert_eq!(config.business_id().unwrap(), 42);
        assert!(config.session.token.is_none());
    }

    #[test]
    fn test_missing_business_id_is_an_error() {
        let config = Config::default();
        assert!(config.business_id().is_err());
    }

    #[test]
    fn test_config_validation() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.log_file = dir.path().join("bizdash.log");
        config.validate().unwrap();

        config.log_file = dir.path().join("missing").join("bizdash.log");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_base_url_without_scheme() {
        let mut config = Config::default();
        config.api.base_url = "demo.example.com/api".to_string();
        assert!(config.validate().is_err());
    }
}
