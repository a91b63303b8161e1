//! Configuration loading and validation
//!
//! All settings come from the environment (`REDDIT_` prefix), with a `.env`
//! file loaded first when present. Credentials are mandatory; everything else
//! has working defaults pointed at the public Reddit endpoints.

use std::time::Duration;

use figment::{Figment, providers::Env};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default token-issuance endpoint
const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Default resource API host
const DEFAULT_API_BASE_URL: &str = "https://oauth.reddit.com";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reddit application client ID (`REDDIT_CLIENT_ID`)
    pub client_id: String,

    /// Reddit application client secret (`REDDIT_CLIENT_SECRET`)
    pub client_secret: String,

    /// User-Agent sent on every upstream request. Reddit rejects generic
    /// agent strings, so this must stay descriptive.
    pub user_agent: String,

    /// Token-issuance endpoint (overridable for tests)
    pub token_url: String,

    /// Resource API host (overridable for tests)
    pub api_base_url: String,

    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,

    /// Retry policy for transient upstream failures
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: default_user_agent(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "reddit-mcp:v{} (by /u/reddit-mcp)",
        env!("CARGO_PKG_VERSION")
    )
}

/// Retry configuration for transient upstream failures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries
    pub enabled: bool,
    /// Maximum retry attempts
    pub max_attempts: u32,
    /// Initial backoff in milliseconds
    pub initial_backoff_ms: u64,
    /// Maximum backoff in milliseconds
    pub max_backoff_ms: u64,
    /// Backoff multiplier
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Initial backoff as a `Duration`
    #[must_use]
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Maximum backoff as a `Duration`
    #[must_use]
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl Config {
    /// Load configuration from the environment (`REDDIT_` prefix)
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be parsed or credentials
    /// are missing. The process must not serve any tool without credentials.
    pub fn load() -> Result<Self> {
        // Load .env into the process environment first; missing file is fine.
        dotenvy::dotenv().ok();

        let config: Self = Figment::new()
            .merge(Env::prefixed("REDDIT_").split("__"))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate required fields
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when credentials are absent.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(Error::Config(
                "Missing Reddit API credentials. Please set REDDIT_CLIENT_ID and \
                 REDDIT_CLIENT_SECRET environment variables."
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Outbound request timeout
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
