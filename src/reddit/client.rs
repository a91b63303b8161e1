//! Authenticated Reddit API request helper
//!
//! One generic operation: an authenticated GET against the resource host with
//! query-parameter encoding, bearer-token injection, and HTTP-status-to-error
//! translation layered on top of the token cache.

use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::token::{Credentials, TokenCache};
use crate::config::Config;
use crate::retry::{RetryPolicy, with_retry};
use crate::{Error, Result};

/// Client for Reddit's resource API
pub struct RedditClient {
    /// Shared HTTP client (carries the request timeout)
    http: Client,
    /// Resource API host, no trailing slash
    api_base_url: String,
    /// User-Agent sent on every request
    user_agent: String,
    /// Token cache
    tokens: TokenCache,
    /// Retry policy for transient failures
    retry: RetryPolicy,
}

impl RedditClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;

        let tokens = TokenCache::new(
            http.clone(),
            Credentials {
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
            },
            config.token_url.clone(),
            config.user_agent.clone(),
        );

        Ok(Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            tokens,
            retry: RetryPolicy::new(&config.retry),
        })
    }

    /// Issue an authenticated GET and return the parsed JSON body
    ///
    /// `params` are appended as a query string in caller order; an empty
    /// slice produces a URL with no query string at all.
    ///
    /// # Errors
    ///
    /// `Error::Upstream` on non-2xx, `Error::Timeout` on a request timeout,
    /// `Error::MalformedResponse` when the body is not JSON, `Error::Auth`
    /// when the token exchange fails.
    pub async fn request(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        match self.request_with_retry(path, params).await {
            // The cached token may have expired or been revoked mid-flight.
            // One forced refresh + retry, outside the transient-retry loop.
            Err(Error::Upstream { status: 401, .. }) => {
                debug!(path, "401 from resource endpoint, refreshing token and retrying once");
                self.tokens.invalidate().await;
                self.request_with_retry(path, params).await
            }
            other => other,
        }
    }

    async fn request_with_retry(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        with_retry(&self.retry, "reddit_api", || self.execute(path, params)).await
    }

    async fn execute(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let token = self.tokens.get_valid_token().await?;
        let url = self.build_url(path, params)?;

        debug!(%path, "Making request");
        let response = self
            .http
            .get(url)
            .bearer_auth(&token)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("Request to {path} timed out: {e}"))
                } else {
                    Error::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream_status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::MalformedResponse(format!("response body is not JSON: {e}")))
    }

    /// Build the absolute URL, appending a query string only when params exist
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.api_base_url, path))
            .map_err(|e| Error::Config(format!("Invalid API URL for {path}: {e}")))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}
