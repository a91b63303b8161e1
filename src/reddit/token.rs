//! OAuth client-credentials token cache
//!
//! Amortizes the token handshake across many tool calls within one long-lived
//! process: acquire once, reuse until expiry, refresh on demand.

use std::time::{Duration, Instant};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{Error, Result};

/// Application credentials, configured once at process start
#[derive(Debug, Clone)]
pub struct Credentials {
    /// OAuth client identifier
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
}

/// A cached access token and its expiry instant
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    /// Expiry is compared exactly: a token is served right up to its expiry
    /// instant, and the request path handles a 401 from a token that died
    /// mid-flight.
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// OAuth token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Process-wide token cache with single-flight refresh
pub struct TokenCache {
    /// HTTP client for token requests
    http: Client,
    /// Application credentials
    credentials: Credentials,
    /// Token-issuance endpoint
    token_url: String,
    /// User-Agent sent on token requests
    user_agent: String,
    /// Current token. The lock is held across the refresh await, so
    /// concurrent callers observing an expired token queue behind the first
    /// refresher instead of issuing their own exchange.
    current: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Create a new token cache
    #[must_use]
    pub fn new(
        http: Client,
        credentials: Credentials,
        token_url: String,
        user_agent: String,
    ) -> Self {
        Self {
            http,
            credentials,
            token_url,
            user_agent,
            current: Mutex::new(None),
        }
    }

    /// Get a valid access token, refreshing when the cached one is expired
    ///
    /// # Errors
    ///
    /// Returns `Error::Auth` when the authorization endpoint answers non-2xx
    /// or with an unparseable body; the cache is left untouched in that case.
    pub async fn get_valid_token(&self) -> Result<String> {
        let mut slot = self.current.lock().await;

        if let Some(ref token) = *slot {
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *slot = Some(token);
        Ok(access_token)
    }

    /// Drop the cached token so the next call performs a fresh exchange
    pub async fn invalidate(&self) {
        *self.current.lock().await = None;
    }

    /// Perform the client-credentials exchange
    async fn fetch_token(&self) -> Result<CachedToken> {
        let now = Instant::now();
        let basic = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        ));

        let response = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, format!("Basic {basic}"))
            .header(USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("Token request timed out: {e}"))
                } else {
                    Error::Auth {
                        status: None,
                        message: format!("Token request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::auth_status(status.as_u16()));
        }

        let token: TokenResponse = response.json().await.map_err(|e| Error::Auth {
            status: None,
            message: format!("Failed to parse token response: {e}"),
        })?;

        debug!("New Reddit access token obtained");
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::from_secs(token.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_not_expired() {
        let token = CachedToken {
            access_token: "TOK1".to_string(),
            expires_at: Instant::now() + Duration::from_secs(3600),
        };
        assert!(!token.is_expired());
    }

    #[test]
    fn token_at_expiry_instant_is_expired() {
        let token = CachedToken {
            access_token: "TOK1".to_string(),
            expires_at: Instant::now(),
        };
        assert!(token.is_expired());
    }

    #[test]
    fn token_response_deserializes() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"TOK1","expires_in":3600}"#).unwrap();
        assert_eq!(response.access_token, "TOK1");
        assert_eq!(response.expires_in, 3600);
    }

    #[test]
    fn token_response_tolerates_extra_fields() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"TOK1","token_type":"bearer","expires_in":86400,"scope":"*"}"#,
        )
        .unwrap();
        assert_eq!(response.expires_in, 86400);
    }
}
