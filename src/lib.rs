//! Reddit MCP Server Library
//!
//! Model Context Protocol (MCP) server exposing read-only Reddit access as
//! tools over stdio.
//!
//! # Features
//!
//! - **Six tools**: subreddit lookup and search, post search and retrieval,
//!   comment retrieval by ID or by submission
//! - **OAuth client-credentials**: application-only auth with a cached,
//!   single-flight-refreshed access token
//! - **Failsafes**: request timeouts, retries with exponential backoff, and
//!   a one-shot token refresh on 401
//!
//! # Protocol Version
//!
//! Implements MCP protocol versions 2024-11-05 through 2025-06-18.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod protocol;
pub mod reddit;
pub mod retry;
pub mod server;
pub mod tools;

pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
///
/// Logs go to stderr; stdout is reserved for the protocol stream.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
