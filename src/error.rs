//! Error types for the Reddit MCP server

use std::io;

use thiserror::Error;

/// Result type alias for the Reddit MCP server
pub type Result<T> = std::result::Result<T, Error>;

/// Reddit MCP server errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing credentials, bad env values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token-issuance request failed (non-2xx or malformed token response)
    #[error("{message}")]
    Auth {
        /// HTTP status from the authorization endpoint, when one was received
        status: Option<u16>,
        /// Upstream message
        message: String,
    },

    /// Resource request returned non-2xx
    #[error("{message}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Upstream message
        message: String,
    },

    /// Outbound request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Upstream body did not match the expected shape
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON-RPC error
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc {
        /// Error code
        code: i32,
        /// Error message
        message: String,
        /// Optional data
        data: Option<serde_json::Value>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a JSON-RPC error
    pub fn json_rpc(code: i32, message: impl Into<String>) -> Self {
        Self::JsonRpc {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an upstream error for a non-2xx resource response
    #[must_use]
    pub fn upstream_status(status: u16) -> Self {
        Self::Upstream {
            status,
            message: format!("HTTP Error: {status}"),
        }
    }

    /// Create an auth error for a non-2xx token response
    #[must_use]
    pub fn auth_status(status: u16) -> Self {
        Self::Auth {
            status: Some(status),
            message: format!("HTTP Error: {status}"),
        }
    }

    /// Convert to JSON-RPC error code
    #[must_use]
    pub fn to_rpc_code(&self) -> i32 {
        match self {
            Self::JsonRpc { code, .. } => *code,
            Self::Json(_) => -32700,     // Parse error
            Self::Protocol(_) => -32600, // Invalid request
            Self::Timeout(_) | Self::Transport(_) => -32000,
            _ => -32603, // Internal error
        }
    }
}

/// Standard JSON-RPC error codes
pub mod rpc_codes {
    /// Parse error - Invalid JSON
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid Request - Not a valid Request object
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = -32603;
}
