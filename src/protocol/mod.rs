//! MCP protocol types

mod messages;
mod types;

pub use messages::*;
pub use types::*;

/// MCP protocol version served by default
pub const PROTOCOL_VERSION: &str = "2025-03-26";

/// Protocol versions this server can speak, newest first
pub const SUPPORTED_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Negotiate a protocol version with the client.
///
/// Echoes the client's version when supported, otherwise answers with our
/// default and lets the client decide whether to proceed.
#[must_use]
pub fn negotiate_version(client_version: &str) -> &'static str {
    SUPPORTED_VERSIONS
        .iter()
        .find(|v| **v == client_version)
        .copied()
        .unwrap_or(PROTOCOL_VERSION)
}
