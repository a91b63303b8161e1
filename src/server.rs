//! MCP server over stdio
//!
//! Reads newline-delimited JSON-RPC from stdin and writes responses to
//! stdout. A single writer task owns stdout so concurrent tool calls never
//! interleave their output; logging goes to stderr for the same reason.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::rpc_codes;
use crate::protocol::{
    Info, InitializeParams, InitializeResult, JsonRpcResponse, RequestId, ServerCapabilities,
    ToolsCallParams, ToolsCapability, ToolsListResult, negotiate_version,
};
use crate::reddit::RedditClient;
use crate::{Error, Result, tools};

/// Server name reported during initialization
const SERVER_NAME: &str = "reddit-mcp";

/// The MCP server
pub struct Server {
    client: Arc<RedditClient>,
}

impl Server {
    /// Create a server around an authenticated Reddit client
    #[must_use]
    pub fn new(client: RedditClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Serve requests from stdin until it closes
    ///
    /// Each request is handled on its own task; a slow upstream call does not
    /// block the read loop or other requests.
    ///
    /// # Errors
    ///
    /// Returns an error when reading stdin fails.
    pub async fn run(&self) -> Result<()> {
        info!("Reddit MCP server listening on stdio");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(line) = rx.recv().await {
                if stdout.write_all(line.as_bytes()).await.is_err()
                    || stdout.write_all(b"\n").await.is_err()
                    || stdout.flush().await.is_err()
                {
                    error!("Failed to write to stdout, shutting down writer");
                    break;
                }
            }
        });

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let client = Arc::clone(&self.client);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = handle_line(&client, &line).await {
                    match serde_json::to_string(&response) {
                        Ok(json) => {
                            // Receiver gone means stdout died; nothing to do.
                            let _ = tx.send(json);
                        }
                        Err(e) => error!(error = %e, "Failed to serialize response"),
                    }
                }
            });
        }

        info!("stdin closed, shutting down");
        drop(tx);
        let _ = writer.await;
        Ok(())
    }
}

/// Parse one input line and handle it; `None` means no response is owed
async fn handle_line(client: &RedditClient, line: &str) -> Option<JsonRpcResponse> {
    match serde_json::from_str::<Value>(line) {
        Ok(message) => handle_message(client, message).await,
        Err(e) => {
            debug!(error = %e, "Received invalid JSON");
            Some(JsonRpcResponse::error(
                None,
                rpc_codes::PARSE_ERROR,
                "Parse error",
            ))
        }
    }
}

/// Handle one JSON-RPC message; `None` for notifications
async fn handle_message(client: &RedditClient, message: Value) -> Option<JsonRpcResponse> {
    let Some(method) = message.get("method").and_then(Value::as_str) else {
        return Some(JsonRpcResponse::error(
            None,
            rpc_codes::INVALID_REQUEST,
            "Invalid Request: missing method",
        ));
    };

    // Notifications carry no id and get no response.
    if method.starts_with("notifications/") {
        debug!(method, "Notification received");
        return None;
    }

    let id = match message.get("id") {
        Some(value) if !value.is_null() => {
            match serde_json::from_value::<RequestId>(value.clone()) {
                Ok(id) => id,
                Err(_) => {
                    return Some(JsonRpcResponse::error(
                        None,
                        rpc_codes::INVALID_REQUEST,
                        "Invalid Request: id must be a string or number",
                    ));
                }
            }
        }
        _ => {
            return Some(JsonRpcResponse::error(
                None,
                rpc_codes::INVALID_REQUEST,
                "Invalid Request: missing id",
            ));
        }
    };

    let params = message.get("params").cloned().unwrap_or(Value::Null);
    debug!(method, %id, "Handling request");

    let response = match method {
        "initialize" => handle_initialize(id, params),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => {
            let result = ToolsListResult {
                tools: tools::definitions(),
                next_cursor: None,
            };
            success_or_internal(id, &result)
        }
        "tools/call" => handle_tools_call(client, id, params).await,
        other => JsonRpcResponse::error(
            Some(id),
            rpc_codes::METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        ),
    };

    Some(response)
}

fn handle_initialize(id: RequestId, params: Value) -> JsonRpcResponse {
    let params: InitializeParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => {
            return JsonRpcResponse::error(
                Some(id),
                rpc_codes::INVALID_PARAMS,
                format!("Invalid params: {e}"),
            );
        }
    };

    let result = InitializeResult {
        protocol_version: negotiate_version(&params.protocol_version).to_string(),
        capabilities: ServerCapabilities {
            experimental: None,
            tools: Some(ToolsCapability {
                list_changed: false,
            }),
        },
        server_info: Info {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: Some("Reddit MCP Server".to_string()),
            description: Some("Read-only access to Reddit subreddits, posts, and comments".to_string()),
        },
        instructions: None,
    };

    let client_name = params
        .client_info
        .as_ref()
        .map_or("unknown", |info| info.name.as_str());
    info!(
        client = client_name,
        client_version = %params.protocol_version,
        negotiated = %result.protocol_version,
        "Initialized"
    );
    success_or_internal(id, &result)
}

async fn handle_tools_call(
    client: &RedditClient,
    id: RequestId,
    params: Value,
) -> JsonRpcResponse {
    let params: ToolsCallParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => {
            return JsonRpcResponse::error(
                Some(id),
                rpc_codes::INVALID_PARAMS,
                format!("Invalid params: {e}"),
            );
        }
    };

    debug!(tool = params.name, "Calling tool");
    match tools::dispatch(client, &params.name, params.arguments).await {
        Ok(result) => success_or_internal(id, &result),
        Err(Error::JsonRpc { code, message, .. }) => {
            JsonRpcResponse::error(Some(id), code, message)
        }
        Err(e) => JsonRpcResponse::error(Some(id), e.to_rpc_code(), e.to_string()),
    }
}

fn success_or_internal<T: serde::Serialize>(id: RequestId, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            Some(id),
            rpc_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {e}"),
        ),
    }
}
