//! Tool registry and dispatch
//!
//! Each tool is defined exactly once: its wire definition (name, description,
//! input schema) and its handler live together in one module, and both
//! `tools/list` and `tools/call` are served from that single source.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::protocol::{Tool, ToolsCallResult};
use crate::reddit::RedditClient;
use crate::{Error, Result, error::rpc_codes};

pub mod comment;
pub mod post;
pub mod subreddit;

/// All tool definitions, in the order they are listed to clients
#[must_use]
pub fn definitions() -> Vec<Tool> {
    vec![
        subreddit::get_subreddit_definition(),
        subreddit::search_subreddits_definition(),
        post::search_posts_definition(),
        post::get_submission_definition(),
        comment::get_comment_definition(),
        comment::get_comments_by_submission_definition(),
    ]
}

/// Route a `tools/call` to its handler
///
/// # Errors
///
/// Returns `Error::JsonRpc` for an unknown tool name or unparseable
/// arguments. Upstream failures do not surface here; handlers convert them
/// into an error-flagged tool result instead.
pub async fn dispatch(
    client: &RedditClient,
    name: &str,
    arguments: Value,
) -> Result<ToolsCallResult> {
    match name {
        "get_subreddit" => subreddit::get_subreddit(client, parse_args(arguments)?).await,
        "search_subreddits" => subreddit::search_subreddits(client, parse_args(arguments)?).await,
        "search_posts" => post::search_posts(client, parse_args(arguments)?).await,
        "get_submission" => post::get_submission(client, parse_args(arguments)?).await,
        "get_comment" => comment::get_comment(client, parse_args(arguments)?).await,
        "get_comments_by_submission" => {
            comment::get_comments_by_submission(client, parse_args(arguments)?).await
        }
        other => Err(Error::json_rpc(
            rpc_codes::METHOD_NOT_FOUND,
            format!("Unknown tool: {other}"),
        )),
    }
}

/// Deserialize tool arguments, treating absent arguments as an empty object
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let value = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(value).map_err(|e| {
        Error::json_rpc(rpc_codes::INVALID_PARAMS, format!("Invalid arguments: {e}"))
    })
}

/// Validate a result-count limit against Reddit's accepted range
fn check_limit(limit: u32) -> Result<()> {
    if (1..=100).contains(&limit) {
        Ok(())
    } else {
        Err(Error::json_rpc(
            rpc_codes::INVALID_PARAMS,
            format!("Invalid arguments: limit must be between 1 and 100, got {limit}"),
        ))
    }
}

/// Convert an upstream failure into an error-flagged tool result
///
/// The text mirrors what the agent should read: a short context plus the
/// upstream error message.
fn api_failure(context: &str, error: &Error) -> ToolsCallResult {
    warn!(context, error = %error, "Tool call failed");
    ToolsCallResult::error_text(format!("{context}: {error}"))
}
