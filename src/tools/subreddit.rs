//! Subreddit tools: `get_subreddit` and `search_subreddits`

use serde::Deserialize;
use serde_json::json;

use super::{api_failure, check_limit};
use crate::format;
use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};
use crate::reddit::RedditClient;
use crate::reddit::model::{Listing, SubredditAbout, Thing, decode};
use crate::Result;

fn default_limit() -> u32 {
    10
}

/// Arguments for `get_subreddit`
#[derive(Debug, Deserialize)]
pub struct GetSubredditArgs {
    /// Subreddit name without the `r/` prefix
    pub name: String,
}

/// Arguments for `search_subreddits`
#[derive(Debug, Deserialize)]
pub struct SearchSubredditsArgs {
    /// Search query
    pub query: String,
    /// Maximum number of results (1-100)
    #[serde(default = "default_limit")]
    pub limit: u32,
}

pub(super) fn get_subreddit_definition() -> Tool {
    Tool {
        name: "get_subreddit".to_string(),
        title: None,
        description: Some(
            "Retrieve information about a subreddit: title, description, \
             subscriber count, and creation date."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name of the subreddit, without the r/ prefix"
                }
            },
            "required": ["name"]
        }),
        annotations: Some(ToolAnnotations {
            title: Some("Get Subreddit".to_string()),
            read_only_hint: Some(true),
            open_world_hint: Some(true),
        }),
    }
}

pub(super) fn search_subreddits_definition() -> Tool {
    Tool {
        name: "search_subreddits".to_string(),
        title: None,
        description: Some("Search for subreddits matching a query.".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return (1-100)",
                    "minimum": 1,
                    "maximum": 100,
                    "default": 10
                }
            },
            "required": ["query"]
        }),
        annotations: Some(ToolAnnotations {
            title: Some("Search Subreddits".to_string()),
            read_only_hint: Some(true),
            open_world_hint: Some(true),
        }),
    }
}

/// Fetch `/r/<name>/about` and render the subreddit
pub async fn get_subreddit(
    client: &RedditClient,
    args: GetSubredditArgs,
) -> Result<ToolsCallResult> {
    let path = format!("/r/{}/about", args.name);

    let outcome = match client.request(&path, &[]).await {
        Ok(value) => decode::<Thing<SubredditAbout>>(value, "subreddit about response")
            .map(|thing| format::subreddit(&thing.data)),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(text) => Ok(ToolsCallResult::text(text)),
        Err(e) => Ok(api_failure("Failed to retrieve subreddit", &e)),
    }
}

/// Search `/subreddits/search` and render the matches
pub async fn search_subreddits(
    client: &RedditClient,
    args: SearchSubredditsArgs,
) -> Result<ToolsCallResult> {
    check_limit(args.limit)?;

    let params = [
        ("q", args.query.clone()),
        ("limit", args.limit.to_string()),
    ];

    let outcome = match client.request("/subreddits/search", &params).await {
        Ok(value) => decode::<Listing<SubredditAbout>>(value, "subreddit search response")
            .map(|listing| format::subreddit_search_results(&listing.into_items())),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(text) => Ok(ToolsCallResult::text(text)),
        Err(e) => Ok(api_failure("Failed to search subreddits", &e)),
    }
}
