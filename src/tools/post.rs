//! Post tools: `search_posts` and `get_submission`

use serde::Deserialize;
use serde_json::{Value, json};

use super::{api_failure, check_limit};
use crate::format;
use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};
use crate::reddit::RedditClient;
use crate::reddit::model::{Listing, Submission, decode};
use crate::{Error, Result};

fn default_limit() -> u32 {
    10
}

/// Sort order for post search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    /// Best match for the query
    #[default]
    Relevance,
    /// Currently trending
    Hot,
    /// Newest first
    New,
    /// Highest scoring within the time range
    Top,
    /// Most commented
    Comments,
}

impl PostSort {
    fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Hot => "hot",
            Self::New => "new",
            Self::Top => "top",
            Self::Comments => "comments",
        }
    }

    /// The listing endpoint used when no query is given. Relevance and
    /// comment-count only exist as search sorts, so browsing falls back to
    /// the hot listing.
    fn browse_listing(self) -> &'static str {
        match self {
            Self::Relevance | Self::Hot | Self::Comments => "hot",
            Self::New => "new",
            Self::Top => "top",
        }
    }
}

/// Time range for post search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// All time
    #[default]
    All,
    /// Past hour
    Hour,
    /// Past day
    Day,
    /// Past week
    Week,
    /// Past month
    Month,
    /// Past year
    Year,
}

impl TimeRange {
    fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Arguments for `search_posts`
#[derive(Debug, Deserialize)]
pub struct SearchPostsArgs {
    /// Subreddit to search within
    pub subreddit: String,
    /// Search query; empty means browse the subreddit's listing
    #[serde(default)]
    pub query: String,
    /// Sort order
    #[serde(default)]
    pub sort: PostSort,
    /// Time range (applies to the `top` sort)
    #[serde(default)]
    pub time: TimeRange,
    /// Maximum number of results (1-100)
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Arguments for `get_submission`
#[derive(Debug, Deserialize)]
pub struct GetSubmissionArgs {
    /// Submission ID, with or without the `t3_` prefix
    pub id: String,
}

pub(super) fn search_posts_definition() -> Tool {
    Tool {
        name: "search_posts".to_string(),
        title: None,
        description: Some(
            "Search for posts within a subreddit. With an empty query, browses \
             the subreddit's hot, new, or top listing instead."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "subreddit": {
                    "type": "string",
                    "description": "Name of the subreddit to search in, without the r/ prefix"
                },
                "query": {
                    "type": "string",
                    "description": "Search query. Leave empty to browse the subreddit listing."
                },
                "sort": {
                    "type": "string",
                    "enum": ["relevance", "hot", "new", "top", "comments"],
                    "description": "Sort order for results",
                    "default": "relevance"
                },
                "time": {
                    "type": "string",
                    "enum": ["all", "hour", "day", "week", "month", "year"],
                    "description": "Time range for results, used with the top sort",
                    "default": "all"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return (1-100)",
                    "minimum": 1,
                    "maximum": 100,
                    "default": 10
                }
            },
            "required": ["subreddit"]
        }),
        annotations: Some(ToolAnnotations {
            title: Some("Search Posts".to_string()),
            read_only_hint: Some(true),
            open_world_hint: Some(true),
        }),
    }
}

pub(super) fn get_submission_definition() -> Tool {
    Tool {
        name: "get_submission".to_string(),
        title: None,
        description: Some(
            "Retrieve a submission by ID, including its title, score, and \
             content."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Submission ID, with or without the t3_ prefix"
                }
            },
            "required": ["id"]
        }),
        annotations: Some(ToolAnnotations {
            title: Some("Get Submission".to_string()),
            read_only_hint: Some(true),
            open_world_hint: Some(true),
        }),
    }
}

/// Search a subreddit's posts, or browse its listing when no query is given
pub async fn search_posts(client: &RedditClient, args: SearchPostsArgs) -> Result<ToolsCallResult> {
    check_limit(args.limit)?;

    let outcome = if args.query.trim().is_empty() {
        browse_posts(client, &args).await
    } else {
        query_posts(client, &args).await
    };

    match outcome {
        Ok(posts) => Ok(ToolsCallResult::text(format::post_search_results(&posts))),
        Err(e) => Ok(api_failure("Failed to search posts", &e)),
    }
}

async fn query_posts(client: &RedditClient, args: &SearchPostsArgs) -> Result<Vec<Submission>> {
    let path = format!("/r/{}/search", args.subreddit);
    let params = [
        ("q", args.query.clone()),
        ("sort", args.sort.as_str().to_string()),
        ("t", args.time.as_str().to_string()),
        ("limit", args.limit.to_string()),
        ("restrict_sr", "true".to_string()),
    ];

    let value = client.request(&path, &params).await?;
    let listing = decode::<Listing<Submission>>(value, "post search response")?;
    Ok(listing.into_items())
}

async fn browse_posts(client: &RedditClient, args: &SearchPostsArgs) -> Result<Vec<Submission>> {
    let listing = args.sort.browse_listing();
    let path = format!("/r/{}/{listing}", args.subreddit);

    let mut params = vec![("limit", args.limit.to_string())];
    if listing == "top" {
        params.push(("t", args.time.as_str().to_string()));
    }

    let value = client.request(&path, &params).await?;
    let listing = decode::<Listing<Submission>>(value, "post listing response")?;
    Ok(listing.into_items())
}

/// Fetch a submission by ID and render it
pub async fn get_submission(
    client: &RedditClient,
    args: GetSubmissionArgs,
) -> Result<ToolsCallResult> {
    let id = args.id.strip_prefix("t3_").unwrap_or(&args.id);
    let path = format!("/comments/{id}");
    // The comment tree is not needed here; limit keeps the response small.
    let params = [("limit", "1".to_string())];

    let outcome = match client.request(&path, &params).await {
        Ok(value) => decode_submission(value),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(submission) => Ok(ToolsCallResult::text(format::submission(&submission))),
        Err(e) => Ok(api_failure("Failed to retrieve submission", &e)),
    }
}

/// `/comments/<id>` answers with a two-element array: the submission listing
/// followed by the comment listing.
fn decode_submission(value: Value) -> Result<Submission> {
    let (submissions, _comments) =
        decode::<(Listing<Submission>, Value)>(value, "submission response")?;
    submissions
        .into_items()
        .into_iter()
        .next()
        .ok_or_else(|| Error::MalformedResponse("submission listing was empty".to_string()))
}
