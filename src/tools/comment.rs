//! Comment tools: `get_comment` and `get_comments_by_submission`

use serde::Deserialize;
use serde_json::{Value, json};

use super::{api_failure, check_limit};
use crate::format;
use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};
use crate::reddit::RedditClient;
use crate::reddit::model::{Comment, Listing, decode};
use crate::Result;

fn default_limit() -> u32 {
    10
}

/// Sort order for a submission's comment tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentSort {
    /// Reddit's default "best" ordering
    #[default]
    Confidence,
    /// Highest scoring first
    Top,
    /// Newest first
    New,
    /// Most controversial first
    Controversial,
    /// Oldest first
    Old,
    /// Random order
    Random,
    /// Q&A ordering
    Qa,
    /// Live ordering
    Live,
}

impl CommentSort {
    fn as_str(self) -> &'static str {
        match self {
            Self::Confidence => "confidence",
            Self::Top => "top",
            Self::New => "new",
            Self::Controversial => "controversial",
            Self::Old => "old",
            Self::Random => "random",
            Self::Qa => "qa",
            Self::Live => "live",
        }
    }
}

/// Arguments for `get_comment`
#[derive(Debug, Deserialize)]
pub struct GetCommentArgs {
    /// Comment ID, with or without the `t1_` prefix
    pub id: String,
}

/// Arguments for `get_comments_by_submission`
#[derive(Debug, Deserialize)]
pub struct GetCommentsBySubmissionArgs {
    /// Submission ID, with or without the `t3_` prefix
    #[serde(rename = "submission_id")]
    pub submission_id: String,
    /// Sort order for the comment tree
    #[serde(default)]
    pub sort: CommentSort,
    /// Maximum number of comments (1-100)
    #[serde(default = "default_limit")]
    pub limit: u32,
}

pub(super) fn get_comment_definition() -> Tool {
    Tool {
        name: "get_comment".to_string(),
        title: None,
        description: Some("Retrieve a single comment by ID.".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Comment ID, with or without the t1_ prefix"
                }
            },
            "required": ["id"]
        }),
        annotations: Some(ToolAnnotations {
            title: Some("Get Comment".to_string()),
            read_only_hint: Some(true),
            open_world_hint: Some(true),
        }),
    }
}

pub(super) fn get_comments_by_submission_definition() -> Tool {
    Tool {
        name: "get_comments_by_submission".to_string(),
        title: None,
        description: Some("Retrieve the top-level comments of a submission.".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "submission_id": {
                    "type": "string",
                    "description": "Submission ID, with or without the t3_ prefix"
                },
                "sort": {
                    "type": "string",
                    "enum": [
                        "confidence", "top", "new", "controversial",
                        "old", "random", "qa", "live"
                    ],
                    "description": "Sort order for the comment tree",
                    "default": "confidence"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of comments to return (1-100)",
                    "minimum": 1,
                    "maximum": 100,
                    "default": 10
                }
            },
            "required": ["submission_id"]
        }),
        annotations: Some(ToolAnnotations {
            title: Some("Get Comments By Submission".to_string()),
            read_only_hint: Some(true),
            open_world_hint: Some(true),
        }),
    }
}

/// Fetch a single comment through `/api/info`
pub async fn get_comment(client: &RedditClient, args: GetCommentArgs) -> Result<ToolsCallResult> {
    let id = args.id.strip_prefix("t1_").unwrap_or(&args.id);
    let params = [("id", format!("t1_{id}"))];

    let outcome = match client.request("/api/info", &params).await {
        Ok(value) => decode::<Listing<Comment>>(value, "comment info response")
            .map(Listing::into_items),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(comments) => match comments.first() {
            Some(comment) => Ok(ToolsCallResult::text(format::comment(comment))),
            // An unknown ID yields an empty listing, not an HTTP error. The
            // message echoes the argument as the caller wrote it.
            None => Ok(ToolsCallResult::text(format!(
                "Comment not found with ID: {}",
                args.id
            ))),
        },
        Err(e) => Ok(api_failure("Failed to retrieve comment", &e)),
    }
}

/// Fetch a submission's comments and render them
pub async fn get_comments_by_submission(
    client: &RedditClient,
    args: GetCommentsBySubmissionArgs,
) -> Result<ToolsCallResult> {
    check_limit(args.limit)?;

    let id = args
        .submission_id
        .strip_prefix("t3_")
        .unwrap_or(&args.submission_id);
    let path = format!("/comments/{id}");
    let params = [
        ("sort", args.sort.as_str().to_string()),
        ("limit", args.limit.to_string()),
    ];

    let outcome = match client.request(&path, &params).await {
        Ok(value) => decode_comments(value),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(comments) => Ok(ToolsCallResult::text(format::comments(&comments))),
        Err(e) => Ok(api_failure("Failed to retrieve comments", &e)),
    }
}

/// Pull the comments out of a `/comments/<id>` response
///
/// The second listing mixes `t1` comments with `more` stubs, so children are
/// filtered by kind before decoding each payload.
fn decode_comments(value: Value) -> Result<Vec<Comment>> {
    let (_submission, comments) =
        decode::<(Value, Listing<Value>)>(value, "comments response")?;

    comments
        .data
        .children
        .into_iter()
        .filter(|child| child.kind == "t1")
        .map(|child| decode::<Comment>(child.data, "comment"))
        .collect()
}
