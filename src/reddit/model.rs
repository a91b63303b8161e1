//! Typed shapes for the subset of Reddit's API this server consumes
//!
//! Responses are decoded into these models right after the request instead of
//! being walked field-by-field; a shape mismatch becomes a typed
//! `MalformedResponse` error rather than a runtime fault during formatting.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// Decode a raw JSON value into a typed model
///
/// # Errors
///
/// Returns `Error::MalformedResponse` naming `what` when the value does not
/// match the expected shape.
pub fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::MalformedResponse(format!("{what}: {e}")))
}

/// A kind-tagged wrapper ("t1" comment, "t3" submission, "t5" subreddit, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    /// Kind tag
    #[serde(default)]
    pub kind: String,
    /// Payload
    pub data: T,
}

/// A Reddit listing response
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    /// Listing payload
    pub data: ListingData<T>,
}

/// The payload of a listing
#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    /// Listing children
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
}

impl<T> Listing<T> {
    /// Unwrap the children into their payloads, dropping the kind tags
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.data.children.into_iter().map(|c| c.data).collect()
    }
}

/// Subreddit metadata (`/r/<name>/about`, `/subreddits/search` children)
#[derive(Debug, Clone, Deserialize)]
pub struct SubredditAbout {
    /// Display name without the `r/` prefix
    pub display_name: String,
    /// Subreddit title
    #[serde(default)]
    pub title: String,
    /// Public description, often empty
    #[serde(default)]
    pub public_description: String,
    /// Subscriber count
    #[serde(default)]
    pub subscribers: u64,
    /// Creation time, seconds since the epoch
    #[serde(default)]
    pub created_utc: f64,
    /// NSFW flag
    #[serde(default)]
    pub over18: bool,
    /// Site-relative URL (`/r/<name>/`)
    #[serde(default)]
    pub url: String,
}

/// A submission (`/comments/<id>` first listing, `/r/<sr>/search` children)
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    /// Submission ID without the `t3_` prefix
    #[serde(default)]
    pub id: String,
    /// Title
    pub title: String,
    /// Author username without the `u/` prefix
    pub author: String,
    /// Subreddit name without the `r/` prefix
    #[serde(default)]
    pub subreddit: String,
    /// Score
    #[serde(default)]
    pub score: i64,
    /// Comment count
    #[serde(default)]
    pub num_comments: u64,
    /// Creation time, seconds since the epoch
    #[serde(default)]
    pub created_utc: f64,
    /// NSFW flag
    #[serde(default)]
    pub over_18: bool,
    /// Site-relative permalink
    #[serde(default)]
    pub permalink: String,
    /// True for text posts, false for link posts
    #[serde(default)]
    pub is_self: bool,
    /// Body text of a text post
    #[serde(default)]
    pub selftext: String,
    /// Target URL of a link post
    #[serde(default)]
    pub url: String,
}

/// A comment (`/api/info` children, `/comments/<id>` second listing)
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    /// Comment ID without the `t1_` prefix
    pub id: String,
    /// Author username without the `u/` prefix
    pub author: String,
    /// Score
    #[serde(default)]
    pub score: i64,
    /// Creation time, seconds since the epoch
    #[serde(default)]
    pub created_utc: f64,
    /// Subreddit name without the `r/` prefix
    #[serde(default)]
    pub subreddit: String,
    /// Fullname of the submission this comment belongs to (`t3_...`)
    #[serde(default)]
    pub link_id: String,
    /// Comment body
    pub body: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_subreddit_about() {
        let value = json!({
            "kind": "t5",
            "data": {
                "display_name": "rust",
                "title": "The Rust Programming Language",
                "public_description": "A place for all things Rust",
                "subscribers": 301_542,
                "created_utc": 1_265_000_000.0,
                "over18": false,
                "url": "/r/rust/"
            }
        });
        let thing: Thing<SubredditAbout> = decode(value, "subreddit").unwrap();
        assert_eq!(thing.kind, "t5");
        assert_eq!(thing.data.display_name, "rust");
        assert_eq!(thing.data.subscribers, 301_542);
    }

    #[test]
    fn decode_listing_into_items() {
        let value = json!({
            "kind": "Listing",
            "data": {
                "children": [
                    {"kind": "t5", "data": {"display_name": "rust"}},
                    {"kind": "t5", "data": {"display_name": "learnrust"}}
                ]
            }
        });
        let listing: Listing<SubredditAbout> = decode(value, "subreddits").unwrap();
        let items = listing.into_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].display_name, "learnrust");
    }

    #[test]
    fn decode_missing_required_field_is_malformed() {
        let value = json!({"kind": "t5", "data": {"title": "no display_name"}});
        let err = decode::<Thing<SubredditAbout>>(value, "subreddit").unwrap_err();
        match err {
            Error::MalformedResponse(msg) => assert!(msg.starts_with("subreddit:")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn decode_submission_defaults_optional_fields() {
        let value = json!({"title": "Hello", "author": "someone"});
        let submission: Submission = decode(value, "submission").unwrap();
        assert_eq!(submission.score, 0);
        assert!(!submission.is_self);
        assert!(submission.selftext.is_empty());
    }

    #[test]
    fn decode_comment() {
        let value = json!({
            "id": "abc123",
            "author": "someone",
            "score": 42,
            "created_utc": 1_700_000_000.0,
            "subreddit": "rust",
            "link_id": "t3_xyz",
            "body": "Nice post"
        });
        let comment: Comment = decode(value, "comment").unwrap();
        assert_eq!(comment.id, "abc123");
        assert_eq!(comment.link_id, "t3_xyz");
    }

    #[test]
    fn empty_listing_children_default() {
        let value = json!({"data": {}});
        let listing: Listing<Comment> = decode(value, "comments").unwrap();
        assert!(listing.into_items().is_empty());
    }
}
