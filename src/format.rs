//! Text rendering for tool responses
//!
//! One authoritative template per entity. Output is plain text the calling
//! agent can read directly; timestamps are RFC 3339 UTC.

use chrono::{DateTime, SecondsFormat};

use crate::reddit::model::{Comment, SubredditAbout, Submission};

/// Render an epoch-seconds timestamp as RFC 3339 UTC with millisecond precision
#[allow(clippy::cast_possible_truncation)]
fn iso_timestamp(epoch_secs: f64) -> String {
    DateTime::from_timestamp(epoch_secs as i64, 0).map_or_else(
        || "unknown".to_string(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// Render an integer with thousands separators (1234567 -> "1,234,567")
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn description_or_default(description: &str) -> &str {
    if description.is_empty() {
        "No description"
    } else {
        description
    }
}

/// Render subreddit metadata
#[must_use]
pub fn subreddit(s: &SubredditAbout) -> String {
    format!(
        "Subreddit: r/{}\n\
         Title: {}\n\
         Description: {}\n\
         Subscribers: {}\n\
         Created: {}\n\
         NSFW: {}\n\
         URL: https://www.reddit.com{}",
        s.display_name,
        s.title,
        description_or_default(&s.public_description),
        group_thousands(s.subscribers),
        iso_timestamp(s.created_utc),
        yes_no(s.over18),
        s.url,
    )
}

/// Render subreddit search results as a numbered list
#[must_use]
pub fn subreddit_search_results(subreddits: &[SubredditAbout]) -> String {
    if subreddits.is_empty() {
        return "No subreddits found matching the search criteria.".to_string();
    }

    subreddits
        .iter()
        .enumerate()
        .map(|(index, s)| {
            format!(
                "{}. r/{}\n\
                 \x20  Title: {}\n\
                 \x20  Description: {}\n\
                 \x20  Subscribers: {}\n\
                 \x20  NSFW: {}\n\
                 \x20  URL: https://www.reddit.com{}",
                index + 1,
                s.display_name,
                s.title,
                description_or_default(&s.public_description),
                group_thousands(s.subscribers),
                yes_no(s.over18),
                s.url,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a single submission
#[must_use]
pub fn submission(s: &Submission) -> String {
    let body = if s.is_self {
        format!("Text Content: {}", s.selftext)
    } else {
        format!("Link URL: {}", s.url)
    };

    format!(
        "Title: {}\n\
         Posted by: u/{}\n\
         Subreddit: r/{}\n\
         Score: {}\n\
         Comments: {}\n\
         Created: {}\n\
         NSFW: {}\n\
         URL: https://www.reddit.com{}\n\
         Content Type: {}\n\
         {}",
        s.title,
        s.author,
        s.subreddit,
        s.score,
        s.num_comments,
        iso_timestamp(s.created_utc),
        yes_no(s.over_18),
        s.permalink,
        if s.is_self { "Text Post" } else { "Link Post" },
        body,
    )
}

/// Render post search results as a numbered list
#[must_use]
pub fn post_search_results(posts: &[Submission]) -> String {
    if posts.is_empty() {
        return "No posts found matching the search criteria.".to_string();
    }

    posts
        .iter()
        .enumerate()
        .map(|(index, p)| {
            format!(
                "{}. {}\n\
                 \x20  Subreddit: r/{}\n\
                 \x20  Posted by: u/{}\n\
                 \x20  Score: {}\n\
                 \x20  Comments: {}\n\
                 \x20  URL: https://www.reddit.com{}\n\
                 \x20  ID: {}",
                index + 1,
                p.title,
                p.subreddit,
                p.author,
                p.score,
                p.num_comments,
                p.permalink,
                p.id,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a single comment
#[must_use]
pub fn comment(c: &Comment) -> String {
    format!(
        "Comment ID: {}\n\
         Author: u/{}\n\
         Score: {}\n\
         Created: {}\n\
         Subreddit: r/{}\n\
         Link ID: {}\n\
         Content: {}",
        c.id,
        c.author,
        c.score,
        iso_timestamp(c.created_utc),
        c.subreddit,
        c.link_id,
        c.body,
    )
}

/// Render a submission's comments as a numbered list
#[must_use]
pub fn comments(items: &[Comment]) -> String {
    if items.is_empty() {
        return "No comments found for this submission.".to_string();
    }

    items
        .iter()
        .enumerate()
        .map(|(index, c)| {
            format!(
                "Comment {}:\n\
                 Author: u/{}\n\
                 Score: {}\n\
                 Created: {}\n\
                 ID: {}\n\
                 Content: {}",
                index + 1,
                c.author,
                c.score,
                iso_timestamp(c.created_utc),
                c.id,
                c.body,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
