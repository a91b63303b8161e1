//! Reddit API access
//!
//! The two pieces every tool goes through: the client-credentials token
//! cache and the authenticated request helper, plus typed response models.

pub mod client;
pub mod model;
pub mod token;

pub use client::RedditClient;
pub use token::{Credentials, TokenCache};
