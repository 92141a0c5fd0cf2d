//! Cached proxy to a remote microblog feed.
//!
//! This module fetches the account's recent statuses from a remote API,
//! normalizes them for display and keeps them in a cache that refreshes at
//! most once per interval.

pub mod cache;
pub mod source;
pub mod transform;
pub mod types;

pub use cache::FeedCache;
pub use source::{FeedSource, MastodonSource};
pub use transform::StatusTransformer;
pub use types::{Link, RawStatus, Status};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The remote could not be reached or the response body was cut short.
    #[error("feed request failed: {0}")]
    Transport(String),

    /// The remote answered with a non-success status.
    #[error("feed endpoint returned HTTP {0}")]
    Status(u16),

    /// The remote answered, but not with a list of statuses.
    #[error("feed payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FeedError {
    /// Whether the failure happened before a payload was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, FeedError::Transport(_) | FeedError::Status(_))
    }
}
