//! Feed entries, both as the remote API sends them and as the site serves them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A normalized feed entry.
///
/// Created once from a [`RawStatus`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub id: String,
    /// Display text, with markup stripped and inline links removed
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Permalink to the entry on the remote instance
    pub url: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub title: String,
}

/// Entry as decoded from the remote API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStatus {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// HTML-bearing content
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub media_attachments: Vec<RawAttachment>,
    #[serde(default)]
    pub card: Option<RawCard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAttachment {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Link preview the remote instance generated for one of the entry's links.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCard {
    pub url: String,
    #[serde(default)]
    pub title: String,
}
