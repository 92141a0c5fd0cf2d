//! Turns remote feed entries into plain-text statuses with extracted links.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::Arc;
use url::Url;

use crate::feed::types::{Link, RawStatus, Status};
use crate::site::content::ContentStore;

/// Replaces inline links when an entry contains more than one.
pub const LINK_GLYPH: &str = "🌐";

/// Prefix for media attachment link titles.
pub const IMAGE_GLYPH: &str = "🖼";

/// Tags Mastodon may leave in sanitized content.
const TAG_PATTERN: &str =
    r"</?(p|span|br|a|del|pre|code|em|strong|b|i|u|ul|ol|li|blockquote)[^>]*>";

const URL_PATTERN: &str = r"https?://[^\s]*";

const ENTITIES: &[(&str, &str)] = &[
    ("&#39;", "'"),
    ("&quot;", "\""),
    ("&lt;", "<"),
    ("&gt;", ">"),
    // Must come last so "&amp;lt;" stays "&lt;"
    ("&amp;", "&"),
];

pub struct StatusTransformer {
    tags: Regex,
    urls: Regex,
    site_host: String,
    content: Arc<ContentStore>,
}

impl StatusTransformer {
    /// `site_host` is this site's own host name; links to it are rewritten
    /// to site-relative paths when `content` can serve them.
    pub fn new(site_host: impl Into<String>, content: Arc<ContentStore>) -> Result<Self, regex::Error> {
        Ok(Self {
            tags: Regex::new(TAG_PATTERN)?,
            urls: Regex::new(URL_PATTERN)?,
            site_host: site_host.into(),
            content,
        })
    }

    /// Normalizes one entry.
    ///
    /// Returns `None` for entries that are empty once markup is stripped and
    /// for replies/mentions (text starting with `@`).
    pub fn transform(&self, raw: &RawStatus) -> Option<Status> {
        let stripped = self.tags.replace_all(&raw.content, "");
        if stripped.is_empty() || stripped.starts_with('@') {
            return None;
        }

        let text = unescape_entities(&stripped);
        let found: Vec<&str> = self.urls.find_iter(&text).map(|m| m.as_str()).collect();

        let placeholder = if found.len() > 1 { LINK_GLYPH } else { "" };
        let content = self.urls.replace_all(&text, placeholder).trim().to_string();

        let mut links = Vec::with_capacity(found.len() + raw.media_attachments.len());
        for url in &found {
            match &raw.card {
                Some(card) if card.url == *url => links.push(Link {
                    url: self.rewrite_url(&card.url),
                    title: card.title.clone(),
                }),
                _ => {
                    let url = self.rewrite_url(url);
                    let title = strip_url(&url);
                    links.push(Link { url, title });
                }
            }
        }

        for media in &raw.media_attachments {
            links.push(Link {
                url: self.rewrite_url(&media.url),
                title: format!(
                    "{IMAGE_GLYPH} {}",
                    media.description.as_deref().unwrap_or_default()
                ),
            });
        }

        Some(Status {
            id: raw.id.clone(),
            content,
            created_at: raw.created_at,
            url: raw.url.clone().unwrap_or_default(),
            links,
        })
    }

    /// Rewrites a link to this site into a site-relative path, but only when
    /// the path resolves to something the content store can serve. Query and
    /// fragment are kept.
    pub fn rewrite_url(&self, url: &str) -> String {
        let Ok(parsed) = Url::parse(url) else {
            return url.to_string();
        };

        let is_local = matches!(parsed.scheme(), "http" | "https")
            && parsed
                .host_str()
                .is_some_and(|h| h.eq_ignore_ascii_case(&self.site_host));
        if !is_local {
            return url.to_string();
        }

        let Ok(path) = percent_decode_str(parsed.path()).decode_utf8() else {
            return url.to_string();
        };
        let path = path.trim_end_matches('/');

        if self.content.resolve(path).is_none() {
            return url.to_string();
        }

        let mut local = if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        };
        if let Some(query) = parsed.query() {
            local.push('?');
            local.push_str(query);
        }
        if let Some(fragment) = parsed.fragment() {
            local.push('#');
            local.push_str(fragment);
        }
        local
    }
}

/// Drops the query and fragment of an absolute URL; anything else is
/// returned unchanged.
pub fn strip_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.into()
        }
        Err(_) => url.to_string(),
    }
}

fn unescape_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, replacement)| {
            acc.replace(entity, replacement)
        })
}
