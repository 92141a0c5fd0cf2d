//! The capsule itself: content, routes and the dynamic pages.
//!
//! - **`content`**: In-memory snapshot of the site's files and path resolution
//! - **`auth`**: Client certificate check for administrative paths
//! - **`router`**: The [`Site`] handle that answers requests
//! - **`render`**: Gemtext for search results and the microblog
//! - **`profile`**: CPU profiling on demand

pub mod auth;
pub mod content;
pub mod profile;
pub mod render;
pub mod router;

pub use content::{ContentStore, Resource};
pub use router::Site;

use anyhow::Context;
use std::sync::Arc;

use crate::config::Config;
use crate::feed::{FeedCache, MastodonSource, StatusTransformer};
use crate::search::SearchIndex;

impl Site {
    /// Loads content and the search index and wires up the feed cache.
    ///
    /// Any failure here is fatal; the server must not start half loaded.
    pub fn load(cfg: &Config) -> anyhow::Result<Self> {
        let content = Arc::new(ContentStore::load_dir(&cfg.content_dir)?);

        let search = SearchIndex::load(&cfg.search_index)
            .with_context(|| format!("loading search index {}", cfg.search_index.display()))?;

        let source = MastodonSource::new(&cfg.feed).context("configuring feed client")?;
        let transformer = StatusTransformer::new(cfg.site_host.clone(), content.clone())?;
        let feed = FeedCache::new(Arc::new(source), transformer, cfg.feed.refresh_interval());

        Ok(Site::new(content, Arc::new(search), feed, cfg.profile_duration()))
    }
}
