use std::sync::Arc;
use std::time::Duration;

use crate::feed::FeedCache;
use crate::gemini::mime;
use crate::gemini::request::Request;
use crate::gemini::response::Response;
use crate::search::SearchIndex;
use crate::site::content::ContentStore;
use crate::site::{profile, render};

pub const SEARCH_PATH: &str = "/search";
pub const FEED_PATH: &str = "/ublog";
pub const PROFILE_PATH: &str = "/_admin/pprof/profile";

const SEARCH_PROMPT: &str = "Search:";

/// Everything a connection needs to answer a request.
///
/// Built once before the listener starts; the content store and the search
/// index are read-only from then on, the feed cache guards its own state.
pub struct Site {
    content: Arc<ContentStore>,
    index: Arc<SearchIndex>,
    feed: FeedCache,
    profile_duration: Duration,
}

impl Site {
    pub fn new(
        content: Arc<ContentStore>,
        index: Arc<SearchIndex>,
        feed: FeedCache,
        profile_duration: Duration,
    ) -> Self {
        Self {
            content,
            index,
            feed,
            profile_duration,
        }
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn search_index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn feed(&self) -> &FeedCache {
        &self.feed
    }

    /// Routes an authorized request: dynamic endpoints by exact path, then
    /// static content.
    pub async fn dispatch(&self, request: &Request) -> Response {
        match request.path.as_str() {
            SEARCH_PATH => self.search(request),
            FEED_PATH => self.microblog().await,
            PROFILE_PATH => self.profile().await,
            path => self.static_resource(path),
        }
    }

    fn search(&self, request: &Request) -> Response {
        let input = match request.input() {
            Ok(input) => input,
            Err(e) => {
                tracing::info!(error = %e, "Invalid search query");
                return Response::bad_request();
            }
        };

        let terms: Vec<&str> = input.split_whitespace().collect();
        if terms.is_empty() {
            return Response::input(SEARCH_PROMPT);
        }

        let pages = self.index.search(&terms);
        tracing::debug!(terms = terms.len(), results = pages.len(), "Search");

        Response::success(mime::GEMTEXT, render::search_page(&terms.join(" "), &pages))
    }

    async fn microblog(&self) -> Response {
        match self.feed.statuses().await {
            Ok(statuses) => Response::success(mime::GEMTEXT, render::feed_page(&statuses)),
            Err(e) => {
                tracing::warn!(error = %e, "Unable to serve microblog");
                Response::temporary_failure()
            }
        }
    }

    async fn profile(&self) -> Response {
        tracing::info!(seconds = self.profile_duration.as_secs(), "Collecting CPU profile");

        match profile::capture_cpu_profile(self.profile_duration).await {
            Ok(body) => Response::success("application/octet-stream", body),
            Err(e) => {
                tracing::error!(error = %e, "Error collecting profile");
                Response::temporary_failure()
            }
        }
    }

    fn static_resource(&self, path: &str) -> Response {
        match self.content.resolve(path) {
            Some(resource) => Response::success(resource.mime, resource.body),
            None => {
                tracing::debug!(path, "No such resource");
                Response::not_found()
            }
        }
    }
}
