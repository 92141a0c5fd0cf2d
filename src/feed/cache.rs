//! Time-gated cache of feed entries.
//!
//! Readers never take a lock while the cache is fresh: the current snapshot
//! is loaded through an [`ArcSwap`]. Refreshes are serialized by a mutex and
//! publish a new snapshot when they finish, so at most one remote fetch is
//! in flight at a time.
//!
//! A reader on the fast path may observe the snapshot from just before a
//! concurrent refresh publishes. That is acceptable: refreshes only prepend
//! entries, so the stale snapshot is a suffix of the new one.

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::feed::source::FeedSource;
use crate::feed::transform::StatusTransformer;
use crate::feed::types::{RawStatus, Status};
use crate::feed::FeedError;

/// Default time between remote fetches.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Default)]
struct Snapshot {
    /// Newest first
    statuses: Arc<Vec<Status>>,
    /// When the last fetch that reached the remote completed
    last_fetch: Option<Instant>,
}

impl Snapshot {
    fn is_fresh(&self, interval: Duration) -> bool {
        self.last_fetch.is_some_and(|at| at.elapsed() < interval)
    }
}

pub struct FeedCache {
    source: Arc<dyn FeedSource>,
    transformer: StatusTransformer,
    interval: Duration,
    snapshot: ArcSwap<Snapshot>,
    refresh: Mutex<()>,
}

impl FeedCache {
    pub fn new(source: Arc<dyn FeedSource>, transformer: StatusTransformer, interval: Duration) -> Self {
        Self {
            source,
            transformer,
            interval,
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
            refresh: Mutex::new(()),
        }
    }

    /// Returns all cached statuses, newest first, refreshing them from the
    /// remote first if the refresh interval has passed.
    ///
    /// Transport failures leave the cache untouched so the next call retries
    /// right away. Decode failures count as a completed fetch: the next
    /// retry waits for the interval.
    pub async fn statuses(&self) -> Result<Arc<Vec<Status>>, FeedError> {
        {
            let current = self.snapshot.load();
            if current.is_fresh(self.interval) {
                return Ok(current.statuses.clone());
            }
        }

        let _guard = self.refresh.lock().await;

        // Another caller may have refreshed while we waited
        let current = self.snapshot.load_full();
        if current.is_fresh(self.interval) {
            return Ok(current.statuses.clone());
        }

        let newest = current.statuses.first().map(|s| s.id.as_str());
        let body = match self.source.fetch(newest).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Feed fetch failed, will retry on next request");
                return Err(e);
            }
        };

        let raw: Vec<RawStatus> = match serde_json::from_slice(&body) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Feed payload could not be decoded");
                self.snapshot.store(Arc::new(Snapshot {
                    statuses: current.statuses.clone(),
                    last_fetch: Some(Instant::now()),
                }));
                return Err(FeedError::Decode(e));
            }
        };

        let mut fresh: Vec<Status> = raw
            .iter()
            .filter_map(|r| self.transformer.transform(r))
            .collect();
        fresh.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::info!(
            fetched = raw.len(),
            kept = fresh.len(),
            cached = current.statuses.len() + fresh.len(),
            "Fetched statuses"
        );

        let statuses = if fresh.is_empty() {
            current.statuses.clone()
        } else {
            let mut merged = fresh;
            merged.extend(current.statuses.iter().cloned());
            Arc::new(merged)
        };

        self.snapshot.store(Arc::new(Snapshot {
            statuses: statuses.clone(),
            last_fetch: Some(Instant::now()),
        }));

        Ok(statuses)
    }

    /// When the last completed fetch happened, if any.
    pub fn last_fetch(&self) -> Option<Instant> {
        self.snapshot.load().last_fetch
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
