//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use capsule::feed::{FeedCache, FeedError, FeedSource, StatusTransformer};
use capsule::gemini::connection::Connection;
use capsule::gemini::request::ClientIdentity;
use capsule::search::SearchIndex;
use capsule::site::{ContentStore, Site};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const SITE_HOST: &str = "capsule.example";

/// Feed source that replays scripted results and records what it was asked.
///
/// Once the script runs out it answers with an empty list.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Bytes, FeedError>>>,
    cursors: Mutex<Vec<Option<String>>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<Bytes, FeedError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for ScriptedSource {
    async fn fetch(&self, min_id: Option<&str>) -> Result<Bytes, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cursors.lock().unwrap().push(min_id.map(str::to_string));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Bytes::from_static(b"[]")))
    }
}

/// One remote status as the API would send it.
pub fn raw_status(id: &str, created_at: &str, content: &str) -> serde_json::Value {
    json!({
        "id": id,
        "created_at": created_at,
        "content": content,
        "url": format!("https://social.example/@me/{id}"),
        "media_attachments": [],
        "card": null,
    })
}

pub fn payload(statuses: Vec<serde_json::Value>) -> Result<Bytes, FeedError> {
    Ok(Bytes::from(serde_json::Value::Array(statuses).to_string()))
}

pub fn sample_content() -> Arc<ContentStore> {
    Arc::new(ContentStore::from_entries([
        ("index.gmi", "# Home\n"),
        ("about.gmi", "# About\n"),
        ("blog/first-post.gmi", "# First post\n"),
        ("notes.txt", "plain notes\n"),
        ("_admin.gmi", "# Admin\n"),
    ]))
}

pub fn feed_cache(source: Arc<ScriptedSource>, interval: Duration) -> FeedCache {
    let transformer = StatusTransformer::new(SITE_HOST, sample_content()).unwrap();
    FeedCache::new(source, transformer, interval)
}

pub fn sample_site(index: &str, source: Arc<ScriptedSource>) -> Arc<Site> {
    Arc::new(Site::new(
        sample_content(),
        Arc::new(SearchIndex::parse(index).unwrap()),
        feed_cache(source, Duration::from_secs(3600)),
        Duration::from_millis(10),
    ))
}

/// Sends `request` over an in-memory connection and returns everything the
/// server wrote before closing.
pub async fn exchange(site: Arc<Site>, request: &[u8], client: Option<ClientIdentity>) -> Vec<u8> {
    let (mut client_end, server_end) = tokio::io::duplex(64 * 1024);

    let server = tokio::spawn(async move {
        let mut conn = Connection::new(server_end, site, client, Duration::from_secs(5));
        conn.run().await
    });

    client_end.write_all(request).await.unwrap();
    let mut response = Vec::new();
    client_end.read_to_end(&mut response).await.unwrap();

    server.await.unwrap().unwrap();
    response
}

/// Splits a raw response into its status line (without CRLF) and body.
pub fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let end = raw
        .windows(2)
        .position(|w| w == b"\r\n")
        .expect("response has a status line");
    let header = String::from_utf8(raw[..end].to_vec()).unwrap();
    (header, raw[end + 2..].to_vec())
}
