//! Read-only snapshot of the site's servable files.
//!
//! The store is filled once at startup and never mutated afterwards, so it
//! can be shared behind an `Arc` and read from any number of connections
//! without locking.

use anyhow::Context;
use bytes::Bytes;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::gemini::mime;

/// A resolved store entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Store key the request path resolved to (e.g. "blog/post.gmi")
    pub key: String,
    /// MIME type derived from the key's extension
    pub mime: &'static str,
    pub body: Bytes,
}

#[derive(Debug, Default)]
pub struct ContentStore {
    entries: HashMap<String, Bytes>,
}

impl ContentStore {
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Bytes>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Loads every regular file below `root`, keyed by its `/`-separated
    /// path relative to `root`.
    pub fn load_dir(root: &Path) -> anyhow::Result<Self> {
        let mut entries = HashMap::new();
        collect_files(root, root, &mut entries)
            .with_context(|| format!("loading content from {}", root.display()))?;

        if entries.is_empty() {
            anyhow::bail!("content directory {} is empty", root.display());
        }

        tracing::info!(root = %root.display(), files = entries.len(), "Content loaded");
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&Bytes> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a request path to a store entry.
    pub fn resolve(&self, path: &str) -> Option<Resource> {
        let key = resource_key(path);
        let body = self.entries.get(&key)?.clone();

        Some(Resource {
            mime: mime::from_path(&key),
            key,
            body,
        })
    }
}

/// Maps a request path to the store key it is served from.
///
/// - `/` or empty → `index.gmi`
/// - `dir/` → `dir/index.gmi`
/// - no extension in the last segment → page extension appended
/// - otherwise the path is used verbatim
///
/// Leading separators are always stripped.
pub fn resource_key(path: &str) -> String {
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        return format!("index.{}", mime::PAGE_EXTENSION);
    }
    if path.ends_with('/') {
        return format!("{path}index.{}", mime::PAGE_EXTENSION);
    }

    let last = path.rsplit('/').next().unwrap_or(path);
    if last.contains('.') {
        path.to_string()
    } else {
        format!("{path}.{}", mime::PAGE_EXTENSION)
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut HashMap<String, Bytes>) -> anyhow::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            collect_files(root, &path, out)?;
        } else if file_type.is_file() {
            let relative = path.strip_prefix(root)?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            out.insert(key, Bytes::from(data));
        }
    }
    Ok(())
}
