use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::feed::cache::DEFAULT_REFRESH_INTERVAL;

/// Config file read when `CAPSULE_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "capsule.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Directory whose files make up the content snapshot
    pub content_dir: PathBuf,
    /// Flat search index file
    pub search_index: PathBuf,
    /// Host name links to this site use; such links are made site-relative
    pub site_host: String,
    pub tls: TlsConfig,
    pub feed: FeedConfig,
    pub limits: LimitsConfig,
    pub profile_duration_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    /// Trust anchor for administrator client certificates. Falls back to
    /// the server certificate when unset.
    pub client_ca_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub api_host: String,
    pub account_id: String,
    pub limit: u32,
    pub refresh_interval_secs: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_connections: usize,
    pub handshake_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:1965".to_string(),
            content_dir: PathBuf::from("content"),
            search_index: PathBuf::from("search.idx"),
            site_host: "localhost".to_string(),
            tls: TlsConfig::default(),
            feed: FeedConfig::default(),
            limits: LimitsConfig::default(),
            profile_duration_secs: 20,
        }
    }
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("server.crt"),
            key_path: PathBuf::from("server.key"),
            client_ca_path: None,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_host: "mastodon.social".to_string(),
            account_id: String::new(),
            limit: 50,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL.as_secs(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_connections: 256,
            handshake_timeout_secs: 10,
            read_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Loads the config file named by `CAPSULE_CONFIG` (or `capsule.yaml`
    /// when present), then applies the `LISTEN` override.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("CAPSULE_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.listen_addr = listen_addr;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.limits.max_connections == 0 {
            anyhow::bail!("limits.max_connections must be at least 1");
        }
        if self.limits.handshake_timeout_secs == 0 {
            anyhow::bail!("limits.handshake_timeout_secs must be at least 1");
        }
        if self.limits.read_timeout_secs == 0 {
            anyhow::bail!("limits.read_timeout_secs must be at least 1");
        }
        if self.feed.connect_timeout_secs == 0 || self.feed.request_timeout_secs == 0 {
            anyhow::bail!("feed timeouts must be at least 1 second");
        }
        Ok(())
    }

    pub fn profile_duration(&self) -> Duration {
        Duration::from_secs(self.profile_duration_secs)
    }
}

impl FeedConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl LimitsConfig {
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}
