//! Outbound connection to the remote feed API.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use url::Url;

use crate::config::FeedConfig;
use crate::feed::FeedError;

/// Where raw feed payloads come from.
///
/// Implementations only deal with transport: they return the undecoded
/// response body, or a [`FeedError::Transport`]/[`FeedError::Status`] when
/// the remote could not be reached or refused the request.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetches the most recent entries, newer than `min_id` when given.
    async fn fetch(&self, min_id: Option<&str>) -> Result<Bytes, FeedError>;
}

/// Fetches statuses of one account from a Mastodon-compatible instance.
pub struct MastodonSource {
    http: reqwest::Client,
    endpoint: Url,
    limit: u32,
}

impl MastodonSource {
    pub fn new(config: &FeedConfig) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&format!(
            "https://{}/api/v1/accounts/{}/statuses",
            config.api_host, config.account_id
        ))?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("capsule/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            limit: config.limit,
        })
    }

    /// URL for one fetch, paginated by `min_id`.
    pub fn request_url(&self, min_id: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("exclude_replies", "1")
                .append_pair("exclude_reblogs", "1")
                .append_pair("limit", &self.limit.to_string());
            if let Some(id) = min_id {
                query.append_pair("min_id", id);
            }
        }
        url
    }
}

#[async_trait]
impl FeedSource for MastodonSource {
    async fn fetch(&self, min_id: Option<&str>) -> Result<Bytes, FeedError> {
        let url = self.request_url(min_id);
        tracing::info!(url = %url, "Fetching statuses");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_carries_cursor() {
        let source = MastodonSource::new(&FeedConfig {
            api_host: "example.social".to_string(),
            account_id: "42".to_string(),
            limit: 50,
            ..FeedConfig::default()
        })
        .unwrap();

        assert_eq!(
            source.request_url(None).as_str(),
            "https://example.social/api/v1/accounts/42/statuses?exclude_replies=1&exclude_reblogs=1&limit=50"
        );
        assert!(source
            .request_url(Some("1099"))
            .as_str()
            .ends_with("&limit=50&min_id=1099"));
    }
}
