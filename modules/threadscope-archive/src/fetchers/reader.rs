// Reader proxy: a third-party service that fetches a page on our behalf
// and returns readable text. Useful when the origin blocks our address.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use threadscope_common::CandidateDocument;
use tracing::debug;

use super::{http_client, FetchStrategy};

pub struct ReaderProxyStrategy {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ReaderProxyStrategy {
    pub fn new(base_url: &str, api_key: Option<String>, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: http_client(user_agent, Duration::from_secs(45))?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// The proxy takes the target URL verbatim as its path.
    pub fn proxied_url(&self, url: &str) -> String {
        format!("{}/{}", self.base_url, url.trim())
    }
}

#[async_trait]
impl FetchStrategy for ReaderProxyStrategy {
    async fn attempt(&self, doc: &CandidateDocument) -> Result<String> {
        let target = self.proxied_url(&doc.url);
        debug!(url = target.as_str(), "Fetching via reader proxy");

        let mut request = self.client.get(&target).header("Accept", "text/plain");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let resp = request.send().await.context("Reader proxy request failed")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("Reader proxy returned {status}");
        }
        resp.text()
            .await
            .context("Failed to read reader proxy body")
    }

    fn name(&self) -> &str {
        "reader_proxy"
    }
}
