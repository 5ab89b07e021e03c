// Content retrieval strategies. Each one knows a single way to turn a
// candidate into text; the chain decides whether that text is good enough.

pub mod apify;
pub mod direct;
pub mod forum_json;
pub mod mirror;
pub mod reader;
pub mod rendered;
pub mod snippet;

pub use apify::ApifyStrategy;
pub use direct::DirectStrategy;
pub use forum_json::ForumJsonStrategy;
pub use mirror::MirrorStrategy;
pub use reader::ReaderProxyStrategy;
pub use rendered::RenderedStrategy;
pub use snippet::CachedSnippetStrategy;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use threadscope_common::CandidateDocument;

/// One link in the retrieval chain.
///
/// Implementations return whatever text they obtained, however short. An
/// `Err` means the strategy could not produce anything at all; the chain
/// treats both cases as "try the next one".
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    async fn attempt(&self, doc: &CandidateDocument) -> Result<String>;
    fn name(&self) -> &str;
}

/// Shared HTTP client for the plain-GET strategies.
pub(crate) fn http_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// GET `url` and return the body, failing on non-2xx statuses.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url} failed"))?;
    let status = resp.status();
    if !status.is_success() {
        anyhow::bail!("GET {url} returned {status}");
    }
    resp.text()
        .await
        .with_context(|| format!("Failed to read body from {url}"))
}
