// Headless-browser rendering via a Browserless instance, for pages that
// only produce their content after scripts run.

use anyhow::Result;
use async_trait::async_trait;
use browserless_client::BrowserlessClient;
use threadscope_common::CandidateDocument;
use tracing::debug;

use super::FetchStrategy;
use crate::readability::html_to_markdown;

pub struct RenderedStrategy {
    client: BrowserlessClient,
}

impl RenderedStrategy {
    pub fn new(client: BrowserlessClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchStrategy for RenderedStrategy {
    async fn attempt(&self, doc: &CandidateDocument) -> Result<String> {
        let html = self.client.content(&doc.url).await?;
        debug!(url = doc.url.as_str(), bytes = html.len(), "Rendered page");
        Ok(html_to_markdown(&html, &doc.url))
    }

    fn name(&self) -> &str {
        "rendered"
    }
}
