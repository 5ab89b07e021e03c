// Plain GET of the origin URL. Frequently blocked by forum hosts, so it
// sits late in the chain when enabled at all.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use threadscope_common::CandidateDocument;

use super::{get_text, http_client, FetchStrategy};
use crate::readability::html_to_markdown;

pub struct DirectStrategy {
    client: reqwest::Client,
}

impl DirectStrategy {
    pub fn new(user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: http_client(user_agent, Duration::from_secs(20))?,
        })
    }
}

#[async_trait]
impl FetchStrategy for DirectStrategy {
    async fn attempt(&self, doc: &CandidateDocument) -> Result<String> {
        let html = get_text(&self.client, &doc.url).await?;
        Ok(html_to_markdown(&html, &doc.url))
    }

    fn name(&self) -> &str {
        "direct"
    }
}
