// Actor run scoped to a single thread URL. Slow and metered, but runs
// behind residential proxies.

use anyhow::Result;
use apify_client::{ApifyClient, RedditScraperInput};
use async_trait::async_trait;
use threadscope_common::CandidateDocument;

use super::FetchStrategy;
use crate::search::apify::thread_text;

pub struct ApifyStrategy {
    client: ApifyClient,
    max_comments: usize,
}

impl ApifyStrategy {
    pub fn new(client: ApifyClient, max_comments: usize) -> Self {
        Self {
            client,
            max_comments,
        }
    }
}

#[async_trait]
impl FetchStrategy for ApifyStrategy {
    async fn attempt(&self, doc: &CandidateDocument) -> Result<String> {
        let input = RedditScraperInput::urls(&[doc.url.as_str()], 1, self.max_comments as u32);
        let threads = self.client.scrape_reddit(&input).await?;
        let Some(thread) = threads.first() else {
            anyhow::bail!("Actor run returned no thread for {}", doc.url);
        };
        Ok(thread_text(thread).render(self.max_comments))
    }

    fn name(&self) -> &str {
        "apify"
    }
}
