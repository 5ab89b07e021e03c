// Actor-backed search: the Reddit scraper actor searches and scrapes in one
// run, so each hit already carries the rendered thread text.

use anyhow::Result;
use apify_client::{ApifyClient, RedditScraperInput, RedditThread};
use async_trait::async_trait;
use tracing::info;

use super::{SearchHit, SearchQuery, WebSearcher};
use crate::thread_text::ThreadText;

pub struct ApifyRedditSearcher {
    client: ApifyClient,
    max_comments: usize,
}

impl ApifyRedditSearcher {
    pub fn new(client: ApifyClient, max_comments: usize) -> Self {
        Self {
            client,
            max_comments,
        }
    }
}

/// Convert an actor thread into a hit. Threads without a URL are dropped.
pub(crate) fn thread_to_hit(thread: &RedditThread, max_comments: usize) -> Option<SearchHit> {
    let url = thread.url.as_deref()?.trim();
    if url.is_empty() {
        return None;
    }
    let title = thread.title.clone().unwrap_or_default();
    let text = thread_text(thread).render(max_comments);
    Some(SearchHit {
        url: url.to_string(),
        title,
        snippet: String::new(),
        raw_content: Some(text),
    })
}

pub(crate) fn thread_text(thread: &RedditThread) -> ThreadText {
    ThreadText {
        title: thread.title.clone().unwrap_or_default(),
        op_text: thread.body.clone().unwrap_or_default(),
        comments: thread
            .comments()
            .into_iter()
            .map(|c| (c.author, c.body))
            .collect(),
    }
}

#[async_trait]
impl WebSearcher for ApifyRedditSearcher {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        info!(query = query.text.as_str(), "Apify Reddit search");
        let input = RedditScraperInput::search(
            &query.text,
            query.max_results as u32,
            self.max_comments as u32,
        );
        let threads = self.client.scrape_reddit(&input).await?;
        let hits: Vec<SearchHit> = threads
            .iter()
            .filter_map(|t| thread_to_hit(t, self.max_comments))
            .collect();
        info!(query = query.text.as_str(), count = hits.len(), "Apify Reddit search complete");
        Ok(hits)
    }

    fn name(&self) -> &str {
        "apify"
    }
}
