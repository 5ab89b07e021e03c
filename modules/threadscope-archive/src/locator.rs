// Source location: turn user input into candidate thread URLs.

use std::collections::HashSet;
use std::sync::Arc;

use threadscope_common::{canonical_url, CandidateDocument, InputTarget, SearchPolicy};
use tracing::{info, warn};

use crate::search::{SearchQuery, WebSearcher};

pub struct SourceLocator {
    searcher: Arc<dyn WebSearcher>,
    site: String,
    thread_marker: Option<String>,
    qualifiers: Vec<String>,
    max_documents: usize,
    results_per_query: usize,
}

impl SourceLocator {
    pub fn new(searcher: Arc<dyn WebSearcher>, policy: &SearchPolicy) -> Self {
        Self {
            searcher,
            site: policy.site.clone(),
            thread_marker: policy.thread_marker.clone(),
            qualifiers: policy.qualifiers.clone(),
            max_documents: policy.max_documents,
            results_per_query: policy.results_per_query,
        }
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    /// Search queries for a topic: the topic itself, then one per qualifier.
    pub fn queries(&self, topic: &str) -> Vec<String> {
        let topic = topic.trim();
        std::iter::once(topic.to_string())
            .chain(self.qualifiers.iter().map(|q| format!("{topic} {q}")))
            .collect()
    }

    /// Produce candidates for `target`, deduplicated by canonical URL and
    /// capped at the policy's document limit.
    ///
    /// Explicit URLs never touch the search backend. A failing query is
    /// logged and skipped; the remaining queries still contribute.
    pub async fn locate(&self, target: &InputTarget) -> Vec<CandidateDocument> {
        match target {
            InputTarget::Urls(urls) => {
                let mut seen = HashSet::new();
                urls.iter()
                    .filter(|u| seen.insert(canonical_url(u)))
                    .take(self.max_documents)
                    .enumerate()
                    .map(|(i, u)| CandidateDocument::direct(u, i))
                    .collect()
            }
            InputTarget::Topic(topic) => self.search_topic(topic).await,
        }
    }

    async fn search_topic(&self, topic: &str) -> Vec<CandidateDocument> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for text in self.queries(topic) {
            if candidates.len() >= self.max_documents {
                break;
            }
            let query = SearchQuery {
                text: text.clone(),
                site: self.site.clone(),
                max_results: self.results_per_query,
            };
            let hits = match self.searcher.search(&query).await {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(
                        backend = self.searcher.name(),
                        query = text.as_str(),
                        error = %e,
                        "Search query failed, skipping"
                    );
                    continue;
                }
            };

            for hit in hits {
                if candidates.len() >= self.max_documents {
                    break;
                }
                if !self.is_thread(&hit.url) {
                    continue;
                }
                if !seen.insert(canonical_url(&hit.url)) {
                    continue;
                }
                let snippet = hit.captured_text();
                candidates.push(CandidateDocument {
                    url: hit.url,
                    title: hit.title,
                    discovery_query: text.clone(),
                    snippet,
                });
            }
        }

        info!(
            topic,
            backend = self.searcher.name(),
            candidates = candidates.len(),
            "Source location complete"
        );
        candidates
    }

    fn is_thread(&self, url: &str) -> bool {
        match &self.thread_marker {
            Some(marker) => url.contains(marker.as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchHit;
    use crate::testing::MockSearcher;

    fn hit(url: &str, title: &str) -> SearchHit {
        SearchHit {
            url: url.into(),
            title: title.into(),
            snippet: format!("snippet for {title}"),
            raw_content: None,
        }
    }

    fn locator(searcher: Arc<MockSearcher>, max_documents: usize) -> SourceLocator {
        let policy = SearchPolicy {
            max_documents,
            ..SearchPolicy::default()
        };
        SourceLocator::new(searcher, &policy)
    }

    #[test]
    fn queries_append_qualifiers() {
        let l = locator(Arc::new(MockSearcher::new()), 10);
        assert_eq!(
            l.queries("heat pump"),
            vec!["heat pump", "heat pump price paid", "heat pump quote received"]
        );
    }

    #[tokio::test]
    async fn explicit_urls_skip_search() {
        let searcher = Arc::new(MockSearcher::new());
        let l = locator(searcher.clone(), 10);
        let target = InputTarget::Urls(vec![
            "https://www.reddit.com/r/a/comments/1/x/".into(),
            "https://reddit.com/r/a/comments/1/x".into(),
            "https://reddit.com/r/b/comments/2/y".into(),
        ]);
        let docs = l.locate(&target).await;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "Thread 1");
        assert_eq!(docs[1].title, "Thread 2");
        assert_eq!(docs[1].discovery_query, "direct");
        assert!(searcher.calls().is_empty());
    }

    #[tokio::test]
    async fn dedupes_filters_and_caps() {
        let searcher = Arc::new(
            MockSearcher::new()
                .on_query(
                    "tires",
                    vec![
                        hit("https://www.reddit.com/r/cars/comments/1/a/", "A"),
                        hit("https://www.reddit.com/r/cars/", "subreddit index"),
                        hit("https://reddit.com/r/cars/comments/2/b", "B"),
                    ],
                )
                .on_query(
                    "tires price paid",
                    vec![
                        hit("https://reddit.com/r/cars/comments/1/a", "A again"),
                        hit("https://reddit.com/r/cars/comments/3/c", "C"),
                    ],
                ),
        );
        let l = locator(searcher.clone(), 3);
        let docs = l.locate(&InputTarget::Topic("tires".into())).await;

        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(docs[2].discovery_query, "tires price paid");
        assert_eq!(docs[0].snippet.as_deref(), Some("snippet for A"));
        // Cap reached before the third query.
        assert_eq!(searcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn failing_query_is_skipped() {
        let searcher = Arc::new(
            MockSearcher::new()
                .failing_on("tires")
                .on_query(
                    "tires quote received",
                    vec![hit("https://reddit.com/r/cars/comments/9/z", "Z")],
                ),
        );
        let l = locator(searcher, 10);
        let docs = l.locate(&InputTarget::Topic("tires".into())).await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "Z");
    }

    #[tokio::test]
    async fn nothing_found_is_empty() {
        let l = locator(Arc::new(MockSearcher::new()), 10);
        assert!(l.locate(&InputTarget::Topic("nothing".into())).await.is_empty());
    }
}
