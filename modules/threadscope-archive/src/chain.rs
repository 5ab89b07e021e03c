// Fallback chain: run strategies in order for each candidate until one
// yields more than the minimum amount of text.

use std::sync::Arc;
use std::time::Duration;

use threadscope_common::{
    AttemptOutcome, CandidateDocument, FetchedDocument, StrategyAttempt,
};
use tracing::{info, warn};

use crate::fetchers::FetchStrategy;

pub struct ContentFetcher {
    strategies: Vec<Arc<dyn FetchStrategy>>,
    min_content_chars: usize,
    pacing: Duration,
}

impl ContentFetcher {
    pub fn new(strategies: Vec<Arc<dyn FetchStrategy>>, min_content_chars: usize) -> Self {
        Self {
            strategies,
            min_content_chars,
            pacing: Duration::ZERO,
        }
    }

    /// Pause between documents in `fetch_all`.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn min_content_chars(&self) -> usize {
        self.min_content_chars
    }

    /// Run the chain for one candidate. Never errors: a candidate no
    /// strategy could serve comes back as `Failed` with every attempt
    /// recorded.
    pub async fn fetch(&self, doc: &CandidateDocument) -> FetchedDocument {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for (rank, strategy) in self.strategies.iter().enumerate() {
            let name = strategy.name();
            match strategy.attempt(doc).await {
                Ok(text) => {
                    let text = text.trim().to_string();
                    let chars = text.chars().count();
                    if chars > self.min_content_chars {
                        attempts.push(StrategyAttempt {
                            strategy: name.to_string(),
                            outcome: AttemptOutcome::Accepted { chars },
                        });
                        info!(url = doc.url.as_str(), strategy = name, rank, chars, "Fetched");
                        return FetchedDocument::accepted(doc, text, rank, name, attempts);
                    }
                    info!(
                        url = doc.url.as_str(),
                        strategy = name,
                        chars,
                        min = self.min_content_chars,
                        "Content too short, falling back"
                    );
                    attempts.push(StrategyAttempt {
                        strategy: name.to_string(),
                        outcome: AttemptOutcome::TooShort { chars },
                    });
                }
                Err(e) => {
                    info!(url = doc.url.as_str(), strategy = name, error = %e, "Strategy failed, falling back");
                    attempts.push(StrategyAttempt {
                        strategy: name.to_string(),
                        outcome: AttemptOutcome::Error {
                            message: e.to_string(),
                        },
                    });
                }
            }
        }

        warn!(url = doc.url.as_str(), attempts = attempts.len(), "All strategies failed");
        FetchedDocument::failed(doc, attempts)
    }

    /// Fetch every candidate sequentially, in input order, pausing between
    /// documents. Output order matches input order.
    pub async fn fetch_all(&self, docs: &[CandidateDocument]) -> Vec<FetchedDocument> {
        let mut fetched = Vec::with_capacity(docs.len());
        for (i, doc) in docs.iter().enumerate() {
            if i > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
            fetched.push(self.fetch(doc).await);
        }
        let ok = fetched.iter().filter(|d| !d.is_failed()).count();
        info!(total = fetched.len(), ok, failed = fetched.len() - ok, "Fetch pass complete");
        fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedStrategy;
    use threadscope_common::StrategyUsed;

    fn doc(url: &str) -> CandidateDocument {
        CandidateDocument::direct(url, 0)
    }

    #[tokio::test]
    async fn primary_wins_when_long_enough() {
        let first = Arc::new(ScriptedStrategy::new("first").default_text(&"a".repeat(301)));
        let second = Arc::new(ScriptedStrategy::new("second").default_text(&"b".repeat(900)));
        let fetcher = ContentFetcher::new(vec![first, second.clone()], 300);

        let out = fetcher.fetch(&doc("https://reddit.com/r/a/comments/1/x")).await;
        assert_eq!(
            out.strategy,
            StrategyUsed::Succeeded { rank: 0, name: "first".into() }
        );
        assert_eq!(out.length, 301);
        assert!(second.calls().is_empty());
    }

    #[tokio::test]
    async fn exactly_minimum_is_rejected() {
        let first = Arc::new(ScriptedStrategy::new("first").default_text(&"a".repeat(300)));
        let second = Arc::new(ScriptedStrategy::new("second").default_text(&"b".repeat(400)));
        let fetcher = ContentFetcher::new(vec![first, second], 300);

        let out = fetcher.fetch(&doc("https://reddit.com/r/a/comments/1/x")).await;
        assert_eq!(out.strategy_name(), Some("second"));
        assert_eq!(out.attempts[0].outcome, AttemptOutcome::TooShort { chars: 300 });
    }

    #[tokio::test]
    async fn errors_fall_through_to_failed() {
        let first = Arc::new(ScriptedStrategy::new("first"));
        let second = Arc::new(ScriptedStrategy::new("second").default_text("tiny"));
        let fetcher = ContentFetcher::new(vec![first, second], 300);

        let out = fetcher.fetch(&doc("https://reddit.com/r/a/comments/1/x")).await;
        assert!(out.is_failed());
        assert!(out.text.is_empty());
        assert_eq!(out.length, 0);
        assert_eq!(out.attempts.len(), 2);
        assert!(matches!(out.attempts[0].outcome, AttemptOutcome::Error { .. }));
    }

    #[tokio::test]
    async fn whitespace_does_not_count() {
        let padded = format!("{}{}", " ".repeat(500), "x".repeat(10));
        let only = Arc::new(ScriptedStrategy::new("only").default_text(&padded));
        let fetcher = ContentFetcher::new(vec![only], 300);
        assert!(fetcher.fetch(&doc("https://reddit.com/r/a/comments/1/x")).await.is_failed());
    }

    #[tokio::test]
    async fn fetch_all_preserves_order() {
        let s = Arc::new(
            ScriptedStrategy::new("s")
                .on_url("https://reddit.com/r/a/comments/1/x", &"1".repeat(400))
                .on_url("https://reddit.com/r/a/comments/3/z", &"3".repeat(400)),
        );
        let fetcher = ContentFetcher::new(vec![s.clone()], 300);
        let docs = vec![
            doc("https://reddit.com/r/a/comments/1/x"),
            doc("https://reddit.com/r/a/comments/2/y"),
            doc("https://reddit.com/r/a/comments/3/z"),
        ];
        let out = fetcher.fetch_all(&docs).await;
        assert_eq!(out.len(), 3);
        assert!(!out[0].is_failed());
        assert!(out[1].is_failed());
        assert!(out[2].text.starts_with('3'));
        assert_eq!(s.calls().len(), 3);
    }
}
