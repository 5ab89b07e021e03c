// Web search backends used by the source locator. Each backend turns a
// site-scoped query into hits; none of them persists anything.

pub mod apify;
pub mod serper;
pub mod tavily;

pub use apify::ApifyRedditSearcher;
pub use serper::SerperSearcher;
pub use tavily::TavilySearcher;

use anyhow::Result;
use async_trait::async_trait;

/// A single site-scoped search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// Domain results must come from (e.g. `reddit.com`).
    pub site: String,
    pub max_results: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Full page text when the backend returns it.
    pub raw_content: Option<String>,
}

impl SearchHit {
    /// Best content captured during search: raw content, else the snippet.
    pub fn captured_text(&self) -> Option<String> {
        self.raw_content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| Some(self.snippet.trim()).filter(|t| !t.is_empty()))
            .map(String::from)
    }
}

#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>>;
    fn name(&self) -> &str;
}

/// Stands in when no search backend is configured. Explicit-URL runs never
/// search, so they can proceed without one.
pub struct NoopSearcher;

#[async_trait]
impl WebSearcher for NoopSearcher {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        tracing::warn!(query = query.text.as_str(), "NoopSearcher: search called but no backend configured");
        Ok(vec![])
    }

    fn name(&self) -> &str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(snippet: &str, raw: Option<&str>) -> SearchHit {
        SearchHit {
            url: "https://reddit.com/r/a/comments/1/x".into(),
            title: "x".into(),
            snippet: snippet.into(),
            raw_content: raw.map(String::from),
        }
    }

    #[test]
    fn captured_text_prefers_raw_content() {
        assert_eq!(hit("short", Some("full page")).captured_text().as_deref(), Some("full page"));
        assert_eq!(hit("short", Some("   ")).captured_text().as_deref(), Some("short"));
        assert_eq!(hit("", None).captured_text(), None);
    }
}
