// Last resort: whatever text the locator captured while searching.

use anyhow::Result;
use async_trait::async_trait;
use threadscope_common::CandidateDocument;

use super::FetchStrategy;

pub struct CachedSnippetStrategy;

#[async_trait]
impl FetchStrategy for CachedSnippetStrategy {
    async fn attempt(&self, doc: &CandidateDocument) -> Result<String> {
        match &doc.snippet {
            Some(text) => Ok(text.clone()),
            None => anyhow::bail!("No cached snippet for {}", doc.url),
        }
    }

    fn name(&self) -> &str {
        "cached_snippet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_snippet_or_errors() {
        let mut doc = CandidateDocument::direct("https://reddit.com/r/a/comments/1/x", 0);
        assert!(CachedSnippetStrategy.attempt(&doc).await.is_err());
        doc.snippet = Some("cached text".into());
        assert_eq!(CachedSnippetStrategy.attempt(&doc).await.unwrap(), "cached text");
    }
}
