use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// TOML-backed tuning for an analysis run. Secrets stay as env vars.
///
/// Every section and field is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisPolicy {
    pub search: SearchPolicy,
    pub fetch: FetchPolicy,
    pub corpus: CorpusPolicy,
    pub model: ModelPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBackend {
    Tavily,
    Serper,
    Apify,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchPolicy {
    pub backend: SearchBackend,
    /// Forum domain every query is scoped to.
    pub site: String,
    /// Path fragment identifying a thread page. `None` keeps every result.
    pub thread_marker: Option<String>,
    /// Appended to the topic for extra recall queries.
    pub qualifiers: Vec<String>,
    pub max_documents: usize,
    pub results_per_query: usize,
    /// Tavily `search_depth`: "basic" or "advanced".
    pub search_depth: String,
    /// Ask the backend for page content alongside results.
    pub include_raw_content: bool,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            backend: SearchBackend::Tavily,
            site: "reddit.com".to_string(),
            thread_marker: Some("/comments/".to_string()),
            qualifiers: vec!["price paid".to_string(), "quote received".to_string()],
            max_documents: 10,
            results_per_query: 10,
            search_depth: "advanced".to_string(),
            include_raw_content: true,
        }
    }
}

/// One link in the content-retrieval chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    ForumJson,
    ReaderProxy,
    Mirror,
    Rendered,
    Direct,
    Apify,
    CachedSnippet,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::ForumJson => "forum_json",
            StrategyKind::ReaderProxy => "reader_proxy",
            StrategyKind::Mirror => "mirror",
            StrategyKind::Rendered => "rendered",
            StrategyKind::Direct => "direct",
            StrategyKind::Apify => "apify",
            StrategyKind::CachedSnippet => "cached_snippet",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchPolicy {
    /// Tried in order until one returns more than `min_content_chars`.
    pub strategies: Vec<StrategyKind>,
    pub min_content_chars: usize,
    /// Hosts substituted for the origin host by the mirror strategy.
    pub mirror_hosts: Vec<String>,
    pub reader_base_url: String,
    pub max_comments: usize,
    /// Sleep between successive documents. Courtesy, not correctness.
    pub pacing_ms: u64,
    pub user_agent: String,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            strategies: vec![
                StrategyKind::ForumJson,
                StrategyKind::ReaderProxy,
                StrategyKind::Mirror,
                StrategyKind::CachedSnippet,
            ],
            min_content_chars: 300,
            mirror_hosts: vec![
                "old.reddit.com".to_string(),
                "safereddit.com".to_string(),
                "redlib.catsarch.com".to_string(),
            ],
            reader_base_url: "https://r.jina.ai".to_string(),
            max_comments: 50,
            pacing_ms: 1000,
            user_agent: "threadscope/0.1 (thread pricing analyst)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusPolicy {
    /// Hard cap on the assembled corpus, in bytes.
    pub max_chars: usize,
    /// Upper bound per thread before the even split kicks in.
    pub per_document_chars: usize,
}

impl Default for CorpusPolicy {
    fn default() -> Self {
        Self {
            max_chars: 40_000,
            per_document_chars: 8_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelProvider {
    Gemini,
    Claude,
    Openai,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelPolicy {
    pub provider: ModelProvider,
    pub name: String,
}

impl Default for ModelPolicy {
    fn default() -> Self {
        Self {
            provider: ModelProvider::Gemini,
            name: "gemini-2.5-flash".to_string(),
        }
    }
}

/// Load and parse a TOML policy file.
pub fn load_policy(path: &Path) -> Result<AnalysisPolicy> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file: {}", path.display()))?;
    let policy: AnalysisPolicy = toml::from_str(&content)
        .with_context(|| format!("Failed to parse policy file: {}", path.display()))?;
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let policy: AnalysisPolicy = toml::from_str("").unwrap();
        assert_eq!(policy.search.site, "reddit.com");
        assert_eq!(policy.fetch.min_content_chars, 300);
        assert_eq!(policy.corpus.max_chars, 40_000);
        assert_eq!(policy.model.provider, ModelProvider::Gemini);
        assert_eq!(
            policy.fetch.strategies.last(),
            Some(&StrategyKind::CachedSnippet)
        );
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let policy: AnalysisPolicy = toml::from_str(
            r#"
            [fetch]
            strategies = ["mirror", "rendered", "cached_snippet"]
            mirror_hosts = ["old.reddit.com"]

            [model]
            provider = "claude"
            name = "claude-haiku-4-5-20251001"
            "#,
        )
        .unwrap();
        assert_eq!(
            policy.fetch.strategies,
            vec![
                StrategyKind::Mirror,
                StrategyKind::Rendered,
                StrategyKind::CachedSnippet
            ]
        );
        assert_eq!(policy.fetch.min_content_chars, 300);
        assert_eq!(policy.model.provider, ModelProvider::Claude);
        assert_eq!(policy.search.backend, SearchBackend::Tavily);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = toml::from_str::<AnalysisPolicy>("[fetch]\nretries = 3\n");
        assert!(err.is_err());
    }

    #[test]
    fn load_policy_reports_path() {
        let err = load_policy(Path::new("/nonexistent/threadscope.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/threadscope.toml"));
    }
}
