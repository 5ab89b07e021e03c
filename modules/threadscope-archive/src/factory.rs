// Wire search backends and fetch strategies from policy + secrets.

use std::sync::Arc;
use std::time::Duration;

use apify_client::ApifyClient;
use browserless_client::BrowserlessClient;
use threadscope_common::{
    Config, FetchPolicy, Result, SearchBackend, SearchPolicy, StrategyKind, ThreadscopeError,
};
use tracing::{info, warn};

use crate::chain::ContentFetcher;
use crate::fetchers::{
    ApifyStrategy, CachedSnippetStrategy, DirectStrategy, FetchStrategy, ForumJsonStrategy,
    MirrorStrategy, ReaderProxyStrategy, RenderedStrategy,
};
use crate::search::{ApifyRedditSearcher, SerperSearcher, TavilySearcher, WebSearcher};

/// The selected search backend. Its credential is mandatory: without a
/// searcher a topic run cannot proceed.
pub fn build_searcher(
    policy: &SearchPolicy,
    config: &Config,
    max_comments: usize,
) -> Result<Arc<dyn WebSearcher>> {
    let searcher: Arc<dyn WebSearcher> = match policy.backend {
        SearchBackend::Tavily => {
            let key = require(&config.tavily_api_key, "TAVILY_API_KEY")?;
            Arc::new(TavilySearcher::new(
                key,
                &policy.search_depth,
                policy.include_raw_content,
            )?)
        }
        SearchBackend::Serper => {
            let key = require(&config.serper_api_key, "SERPER_API_KEY")?;
            Arc::new(SerperSearcher::new(key)?)
        }
        SearchBackend::Apify => {
            let token = require(&config.apify_api_token, "APIFY_API_TOKEN")?;
            Arc::new(ApifyRedditSearcher::new(
                new_apify_client(token)?,
                max_comments,
            ))
        }
    };
    info!(backend = searcher.name(), "Search backend ready");
    Ok(searcher)
}

/// The strategy chain in policy order. Strategies whose credentials are
/// missing are skipped with a warning; an empty chain is a configuration
/// error.
pub fn build_fetcher(policy: &FetchPolicy, config: &Config) -> Result<ContentFetcher> {
    let mut strategies: Vec<Arc<dyn FetchStrategy>> = Vec::new();

    for kind in &policy.strategies {
        let strategy: Arc<dyn FetchStrategy> = match kind {
            StrategyKind::ForumJson => Arc::new(ForumJsonStrategy::new(
                &policy.user_agent,
                policy.max_comments,
            )?),
            StrategyKind::ReaderProxy => Arc::new(ReaderProxyStrategy::new(
                &policy.reader_base_url,
                config.reader_api_key.clone(),
                &policy.user_agent,
            )?),
            StrategyKind::Mirror => Arc::new(MirrorStrategy::new(
                policy.mirror_hosts.clone(),
                policy.min_content_chars,
                &policy.user_agent,
            )?),
            StrategyKind::Rendered => match &config.browserless_url {
                Some(url) => {
                    let client = BrowserlessClient::new(url, config.browserless_token.as_deref())
                        .map_err(|e| ThreadscopeError::Config(e.to_string()))?;
                    Arc::new(RenderedStrategy::new(client))
                }
                None => {
                    warn!(strategy = kind.as_str(), "BROWSERLESS_URL not set, skipping strategy");
                    continue;
                }
            },
            StrategyKind::Direct => Arc::new(DirectStrategy::new(&policy.user_agent)?),
            StrategyKind::Apify => match &config.apify_api_token {
                Some(token) => Arc::new(ApifyStrategy::new(
                    new_apify_client(token)?,
                    policy.max_comments,
                )),
                None => {
                    warn!(strategy = kind.as_str(), "APIFY_API_TOKEN not set, skipping strategy");
                    continue;
                }
            },
            StrategyKind::CachedSnippet => Arc::new(CachedSnippetStrategy),
        };
        strategies.push(strategy);
    }

    if strategies.is_empty() {
        return Err(ThreadscopeError::Config(
            "no usable fetch strategies configured".to_string(),
        ));
    }

    let fetcher = ContentFetcher::new(strategies, policy.min_content_chars)
        .with_pacing(Duration::from_millis(policy.pacing_ms));
    info!(strategies = ?fetcher.strategy_names(), "Fetch chain ready");
    Ok(fetcher)
}

fn new_apify_client(token: &str) -> Result<ApifyClient> {
    ApifyClient::new(token.to_string()).map_err(|e| ThreadscopeError::Config(e.to_string()))
}

fn require<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ThreadscopeError::Config(format!("{name} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chain_needs_no_credentials() {
        let fetcher = build_fetcher(&FetchPolicy::default(), &Config::default()).unwrap();
        assert_eq!(
            fetcher.strategy_names(),
            vec!["forum_json", "reader_proxy", "mirror", "cached_snippet"]
        );
    }

    #[test]
    fn credentialed_strategies_are_skipped_without_keys() {
        let policy = FetchPolicy {
            strategies: vec![StrategyKind::Rendered, StrategyKind::Apify, StrategyKind::Direct],
            ..FetchPolicy::default()
        };
        let fetcher = build_fetcher(&policy, &Config::default()).unwrap();
        assert_eq!(fetcher.strategy_names(), vec!["direct"]);
    }

    #[test]
    fn credentialed_strategies_build_with_keys() {
        let policy = FetchPolicy {
            strategies: vec![StrategyKind::Rendered, StrategyKind::Apify],
            ..FetchPolicy::default()
        };
        let config = Config {
            browserless_url: Some("http://localhost:3000".into()),
            apify_api_token: Some("apify-token".into()),
            ..Config::default()
        };
        let fetcher = build_fetcher(&policy, &config).unwrap();
        assert_eq!(fetcher.strategy_names(), vec!["rendered", "apify"]);

        let search = SearchPolicy {
            backend: SearchBackend::Apify,
            ..SearchPolicy::default()
        };
        assert_eq!(build_searcher(&search, &config, 50).unwrap().name(), "apify");
    }

    #[test]
    fn empty_chain_is_config_error() {
        let policy = FetchPolicy {
            strategies: vec![StrategyKind::Rendered],
            ..FetchPolicy::default()
        };
        let err = build_fetcher(&policy, &Config::default()).err().unwrap();
        assert!(matches!(err, ThreadscopeError::Config(_)));
    }

    #[test]
    fn searcher_requires_backend_key() {
        let err = build_searcher(&SearchPolicy::default(), &Config::default(), 50)
            .err()
            .unwrap();
        assert!(err.to_string().contains("TAVILY_API_KEY"));

        let config = Config {
            serper_api_key: Some("serper-key".into()),
            ..Config::default()
        };
        let policy = SearchPolicy {
            backend: SearchBackend::Serper,
            ..SearchPolicy::default()
        };
        let searcher = build_searcher(&policy, &config, 50).unwrap();
        assert_eq!(searcher.name(), "serper");
    }
}
