use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{SearchHit, SearchQuery, WebSearcher};

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum SearchDepth {
    Basic,
    Advanced,
}

impl SearchDepth {
    fn parse(raw: &str) -> Self {
        match raw {
            "advanced" => SearchDepth::Advanced,
            _ => SearchDepth::Basic,
        }
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: SearchDepth,
    max_results: usize,
    include_domains: Vec<&'a str>,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    raw_content: Option<String>,
}

/// Tavily web search, restricted to the query's site via `include_domains`.
pub struct TavilySearcher {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
    search_depth: SearchDepth,
    include_raw_content: bool,
}

impl TavilySearcher {
    pub fn new(api_key: &str, search_depth: &str, include_raw_content: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key: api_key.to_string(),
            client,
            endpoint: TAVILY_ENDPOINT.to_string(),
            search_depth: SearchDepth::parse(search_depth),
            include_raw_content,
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[async_trait]
impl WebSearcher for TavilySearcher {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        info!(query = query.text.as_str(), site = query.site.as_str(), "Tavily search");

        let request = TavilyRequest {
            api_key: &self.api_key,
            query: &query.text,
            search_depth: self.search_depth,
            max_results: query.max_results,
            include_domains: vec![query.site.as_str()],
            include_raw_content: self.include_raw_content,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to send Tavily search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Tavily API error {}: {}", status, body);
        }

        let data: TavilyResponse = response
            .json()
            .await
            .context("Failed to parse Tavily response")?;

        let hits: Vec<SearchHit> = data
            .results
            .into_iter()
            .map(|r| SearchHit {
                url: r.url,
                title: r.title,
                snippet: r.content,
                raw_content: r.raw_content,
            })
            .collect();

        info!(query = query.text.as_str(), count = hits.len(), "Tavily search complete");
        Ok(hits)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
