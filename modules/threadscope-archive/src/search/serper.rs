// Serper (Google Search) backend. Site scoping uses the `site:` operator.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::{SearchHit, SearchQuery, WebSearcher};

#[derive(Debug, serde::Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, serde::Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

pub struct SerperSearcher {
    api_key: String,
    client: reqwest::Client,
}

impl SerperSearcher {
    pub fn new(api_key: &str) -> Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .context("Failed to create HTTP client")?,
        })
    }
}

fn scoped_query(query: &SearchQuery) -> String {
    format!("site:{} {}", query.site, query.text)
}

#[async_trait]
impl WebSearcher for SerperSearcher {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let q = scoped_query(query);
        info!(query = q.as_str(), max_results = query.max_results, "Serper search");

        let body = serde_json::json!({
            "q": q,
            "num": query.max_results,
        });

        let resp = self
            .client
            .post("https://google.serper.dev/search")
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Serper API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Serper API error {}: {}", status, body);
        }

        let data: SerperResponse = resp
            .json()
            .await
            .context("Failed to parse Serper response")?;

        let hits: Vec<SearchHit> = data
            .organic
            .into_iter()
            .filter(|r| !r.link.is_empty())
            .map(|r| SearchHit {
                url: r.link,
                title: r.title,
                snippet: r.snippet,
                raw_content: None,
            })
            .collect();

        info!(query = q.as_str(), count = hits.len(), "Serper search complete");
        Ok(hits)
    }

    fn name(&self) -> &str {
        "serper"
    }
}
