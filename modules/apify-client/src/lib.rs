pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{
    ProxyConfig, RedditComment, RedditScraperInput, RedditThread, RunData, StartUrl,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for the Reddit thread scraper (posts with comments).
const REDDIT_SCRAPER: &str = "jwR5FKaWaGSmkeq2b";

/// Each poll long-waits 60s server-side, so this bounds a run at ~10 minutes.
const MAX_POLLS: u32 = 10;

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            token,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Send an authenticated request and decode its JSON body. Non-2xx
    /// statuses become [`ApifyError::Api`] with the response text.
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let resp = request.bearer_auth(&self.token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Start an actor run. Returns immediately with run metadata.
    pub async fn start_run<I: Serialize + ?Sized>(&self, actor_id: &str, input: &I) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", self.base_url, actor_id);
        let resp: ApiResponse<RunData> = self.send(self.client.post(&url).json(input)).await?;
        Ok(resp.data)
    }

    /// Long-poll (`waitForFinish=60`) until the run reaches a terminal state,
    /// giving up after `MAX_POLLS` rounds.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        let url = format!("{}/actor-runs/{}?waitForFinish=60", self.base_url, run_id);
        let mut last_status = String::from("READY");
        for poll in 0..MAX_POLLS {
            let resp: ApiResponse<RunData> = self.send(self.client.get(&url)).await?;
            let run = resp.data;
            match run.status.as_str() {
                "SUCCEEDED" => return Ok(run),
                "FAILED" | "ABORTED" | "TIMED-OUT" => return Err(ApifyError::RunFailed(run.status)),
                _ => {
                    tracing::debug!(run_id, poll, status = %run.status, "Run still in progress");
                    last_status = run.status;
                }
            }
        }

        Err(ApifyError::PollLimit {
            run_id: run_id.to_string(),
            status: last_status,
            polls: MAX_POLLS,
        })
    }

    /// Items of a finished run's dataset.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/datasets/{}/items?format=json&clean=true", self.base_url, dataset_id);
        self.send(self.client.get(&url)).await
    }

    /// Run an actor end-to-end: start run, poll, fetch dataset.
    pub async fn call_actor<I, T>(&self, actor_id: &str, input: &I) -> Result<Vec<T>>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let run = self.start_run(actor_id, input).await?;
        tracing::info!(actor_id, run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        self.get_dataset_items(&completed.default_dataset_id).await
    }

    /// Scrape Reddit threads (with comments) through the residential proxy.
    pub async fn scrape_reddit(&self, input: &RedditScraperInput) -> Result<Vec<RedditThread>> {
        tracing::info!(
            search = %input.search,
            start_urls = input.start_urls.len(),
            max_items = input.max_items,
            "Starting Reddit thread scrape"
        );

        let threads: Vec<RedditThread> = self.call_actor(REDDIT_SCRAPER, input).await?;
        tracing::info!(count = threads.len(), "Fetched Reddit threads");

        Ok(threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_trimmed_base_url() {
        let client = ApifyClient::new("token".into())
            .unwrap()
            .with_base_url("http://localhost:8080/v2/");
        assert_eq!(client.base_url, "http://localhost:8080/v2");
        assert_eq!(client.token, "token");
    }
}
