pub mod error;

pub use error::{BrowserlessError, Result};

use serde::Serialize;
use std::time::Duration;

/// Resource types the headless browser skips. Thread text never needs them.
const REJECTED_RESOURCES: &[&str] = &["image", "media", "font", "stylesheet"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    reject_resource_types: &'a [&'a str],
    goto_options: GotoOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
    timeout: u64,
}

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    navigation_timeout: Duration,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(45))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
            navigation_timeout: Duration::from_secs(30),
        })
    }

    /// Page-load budget handed to the browser; the HTTP timeout stays above it.
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }
        endpoint
    }

    /// Fetch fully-rendered HTML content for a URL via Browserless /content endpoint.
    pub async fn content(&self, url: &str) -> Result<String> {
        let body = ContentRequest {
            url,
            reject_resource_types: REJECTED_RESOURCES,
            goto_options: GotoOptions {
                wait_until: "networkidle2",
                timeout: self.navigation_timeout.as_millis() as u64,
            },
        };

        tracing::debug!(url, "Browserless content request");

        let resp = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let html = resp.text().await?;
        if html.trim().is_empty() {
            return Err(BrowserlessError::EmptyDocument(url.to_string()));
        }
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_token() {
        let client = BrowserlessClient::new("https://chrome.example.com/", Some("abc")).unwrap();
        assert_eq!(client.endpoint(), "https://chrome.example.com/content?token=abc");
    }

    #[test]
    fn endpoint_without_token() {
        let client = BrowserlessClient::new("http://localhost:3000", None).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3000/content");
    }

    #[test]
    fn request_body_shape() {
        let body = ContentRequest {
            url: "https://old.reddit.com/r/a/comments/1/x/",
            reject_resource_types: REJECTED_RESOURCES,
            goto_options: GotoOptions {
                wait_until: "networkidle2",
                timeout: 30_000,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["gotoOptions"]["waitUntil"], "networkidle2");
        assert_eq!(value["rejectResourceTypes"][0], "image");
    }
}
