// Mirror hosts: alternate front-ends that serve the same thread path.
// Tried in order; the first mirror with enough text wins.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use threadscope_common::CandidateDocument;
use tracing::debug;

use super::{get_text, http_client, FetchStrategy};
use crate::readability::html_to_markdown;

pub struct MirrorStrategy {
    client: reqwest::Client,
    hosts: Vec<String>,
    min_chars: usize,
}

impl MirrorStrategy {
    pub fn new(hosts: Vec<String>, min_chars: usize, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: http_client(user_agent, Duration::from_secs(20))?,
            hosts,
            min_chars,
        })
    }
}

/// Swap the host of `url` for `host`, keeping path and query. `host` may
/// carry a port (`localhost:8080`); without one the default port is used.
pub fn rewrite_host(url: &str, host: &str) -> Result<String> {
    let mut parsed = url::Url::parse(url.trim()).with_context(|| format!("Invalid URL: {url}"))?;
    let (name, port) = match host.rsplit_once(':') {
        Some((name, port)) => {
            let port: u16 = port
                .parse()
                .with_context(|| format!("Invalid port in mirror host: {host}"))?;
            (name, Some(port))
        }
        None => (host, None),
    };
    parsed
        .set_host(Some(name))
        .with_context(|| format!("Invalid mirror host: {host}"))?;
    parsed
        .set_port(port)
        .map_err(|_| anyhow::anyhow!("Mirror host cannot carry a port: {host}"))?;
    Ok(parsed.to_string())
}

/// Request `urls` in order. The first text longer than `min_chars` wins and
/// later URLs are never requested. Otherwise the longest short text comes
/// back, or the last error when no URL answered at all.
async fn first_long_enough<F, Fut>(urls: &[String], min_chars: usize, mut fetch: F) -> Result<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut best = String::new();
    let mut last_err = None;

    for url in urls {
        match fetch(url.clone()).await {
            Ok(text) => {
                let chars = text.chars().count();
                debug!(url = url.as_str(), chars, "Mirror responded");
                if chars > min_chars {
                    return Ok(text);
                }
                if chars > best.chars().count() {
                    best = text;
                }
            }
            Err(e) => {
                debug!(url = url.as_str(), error = %e, "Mirror failed");
                last_err = Some(e);
            }
        }
    }

    match last_err {
        Some(e) if best.is_empty() => Err(e),
        _ => Ok(best),
    }
}

#[async_trait]
impl FetchStrategy for MirrorStrategy {
    async fn attempt(&self, doc: &CandidateDocument) -> Result<String> {
        let urls = self
            .hosts
            .iter()
            .map(|host| rewrite_host(&doc.url, host))
            .collect::<Result<Vec<_>>>()?;
        let client = &self.client;

        first_long_enough(&urls, self.min_chars, |url| async move {
            let html = get_text(client, &url).await?;
            Ok(html_to_markdown(&html, &url))
        })
        .await
    }

    fn name(&self) -> &str {
        "mirror"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn rewrites_host_only() {
        assert_eq!(
            rewrite_host("https://www.reddit.com/r/a/comments/1/x/?sort=top", "old.reddit.com").unwrap(),
            "https://old.reddit.com/r/a/comments/1/x/?sort=top"
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(rewrite_host("nope", "old.reddit.com").is_err());
        assert!(rewrite_host("https://reddit.com/r/a", "localhost:http").is_err());
    }

    #[test]
    fn mirror_host_may_carry_port() {
        assert_eq!(
            rewrite_host("https://www.reddit.com/r/a/comments/1/x/", "localhost:8080").unwrap(),
            "https://localhost:8080/r/a/comments/1/x/"
        );
        assert_eq!(
            rewrite_host("https://www.reddit.com:8443/r/a", "old.reddit.com").unwrap(),
            "https://old.reddit.com/r/a"
        );
    }

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|h| format!("https://{h}/r/a/comments/1/x")).collect()
    }

    #[tokio::test]
    async fn short_mirror_falls_through_to_next() {
        let calls = Mutex::new(Vec::new());
        let urls = hosts(&["one.test", "two.test", "three.test"]);

        let text = first_long_enough(&urls, 10, |url| {
            calls.lock().unwrap().push(url.clone());
            let reply = if url.contains("one.test") {
                Ok("blocked".to_string())
            } else {
                Ok("full thread text with comments".to_string())
            };
            async move { reply }
        })
        .await
        .unwrap();

        assert_eq!(text, "full thread text with comments");
        let calls = calls.into_inner().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(!calls.iter().any(|u| u.contains("three.test")));
    }

    #[tokio::test]
    async fn all_mirrors_erroring_is_err() {
        let urls = hosts(&["one.test", "two.test"]);
        let result = first_long_enough(&urls, 10, |url| async move {
            Err(anyhow::anyhow!("connection refused: {url}"))
        })
        .await;
        assert!(result.unwrap_err().to_string().contains("two.test"));
    }

    #[tokio::test]
    async fn longest_short_reply_beats_errors() {
        let urls = hosts(&["one.test", "two.test", "three.test"]);
        let text = first_long_enough(&urls, 100, |url| async move {
            if url.contains("two.test") {
                Err(anyhow::anyhow!("timeout"))
            } else if url.contains("one.test") {
                Ok("short".to_string())
            } else {
                Ok("a bit longer".to_string())
            }
        })
        .await
        .unwrap();
        assert_eq!(text, "a bit longer");
    }

    #[tokio::test]
    async fn no_hosts_yields_empty_text() {
        let s = MirrorStrategy::new(vec![], 300, "test").unwrap();
        let doc = CandidateDocument::direct("https://reddit.com/r/a/comments/1/x", 0);
        assert_eq!(s.attempt(&doc).await.unwrap(), "");
    }
}
