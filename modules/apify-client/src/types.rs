use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// A start URL entry for scraper input.
#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

/// Proxy settings passed through to the actor.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyConfig {
    #[serde(rename = "useApifyProxy")]
    pub use_apify_proxy: bool,
    #[serde(rename = "apifyProxyGroups")]
    pub apify_proxy_groups: Vec<String>,
}

impl ProxyConfig {
    /// Residential proxy group. Datacenter IPs are blocked by Reddit.
    pub fn residential() -> Self {
        Self {
            use_apify_proxy: true,
            apify_proxy_groups: vec!["RESIDENTIAL".to_string()],
        }
    }
}

/// Input for the Reddit thread scraper actor.
///
/// Exactly one of `search` / `start_urls` is meaningful per run; the other is
/// sent empty so the actor does not mix modes.
#[derive(Debug, Clone, Serialize)]
pub struct RedditScraperInput {
    #[serde(rename = "searchMode")]
    pub search_mode: String,
    pub time: String,
    #[serde(rename = "includeComments")]
    pub include_comments: bool,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
    #[serde(rename = "maxComments")]
    pub max_comments: u32,
    pub proxy: ProxyConfig,
    pub search: String,
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
}

impl RedditScraperInput {
    fn base(max_items: u32, max_comments: u32) -> Self {
        Self {
            search_mode: "link".to_string(),
            time: "all".to_string(),
            include_comments: true,
            max_items,
            max_comments,
            proxy: ProxyConfig::residential(),
            search: String::new(),
            start_urls: Vec::new(),
        }
    }

    /// Keyword search across Reddit.
    pub fn search(query: &str, max_items: u32, max_comments: u32) -> Self {
        Self {
            search: query.to_string(),
            ..Self::base(max_items, max_comments)
        }
    }

    /// Scrape specific thread URLs.
    pub fn urls<S: AsRef<str>>(urls: &[S], max_items: u32, max_comments: u32) -> Self {
        Self {
            start_urls: urls
                .iter()
                .map(|u| StartUrl {
                    url: u.as_ref().to_string(),
                })
                .collect(),
            ..Self::base(max_items, max_comments)
        }
    }
}

/// A single Reddit thread from the actor's dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditThread {
    pub url: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Nested or flat depending on actor version; entries that are not
    /// objects are ignored by [`RedditThread::comments`].
    #[serde(default)]
    comments: Vec<serde_json::Value>,
}

/// A comment flattened out of [`RedditThread`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditComment {
    pub author: String,
    pub body: String,
}

impl RedditThread {
    /// Comments with a non-empty body, in dataset order.
    pub fn comments(&self) -> Vec<RedditComment> {
        self.comments
            .iter()
            .filter_map(|c| {
                let obj = c.as_object()?;
                let body = obj.get("body")?.as_str()?.trim();
                if body.is_empty() {
                    return None;
                }
                let author = obj
                    .get("author")
                    .and_then(|a| a.as_str())
                    .unwrap_or("user");
                Some(RedditComment {
                    author: author.to_string(),
                    body: body.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_input_clears_start_urls() {
        let input = RedditScraperInput::search("car insurance", 10, 50);
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["search"], "car insurance");
        assert_eq!(value["startUrls"].as_array().unwrap().len(), 0);
        assert_eq!(value["includeComments"], true);
        assert_eq!(value["proxy"]["apifyProxyGroups"][0], "RESIDENTIAL");
    }

    #[test]
    fn url_input_clears_search() {
        let input = RedditScraperInput::urls(&["https://www.reddit.com/r/a/comments/1/x/"], 5, 20);
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["search"], "");
        assert_eq!(
            value["startUrls"][0]["url"],
            "https://www.reddit.com/r/a/comments/1/x/"
        );
        assert_eq!(value["maxComments"], 20);
    }

    #[test]
    fn comments_skip_non_objects_and_empty_bodies() {
        let thread: RedditThread = serde_json::from_str(
            r#"{
                "url": "https://www.reddit.com/r/a/comments/1/x/",
                "title": "Insurance cost",
                "body": "What do you pay?",
                "comments": [
                    {"author": "alice", "body": "$120/mo with Geico"},
                    "deleted",
                    {"author": "bob", "body": "   "},
                    {"body": "Progressive quoted me 95"}
                ]
            }"#,
        )
        .unwrap();

        let comments = thread.comments();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author, "alice");
        assert_eq!(comments[1].author, "user");
    }
}
