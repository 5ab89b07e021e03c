// Forum JSON endpoint: Reddit serves any thread as JSON by appending
// `.json`. The response is a two-element listing: [post, comment tree].

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use threadscope_common::CandidateDocument;
use tracing::debug;

use super::{get_text, http_client, FetchStrategy};
use crate::thread_text::ThreadText;

pub struct ForumJsonStrategy {
    client: reqwest::Client,
    max_comments: usize,
}

impl ForumJsonStrategy {
    pub fn new(user_agent: &str, max_comments: usize) -> Result<Self> {
        Ok(Self {
            client: http_client(user_agent, Duration::from_secs(20))?,
            max_comments,
        })
    }
}

/// Thread URL to its JSON endpoint. Query and fragment are dropped.
pub fn json_endpoint(url: &str, limit: usize) -> Result<String> {
    let mut parsed = url::Url::parse(url.trim()).with_context(|| format!("Invalid URL: {url}"))?;
    parsed.set_query(None);
    parsed.set_fragment(None);
    let path = parsed.path().trim_end_matches('/').to_string();
    let path = path.strip_suffix(".json").unwrap_or(&path).to_string();
    parsed.set_path(&format!("{path}.json"));
    parsed.set_query(Some(&format!("limit={limit}&raw_json=1")));
    Ok(parsed.to_string())
}

/// Render a thread listing to text. Comments are walked depth-first so
/// replies follow their parent. Deleted and removed bodies are skipped.
pub fn render_thread_json(listing: &Value, max_comments: usize) -> Result<String> {
    let post = listing
        .get(0)
        .and_then(|l| l.pointer("/data/children/0/data"))
        .context("Thread JSON missing post listing")?;

    let mut comments = Vec::new();
    if let Some(children) = listing
        .get(1)
        .and_then(|l| l.pointer("/data/children"))
        .and_then(Value::as_array)
    {
        collect_comments(children, max_comments, &mut comments);
    }

    let thread = ThreadText {
        title: str_field(post, "title"),
        op_text: str_field(post, "selftext"),
        comments,
    };
    Ok(thread.render(max_comments))
}

fn collect_comments(children: &[Value], max: usize, out: &mut Vec<(String, String)>) {
    for child in children {
        if out.len() >= max {
            return;
        }
        if child.get("kind").and_then(Value::as_str) != Some("t1") {
            continue;
        }
        let Some(data) = child.get("data") else {
            continue;
        };
        let body = str_field(data, "body");
        let body = body.trim();
        if !body.is_empty() && body != "[deleted]" && body != "[removed]" {
            let author = data
                .get("author")
                .and_then(Value::as_str)
                .unwrap_or("user");
            out.push((author.to_string(), body.to_string()));
        }
        if let Some(replies) = data
            .pointer("/replies/data/children")
            .and_then(Value::as_array)
        {
            collect_comments(replies, max, out);
        }
    }
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl FetchStrategy for ForumJsonStrategy {
    async fn attempt(&self, doc: &CandidateDocument) -> Result<String> {
        let endpoint = json_endpoint(&doc.url, self.max_comments)?;
        debug!(url = endpoint.as_str(), "Fetching thread JSON");
        let body = get_text(&self.client, &endpoint).await?;
        let listing: Value =
            serde_json::from_str(&body).context("Thread endpoint did not return JSON")?;
        render_thread_json(&listing, self.max_comments)
    }

    fn name(&self) -> &str {
        "forum_json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_appends_json() {
        assert_eq!(
            json_endpoint("https://www.reddit.com/r/a/comments/1/x/?utm_source=share", 50).unwrap(),
            "https://www.reddit.com/r/a/comments/1/x.json?limit=50&raw_json=1"
        );
        assert_eq!(
            json_endpoint("https://reddit.com/r/a/comments/1/x.json", 5).unwrap(),
            "https://reddit.com/r/a/comments/1/x.json?limit=5&raw_json=1"
        );
        assert!(json_endpoint("not a url", 5).is_err());
    }

    fn comment(author: &str, body: &str, replies: Value) -> Value {
        json!({"kind": "t1", "data": {"author": author, "body": body, "replies": replies}})
    }

    #[test]
    fn renders_nested_comments_depth_first() {
        let listing = json!([
            {"data": {"children": [{"data": {"title": "Solar quotes", "selftext": "What did you pay?"}}]}},
            {"data": {"children": [
                comment("a", "$18k for 8kW", json!({"data": {"children": [
                    comment("b", "That is high", json!(""))
                ]}})),
                comment("c", "[deleted]", json!("")),
                {"kind": "more", "data": {"count": 10}},
                comment("d", "$15k", json!(""))
            ]}}
        ]);
        let text = render_thread_json(&listing, 10).unwrap();
        assert!(text.starts_with("TITLE: Solar quotes\nOP_TEXT: What did you pay?"));
        let a = text.find("[a]").unwrap();
        let b = text.find("[b]").unwrap();
        let d = text.find("[d]").unwrap();
        assert!(a < b && b < d);
        assert!(!text.contains("[c]"));
    }

    #[test]
    fn comment_cap_applies_across_depth() {
        let listing = json!([
            {"data": {"children": [{"data": {"title": "t", "selftext": ""}}]}},
            {"data": {"children": [
                comment("a", "one", json!({"data": {"children": [comment("b", "two", json!(""))]}})),
                comment("c", "three", json!(""))
            ]}}
        ]);
        let text = render_thread_json(&listing, 2).unwrap();
        assert!(text.contains("[b]"));
        assert!(!text.contains("[c]"));
    }

    #[test]
    fn non_listing_is_error() {
        assert!(render_thread_json(&json!({"error": 403}), 10).is_err());
    }
}
