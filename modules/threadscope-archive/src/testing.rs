// Test doubles for the two archive trait boundaries:
// - MockSearcher (WebSearcher): query → hits, records every query issued
// - ScriptedStrategy (FetchStrategy): URL → text, records every URL attempted

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use threadscope_common::CandidateDocument;

use crate::fetchers::FetchStrategy;
use crate::search::{SearchHit, SearchQuery, WebSearcher};

// ---------------------------------------------------------------------------
// MockSearcher
// ---------------------------------------------------------------------------

/// Unregistered queries return no hits; `failing_on` queries return `Err`.
pub struct MockSearcher {
    results: HashMap<String, Vec<SearchHit>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self {
            results: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_query(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.results.insert(query.to_string(), hits);
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    /// Query texts in the order they were issued.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        self.calls.lock().unwrap().push(query.text.clone());
        if self.failing.contains(&query.text) {
            bail!("MockSearcher: query '{}' configured to fail", query.text);
        }
        Ok(self.results.get(&query.text).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A thread hit with the given URL and title.
pub fn thread_hit(url: &str, title: &str) -> SearchHit {
    SearchHit {
        url: url.to_string(),
        title: title.to_string(),
        snippet: String::new(),
        raw_content: None,
    }
}

// ---------------------------------------------------------------------------
// ScriptedStrategy
// ---------------------------------------------------------------------------

/// Returns the text registered for a URL, else the default text, else `Err`.
pub struct ScriptedStrategy {
    name: String,
    responses: HashMap<String, String>,
    default_text: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedStrategy {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            responses: HashMap::new(),
            default_text: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_url(mut self, url: &str, text: &str) -> Self {
        self.responses.insert(url.to_string(), text.to_string());
        self
    }

    pub fn default_text(mut self, text: &str) -> Self {
        self.default_text = Some(text.to_string());
        self
    }

    /// URLs attempted, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FetchStrategy for ScriptedStrategy {
    async fn attempt(&self, doc: &CandidateDocument) -> Result<String> {
        self.calls.lock().unwrap().push(doc.url.clone());
        match self.responses.get(&doc.url).or(self.default_text.as_ref()) {
            Some(text) => Ok(text.clone()),
            None => bail!("ScriptedStrategy '{}': no response for {}", self.name, doc.url),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
