use serde::{Deserialize, Serialize};

// --- Source location ---

/// A thread URL discovered as possibly relevant, not yet fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub url: String,
    pub title: String,
    /// Query that surfaced this thread, or `"direct"` for explicit URLs.
    pub discovery_query: String,
    /// Content captured incidentally while locating (search raw content,
    /// actor-run thread text). Lowest-fidelity fallback for the fetcher.
    pub snippet: Option<String>,
}

impl CandidateDocument {
    pub const DIRECT_QUERY: &'static str = "direct";

    /// Wrap an explicitly supplied URL. `index` is zero-based.
    pub fn direct(url: &str, index: usize) -> Self {
        Self {
            url: url.to_string(),
            title: format!("Thread {}", index + 1),
            discovery_query: Self::DIRECT_QUERY.to_string(),
            snippet: None,
        }
    }
}

// --- Content fetching ---

/// Which link of the strategy chain produced a document's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StrategyUsed {
    /// `rank` is the zero-based position in the chain (0 = primary).
    Succeeded { rank: usize, name: String },
    Failed,
}

/// Result of a single strategy attempt for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Accepted { chars: usize },
    /// Returned text at or below the minimum length: likely a block page or stub.
    TooShort { chars: usize },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyAttempt {
    pub strategy: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// One candidate after the strategy chain ran.
///
/// Invariant: unless `strategy` is `Failed`, `text` is non-empty and
/// `length` exceeds the fetcher's minimum. Failed documents carry empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedDocument {
    pub url: String,
    pub title: String,
    #[serde(skip_serializing, default)]
    pub text: String,
    pub strategy: StrategyUsed,
    /// Character count of `text`.
    pub length: usize,
    pub attempts: Vec<StrategyAttempt>,
}

impl FetchedDocument {
    pub fn accepted(
        doc: &CandidateDocument,
        text: String,
        rank: usize,
        strategy: &str,
        attempts: Vec<StrategyAttempt>,
    ) -> Self {
        let length = text.chars().count();
        Self {
            url: doc.url.clone(),
            title: doc.title.clone(),
            text,
            strategy: StrategyUsed::Succeeded {
                rank,
                name: strategy.to_string(),
            },
            length,
            attempts,
        }
    }

    pub fn failed(doc: &CandidateDocument, attempts: Vec<StrategyAttempt>) -> Self {
        Self {
            url: doc.url.clone(),
            title: doc.title.clone(),
            text: String::new(),
            strategy: StrategyUsed::Failed,
            length: 0,
            attempts,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.strategy == StrategyUsed::Failed
    }

    pub fn strategy_name(&self) -> Option<&str> {
        match &self.strategy {
            StrategyUsed::Succeeded { name, .. } => Some(name),
            StrategyUsed::Failed => None,
        }
    }
}

// --- URL helpers ---

/// Subdomains that serve the same threads under another front-end.
const FRONT_END_PREFIXES: &[&str] = &["www.", "old.", "new.", "np.", "m.", "i.", "amp."];

/// Dedup key for a thread URL: scheme, lowercased host and path without the
/// trailing slash. Front-end subdomains fold into the bare host, so
/// `old.reddit.com` and `www.reddit.com` links to one thread collide. Query
/// strings and fragments are dropped (tracking params, comment anchors).
/// Unparseable input is returned trimmed.
pub fn canonical_url(raw: &str) -> String {
    let trimmed = raw.trim();
    match url::Url::parse(trimmed) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default().to_lowercase();
            let host = FRONT_END_PREFIXES
                .iter()
                .find_map(|prefix| host.strip_prefix(prefix))
                .filter(|rest| rest.contains('.'))
                .unwrap_or(host.as_str());
            let path = parsed.path().trim_end_matches('/');
            format!("{}://{}{}", parsed.scheme(), host, path)
        }
        Err(_) => trimmed.trim_end_matches('/').to_string(),
    }
}

/// Whether `url` is an http(s) URL on `site` or one of its subdomains.
pub fn is_site_url(url: &str, site: &str) -> bool {
    let Ok(parsed) = url::Url::parse(url.trim()) else {
        return false;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }
    let site = site.trim().trim_start_matches("www.").to_lowercase();
    match parsed.host_str() {
        Some(host) => {
            let host = host.to_lowercase();
            host == site || host.ends_with(&format!(".{site}"))
        }
        None => false,
    }
}
