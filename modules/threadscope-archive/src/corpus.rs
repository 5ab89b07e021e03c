// Corpus assembly: fetched threads → one bounded, source-tagged text block.

use std::collections::HashSet;

use ai_client::truncate_to_char_boundary;
use serde::Serialize;
use threadscope_common::{canonical_url, CorpusPolicy, FetchedDocument};
use tracing::{debug, info};

const SEPARATOR_WIDTH: usize = 40;

/// One document's contribution to the corpus, after truncation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusSegment {
    pub url: String,
    pub title: String,
    pub text: String,
}

/// Invariant: `text.len() <= max_chars` of the assembler that built it, and
/// every segment's URL appears as a `SOURCE_ID:` line in `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Corpus {
    pub segments: Vec<CorpusSegment>,
    pub text: String,
}

impl Corpus {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.url.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusAssembler {
    max_chars: usize,
    per_document_chars: usize,
}

impl CorpusAssembler {
    pub fn new(max_chars: usize, per_document_chars: usize) -> Self {
        Self {
            max_chars,
            per_document_chars,
        }
    }

    pub fn from_policy(policy: &CorpusPolicy) -> Self {
        Self::new(policy.max_chars, policy.per_document_chars)
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Concatenate surviving documents in input order. Failed documents and
    /// repeated URLs are dropped. Sizes are measured in bytes, so the cap
    /// also bounds the character count.
    pub fn assemble(&self, docs: &[FetchedDocument]) -> Corpus {
        let mut seen = HashSet::new();
        let survivors: Vec<&FetchedDocument> = docs
            .iter()
            .filter(|d| !d.is_failed() && !d.text.trim().is_empty())
            .filter(|d| seen.insert(canonical_url(&d.url)))
            .collect();

        if survivors.is_empty() {
            return Corpus::default();
        }

        let separator = format!("{}\n", "=".repeat(SEPARATOR_WIDTH));
        let blocks: Vec<(&FetchedDocument, String)> = survivors
            .into_iter()
            .map(|doc| {
                let header = format!(
                    "SOURCE_ID: {}\nTITLE: {}\nTEXT:\n",
                    single_line(&doc.url),
                    single_line(&doc.title)
                );
                (doc, header)
            })
            .collect();

        // Headers and separators come off the top so every block gets the
        // same body budget. When they alone overflow the cap, trailing blocks
        // are omitted below.
        let overhead: usize = blocks
            .iter()
            .map(|(_, header)| header.len() + 1 + separator.len())
            .sum();
        let shareable = if overhead < self.max_chars {
            self.max_chars - overhead
        } else {
            self.max_chars
        };
        let budget = self.per_document_chars.min(shareable / blocks.len());

        let mut corpus = Corpus::default();
        for (doc, header) in blocks {
            let fixed = header.len() + 1 + separator.len();
            let remaining = self.max_chars - corpus.text.len();
            if fixed >= remaining {
                debug!(url = doc.url.as_str(), "No room left in corpus, omitting");
                continue;
            }
            let room = budget.min(remaining - fixed);
            let body = truncate_to_char_boundary(&doc.text, room);
            if body.trim().is_empty() {
                continue;
            }

            corpus.text.push_str(&header);
            corpus.text.push_str(body);
            corpus.text.push('\n');
            corpus.text.push_str(&separator);
            corpus.segments.push(CorpusSegment {
                url: doc.url.clone(),
                title: doc.title.clone(),
                text: body.to_string(),
            });
        }

        info!(
            documents = corpus.len(),
            bytes = corpus.text.len(),
            max_chars = self.max_chars,
            per_document = budget,
            "Corpus assembled"
        );
        corpus
    }
}

impl Default for CorpusAssembler {
    fn default() -> Self {
        Self::from_policy(&CorpusPolicy::default())
    }
}

/// Header fields must stay on one line or the tags become ambiguous.
fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadscope_common::CandidateDocument;

    fn fetched(url: &str, title: &str, text: &str) -> FetchedDocument {
        let doc = CandidateDocument {
            url: url.into(),
            title: title.into(),
            discovery_query: "q".into(),
            snippet: None,
        };
        FetchedDocument::accepted(&doc, text.into(), 0, "forum_json", vec![])
    }

    fn failed(url: &str) -> FetchedDocument {
        FetchedDocument::failed(&CandidateDocument::direct(url, 0), vec![])
    }

    #[test]
    fn block_format() {
        let corpus = CorpusAssembler::new(10_000, 5_000)
            .assemble(&[fetched("https://reddit.com/r/a/comments/1/x", "Quotes", "body text")]);
        assert_eq!(
            corpus.text,
            format!(
                "SOURCE_ID: https://reddit.com/r/a/comments/1/x\nTITLE: Quotes\nTEXT:\nbody text\n{}\n",
                "=".repeat(40)
            )
        );
        assert_eq!(corpus.source_ids(), vec!["https://reddit.com/r/a/comments/1/x"]);
    }

    #[test]
    fn drops_failed_and_duplicates() {
        let corpus = CorpusAssembler::default().assemble(&[
            fetched("https://www.reddit.com/r/a/comments/1/x/", "A", "first"),
            failed("https://reddit.com/r/a/comments/2/y"),
            fetched("https://reddit.com/r/a/comments/1/x", "A dup", "second"),
        ]);
        assert_eq!(corpus.len(), 1);
        assert!(!corpus.text.contains("second"));
    }

    #[test]
    fn all_failed_is_empty() {
        let corpus = CorpusAssembler::default().assemble(&[failed("https://reddit.com/r/a/comments/2/y")]);
        assert!(corpus.is_empty());
        assert!(corpus.text.is_empty());
    }

    #[test]
    fn budget_splits_evenly() {
        let long = "x".repeat(5_000);
        let docs: Vec<_> = (0..4)
            .map(|i| fetched(&format!("https://reddit.com/r/a/comments/{i}/t"), "t", &long))
            .collect();
        let corpus = CorpusAssembler::new(4_000, 8_000).assemble(&docs);
        assert!(corpus.text.len() <= 4_000);
        assert!(corpus.segments.iter().all(|s| s.text.len() <= 1_000));
    }

    #[test]
    fn equal_documents_get_equal_shares() {
        let long = "x".repeat(9_000);
        let docs: Vec<_> = (0..10)
            .map(|i| fetched(&format!("https://reddit.com/r/a/comments/{i}/t"), "t", &long))
            .collect();
        let corpus = CorpusAssembler::default().assemble(&docs);
        assert_eq!(corpus.len(), 10);
        assert!(corpus.text.len() <= 40_000);
        let first = corpus.segments[0].text.len();
        assert!(first > 3_800);
        assert!(corpus.segments.iter().all(|s| s.text.len() == first));
    }

    #[test]
    fn multibyte_text_truncates_on_boundary() {
        let text = "€".repeat(200);
        let corpus = CorpusAssembler::new(200, 200)
            .assemble(&[fetched("https://reddit.com/r/a/comments/1/x", "t", &text)]);
        assert!(corpus.text.len() <= 200);
        assert!(corpus.segments[0].text.chars().all(|c| c == '€'));
    }

    #[test]
    fn titles_are_flattened() {
        let corpus = CorpusAssembler::default()
            .assemble(&[fetched("https://reddit.com/r/a/comments/1/x", "two\nlines", "body")]);
        assert!(corpus.text.contains("TITLE: two lines\n"));
    }

    #[test]
    fn header_that_does_not_fit_is_omitted() {
        let corpus = CorpusAssembler::new(20, 20)
            .assemble(&[fetched("https://reddit.com/r/a/comments/1/x", "t", "body")]);
        assert!(corpus.is_empty());
        assert!(corpus.text.is_empty());
    }
}
