use std::collections::BTreeMap;

use serde::Serialize;
use threadscope_common::FetchedDocument;

/// Counters from one analysis run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunStats {
    pub candidates: usize,
    pub fetched: usize,
    pub fetch_failed: usize,
    /// Accepted documents per strategy name.
    pub by_strategy: BTreeMap<String, usize>,
    pub corpus_sources: usize,
    pub corpus_bytes: usize,
    pub entries: usize,
    pub elapsed_ms: u128,
}

impl RunStats {
    pub fn record_fetches(&mut self, docs: &[FetchedDocument]) {
        for doc in docs {
            match doc.strategy_name() {
                Some(name) => {
                    self.fetched += 1;
                    *self.by_strategy.entry(name.to_string()).or_default() += 1;
                }
                None => self.fetch_failed += 1,
            }
        }
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Analysis Run Complete ===")?;
        writeln!(f, "Candidates:      {}", self.candidates)?;
        writeln!(f, "Fetched:         {}", self.fetched)?;
        writeln!(f, "Fetch failed:    {}", self.fetch_failed)?;
        if !self.by_strategy.is_empty() {
            writeln!(f, "\nBy strategy:")?;
            for (name, count) in &self.by_strategy {
                writeln!(f, "  {name:<15} {count}")?;
            }
        }
        writeln!(f, "\nCorpus sources:  {}", self.corpus_sources)?;
        writeln!(f, "Corpus bytes:    {}", self.corpus_bytes)?;
        writeln!(f, "Entries:         {}", self.entries)?;
        writeln!(f, "Elapsed:         {}ms", self.elapsed_ms)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadscope_common::CandidateDocument;

    #[test]
    fn counts_by_strategy() {
        let a = CandidateDocument::direct("https://reddit.com/r/a/comments/1/x", 0);
        let b = CandidateDocument::direct("https://reddit.com/r/a/comments/2/y", 1);
        let docs = vec![
            FetchedDocument::accepted(&a, "x".repeat(400), 1, "mirror", vec![]),
            FetchedDocument::failed(&b, vec![]),
        ];
        let mut stats = RunStats::default();
        stats.record_fetches(&docs);
        assert_eq!(stats.fetched, 1);
        assert_eq!(stats.fetch_failed, 1);
        assert_eq!(stats.by_strategy["mirror"], 1);
        assert!(stats.to_string().contains("mirror"));
    }
}
