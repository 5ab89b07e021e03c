pub mod chain;
pub mod corpus;
pub mod factory;
pub mod fetchers;
pub mod locator;
mod readability;
pub mod search;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod thread_text;

pub use chain::ContentFetcher;
pub use corpus::{Corpus, CorpusAssembler, CorpusSegment};
pub use factory::{build_fetcher, build_searcher};
pub use fetchers::FetchStrategy;
pub use locator::SourceLocator;
pub use search::{NoopSearcher, SearchHit, SearchQuery, WebSearcher};
