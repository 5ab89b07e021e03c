pub mod config;
pub mod error;
pub mod input;
pub mod policy;
pub mod types;

pub use config::Config;
pub use error::{Result, ThreadscopeError};
pub use input::InputTarget;
pub use policy::{
    load_policy, AnalysisPolicy, CorpusPolicy, FetchPolicy, ModelPolicy, ModelProvider,
    SearchBackend, SearchPolicy, StrategyKind,
};
pub use types::*;
